//! Architecture preference ordering shared by every resolver.
//!
//! When a source offers several candidates, the winner is decided by a
//! fixed keyword chain: the host's own tag, then "universal", then
//! "silicon", then "apple". The keyword loop is the outer loop — the first
//! keyword satisfied by any candidate wins, taking the earliest candidate
//! in discovery order for that keyword. A name matching several keywords
//! (say "universal-apple") is therefore claimed by the earliest keyword,
//! never scored. When no keyword matches anything the pick is delegated
//! back to the caller, which applies its own last-resort rule.

use crate::arch::ArchTag;

/// Keywords tried after the host's own tag, in order.
const FALLBACK_KEYWORDS: [&str; 3] = ["universal", "silicon", "apple"];

/// Pick the preferred candidate, comparing case-insensitively against the
/// string produced by `key`.
///
/// Returns `None` when no keyword in the chain matches any candidate.
pub fn pick_preferred<'a, T, F>(candidates: &'a [T], arch: ArchTag, key: F) -> Option<&'a T>
where
    F: Fn(&T) -> &str,
{
    for keyword in keyword_chain(arch) {
        for candidate in candidates {
            if key(candidate).to_lowercase().contains(keyword) {
                return Some(candidate);
            }
        }
    }
    None
}

/// Whether `name` satisfies any keyword in the preference chain for `arch`.
#[must_use]
pub fn matches_any(name: &str, arch: ArchTag) -> bool {
    let lowered = name.to_lowercase();
    keyword_chain(arch).iter().any(|kw| lowered.contains(kw))
}

fn keyword_chain(arch: ArchTag) -> [&'static str; 4] {
    [
        arch.token(),
        FALLBACK_KEYWORDS[0],
        FALLBACK_KEYWORDS[1],
        FALLBACK_KEYWORDS[2],
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pick<'a>(candidates: &'a [&str], arch: ArchTag) -> Option<&'a str> {
        pick_preferred(candidates, arch, |c| c).copied()
    }

    #[test]
    fn test_exact_host_tag_wins() {
        let candidates = ["App-x86_64.dmg", "App-arm64.dmg", "App-universal.dmg"];
        assert_eq!(pick(&candidates, ArchTag::Arm64), Some("App-arm64.dmg"));
        assert_eq!(pick(&candidates, ArchTag::X86_64), Some("App-x86_64.dmg"));
    }

    #[test]
    fn test_universal_beats_wrong_arch_listed_first() {
        // x86_64 appears first in discovery order; an arm64 host must still
        // take the universal build.
        let candidates = ["App-x86_64.dmg", "App-universal.dmg", "App-silicon.dmg"];
        assert_eq!(pick(&candidates, ArchTag::Arm64), Some("App-universal.dmg"));
    }

    #[test]
    fn test_silicon_when_no_universal_and_no_exact() {
        let candidates = ["App-x86_64.dmg", "App-silicon.dmg"];
        assert_eq!(pick(&candidates, ArchTag::Arm64), Some("App-silicon.dmg"));
    }

    #[test]
    fn test_apple_is_last_keyword() {
        let candidates = ["App-x86_64.dmg", "App-apple.dmg"];
        assert_eq!(pick(&candidates, ArchTag::Arm64), Some("App-apple.dmg"));
    }

    #[test]
    fn test_multi_keyword_name_claimed_by_earliest_keyword() {
        // "universal-apple" satisfies both keywords; the universal pass
        // claims it before the apple pass ever runs.
        let candidates = ["App-universal-apple.dmg", "App-apple.dmg"];
        assert_eq!(
            pick(&candidates, ArchTag::Arm64),
            Some("App-universal-apple.dmg")
        );
    }

    #[test]
    fn test_document_order_within_one_keyword() {
        let candidates = ["A-arm64.dmg", "B-arm64.dmg"];
        assert_eq!(pick(&candidates, ArchTag::Arm64), Some("A-arm64.dmg"));
    }

    #[test]
    fn test_case_insensitive_match() {
        let candidates = ["App-ARM64.dmg"];
        assert_eq!(pick(&candidates, ArchTag::Arm64), Some("App-ARM64.dmg"));
    }

    #[test]
    fn test_none_when_nothing_matches() {
        let candidates = ["App.dmg", "Other.dmg"];
        assert_eq!(pick(&candidates, ArchTag::Arm64), None);
    }

    #[test]
    fn test_empty_candidates() {
        let candidates: [&str; 0] = [];
        assert_eq!(pick(&candidates, ArchTag::Arm64), None);
    }

    #[test]
    fn test_matches_any() {
        assert!(matches_any("App-arm64.dmg", ArchTag::Arm64));
        assert!(matches_any("App-universal.dmg", ArchTag::X86_64));
        assert!(matches_any("App-Silicon.dmg", ArchTag::Arm64));
        assert!(!matches_any("App.dmg", ArchTag::Arm64));
        // arm64 is not in the x86_64 host's keyword chain
        assert!(!matches_any("App-arm64.dmg", ArchTag::X86_64));
    }
}
