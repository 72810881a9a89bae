//! Mac App Store installs through the `mas` CLI.
//!
//! A numeric payload is an App Store identifier and installs directly.
//! Anything else is a search term, disambiguated against the catalog:
//! exact title matches win, and a search that stays ambiguous is a
//! failure asking the operator to pin the identifier instead.

use anyhow::{Context, Result, bail};
use log::warn;

use crate::runner;

pub fn install(payload: &str) -> Result<()> {
    if !runner::command_exists("mas") {
        bail!("mas CLI not found (brew install mas)");
    }

    let id = if is_store_id(payload) {
        payload.to_string()
    } else {
        search_id(payload)?
    };

    let status = runner::run("mas", &["install", &id])?;
    if !status.success() {
        bail!("mas install {} failed", id);
    }
    Ok(())
}

fn is_store_id(payload: &str) -> bool {
    !payload.is_empty() && payload.chars().all(|c| c.is_ascii_digit())
}

fn search_id(term: &str) -> Result<String> {
    let output = runner::run_capture("mas", &["search", term])
        .with_context(|| format!("mas search '{}' failed", term))?;
    let hits = parse_search(&output);
    if hits.is_empty() {
        bail!("no App Store results for '{}'", term);
    }
    pick_hit(term, &hits)
}

#[derive(Debug, PartialEq, Eq)]
struct SearchHit {
    id: String,
    title: String,
}

fn parse_search(output: &str) -> Vec<SearchHit> {
    output.lines().filter_map(parse_search_line).collect()
}

// mas prints `  1451685025  WireGuard  (1.0.16)`; anything without a
// leading numeric id is noise.
fn parse_search_line(line: &str) -> Option<SearchHit> {
    let (id, rest) = line.trim_start().split_once(char::is_whitespace)?;
    if id.is_empty() || !id.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    let rest = rest.trim();
    let title = match rest.rfind('(') {
        Some(index) => rest[..index].trim(),
        None => rest,
    };
    Some(SearchHit {
        id: id.to_string(),
        title: title.to_string(),
    })
}

fn pick_hit(term: &str, hits: &[SearchHit]) -> Result<String> {
    let exact: Vec<&SearchHit> = hits
        .iter()
        .filter(|h| h.title.eq_ignore_ascii_case(term))
        .collect();

    match exact.len() {
        1 => Ok(exact[0].id.clone()),
        0 => match hits.len() {
            1 => Ok(hits[0].id.clone()),
            n => bail!(
                "'{}' is ambiguous: {} results, no exact title match; use the numeric identifier",
                term,
                n
            ),
        },
        _ => {
            let others: Vec<String> = exact[1..]
                .iter()
                .map(|h| format!("{} [{}]", h.title, h.id))
                .collect();
            warn!(
                "several exact matches for '{}'; using [{}] over {}",
                term,
                exact[0].id,
                others.join(", ")
            );
            Ok(exact[0].id.clone())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SEARCH_OUTPUT: &str = "\
   1451685025  WireGuard                  (1.0.16)
    497799835  Xcode                      (15.2)
   1333542190  1Password 7 - Password Manager (7.9.11)
";

    #[test]
    fn test_parse_search_lines() {
        let hits = parse_search(SEARCH_OUTPUT);
        assert_eq!(hits.len(), 3);
        assert_eq!(hits[0].id, "1451685025");
        assert_eq!(hits[0].title, "WireGuard");
        assert_eq!(hits[2].title, "1Password 7 - Password Manager");
    }

    #[test]
    fn test_parse_search_skips_noise() {
        let hits = parse_search("No results found\n");
        assert!(hits.is_empty());
    }

    #[test]
    fn test_parse_search_line_without_version_suffix() {
        let hit = parse_search_line("  12345  Plain Title").unwrap();
        assert_eq!(hit.title, "Plain Title");
    }

    #[test]
    fn test_parse_search_line_title_containing_parens() {
        let hit = parse_search_line("  12345  Tool (Beta) (2.0)").unwrap();
        assert_eq!(hit.title, "Tool (Beta)");
    }

    #[test]
    fn test_pick_hit_single_exact_match() {
        let hits = parse_search(SEARCH_OUTPUT);
        assert_eq!(pick_hit("wireguard", &hits).unwrap(), "1451685025");
    }

    #[test]
    fn test_pick_hit_several_exact_matches_takes_first() {
        let hits = vec![
            SearchHit {
                id: "111".into(),
                title: "Magnet".into(),
            },
            SearchHit {
                id: "222".into(),
                title: "magnet".into(),
            },
        ];
        assert_eq!(pick_hit("Magnet", &hits).unwrap(), "111");
    }

    #[test]
    fn test_pick_hit_no_exact_single_result_falls_back() {
        let hits = vec![SearchHit {
            id: "333".into(),
            title: "WireGuard Tunnel Manager".into(),
        }];
        assert_eq!(pick_hit("WireGuard", &hits).unwrap(), "333");
    }

    #[test]
    fn test_pick_hit_no_exact_many_results_is_ambiguous() {
        let hits = parse_search(SEARCH_OUTPUT);
        let err = pick_hit("Password", &hits).unwrap_err();
        assert!(err.to_string().contains("ambiguous"));
    }

    #[test]
    fn test_is_store_id() {
        assert!(is_store_id("1451685025"));
        assert!(!is_store_id("WireGuard"));
        assert!(!is_store_id(""));
        assert!(!is_store_id("123abc"));
    }
}
