//! # fetchkit
//!
//! Synchronous resolution of macOS application downloads.
//!
//! This crate turns an indirect source locator into a concrete disk image
//! download:
//! - latest GitHub release assets ([`release`])
//! - hyperlink scans of vendor download pages ([`webpage`])
//! - JSON indexes embedded in vendor page markup ([`vendor`])
//!
//! All three resolvers share one architecture preference policy
//! ([`prefer`]) and a bounded-timeout HTTP layer ([`http`]). Resolution is
//! read-only and idempotent: nothing here mutates the host, and results are
//! recomputed on every call because the upstream release or page may have
//! changed.
//!
//! ## Example
//!
//! ```no_run
//! use fetchkit::{ArchTag, release};
//!
//! let arch = ArchTag::detect();
//! let artifact = release::resolve("wez/wezterm", arch).expect("no disk image asset");
//! println!("{} -> {}", artifact.filename, artifact.url);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod arch;
pub mod error;
pub mod http;
pub mod prefer;
pub mod release;
pub mod vendor;
pub mod webpage;

pub use arch::ArchTag;
pub use error::{Error, Result};

/// A concrete downloadable artifact produced by a resolver.
///
/// Ephemeral by design: never persisted across runs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedArtifact {
    /// Absolute download URL.
    pub url: String,
    /// Filename to store the download under.
    pub filename: String,
}

impl ResolvedArtifact {
    /// Build an artifact from a URL, deriving the filename from its last
    /// path segment.
    #[must_use]
    pub fn from_url(url: &str) -> Self {
        Self {
            url: url.to_string(),
            filename: filename_from_url(url),
        }
    }
}

/// Last path segment of a URL, query string and fragment excluded.
fn filename_from_url(url: &str) -> String {
    let path = url.split(['?', '#']).next().unwrap_or(url);
    path.rsplit('/')
        .next()
        .filter(|segment| !segment.is_empty())
        .unwrap_or("download.dmg")
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filename_from_plain_url() {
        let artifact = ResolvedArtifact::from_url("https://example.com/apps/Tool.dmg");
        assert_eq!(artifact.filename, "Tool.dmg");
        assert_eq!(artifact.url, "https://example.com/apps/Tool.dmg");
    }

    #[test]
    fn test_filename_strips_query() {
        let artifact = ResolvedArtifact::from_url("https://example.com/Tool.dmg?ref=site");
        assert_eq!(artifact.filename, "Tool.dmg");
    }

    #[test]
    fn test_filename_strips_fragment() {
        let artifact = ResolvedArtifact::from_url("https://example.com/Tool.dmg#latest");
        assert_eq!(artifact.filename, "Tool.dmg");
    }

    #[test]
    fn test_filename_falls_back_on_trailing_slash() {
        let artifact = ResolvedArtifact::from_url("https://example.com/downloads/");
        assert_eq!(artifact.filename, "download.dmg");
    }
}
