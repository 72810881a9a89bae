//! Host version gate, checked once before any other work.

use anyhow::{Context, Result, bail};

use crate::runner;

/// Oldest supported major release. Big Sur is the first with arm64
/// support, which the artifact resolvers assume throughout.
const MIN_MAJOR_VERSION: u32 = 11;

/// Verify the host runs a supported macOS release.
///
/// An unsupported or unparseable version is fatal; nothing else should
/// run on a host we cannot reason about.
pub fn ensure_supported() -> Result<()> {
    let version = runner::run_capture("sw_vers", &["-productVersion"])
        .context("Could not query the macOS version")?;
    let major = parse_major(&version)
        .with_context(|| format!("Unrecognized macOS version '{}'", version))?;
    if major < MIN_MAJOR_VERSION {
        bail!(
            "macOS {} is not supported (need {} or newer)",
            version,
            MIN_MAJOR_VERSION
        );
    }
    Ok(())
}

fn parse_major(version: &str) -> Option<u32> {
    version.trim().split('.').next()?.parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_major_modern() {
        assert_eq!(parse_major("14.2.1"), Some(14));
        assert_eq!(parse_major("11.0"), Some(11));
    }

    #[test]
    fn test_parse_major_legacy() {
        assert_eq!(parse_major("10.15.7"), Some(10));
    }

    #[test]
    fn test_parse_major_trims_output() {
        assert_eq!(parse_major("13.6\n"), Some(13));
    }

    #[test]
    fn test_parse_major_garbage() {
        assert_eq!(parse_major(""), None);
        assert_eq!(parse_major("beta"), None);
    }
}
