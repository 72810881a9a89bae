//! Centralized path resolution for rigup
//!
//! # Environment Variables
//!
//! - `RIGUP_CONFIG_DIR` - Override config directory (e.g., `~/dotfiles/rigup`)
//!
//! # Path Resolution Priority
//!
//! For config_dir():
//! 1. `RIGUP_CONFIG_DIR` environment variable
//! 2. `XDG_CONFIG_HOME/rigup` (if set)
//! 3. Default: `~/.config/rigup`

use anyhow::{Context, Result};
use std::path::PathBuf;

/// Environment variable for config directory override
pub const ENV_CONFIG_DIR: &str = "RIGUP_CONFIG_DIR";

/// Prefix for every staging directory created under the system temp dir.
/// `--cleanup` sweeps leftovers by this prefix.
pub const STAGING_PREFIX: &str = "rigup-";

/// Get the rigup config directory path
pub fn config_dir() -> Result<PathBuf> {
    // 1. Check environment variable override
    if let Ok(dir) = std::env::var(ENV_CONFIG_DIR) {
        let path = expand(&dir);
        log::debug!(
            "Using config dir from {}: {}",
            ENV_CONFIG_DIR,
            path.display()
        );
        return Ok(path);
    }

    // 2. Check XDG_CONFIG_HOME
    if let Ok(xdg_config) = std::env::var("XDG_CONFIG_HOME") {
        let path = PathBuf::from(xdg_config).join("rigup");
        log::debug!("Using XDG_CONFIG_HOME: {}", path.display());
        return Ok(path);
    }

    // 3. Default: ~/.config/rigup
    let home = dirs::home_dir().context("Could not determine home directory")?;
    let path = home.join(".config").join("rigup");
    log::debug!("Using default config dir: {}", path.display());
    Ok(path)
}

/// Expand ~ and environment variables in a path string.
///
/// This is the canonical path expansion function for rigup. All modules
/// should use this instead of calling shellexpand directly.
pub fn expand(path: &str) -> PathBuf {
    let expanded = shellexpand::full(path).unwrap_or(std::borrow::Cow::Borrowed(path));
    PathBuf::from(expanded.as_ref())
}

/// Create a fresh staging directory, removed when the handle drops.
pub fn staging_dir() -> Result<tempfile::TempDir> {
    tempfile::Builder::new()
        .prefix(STAGING_PREFIX)
        .tempdir()
        .context("Could not create staging directory")
}

// ============================================================================
// Tests
// ============================================================================
