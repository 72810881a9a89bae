use anyhow::{Context, Result};
use log::warn;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

use crate::directive::{self, InstallDirective};

// ============================================================================
// Settings
// ============================================================================

/// Optional `settings.toml` in the config directory. Every field has a
/// default, and a missing file means all defaults.
#[derive(Debug, Deserialize)]
pub struct Settings {
    /// Where `.app` bundles get copied.
    #[serde(default = "default_applications_dir")]
    pub applications_dir: String,
    /// Shell profile that receives the managed block.
    #[serde(default = "default_profile_path")]
    pub profile_path: String,
    /// Include `.personal.` config files without passing the flag.
    #[serde(default)]
    pub personal: bool,
}

fn default_applications_dir() -> String {
    "/Applications".to_string()
}

fn default_profile_path() -> String {
    "~/.zshrc".to_string()
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            applications_dir: default_applications_dir(),
            profile_path: default_profile_path(),
            personal: false,
        }
    }
}

impl Settings {
    /// Load settings.toml from `dir`, falling back to defaults when the
    /// file does not exist. A file that exists but fails to parse is an
    /// error; silently ignoring a typo'd settings file would be worse.
    pub fn load(dir: &Path) -> Result<Self> {
        let path = dir.join("settings.toml");
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = fs::read_to_string(&path)
            .with_context(|| format!("Could not read {}", path.display()))?;
        toml::from_str(&content).with_context(|| format!("Invalid {}", path.display()))
    }
}

// ============================================================================
// Directive files
// ============================================================================

/// List the `.list` files under `dir` in lexicographic filename order.
/// Files with a `.personal.` infix are included only when `personal` is set.
pub fn discover_list_files(dir: &Path, personal: bool) -> Result<Vec<PathBuf>> {
    let entries = fs::read_dir(dir)
        .with_context(|| format!("Could not read config directory {}", dir.display()))?;

    let mut files: Vec<PathBuf> = Vec::new();
    for entry in entries {
        let path = entry?.path();
        if !path.is_file() {
            continue;
        }
        let Some(file_name) = path.file_name().and_then(|n| n.to_str()) else {
            continue;
        };
        if !file_name.ends_with(".list") {
            continue;
        }
        if file_name.contains(".personal.") && !personal {
            continue;
        }
        files.push(path);
    }
    files.sort();
    Ok(files)
}

/// Parse every discovered config file into a single directive sequence,
/// preserving file order then line order. Malformed lines are logged with
/// their location and skipped.
pub fn load_directives(dir: &Path, personal: bool) -> Result<Vec<InstallDirective>> {
    let mut directives = Vec::new();
    for path in discover_list_files(dir, personal)? {
        let content = fs::read_to_string(&path)
            .with_context(|| format!("Could not read {}", path.display()))?;
        for (index, line) in content.lines().enumerate() {
            match directive::parse_line(line) {
                Ok(Some(d)) => directives.push(d),
                Ok(None) => {}
                Err(e) => warn!("{}:{}: {} (line skipped)", path.display(), index + 1, e),
            }
        }
    }
    Ok(directives)
}
