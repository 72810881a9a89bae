//! Presence checks: the "is this already installed" side of convergence.
//!
//! All read-only. A presence check never installs anything and never
//! fails; anything unreadable or unresolvable counts as absent.

use crate::directive::{Category, InstallDirective, Method};
use crate::paths;
use crate::runner;

/// Route a directive to its backend's presence query.
pub fn is_present(directive: &InstallDirective) -> bool {
    match (directive.category, &directive.method) {
        (Category::Brew, Method::Install) => brew_present(&directive.name),
        (Category::Asdf, Method::Install) => asdf_present(&directive.name, &directive.payload),
        _ => path_present(&directive.target_path),
    }
}

/// Does the target path exist? Tilde and environment references are
/// expanded first; symlinks are followed, so a dangling link is absent.
pub fn path_present(target: &str) -> bool {
    paths::expand(target).exists()
}

/// Native query: `brew list <name>` exits zero only when installed.
pub fn brew_present(name: &str) -> bool {
    runner::run_quiet("brew", &["list", name])
}

/// Native query: the requested version appears in `asdf list <name>`.
pub fn asdf_present(name: &str, version: &str) -> bool {
    match runner::run_capture_ok("asdf", &["list", name]) {
        Some(output) => version_listed(&output, version),
        None => false,
    }
}

// Substring match over the whole listing. Coarse on purpose: "3.12" is
// satisfied by an installed "3.12.1". Pin the full version in the config
// when that matters.
fn version_listed(output: &str, version: &str) -> bool {
    output.contains(version)
}
