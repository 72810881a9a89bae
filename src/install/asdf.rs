//! asdf version installs: register the plugin, install the exact
//! version, promote it to the global default.

use anyhow::{Result, bail};
use log::debug;

use crate::runner;

pub fn install(name: &str, version: &str) -> Result<()> {
    ensure_plugin(name)?;

    let status = runner::run("asdf", &["install", name, version])?;
    if !status.success() {
        bail!("asdf install {} {} failed", name, version);
    }

    let status = runner::run("asdf", &["global", name, version])?;
    if !status.success() {
        bail!("asdf global {} {} failed", name, version);
    }
    Ok(())
}

fn ensure_plugin(name: &str) -> Result<()> {
    if let Some(plugins) = runner::run_capture_ok("asdf", &["plugin", "list"])
        && plugins.lines().any(|line| line.trim() == name)
    {
        debug!("asdf plugin '{}' already registered", name);
        return Ok(());
    }

    let status = runner::run("asdf", &["plugin", "add", name])?;
    if !status.success() {
        bail!("asdf plugin add {} failed", name);
    }
    Ok(())
}

/// Regenerate shims once at the end of a run that installed versions.
pub fn reshim() -> Result<()> {
    let status = runner::run("asdf", &["reshim"])?;
    if !status.success() {
        bail!("asdf reshim failed");
    }
    Ok(())
}
