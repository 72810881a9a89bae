//! The `run` method: execute a configured shell command verbatim.
//!
//! Deliberately unvalidated. Config files are trusted input, and this is
//! the escape hatch for installs nothing else covers.

use anyhow::{Result, bail};
use log::debug;

use crate::runner;

pub fn install(payload: &str) -> Result<()> {
    debug!("running: {}", payload);
    let status = runner::run_shell(payload)?;
    if !status.success() {
        bail!("command exited with {}", status);
    }
    Ok(())
}
