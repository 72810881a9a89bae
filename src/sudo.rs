//! Scoped sudo context.
//!
//! Elevation is never requested up front. The plan pass first proves that
//! at least one absent directive needs the privileged bundle copy; only
//! then is the timestamp validated, once, with the reason printed. The
//! timestamp is invalidated again the moment the context drops, so
//! privileges never outlive the apply pass.

use anyhow::{Context, Result, bail};
use colored::Colorize;
use std::process::{Command, Stdio};

/// Holds a validated sudo timestamp for the duration of the apply pass.
pub struct SudoContext(());

impl SudoContext {
    /// Validate the sudo timestamp, prompting for a password if needed.
    /// `reason` tells the user why before the prompt appears.
    pub fn acquire(reason: &str) -> Result<Self> {
        eprintln!();
        eprintln!("  {} {}", "sudo needed:".yellow().bold(), reason);

        let status = Command::new("sudo")
            .arg("-v")
            .status()
            .context("Failed to execute sudo")?;
        if !status.success() {
            bail!("sudo privileges were not granted");
        }
        Ok(Self(()))
    }

    /// Run `cmd` under sudo, reporting whether it exited cleanly. Output
    /// is suppressed; callers surface their own errors.
    pub fn run_status(&self, cmd: &str, args: &[&str]) -> Result<bool> {
        let status = Command::new("sudo")
            .arg(cmd)
            .args(args)
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .with_context(|| format!("Failed to execute: sudo {}", cmd))?;
        Ok(status.success())
    }
}

impl Drop for SudoContext {
    // Give the privileges back as soon as the pass is done with them.
    fn drop(&mut self) {
        let _ = Command::new("sudo").arg("-k").status();
    }
}
