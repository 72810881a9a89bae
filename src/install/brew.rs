//! Homebrew installs. The payload is passed through word-split, so
//! config authors can carry flags like `--cask` themselves.

use anyhow::{Result, bail};

use crate::runner;

pub fn install(payload: &str) -> Result<()> {
    let mut args = vec!["install"];
    args.extend(payload.split_whitespace());
    let status = runner::run("brew", &args)?;
    if !status.success() {
        bail!("brew install {} failed", payload);
    }
    Ok(())
}
