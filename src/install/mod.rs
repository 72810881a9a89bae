//! Backend installers
//!
//! The orchestrator checks presence before calling in here. Every install
//! re-runs the presence check afterwards, so an action that "succeeded"
//! but left the target absent is reported as a verification failure
//! rather than silently counted as installed.

pub mod archive;
pub mod asdf;
pub mod brew;
pub mod command;
pub mod dmg;
pub mod mas;

use anyhow::{Result, bail};
use fetchkit::ResolvedArtifact;

use crate::directive::{Category, InstallDirective, Method};
use crate::presence;
use crate::sudo::SudoContext;

/// Shared installer inputs.
pub struct InstallContext<'a> {
    /// Acquired lazily; only the bundle-copying installers use it.
    pub sudo: Option<&'a SudoContext>,
    /// Where `.app` bundles land.
    pub applications_dir: &'a str,
}

/// Run the matching installer, then re-check presence.
pub fn install_and_verify(
    directive: &InstallDirective,
    artifact: Option<&ResolvedArtifact>,
    ctx: &InstallContext,
) -> Result<()> {
    dispatch(directive, artifact, ctx)?;
    if !presence::is_present(directive) {
        bail!(
            "verification failed: '{}' is still absent after install",
            directive.name
        );
    }
    Ok(())
}

fn dispatch(
    directive: &InstallDirective,
    artifact: Option<&ResolvedArtifact>,
    ctx: &InstallContext,
) -> Result<()> {
    match (&directive.method, directive.category) {
        (Method::Run, _) => command::install(&directive.payload),
        (Method::Dmg | Method::DmgGithub | Method::DmgWeb | Method::DmgVendor, _) => {
            let Some(artifact) = artifact else {
                bail!("no resolved artifact for '{}'", directive.name);
            };
            dmg::install(artifact, ctx)
        }
        (Method::Zip, _) => {
            let Some(artifact) = artifact else {
                bail!("no resolved artifact for '{}'", directive.name);
            };
            archive::install(artifact, ctx)
        }
        (Method::Install, Category::Brew) => brew::install(&directive.payload),
        (Method::Install, Category::Asdf) => asdf::install(&directive.name, &directive.payload),
        (Method::Install, Category::Mas) => mas::install(&directive.payload),
        (Method::Manual | Method::Unknown(_), _) | (Method::Install, Category::Custom) => {
            bail!("'{}' has no automated installer", directive.name)
        }
    }
}
