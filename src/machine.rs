//! The live machine: routes engine queries to the real backends.

use anyhow::Result;
use fetchkit::{ArchTag, ResolvedArtifact};

use crate::directive::{InstallDirective, Method};
use crate::engine::Machine;
use crate::install::{self, InstallContext};
use crate::presence;
use crate::sudo::SudoContext;

/// Production [`Machine`]: presence via the real checks, resolution via
/// fetchkit, installs via the backend installers.
pub struct LiveMachine<'a> {
    arch: ArchTag,
    applications_dir: String,
    sudo: Option<&'a SudoContext>,
}

impl<'a> LiveMachine<'a> {
    pub fn new(arch: ArchTag, applications_dir: &str, sudo: Option<&'a SudoContext>) -> Self {
        Self {
            arch,
            applications_dir: applications_dir.to_string(),
            sudo,
        }
    }
}

impl Machine for LiveMachine<'_> {
    fn is_present(&self, directive: &InstallDirective) -> bool {
        presence::is_present(directive)
    }

    fn resolve(&self, directive: &InstallDirective) -> Result<Option<ResolvedArtifact>> {
        let artifact = match &directive.method {
            // Direct URLs carry their artifact in the payload.
            Method::Dmg | Method::Zip => ResolvedArtifact::from_url(&directive.payload),
            Method::DmgGithub => fetchkit::release::resolve(&directive.payload, self.arch)?,
            Method::DmgWeb => fetchkit::webpage::resolve(&directive.payload, self.arch)?,
            Method::DmgVendor => fetchkit::vendor::resolve(&directive.payload, self.arch)?,
            _ => return Ok(None),
        };
        Ok(Some(artifact))
    }

    fn install(
        &self,
        directive: &InstallDirective,
        artifact: Option<&ResolvedArtifact>,
    ) -> Result<()> {
        let ctx = InstallContext {
            sudo: self.sudo,
            applications_dir: &self.applications_dir,
        };
        install::install_and_verify(directive, artifact, &ctx)
    }

    // Copying into the applications directory is the only privileged
    // action this tool performs.
    fn needs_elevation(&self, directive: &InstallDirective) -> bool {
        matches!(
            directive.method,
            Method::Dmg | Method::DmgGithub | Method::DmgWeb | Method::DmgVendor | Method::Zip
        )
    }
}
