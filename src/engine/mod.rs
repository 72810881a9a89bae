//! The convergence engine
//!
//! One pass walks every directive in config order:
//! 1. Presence - is the unit already there?
//! 2. Resolution - turn indirect locators into concrete download URLs
//! 3. Install - apply the backend action (apply mode only)
//!
//! Plan mode stops after resolution, so a dry run previews the exact
//! artifacts an apply would fetch without touching the machine.

pub mod pass;

pub use pass::{print_summary, run_pass};

use anyhow::Result;
use fetchkit::ResolvedArtifact;

use crate::directive::{Category, InstallDirective};

/// Whether a pass may mutate the machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Report what would change; resolvers still run.
    Plan,
    /// Actually install.
    Apply,
}

/// Terminal state of one directive within a pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    AlreadyPresent,
    Installed,
    WouldInstall,
    Failed(String),
    SkippedManual,
    SkippedUnknown,
}

/// One directive's record in the pass report.
#[derive(Debug, Clone)]
pub struct Record {
    pub name: String,
    pub category: Category,
    pub outcome: Outcome,
    /// Present when resolution ran, so plan output can show the URL.
    pub artifact: Option<ResolvedArtifact>,
}

/// Everything one pass learned, in directive order.
#[derive(Debug, Default)]
pub struct PassReport {
    pub records: Vec<Record>,
    /// At least one absent directive needs the privileged copy path.
    pub elevation_needed: bool,
    /// At least one version-manager install ran; shims owed at end of run.
    pub reshim_owed: bool,
}

/// Outcome tallies for the end-of-run summary.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct OutcomeCounts {
    pub already_present: usize,
    pub installed: usize,
    pub would_install: usize,
    pub failed: usize,
    pub skipped_manual: usize,
    pub skipped_unknown: usize,
}

impl PassReport {
    pub fn counts(&self) -> OutcomeCounts {
        let mut counts = OutcomeCounts::default();
        for record in &self.records {
            match record.outcome {
                Outcome::AlreadyPresent => counts.already_present += 1,
                Outcome::Installed => counts.installed += 1,
                Outcome::WouldInstall => counts.would_install += 1,
                Outcome::Failed(_) => counts.failed += 1,
                Outcome::SkippedManual => counts.skipped_manual += 1,
                Outcome::SkippedUnknown => counts.skipped_unknown += 1,
            }
        }
        counts
    }

    pub fn is_success(&self) -> bool {
        self.counts().failed == 0
    }
}

/// Seam between the engine and the real machine. Passes are driven
/// against fakes in tests and against [`crate::machine::LiveMachine`]
/// in production.
pub trait Machine {
    /// Read-only presence query.
    fn is_present(&self, directive: &InstallDirective) -> bool;

    /// Turn an indirect locator into a concrete artifact. `None` for
    /// methods that carry no download.
    fn resolve(&self, directive: &InstallDirective) -> Result<Option<ResolvedArtifact>>;

    /// Apply the backend action.
    fn install(
        &self,
        directive: &InstallDirective,
        artifact: Option<&ResolvedArtifact>,
    ) -> Result<()>;

    /// Would installing this directive need the privileged copy path?
    fn needs_elevation(&self, directive: &InstallDirective) -> bool;
}
