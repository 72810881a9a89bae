//! End-to-end convergence run: gate, load, plan, apply, finish up.
//!
//! Two passes over the same directives. The plan pass is read-only and
//! decides whether sudo is worth asking for; the apply pass mutates.
//! Post-pass steps (reshim, shell profile, cleanup) are best-effort:
//! their failures are reported but never change the exit code.

use anyhow::Result;
use log::info;

use fetchkit::ArchTag;

use crate::cleanup;
use crate::config::{self, Settings};
use crate::engine::{self, Mode, PassReport};
use crate::host;
use crate::install::asdf;
use crate::machine::LiveMachine;
use crate::paths;
use crate::profile;
use crate::sudo::SudoContext;
use crate::ui;

/// Options distilled from the CLI.
pub struct ConvergeOptions {
    pub personal: bool,
    pub cleanup: bool,
    pub dry_run: bool,
}

/// Run one full convergence.
pub fn run(opts: &ConvergeOptions) -> Result<()> {
    host::ensure_supported()?;

    let config_dir = paths::config_dir()?;
    let settings = Settings::load(&config_dir)?;
    let personal = opts.personal || settings.personal;
    let directives = config::load_directives(&config_dir, personal)?;

    if directives.is_empty() {
        ui::warn(&format!("no directives found in {}", config_dir.display()));
        return Ok(());
    }

    let arch = ArchTag::detect();
    info!("host architecture: {}", arch);

    ui::header(&format!("Converging {} directives", directives.len()));
    if opts.dry_run {
        ui::warn("Dry run - no changes will be made");
    }

    // Plan pass: read-only, but resolvers still run so the preview
    // shows the exact artifacts an apply would fetch.
    ui::section("Planning");
    let planner = LiveMachine::new(arch, &settings.applications_dir, None);
    let plan = engine::run_pass(&planner, &directives, Mode::Plan);

    if opts.dry_run {
        engine::print_summary(&plan);
        return Ok(());
    }

    let report = if plan.counts().would_install == 0 {
        ui::dim("nothing to install");
        plan
    } else {
        apply(&directives, &plan, arch, &settings)?
    };

    if report.reshim_owed {
        ui::section("Regenerating shims");
        if let Err(e) = asdf::reshim() {
            ui::error(&format!("reshim failed: {:#}", e));
        }
    }

    ui::section("Shell profile");
    let profile_path = paths::expand(&settings.profile_path);
    if let Err(e) = profile::reconcile(&profile_path) {
        ui::error(&format!("shell profile: {:#}", e));
    }

    if opts.cleanup {
        ui::section("Cleanup");
        if let Err(e) = cleanup::sweep() {
            ui::error(&format!("cleanup: {:#}", e));
        }
    }

    engine::print_summary(&report);
    Ok(())
}

fn apply(
    directives: &[crate::directive::InstallDirective],
    plan: &PassReport,
    arch: ArchTag,
    settings: &Settings,
) -> Result<PassReport> {
    // Sudo is requested at most once, and only because the plan proved
    // something absent needs the privileged copy path.
    let sudo = if plan.elevation_needed {
        Some(SudoContext::acquire(
            "copy application bundles into the applications directory",
        )?)
    } else {
        None
    };

    ui::section("Applying");
    let applier = LiveMachine::new(arch, &settings.applications_dir, sudo.as_ref());
    Ok(engine::run_pass(&applier, directives, Mode::Apply))
}
