//! Pass runner: takes each directive through its states and reports.
//!
//! Per directive: `Pending -> {AlreadyPresent | Resolving -> Resolved ->
//! Installing -> {Installed | Failed}} | ManualSkip | UnknownSkip`.
//! Terminal states never transition again within a run, and one
//! directive's failure never stops the pass.

use colored::Colorize;
use log::warn;

use crate::directive::{Category, InstallDirective, Method};
use crate::ui;

use super::{Machine, Mode, Outcome, PassReport, Record};

/// Run one full convergence pass over `directives` in order.
pub fn run_pass(machine: &dyn Machine, directives: &[InstallDirective], mode: Mode) -> PassReport {
    let mut report = PassReport::default();
    let total = directives.len();

    for (index, directive) in directives.iter().enumerate() {
        ui::step(
            index + 1,
            total,
            &format!("{} ({})", directive.name, directive.category.token()),
        );
        let record = step(machine, directive, mode, &mut report);
        announce(&record);
        report.records.push(record);
    }

    report
}

fn step(
    machine: &dyn Machine,
    directive: &InstallDirective,
    mode: Mode,
    report: &mut PassReport,
) -> Record {
    let record = |outcome: Outcome, artifact: Option<fetchkit::ResolvedArtifact>| Record {
        name: directive.name.clone(),
        category: directive.category,
        outcome,
        artifact,
    };

    match &directive.method {
        Method::Manual => return record(Outcome::SkippedManual, None),
        Method::Unknown(token) => {
            warn!("{}: unknown method '{}', skipped", directive.name, token);
            return record(Outcome::SkippedUnknown, None);
        }
        _ => {}
    }

    if machine.is_present(directive) {
        return record(Outcome::AlreadyPresent, None);
    }

    if machine.needs_elevation(directive) {
        report.elevation_needed = true;
    }

    let artifact = match machine.resolve(directive) {
        Ok(artifact) => artifact,
        Err(e) => return record(Outcome::Failed(format!("{:#}", e)), None),
    };

    if mode == Mode::Plan {
        return record(Outcome::WouldInstall, artifact);
    }

    match machine.install(directive, artifact.as_ref()) {
        Ok(()) => {
            if directive.category == Category::Asdf && directive.method == Method::Install {
                report.reshim_owed = true;
            }
            record(Outcome::Installed, artifact)
        }
        Err(e) => record(Outcome::Failed(format!("{:#}", e)), artifact),
    }
}

fn announce(record: &Record) {
    match &record.outcome {
        Outcome::AlreadyPresent => ui::dim("already present"),
        Outcome::Installed => ui::success(&format!("{} installed", record.name)),
        Outcome::WouldInstall => match &record.artifact {
            Some(artifact) => {
                ui::info(&format!("would install {} from {}", record.name, artifact.url));
            }
            None => ui::info(&format!("would install {}", record.name)),
        },
        Outcome::Failed(reason) => ui::error(&format!("{} failed: {}", record.name, reason)),
        Outcome::SkippedManual => {
            ui::warn(&format!("{} must be installed manually", record.name));
        }
        Outcome::SkippedUnknown => ui::dim("skipped (unknown method)"),
    }
}

/// Print the end-of-run summary.
pub fn print_summary(report: &PassReport) {
    let counts = report.counts();
    println!();
    if report.is_success() {
        println!("  {} Converged", "✓".green().bold());
    } else {
        println!("  {} Converged with failures", "⚠".yellow().bold());
    }

    if counts.already_present > 0 {
        println!("    • {} already present", counts.already_present);
    }
    if counts.installed > 0 {
        println!("    • {} installed", counts.installed);
    }
    if counts.would_install > 0 {
        println!("    • {} would be installed", counts.would_install);
    }
    if counts.skipped_manual > 0 {
        println!("    • {} manual, left to you", counts.skipped_manual);
    }
    if counts.skipped_unknown > 0 {
        println!("    • {} skipped (unknown method)", counts.skipped_unknown);
    }
    if counts.failed > 0 {
        println!("    • {} {}", counts.failed, "failed".red());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::{Result, bail};
    use fetchkit::ResolvedArtifact;
    use std::cell::RefCell;

    use crate::directive;

    fn parse(line: &str) -> InstallDirective {
        directive::parse_line(line).unwrap().unwrap()
    }

    #[derive(Default)]
    struct FakeMachine {
        present: Vec<&'static str>,
        fail_resolve: Vec<&'static str>,
        fail_install: Vec<&'static str>,
        installs: RefCell<Vec<String>>,
        resolutions: RefCell<Vec<String>>,
    }

    impl Machine for FakeMachine {
        fn is_present(&self, directive: &InstallDirective) -> bool {
            self.present.contains(&directive.name.as_str())
        }

        fn resolve(&self, directive: &InstallDirective) -> Result<Option<ResolvedArtifact>> {
            if self.fail_resolve.contains(&directive.name.as_str()) {
                bail!("no matching download found");
            }
            match directive.method {
                Method::Dmg
                | Method::DmgGithub
                | Method::DmgWeb
                | Method::DmgVendor
                | Method::Zip => {
                    self.resolutions.borrow_mut().push(directive.name.clone());
                    Ok(Some(ResolvedArtifact::from_url(
                        "https://example.com/Tool.dmg",
                    )))
                }
                _ => Ok(None),
            }
        }

        fn install(
            &self,
            directive: &InstallDirective,
            _artifact: Option<&ResolvedArtifact>,
        ) -> Result<()> {
            if self.fail_install.contains(&directive.name.as_str()) {
                bail!("install blew up");
            }
            self.installs.borrow_mut().push(directive.name.clone());
            Ok(())
        }

        fn needs_elevation(&self, directive: &InstallDirective) -> bool {
            matches!(
                directive.method,
                Method::Dmg
                    | Method::DmgGithub
                    | Method::DmgWeb
                    | Method::DmgVendor
                    | Method::Zip
            )
        }
    }

    #[test]
    fn test_present_directive_never_reaches_installer() {
        let machine = FakeMachine {
            present: vec!["fzf"],
            ..Default::default()
        };
        let directives = [parse("brew=fzf::install::fzf::")];
        let report = run_pass(&machine, &directives, Mode::Apply);

        assert_eq!(report.records[0].outcome, Outcome::AlreadyPresent);
        assert!(machine.installs.borrow().is_empty());
    }

    #[test]
    fn test_plan_mode_resolves_but_never_installs() {
        let machine = FakeMachine::default();
        let directives = [parse(
            "custom=wezterm::dmg-github::wez/wezterm::/Applications/WezTerm.app",
        )];
        let report = run_pass(&machine, &directives, Mode::Plan);

        assert_eq!(report.records[0].outcome, Outcome::WouldInstall);
        assert!(report.records[0].artifact.is_some());
        assert_eq!(machine.resolutions.borrow().as_slice(), ["wezterm"]);
        assert!(machine.installs.borrow().is_empty());
        assert!(report.elevation_needed);
    }

    #[test]
    fn test_apply_installs_absent_directive() {
        let machine = FakeMachine::default();
        let directives = [parse("brew=fzf::install::fzf::")];
        let report = run_pass(&machine, &directives, Mode::Apply);

        assert_eq!(report.records[0].outcome, Outcome::Installed);
        assert_eq!(machine.installs.borrow().as_slice(), ["fzf"]);
        assert!(!report.elevation_needed);
    }

    #[test]
    fn test_failure_is_isolated_pass_continues() {
        let machine = FakeMachine {
            fail_install: vec!["broken"],
            ..Default::default()
        };
        let directives = [
            parse("brew=broken::install::broken::"),
            parse("brew=fine::install::fine::"),
        ];
        let report = run_pass(&machine, &directives, Mode::Apply);

        assert!(matches!(report.records[0].outcome, Outcome::Failed(_)));
        assert_eq!(report.records[1].outcome, Outcome::Installed);
        assert_eq!(machine.installs.borrow().as_slice(), ["fine"]);
    }

    #[test]
    fn test_resolve_failure_never_installs() {
        let machine = FakeMachine {
            fail_resolve: vec!["ghost"],
            ..Default::default()
        };
        let directives = [parse(
            "custom=ghost::dmg-web::https://ghost.example/download::/Applications/Ghost.app",
        )];
        let report = run_pass(&machine, &directives, Mode::Apply);

        match &report.records[0].outcome {
            Outcome::Failed(reason) => assert!(reason.contains("no matching download")),
            other => panic!("expected failure, got {:?}", other),
        }
        assert!(machine.installs.borrow().is_empty());
    }

    #[test]
    fn test_manual_and_unknown_skip_without_touching_machine() {
        let machine = FakeMachine::default();
        let directives = [
            parse("custom=xcode::manual::from the App Store::"),
            parse("custom=tool::pkg::https://example.com/t.pkg::/Applications/T.app"),
        ];
        let report = run_pass(&machine, &directives, Mode::Apply);

        assert_eq!(report.records[0].outcome, Outcome::SkippedManual);
        assert_eq!(report.records[1].outcome, Outcome::SkippedUnknown);
        assert!(machine.installs.borrow().is_empty());
        assert!(machine.resolutions.borrow().is_empty());
    }

    #[test]
    fn test_reshim_owed_only_after_version_install() {
        let machine = FakeMachine::default();

        let directives = [parse("asdf=python::install::3.12.1::")];
        let report = run_pass(&machine, &directives, Mode::Apply);
        assert!(report.reshim_owed);

        let directives = [parse("brew=fzf::install::fzf::")];
        let report = run_pass(&machine, &directives, Mode::Apply);
        assert!(!report.reshim_owed);
    }

    #[test]
    fn test_elevation_not_flagged_when_already_present() {
        let machine = FakeMachine {
            present: vec!["wezterm"],
            ..Default::default()
        };
        let directives = [parse(
            "custom=wezterm::dmg-github::wez/wezterm::/Applications/WezTerm.app",
        )];
        let report = run_pass(&machine, &directives, Mode::Plan);
        assert!(!report.elevation_needed);
    }

    #[test]
    fn test_counts_tally_records() {
        let machine = FakeMachine {
            present: vec!["fzf"],
            fail_install: vec!["broken"],
            ..Default::default()
        };
        let directives = [
            parse("brew=fzf::install::fzf::"),
            parse("brew=broken::install::broken::"),
            parse("custom=xcode::manual::from the App Store::"),
            parse("brew=fine::install::fine::"),
        ];
        let report = run_pass(&machine, &directives, Mode::Apply);
        let counts = report.counts();

        assert_eq!(counts.already_present, 1);
        assert_eq!(counts.failed, 1);
        assert_eq!(counts.skipped_manual, 1);
        assert_eq!(counts.installed, 1);
        assert!(!report.is_success());
    }
}
