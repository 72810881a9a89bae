mod cleanup;
mod cli;
mod config;
mod converge;
mod directive;
mod engine;
mod host;
mod install;
mod machine;
mod paths;
mod presence;
mod profile;
mod runner;
mod sudo;
mod ui;

use anyhow::Result;
use clap::{CommandFactory, Parser};
use clap_complete::generate;
use cli::Cli;
use std::io;

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging based on verbosity
    let log_level = match cli.verbose {
        0 => log::LevelFilter::Warn,
        1 => log::LevelFilter::Info,
        2 => log::LevelFilter::Debug,
        _ => log::LevelFilter::Trace,
    };

    env_logger::Builder::new()
        .filter_level(log_level)
        .format_timestamp(None)
        .init();

    if let Some(shell) = cli.completions {
        let mut cmd = Cli::command();
        generate(shell, &mut cmd, "rigup", &mut io::stdout());
        return Ok(());
    }

    converge::run(&converge::ConvergeOptions {
        personal: cli.personal,
        cleanup: cli.cleanup,
        dry_run: cli.dry_run,
    })
}
