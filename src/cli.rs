use clap::Parser;
use clap_complete::Shell;

#[derive(Parser)]
#[command(name = "rigup")]
#[command(author = "Alberto Cavalcante")]
#[command(version)]
#[command(about = "Declarative macOS environment provisioner", long_about = None)]
pub struct Cli {
    /// Include config files with a .personal. infix
    #[arg(short, long)]
    pub personal: bool,

    /// Remove stale staging directories after the run
    #[arg(short, long)]
    pub cleanup: bool,

    /// Plan only: report what would change without touching anything
    #[arg(short = 'n', long)]
    pub dry_run: bool,

    /// Verbosity level
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Generate shell completions and exit
    #[arg(long, value_enum, value_name = "SHELL")]
    pub completions: Option<Shell>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_parses() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_flags() {
        let cli = Cli::parse_from(["rigup", "--personal", "--dry-run", "-vv"]);
        assert!(cli.personal);
        assert!(cli.dry_run);
        assert!(!cli.cleanup);
        assert_eq!(cli.verbose, 2);
    }
}
