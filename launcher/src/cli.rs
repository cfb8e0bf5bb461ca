//! CLI argument definitions for the guard launcher.
//!
//! Parsing lives here so the binary stays focused on orchestration.

use camino::Utf8PathBuf;
use clap::Parser;
use log::LevelFilter;

/// Configuration file used when `--config` is not given.
pub const DEFAULT_CONFIG: &str = "launcher.toml";

/// Provision launch guards and start the protected client.
#[derive(Parser, Debug, Clone)]
#[command(name = "guard-launcher")]
#[command(version, about)]
#[command(long_about = concat!(
    "Provision launch guards and start the protected client.\n\n",
    "The launcher reads its configuration, unpacks the artifacts each guard ",
    "needs into the guard directory, lets every guard rewrite the launch, and ",
    "then starts the client. If any guard cannot be initialised the client is ",
    "never started.",
))]
#[command(after_help = concat!(
    "EXAMPLES:\n",
    "  Start the client described by ./launcher.toml:\n",
    "    $ guard-launcher\n\n",
    "  Show the final launch without starting it:\n",
    "    $ guard-launcher --config game/launcher.toml --dry-run --json",
))]
pub struct Cli {
    /// Launcher configuration file.
    #[arg(short, long, value_name = "PATH", default_value = DEFAULT_CONFIG)]
    pub config: Utf8PathBuf,

    /// Provision and apply guards, then print the launch instead of starting it.
    #[arg(long)]
    pub dry_run: bool,

    /// Print the dry-run launch as JSON.
    #[arg(long, requires = "dry_run")]
    pub json: bool,

    /// Increase log verbosity (repeatable: -v, -vv, -vvv).
    #[arg(
        short,
        long = "verbose",
        action = clap::ArgAction::Count,
        conflicts_with = "quiet"
    )]
    pub verbosity: u8,

    /// Only log errors.
    #[arg(short, long, conflicts_with = "verbosity")]
    pub quiet: bool,
}

impl Default for Cli {
    fn default() -> Self {
        Self {
            config: Utf8PathBuf::from(DEFAULT_CONFIG),
            dry_run: false,
            json: false,
            verbosity: 0,
            quiet: false,
        }
    }
}

impl Cli {
    /// Log level selected by `-v`/`-q`.
    #[must_use]
    pub const fn log_level(&self) -> LevelFilter {
        if self.quiet {
            return LevelFilter::Error;
        }
        match self.verbosity {
            0 => LevelFilter::Warn,
            1 => LevelFilter::Info,
            2 => LevelFilter::Debug,
            _ => LevelFilter::Trace,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn defaults_to_local_config() {
        let cli = Cli::try_parse_from(["guard-launcher"]).expect("parse");
        assert_eq!(cli.config, Utf8PathBuf::from("launcher.toml"));
        assert!(!cli.dry_run);
        assert_eq!(cli.log_level(), LevelFilter::Warn);
    }

    #[rstest]
    #[case::info(&["guard-launcher", "-v"][..], LevelFilter::Info)]
    #[case::debug(&["guard-launcher", "-vv"][..], LevelFilter::Debug)]
    #[case::trace(&["guard-launcher", "-vvvv"][..], LevelFilter::Trace)]
    #[case::quiet(&["guard-launcher", "--quiet"][..], LevelFilter::Error)]
    fn verbosity_flags_select_level(#[case] args: &[&str], #[case] expected: LevelFilter) {
        let cli = Cli::try_parse_from(args).expect("parse");
        assert_eq!(cli.log_level(), expected);
    }

    #[test]
    fn json_requires_dry_run() {
        assert!(Cli::try_parse_from(["guard-launcher", "--json"]).is_err());
        let cli = Cli::try_parse_from(["guard-launcher", "--dry-run", "--json"]).expect("parse");
        assert!(cli.json);
    }

    #[test]
    fn quiet_conflicts_with_verbose() {
        assert!(Cli::try_parse_from(["guard-launcher", "-q", "-v"]).is_err());
    }

    #[test]
    fn accepts_explicit_config_path() {
        let cli = Cli::try_parse_from(["guard-launcher", "--config", "/etc/game/launcher.toml"])
            .expect("parse");
        assert_eq!(cli.config, Utf8PathBuf::from("/etc/game/launcher.toml"));
    }
}
