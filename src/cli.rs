use crate::binary::{Arch, Platform};
use crate::lint::{OutputFormat, Severity};
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "vacuum-lint")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Lint OpenAPI documents with the prebuilt vacuum linter")]
#[command(long_about = "Installs the vacuum OpenAPI linter for this platform and runs it against a spec and ruleset. The ruleset is streamed to vacuum through an in-memory pipe, never written to disk.")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Path to configuration file or project directory
    #[arg(short, long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Enable verbose logging (-v for info, -vv for debug, -vvv for trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    pub quiet: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Download and install the vacuum binary
    Install {
        /// vacuum release to install
        #[arg(long, env = "VACUUM_VERSION")]
        version: Option<String>,

        /// Target platform (defaults to the host)
        #[arg(long)]
        platform: Option<Platform>,

        /// Target architecture (defaults to the host)
        #[arg(long)]
        arch: Option<Arch>,

        /// Reinstall even if the binary is present (default)
        #[arg(long, overrides_with = "no_force")]
        force: bool,

        /// Keep an already installed binary
        #[arg(long, overrides_with = "force")]
        no_force: bool,

        /// Install binaries for every published platform and architecture
        #[arg(long, conflicts_with_all = ["platform", "arch"])]
        all: bool,
    },

    /// Lint an API specification
    Lint {
        /// Spec to lint, `-` for stdin
        #[arg(value_name = "SPEC")]
        spec: PathBuf,

        /// Ruleset file (falls back to `lint.ruleset` in the config)
        #[arg(short, long, value_name = "FILE")]
        ruleset: Option<PathBuf>,

        /// Output format
        #[arg(long, value_enum)]
        format: Option<OutputFormat>,

        /// Exit with status 1 when a result at or above this severity is found
        #[arg(long, value_enum, default_value = "error")]
        fail_on: SeverityThreshold,

        /// Disable colored output
        #[arg(long)]
        no_color: bool,
    },

    /// Show the configured vacuum version and binary location
    Version,

    /// Print the effective configuration
    Config,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum SeverityThreshold {
    Hint,
    Info,
    Warn,
    Error,
    /// Never fail on results
    Never,
}

impl SeverityThreshold {
    pub fn severity(&self) -> Option<Severity> {
        match self {
            Self::Hint => Some(Severity::Hint),
            Self::Info => Some(Severity::Info),
            Self::Warn => Some(Severity::Warn),
            Self::Error => Some(Severity::Error),
            Self::Never => None,
        }
    }
}

impl Cli {
    /// Initialize logging based on verbosity level
    pub fn init_logging(&self) {
        if self.quiet {
            return;
        }

        let level = match self.verbose {
            0 => log::LevelFilter::Warn,
            1 => log::LevelFilter::Info,
            2 => log::LevelFilter::Debug,
            _ => log::LevelFilter::Trace,
        };

        env_logger::Builder::from_default_env()
            .filter_level(level)
            .init();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_definition_is_valid() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn test_install_flags() {
        let cli = Cli::parse_from([
            "vacuum-lint", "install", "--platform", "Darwin", "--arch", "aarch64", "--no-force",
        ]);
        match cli.command {
            Commands::Install { platform, arch, no_force, all, .. } => {
                assert_eq!(platform, Some(Platform::Darwin));
                assert_eq!(arch, Some(Arch::Arm64));
                assert!(no_force);
                assert!(!all);
            }
            _ => panic!("expected install"),
        }
    }

    #[test]
    fn test_install_all_conflicts_with_platform() {
        let parsed = Cli::try_parse_from(["vacuum-lint", "install", "--all", "--platform", "linux"]);
        assert!(parsed.is_err());
    }

    #[test]
    fn test_lint_defaults() {
        let cli = Cli::parse_from(["vacuum-lint", "-vv", "lint", "-", "--ruleset", "rules.yaml"]);
        assert_eq!(cli.verbose, 2);
        match cli.command {
            Commands::Lint { spec, ruleset, format, fail_on, .. } => {
                assert_eq!(spec, PathBuf::from("-"));
                assert_eq!(ruleset, Some(PathBuf::from("rules.yaml")));
                assert_eq!(format, None);
                assert_eq!(fail_on.severity(), Some(Severity::Error));
            }
            _ => panic!("expected lint"),
        }
    }
}
