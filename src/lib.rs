//! # vacuum-lint
//!
//! Rust bindings for the [vacuum](https://github.com/daveshanley/vacuum)
//! OpenAPI linter. The crate contains no linting logic of its own: it installs
//! vacuum's prebuilt executable for the current platform and runs it as a
//! subprocess, returning the report as typed results.
//!
//! ## Features
//!
//! - **Installer**: Downloads the release tarball for any published platform/architecture
//! - **In-memory inputs**: The spec goes over stdin, the ruleset over an anonymous pipe
//! - **Sync and async**: Blocking and tokio entry points with identical semantics
//! - **Typed results**: Serde-decoded `LintResult`s with severities and ranges
//!
//! ## Example
//!
//! ```rust,no_run
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let spec = std::fs::read("openapi.yaml")?;
//! let ruleset = r#"{"rules": {"oas3-api-servers": true}}"#;
//!
//! for result in vacuum::lint(&spec, ruleset)? {
//!     println!("{} {}: {}", result.path, result.rule_id, result.message);
//! }
//! # Ok(())
//! # }
//! ```

pub mod binary;
pub mod cli;
pub mod config;
pub mod error;
pub mod handlers;
pub mod lint;

// Re-export commonly used types and functions
pub use binary::{DEFAULT_VACUUM_VERSION, Installer, Target};
pub use error::{Result, VacuumError};
pub use lint::{LintResult, Linter, Severity, StaticContentPipe, lint, lint_async};
use cli::Commands;
use config::types::Config;

/// The current version of the CLI tool
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Run a CLI command. Returns the number of failing lint results.
pub async fn run_command(command: Commands, config: &Config, quiet: bool) -> Result<usize> {
    match command {
        Commands::Install {
            version,
            platform,
            arch,
            force: _,
            no_force,
            all,
        } => {
            handlers::handle_install(
                config,
                handlers::InstallOptions {
                    version,
                    platform,
                    arch,
                    force: !no_force,
                    all,
                    quiet,
                },
            )
            .await
            .map(|_| 0)
        }
        Commands::Lint {
            spec,
            ruleset,
            format,
            fail_on,
            no_color,
        } => {
            handlers::handle_lint(
                config,
                handlers::LintOptions {
                    spec,
                    ruleset,
                    format,
                    fail_on,
                    no_color,
                },
            )
            .await
        }
        Commands::Version => handlers::handle_version(config).map(|_| 0),
        Commands::Config => handlers::handle_config(config).map(|_| 0),
    }
}
