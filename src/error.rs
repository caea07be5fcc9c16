//! Error types for linting and binary installation.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while installing or running the vacuum linter
#[derive(Debug, Error)]
pub enum VacuumError {
    /// The spec or ruleset handed to the linter was unusable
    #[error("Invalid input: {0}")]
    Input(String),

    /// vacuum exited with status 2; carries its stderr
    #[error("vacuum failed fatally: {0}")]
    Fatal(String),

    /// vacuum exited with any other non-zero status; carries its stdout
    #[error("vacuum failed: {0}")]
    Failed(String),

    /// vacuum's stdout could not be decoded as a report
    #[error("Failed to parse vacuum report: {0}")]
    Report(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// HTTP request failed (network error, TLS, etc.)
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Release server answered with a non-success status
    #[error("Download of {url} failed with status {status}")]
    Download {
        url: String,
        status: u16,
    },

    /// Release tarball did not contain what we expected
    #[error("Invalid release archive: {0}")]
    Archive(String),

    #[error("Unsupported platform or architecture: {0}")]
    UnsupportedTarget(String),

    #[error("Configuration error: {0}")]
    Config(String),

    /// Binary is missing and automatic installation is off
    #[error("vacuum binary not found at {} (run `vacuum-lint install`)", .0.display())]
    BinaryNotFound(PathBuf),
}

impl VacuumError {
    /// Whether this error was raised by input validation, before any process ran.
    pub fn is_input_error(&self) -> bool {
        matches!(self, Self::Input(_))
    }
}

/// Result type alias for this crate
pub type Result<T> = std::result::Result<T, VacuumError>;
