//! Runs `vacuum report` against an in-memory spec and ruleset.
//!
//! The spec is fed to vacuum on stdin and the ruleset is handed over through a
//! [`StaticContentPipe`], so neither document is written to disk. Both a
//! blocking ([`Linter::lint`]) and a tokio-based ([`Linter::lint_async`])
//! entry point are provided; they share argument building and exit status
//! handling.
//!
//! # Example
//!
//! ```rust,ignore
//! use vacuum::lint::Linter;
//!
//! let linter = Linter::new("/usr/local/bin/vacuum");
//! let results = linter.lint(spec_yaml, ruleset_yaml)?;
//!
//! for result in results {
//!     println!("{} {}: {}", result.path, result.rule_id, result.message);
//! }
//! ```

pub mod formatter;
pub mod pipe;
pub mod report;

pub use formatter::{OutputFormat, format_results};
pub use pipe::StaticContentPipe;
pub use report::{LintOrigin, LintResult, Severity, TextPoint, TextRange, parse_report};

use crate::binary;
use crate::config;
use crate::error::{Result, VacuumError};
use log::{debug, warn};
use std::ffi::OsString;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::process::{Command, ExitStatus, Stdio};
use std::thread;
use tokio::io::AsyncWriteExt;

/// vacuum's exit status for errors that prevented linting altogether
const FATAL_EXIT_CODE: i32 = 2;

/// Handle to a vacuum executable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Linter {
    binary: PathBuf,
}

impl Linter {
    pub fn new(binary: impl Into<PathBuf>) -> Self {
        Self {
            binary: binary.into(),
        }
    }

    /// Resolve the binary from configuration, installing it if allowed.
    ///
    /// Blocks while downloading; async callers should run this on a blocking thread.
    pub fn from_config(config: &config::types::Config) -> Result<Self> {
        if let Some(path) = binary::explicit_binary(&config.binary) {
            // a bare name is left to the PATH lookup at spawn time
            if path.exists() || path.components().count() == 1 {
                return Ok(Self::new(path));
            }
            return Err(VacuumError::BinaryNotFound(path));
        }

        let target = binary::Target::host()?;
        let installer = binary::Installer::from_config(&config.binary);
        let path = installer.binary_path(target);
        if !path.exists() {
            if !config.binary.auto_install {
                return Err(VacuumError::BinaryNotFound(path));
            }
            installer.ensure_installed(target, false)?;
        }
        Ok(Self::new(path))
    }

    pub fn binary(&self) -> &Path {
        &self.binary
    }

    /// Lint `spec` against `ruleset`, blocking until vacuum exits.
    pub fn lint(&self, spec: impl AsRef<[u8]>, ruleset: impl AsRef<[u8]>) -> Result<Vec<LintResult>> {
        let (spec, ruleset) = validate_input(spec.as_ref(), ruleset.as_ref())?;

        let mut ruleset_pipe = StaticContentPipe::new(ruleset)?;
        let args = report_args(ruleset_pipe.path());
        let mut cmd = Command::new(&self.binary);
        cmd.args(&args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());
        ruleset_pipe.attach(&mut cmd);

        debug!(
            "Running {} {:?} ({} spec bytes, {} ruleset bytes)",
            self.binary.display(),
            args,
            spec.len(),
            ruleset.len()
        );
        let mut child = cmd.spawn()?;
        ruleset_pipe.release_reader();

        let stdin = child.stdin.take();
        // stdin is fed from a second thread so a chatty child can't deadlock us
        let output = thread::scope(|scope| {
            let feeder = scope.spawn(move || feed_stdin(stdin, spec));
            let output = child.wait_with_output();
            let fed = feeder
                .join()
                .unwrap_or_else(|_| Err(io::Error::other("stdin feeder panicked")));
            fed.and(output)
        })?;
        ruleset_pipe.finish()?;

        finalize_report(output.status, &output.stdout, &output.stderr)
    }

    /// Lint `spec` against `ruleset` without blocking the async runtime.
    pub async fn lint_async(
        &self,
        spec: impl AsRef<[u8]>,
        ruleset: impl AsRef<[u8]>,
    ) -> Result<Vec<LintResult>> {
        let (spec, ruleset) = validate_input(spec.as_ref(), ruleset.as_ref())?;

        let mut ruleset_pipe = StaticContentPipe::new(ruleset)?;
        let args = report_args(ruleset_pipe.path());
        let mut cmd = tokio::process::Command::new(&self.binary);
        cmd.args(&args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);
        ruleset_pipe.attach_async(&mut cmd);

        debug!(
            "Running {} {:?} asynchronously ({} spec bytes, {} ruleset bytes)",
            self.binary.display(),
            args,
            spec.len(),
            ruleset.len()
        );
        let mut child = cmd.spawn()?;
        ruleset_pipe.release_reader();

        let stdin = child.stdin.take();
        let feed = async move {
            let Some(mut stdin) = stdin else {
                return Ok(());
            };
            match stdin.write_all(spec).await {
                Err(e) if e.kind() == io::ErrorKind::BrokenPipe => Ok(()),
                other => other,
            }
            // stdin dropped here, closing the child's input
        };
        let (fed, output) = tokio::join!(feed, child.wait_with_output());
        fed?;
        let output = output?;

        // The writer thread is done or unblocked by now; don't park a runtime worker on it.
        tokio::task::spawn_blocking(move || ruleset_pipe.finish())
            .await
            .map_err(|e| io::Error::other(e.to_string()))??;

        finalize_report(output.status, &output.stdout, &output.stderr)
    }
}

/// Lint with a linter resolved from the default configuration.
pub fn lint(spec: impl AsRef<[u8]>, ruleset: impl AsRef<[u8]>) -> Result<Vec<LintResult>> {
    // validate first so bad input never triggers a download
    validate_input(spec.as_ref(), ruleset.as_ref())?;
    let config = config::load_config(None)?;
    Linter::from_config(&config)?.lint(spec, ruleset)
}

/// Async counterpart of [`lint`].
pub async fn lint_async(spec: impl AsRef<[u8]>, ruleset: impl AsRef<[u8]>) -> Result<Vec<LintResult>> {
    validate_input(spec.as_ref(), ruleset.as_ref())?;
    let config = config::load_config(None)?;
    let linter = tokio::task::spawn_blocking(move || Linter::from_config(&config))
        .await
        .map_err(|e| io::Error::other(e.to_string()))??;
    linter.lint_async(spec, ruleset).await
}

fn validate_input<'a>(spec: &'a [u8], ruleset: &'a [u8]) -> Result<(&'a [u8], &'a [u8])> {
    if spec.is_empty() || ruleset.is_empty() {
        return Err(VacuumError::Input(
            "spec and ruleset must be non-empty".to_string(),
        ));
    }
    Ok((spec, ruleset))
}

fn report_args(ruleset: &Path) -> Vec<OsString> {
    let mut args: Vec<OsString> = [
        "report",
        "--no-pretty",
        "--no-style",
        "--stdin",
        "--stdout",
        "--ruleset",
    ]
    .iter()
    .map(OsString::from)
    .collect();
    args.push(ruleset.as_os_str().to_owned());
    args
}

fn feed_stdin(stdin: Option<std::process::ChildStdin>, spec: &[u8]) -> io::Result<()> {
    let Some(mut stdin) = stdin else {
        return Ok(());
    };
    match stdin.write_all(spec) {
        // vacuum may bail out before reading its input, e.g. on a broken ruleset
        Err(e) if e.kind() == io::ErrorKind::BrokenPipe => Ok(()),
        other => other,
    }
}

fn finalize_report(status: ExitStatus, stdout: &[u8], stderr: &[u8]) -> Result<Vec<LintResult>> {
    match status.code() {
        Some(0) => parse_report(stdout),
        Some(FATAL_EXIT_CODE) => {
            let stderr = String::from_utf8_lossy(stderr).into_owned();
            warn!("vacuum exited fatally: {}", stderr.trim());
            Err(VacuumError::Fatal(stderr))
        }
        code => {
            let stdout = String::from_utf8_lossy(stdout).into_owned();
            warn!("vacuum exited with {:?}: {}", code, stdout.trim());
            Err(VacuumError::Failed(stdout))
        }
    }
}
