use crate::cli::SeverityThreshold;
use crate::config::types::Config;
use crate::error::{Result, VacuumError};
use crate::lint::{Linter, OutputFormat, format_results};
use log::info;
use std::io::{IsTerminal, Read};
use std::path::{Path, PathBuf};

pub struct LintOptions {
    pub spec: PathBuf,
    pub ruleset: Option<PathBuf>,
    pub format: Option<OutputFormat>,
    pub fail_on: SeverityThreshold,
    pub no_color: bool,
}

/// Lint one spec and print the results.
///
/// Returns the number of results at or above the `fail_on` threshold.
pub async fn handle_lint(config: &Config, options: LintOptions) -> Result<usize> {
    let ruleset_path = options
        .ruleset
        .or_else(|| config.lint.ruleset.clone())
        .ok_or_else(|| {
            VacuumError::Input("no ruleset given; pass --ruleset or set lint.ruleset".to_string())
        })?;

    let spec = read_spec(&options.spec)?;
    let ruleset = std::fs::read(&ruleset_path)?;

    let linter_config = config.clone();
    let linter = tokio::task::spawn_blocking(move || Linter::from_config(&linter_config))
        .await
        .map_err(|e| std::io::Error::other(e.to_string()))??;
    info!("Linting {} with {}", options.spec.display(), linter.binary().display());

    let results = linter.lint_async(&spec, &ruleset).await?;

    let format = options.format.unwrap_or(config.lint.format);
    let mut stdout = std::io::stdout().lock();
    let colors = !options.no_color && format == OutputFormat::Text && std::io::stdout().is_terminal();
    format_results(&results, &display_name(&options.spec), format, colors, &mut stdout)?;

    let failing = match options.fail_on.severity() {
        Some(threshold) => results
            .iter()
            .filter(|r| r.severity().is_some_and(|s| s >= threshold))
            .count(),
        None => 0,
    };
    Ok(failing)
}

fn read_spec(path: &Path) -> Result<Vec<u8>> {
    if path == Path::new("-") {
        let mut buf = Vec::new();
        std::io::stdin().lock().read_to_end(&mut buf)?;
        return Ok(buf);
    }
    Ok(std::fs::read(path)?)
}

fn display_name(path: &Path) -> String {
    if path == Path::new("-") {
        "<stdin>".to_string()
    } else {
        path.display().to_string()
    }
}
