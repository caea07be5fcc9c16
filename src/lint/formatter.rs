//! Output formatters for lint results.
//!
//! - **Text**: colored terminal output for human readability
//! - **JSON**: the decoded results, for CI/CD pipelines

use super::report::{LintResult, Severity};
use colored::Colorize;
use serde::{Deserialize, Serialize};
use std::io::Write;

/// Output format for lint results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

/// Write `results` for the document named `filename`.
pub fn format_results<W: Write>(
    results: &[LintResult],
    filename: &str,
    format: OutputFormat,
    colors: bool,
    writer: &mut W,
) -> std::io::Result<()> {
    match format {
        OutputFormat::Text => format_text(results, filename, colors, writer),
        OutputFormat::Json => {
            serde_json::to_writer_pretty(&mut *writer, results)?;
            writeln!(writer)
        }
    }
}

fn paint(severity: Option<Severity>, label: &str, colors: bool) -> String {
    if !colors {
        return label.to_string();
    }
    match severity {
        Some(Severity::Error) => label.red().bold().to_string(),
        Some(Severity::Warn) => label.yellow().bold().to_string(),
        Some(Severity::Info) => label.cyan().bold().to_string(),
        Some(Severity::Hint) | None => label.dimmed().to_string(),
    }
}

fn format_text<W: Write>(
    results: &[LintResult],
    filename: &str,
    colors: bool,
    writer: &mut W,
) -> std::io::Result<()> {
    if results.is_empty() {
        return writeln!(writer, "{}: no issues found", filename);
    }

    for result in results {
        let severity = result.severity();
        // lines are zero-based in the report
        let location = format!(
            "{}:{}:{}",
            filename,
            result.range.start.line + 1,
            result.range.start.character + 1
        );
        let location = if colors {
            location.bold().to_string()
        } else {
            location
        };
        let rule = if colors {
            result.rule_id.dimmed().to_string()
        } else {
            result.rule_id.clone()
        };

        writeln!(
            writer,
            "{} {} {}: {} ({})",
            location,
            paint(severity, &result.rule_severity, colors),
            rule,
            result.message,
            result.path
        )?;
    }

    let count = |level: Severity| results.iter().filter(|r| r.severity() == Some(level)).count();
    let mut parts = Vec::new();
    for level in [Severity::Error, Severity::Warn, Severity::Info, Severity::Hint] {
        let n = count(level);
        if n > 0 {
            parts.push(paint(Some(level), &format!("{} {}", n, level), colors));
        }
    }

    writeln!(writer)?;
    writeln!(writer, "{} issue(s): {}", results.len(), parts.join(", "))
}
