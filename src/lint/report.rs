//! Structured results decoded from `vacuum report` JSON output.

use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;

/// A zero-based position inside the linted document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextPoint {
    pub line: i64,
    pub character: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextRange {
    pub start: TextPoint,
    pub end: TextPoint,
}

/// Where a result originated when the document spans several files.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LintOrigin {
    pub line: i64,
    pub column: i64,
    #[serde(rename = "absoluteLocation", alias = "absolute_location")]
    pub absolute_location: String,
}

/// A single rule violation reported by vacuum.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LintResult {
    pub message: String,
    pub range: TextRange,
    /// JSON path of the offending node, e.g. `$.servers`.
    pub path: String,
    #[serde(rename = "ruleId")]
    pub rule_id: String,
    #[serde(rename = "ruleSeverity")]
    pub rule_severity: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub origin: Option<LintOrigin>,
}

impl LintResult {
    /// The parsed severity, if vacuum reported one we recognise.
    pub fn severity(&self) -> Option<Severity> {
        Severity::parse(&self.rule_severity)
    }
}

/// Severity levels used by vacuum rulesets.
///
/// Ordered from most severe to least severe:
/// `Error > Warn > Info > Hint`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Severity {
    Error,
    Warn,
    Info,
    Hint,
}

impl Severity {
    /// Parse a severity from a string (case-insensitive).
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "error" => Some(Self::Error),
            "warn" | "warning" => Some(Self::Warn),
            "info" => Some(Self::Info),
            "hint" => Some(Self::Hint),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Error => "error",
            Self::Warn => "warn",
            Self::Info => "info",
            Self::Hint => "hint",
        }
    }

    fn rank(&self) -> u8 {
        match self {
            Self::Error => 3,
            Self::Warn => 2,
            Self::Info => 1,
            Self::Hint => 0,
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl Ord for Severity {
    fn cmp(&self, other: &Self) -> Ordering {
        self.rank().cmp(&other.rank())
    }
}

impl PartialOrd for Severity {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

#[derive(Debug, Deserialize)]
struct RawReport {
    #[serde(rename = "resultSet")]
    result_set: Option<RawResultSet>,
}

#[derive(Debug, Deserialize)]
struct RawResultSet {
    results: Option<Vec<LintResult>>,
}

/// Decode the JSON document vacuum writes to stdout.
///
/// A report without a `resultSet` or without `results` means nothing was found.
pub fn parse_report(stdout: &[u8]) -> Result<Vec<LintResult>> {
    let report: RawReport = serde_json::from_slice(stdout)?;
    Ok(report
        .result_set
        .and_then(|set| set.results)
        .unwrap_or_default())
}
