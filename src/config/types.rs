use crate::binary::{DEFAULT_DOWNLOAD_BASE_URL, DEFAULT_VACUUM_VERSION};
use crate::lint::OutputFormat;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Main configuration structure
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub binary: BinaryConfig,
    pub lint: LintConfig,
}

/// Which vacuum executable to run and where to install it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BinaryConfig {
    pub version: String,
    /// Explicit executable; skips installation entirely
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub install_dir: Option<PathBuf>,
    pub download_base_url: String,
    /// Download the binary on first use when it is missing
    pub auto_install: bool,
}

impl Default for BinaryConfig {
    fn default() -> Self {
        Self {
            version: DEFAULT_VACUUM_VERSION.to_string(),
            path: None,
            install_dir: None,
            download_base_url: DEFAULT_DOWNLOAD_BASE_URL.to_string(),
            auto_install: true,
        }
    }
}

impl BinaryConfig {
    /// Configured install directory, or `<cache dir>/vacuum-lint`.
    pub fn install_dir(&self) -> PathBuf {
        self.install_dir.clone().unwrap_or_else(|| {
            dirs::cache_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join("vacuum-lint")
        })
    }
}

/// Defaults for the `lint` command
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LintConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ruleset: Option<PathBuf>,
    pub format: OutputFormat,
}
