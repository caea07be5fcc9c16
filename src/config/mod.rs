pub mod types;

use crate::error::{Result, VacuumError};
use log::{debug, warn};
use std::fs;
use std::path::{Path, PathBuf};

const CONFIG_FILE_NAME: &str = ".vacuum-lint.toml";

/// Get the global config file path (~/.vacuum-lint.toml)
pub fn global_config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|h| h.join(CONFIG_FILE_NAME))
}

/// Get the local config file path (project/.vacuum-lint.toml)
pub fn local_config_path(project_path: &Path) -> PathBuf {
    project_path.join(CONFIG_FILE_NAME)
}

/// Load configuration from file or use defaults.
///
/// `explicit` may name a config file directly or a project directory. Without
/// it the current directory is tried, then the global config.
pub fn load_config(explicit: Option<&Path>) -> Result<types::Config> {
    if let Some(path) = explicit {
        let file = if path.is_dir() {
            local_config_path(path)
        } else {
            path.to_path_buf()
        };
        return read_config(&file);
    }

    let local = local_config_path(Path::new("."));
    if local.exists() {
        return read_config(&local);
    }

    if let Some(global) = global_config_path() {
        if global.exists() {
            return read_config(&global);
        }
    }

    Ok(types::Config::default())
}

/// Parse a single config file; a present but broken file is an error.
pub fn read_config(path: &Path) -> Result<types::Config> {
    debug!("Loading configuration from {}", path.display());
    let content = fs::read_to_string(path)?;
    toml::from_str(&content).map_err(|e| {
        warn!("{} is not valid configuration: {}", path.display(), e);
        VacuumError::Config(format!("{}: {}", path.display(), e))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lint::OutputFormat;
    use tempfile::TempDir;

    #[test]
    fn test_defaults_when_sections_missing() {
        let dir = TempDir::new().unwrap();
        let file = dir.path().join("partial.toml");
        fs::write(&file, "[binary]\nauto_install = false\n").unwrap();

        let config = load_config(Some(&file)).unwrap();
        assert!(!config.binary.auto_install);
        assert_eq!(config.binary.version, crate::binary::DEFAULT_VACUUM_VERSION);
        assert_eq!(config.lint, types::LintConfig::default());
    }

    #[test]
    fn test_project_directory_config() {
        let dir = TempDir::new().unwrap();
        fs::write(
            local_config_path(dir.path()),
            "[binary]\nversion = \"0.10.0\"\npath = \"/usr/bin/vacuum\"\n\n[lint]\nruleset = \"rules.yaml\"\nformat = \"json\"\n",
        )
        .unwrap();

        let config = load_config(Some(dir.path())).unwrap();
        assert_eq!(config.binary.version, "0.10.0");
        assert_eq!(config.binary.path, Some(PathBuf::from("/usr/bin/vacuum")));
        assert_eq!(config.lint.ruleset, Some(PathBuf::from("rules.yaml")));
        assert_eq!(config.lint.format, OutputFormat::Json);
    }

    #[test]
    fn test_broken_config_is_an_error() {
        let dir = TempDir::new().unwrap();
        let file = dir.path().join("broken.toml");
        fs::write(&file, "[binary\nversion = ").unwrap();
        assert!(matches!(load_config(Some(&file)), Err(VacuumError::Config(_))));
    }

    #[test]
    fn test_config_round_trips_through_toml() {
        let config = types::Config::default();
        let text = toml::to_string_pretty(&config).unwrap();
        let parsed: types::Config = toml::from_str(&text).unwrap();
        assert_eq!(parsed, config);
    }
}
