//! Locating and installing the prebuilt vacuum executable.
//!
//! vacuum publishes a gzipped tarball per platform/architecture on every
//! GitHub release. [`Installer`] downloads the one matching a [`Target`],
//! pulls the executable out and installs it under the configured directory.
//! [`locate`] resolves which executable the linter should run.

pub mod installer;
pub mod platform;

pub use installer::{
    DEFAULT_DOWNLOAD_BASE_URL, Installer, extract_binary, install_binary, release_url,
};
pub use platform::{Arch, Platform, SUPPORTED_TARGETS, Target};

use crate::config::types::BinaryConfig;
use log::debug;
use std::path::PathBuf;

/// vacuum release this crate is tested against
pub const DEFAULT_VACUUM_VERSION: &str = "0.9.15";

/// Environment variable pointing at an explicit vacuum executable
pub const BINARY_ENV_VAR: &str = "VACUUM_BIN";

/// Environment variable overriding the vacuum version to install
pub const VERSION_ENV_VAR: &str = "VACUUM_VERSION";

/// The vacuum version that will be installed and run.
pub fn configured_version(config: &BinaryConfig) -> String {
    std::env::var(VERSION_ENV_VAR)
        .ok()
        .filter(|v| !v.trim().is_empty())
        .unwrap_or_else(|| config.version.clone())
}

/// An executable named by `VACUUM_BIN` or the config's `path`.
///
/// `VACUUM_BIN` wins over the config. Explicit binaries are never installed.
pub fn explicit_binary(config: &BinaryConfig) -> Option<PathBuf> {
    if let Some(path) = std::env::var_os(BINARY_ENV_VAR).filter(|p| !p.is_empty()) {
        debug!("Using vacuum from ${}", BINARY_ENV_VAR);
        return Some(PathBuf::from(path));
    }
    config.path.clone()
}

/// Resolve the vacuum executable to run.
///
/// An explicit binary is used as is; otherwise the binary installed for the
/// host target. When the host target is not one vacuum publishes, the bare
/// install directory path is returned and the caller finds out on spawn.
pub fn locate(config: &BinaryConfig) -> PathBuf {
    if let Some(path) = explicit_binary(config) {
        return path;
    }

    let installer = Installer::new(configured_version(config), config.install_dir());
    match Target::host() {
        Ok(target) => installer.binary_path(target),
        Err(_) => config.install_dir().join(installer.version()).join("vacuum"),
    }
}
