use super::platform::{SUPPORTED_TARGETS, Target};
use crate::config::types::BinaryConfig;
use crate::error::{Result, VacuumError};
use flate2::read::GzDecoder;
use indicatif::ProgressBar;
use log::{debug, info, warn};
use std::io::{Read, Write};
use std::path::{Component, Path, PathBuf};
use tempfile::NamedTempFile;

/// Where vacuum publishes its release tarballs
pub const DEFAULT_DOWNLOAD_BASE_URL: &str = "https://github.com/daveshanley/vacuum/releases/download";

const DOWNLOAD_CHUNK_SIZE: usize = 64 * 1024;

/// Upper bound on buffer preallocation from sizes the remote side claims
const MAX_SIZE_HINT: u64 = 64 << 20;

fn capacity_hint(claimed: u64) -> usize {
    claimed.min(MAX_SIZE_HINT) as usize
}

/// URL of the release tarball for `version` on `target`.
pub fn release_url(base_url: &str, version: &str, target: Target) -> String {
    format!(
        "{}/v{}/vacuum_{}_{}_{}.tar.gz",
        base_url.trim_end_matches('/'),
        version,
        version,
        target.platform,
        target.arch
    )
}

/// Downloads release tarballs and installs the vacuum executable from them.
///
/// Binaries land in `<install_dir>/<version>/<platform>_<arch>/`, so several
/// versions and targets can live side by side.
pub struct Installer {
    version: String,
    install_dir: PathBuf,
    base_url: String,
    client: Option<reqwest::blocking::Client>,
    progress: Option<ProgressBar>,
}

impl Installer {
    pub fn new(version: impl Into<String>, install_dir: impl Into<PathBuf>) -> Self {
        Self {
            version: version.into(),
            install_dir: install_dir.into(),
            base_url: DEFAULT_DOWNLOAD_BASE_URL.to_string(),
            client: None,
            progress: None,
        }
    }

    pub fn from_config(config: &BinaryConfig) -> Self {
        Self::new(super::configured_version(config), config.install_dir())
            .with_base_url(config.download_base_url.clone())
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Download with a preconfigured client (proxies, TLS roots, timeouts).
    pub fn with_client(mut self, client: reqwest::blocking::Client) -> Self {
        self.client = Some(client);
        self
    }

    /// Report download progress on `bar`.
    pub fn with_progress(mut self, bar: ProgressBar) -> Self {
        self.progress = Some(bar);
        self
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    pub fn binary_path(&self, target: Target) -> PathBuf {
        self.install_dir
            .join(&self.version)
            .join(target.slug())
            .join(target.binary_name())
    }

    pub fn release_url(&self, target: Target) -> String {
        release_url(&self.base_url, &self.version, target)
    }

    /// Install the binary for `target` unless it is already there.
    ///
    /// Returns the number of bytes written, 0 when nothing had to be done.
    pub fn ensure_installed(&self, target: Target, force: bool) -> Result<u64> {
        let dest = self.binary_path(target);
        if !force && dest.exists() {
            debug!("vacuum {} for {} already installed at {}", self.version, target, dest.display());
            return Ok(0);
        }

        info!("Installing vacuum {} for {}", self.version, target);
        let tarball = self.download_release_tarball(target)?;
        let binary = extract_binary(&tarball, target)?;
        let written = install_binary(&binary, &dest)?;
        info!("Wrote {} bytes to {}", written, dest.display());
        Ok(written)
    }

    /// Install binaries for every published target.
    pub fn install_all(&self, force: bool) -> Result<Vec<(Target, u64)>> {
        SUPPORTED_TARGETS
            .iter()
            .map(|&target| {
                self.ensure_installed(target, force)
                    .map(|written| (target, written))
            })
            .collect()
    }

    /// Fetch the release tarball for `target` into memory.
    pub fn download_release_tarball(&self, target: Target) -> Result<Vec<u8>> {
        let url = self.release_url(target);
        debug!("Downloading {}", url);

        let client = match &self.client {
            Some(client) => client.clone(),
            None => reqwest::blocking::Client::builder()
                .user_agent(concat!("vacuum-lint/", env!("CARGO_PKG_VERSION")))
                .build()?,
        };
        let mut response = client.get(&url).send()?;

        let status = response.status();
        if !status.is_success() {
            warn!("Download of {} failed: {}", url, status);
            return Err(VacuumError::Download {
                url,
                status: status.as_u16(),
            });
        }

        if let Some(bar) = &self.progress {
            // the bar is shared across targets and was finished by the last download
            bar.reset();
            bar.set_length(response.content_length().unwrap_or(0));
            bar.set_message(format!("vacuum {} ({})", self.version, target));
        }

        let mut out = Vec::with_capacity(capacity_hint(response.content_length().unwrap_or(0)));
        let mut chunk = vec![0u8; DOWNLOAD_CHUNK_SIZE];
        loop {
            let n = response.read(&mut chunk)?;
            if n == 0 {
                break;
            }
            out.extend_from_slice(&chunk[..n]);
            if let Some(bar) = &self.progress {
                bar.inc(n as u64);
            }
        }

        if let Some(bar) = &self.progress {
            bar.finish_and_clear();
        }
        debug!("Downloaded {} bytes from {}", out.len(), url);
        Ok(out)
    }
}

/// Pull the top-level `vacuum[.exe]` member out of a gzipped release tarball.
pub fn extract_binary(tarball: &[u8], target: Target) -> Result<Vec<u8>> {
    let wanted = target.binary_name();
    let mut archive = tar::Archive::new(GzDecoder::new(tarball));

    for entry in archive.entries()? {
        let mut entry = entry?;
        let path = entry.path()?.into_owned();
        if !is_top_level_member(&path, wanted) {
            continue;
        }
        let mut binary = Vec::with_capacity(capacity_hint(entry.size()));
        entry.read_to_end(&mut binary)?;
        return Ok(binary);
    }

    Err(VacuumError::Archive(format!(
        "release tarball has no '{}' member",
        wanted
    )))
}

fn is_top_level_member(path: &Path, name: &str) -> bool {
    let mut parts = path
        .components()
        .filter(|c| !matches!(c, Component::CurDir));
    matches!(
        (parts.next(), parts.next()),
        (Some(Component::Normal(first)), None) if first == name
    )
}

/// Write `binary` to `dest` as an executable, replacing whatever was there.
///
/// The bytes go to a temporary file next to `dest` first, so a concurrent
/// reader never sees a half-written executable.
pub fn install_binary(binary: &[u8], dest: &Path) -> Result<u64> {
    let dir = dest
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    std::fs::create_dir_all(dir)?;

    let mut file = NamedTempFile::new_in(dir)?;
    file.write_all(binary)?;
    file.flush()?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        file.as_file()
            .set_permissions(std::fs::Permissions::from_mode(0o755))?;
    }

    file.persist(dest).map_err(|e| e.error)?;
    Ok(binary.len() as u64)
}
