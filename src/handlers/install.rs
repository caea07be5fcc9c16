use crate::binary::{Arch, Installer, Platform, Target};
use crate::config::types::Config;
use crate::error::{Result, VacuumError};
use indicatif::{ProgressBar, ProgressStyle};

pub struct InstallOptions {
    pub version: Option<String>,
    pub platform: Option<Platform>,
    pub arch: Option<Arch>,
    pub force: bool,
    pub all: bool,
    pub quiet: bool,
}

pub async fn handle_install(config: &Config, options: InstallOptions) -> Result<()> {
    let mut installer = Installer::from_config(&config.binary);
    if let Some(version) = &options.version {
        installer = Installer::new(version.clone(), config.binary.install_dir())
            .with_base_url(config.binary.download_base_url.clone());
    }
    if !options.quiet {
        installer = installer.with_progress(download_bar());
    }

    let force = options.force;
    if options.all {
        let installed = tokio::task::spawn_blocking(move || {
            let results = installer.install_all(force)?;
            Ok::<_, VacuumError>(
                results
                    .into_iter()
                    .map(|(target, written)| (installer.binary_path(target), written))
                    .collect::<Vec<_>>(),
            )
        })
        .await
        .map_err(|e| std::io::Error::other(e.to_string()))??;

        for (path, written) in installed {
            println!("Wrote {} bytes to {}", written, path.display());
        }
        return Ok(());
    }

    let target = Target::new(
        options.platform.map_or_else(Platform::host, Ok)?,
        options.arch.map_or_else(Arch::host, Ok)?,
    );
    let (path, written) = tokio::task::spawn_blocking(move || {
        let written = installer.ensure_installed(target, force)?;
        Ok::<_, VacuumError>((installer.binary_path(target), written))
    })
    .await
    .map_err(|e| std::io::Error::other(e.to_string()))??;

    println!("Wrote {} bytes to {}", written, path.display());
    Ok(())
}

fn download_bar() -> ProgressBar {
    let bar = ProgressBar::new(0);
    if let Ok(style) = ProgressStyle::with_template(
        "{spinner:.green} {msg} [{bar:30.cyan/blue}] {bytes}/{total_bytes}",
    ) {
        bar.set_style(style.progress_chars("=> "));
    }
    bar
}
