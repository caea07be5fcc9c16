use crate::binary;
use crate::config::types::Config;
use crate::error::{Result, VacuumError};

pub fn handle_version(config: &Config) -> Result<()> {
    let path = binary::locate(&config.binary);
    let state = if path.exists() { "installed" } else { "not installed" };

    println!("vacuum-lint {}", crate::VERSION);
    println!("vacuum {}", binary::configured_version(&config.binary));
    println!("binary: {} ({})", path.display(), state);
    Ok(())
}

pub fn handle_config(config: &Config) -> Result<()> {
    let content = toml::to_string_pretty(config).map_err(|e| VacuumError::Config(e.to_string()))?;
    print!("{}", content);
    Ok(())
}
