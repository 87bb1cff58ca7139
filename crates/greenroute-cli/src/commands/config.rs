use anyhow::{Context, Result};

use greenroute_core::config::ClientConfig;
use greenroute_infrastructure::{ConfigStorage, GreenRoutePaths};

/// Prints the effective configuration as TOML.
pub fn show(config: &ClientConfig) -> Result<()> {
    let rendered = toml::to_string_pretty(config).context("Failed to render config")?;
    println!("{}", rendered.trim_end());
    Ok(())
}

/// Writes a default `config.toml` unless one already exists.
pub fn init(force: bool) -> Result<()> {
    let path = GreenRoutePaths::config_file().context("Failed to resolve config path")?;
    let storage = ConfigStorage::new(path.clone());

    if !force && storage.load()?.is_some() {
        println!("Config already exists at {}", path.display());
        return Ok(());
    }

    storage.save(&ClientConfig::default())?;
    println!("✅ Wrote default config to {}", path.display());
    Ok(())
}
