//! Composition root: resolves configuration and wires the state machine.

use anyhow::{Context, Result};
use std::path::PathBuf;
use std::sync::Arc;

use greenroute_application::RouteProgress;
use greenroute_core::config::{BASE_URL_ENV, ClientConfig};
use greenroute_core::protocol::ProtocolVersion;
use greenroute_infrastructure::{ConfigStorage, FileSessionStore, GreenRoutePaths, HttpGateway};

/// Overrides given on the command line.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub base_url: Option<String>,
    pub legacy: bool,
    pub data_dir: Option<PathBuf>,
}

/// Applies overrides in order: file, then environment, then flags.
pub fn resolve_config(
    file_config: ClientConfig,
    env_base_url: Option<String>,
    overrides: &Overrides,
) -> ClientConfig {
    let mut config = file_config;
    if let Some(url) = env_base_url.filter(|u| !u.trim().is_empty()) {
        config = config.with_base_url(url.trim());
    }
    if let Some(url) = &overrides.base_url {
        config = config.with_base_url(url.trim());
    }
    if overrides.legacy {
        config = config.with_protocol(ProtocolVersion::Legacy);
    }
    config
}

pub fn load_config(overrides: &Overrides) -> Result<ClientConfig> {
    let path = GreenRoutePaths::config_file().context("Failed to resolve config path")?;
    let file_config = ConfigStorage::new(path.clone())
        .load_or_default()
        .with_context(|| format!("Failed to load config from {}", path.display()))?;

    let config = resolve_config(file_config, std::env::var(BASE_URL_ENV).ok(), overrides);
    config.validate()?;
    Ok(config)
}

pub fn build_route_progress(config: &ClientConfig, overrides: &Overrides) -> Result<RouteProgress> {
    let store = match &overrides.data_dir {
        Some(dir) => FileSessionStore::new(dir),
        None => FileSessionStore::default_location().context("Failed to resolve data directory")?,
    };
    tracing::debug!(
        base_url = %config.base_url,
        protocol = %config.protocol,
        session_file = %store.path().display(),
        "Client configured"
    );

    let gateway = Arc::new(HttpGateway::new(config)?);
    Ok(RouteProgress::with_gateway(
        Arc::new(store),
        gateway,
        config.protocol,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flags_beat_env_beat_file() {
        let file = ClientConfig::default().with_base_url("http://file.example/api");

        let from_env = resolve_config(
            file.clone(),
            Some("http://env.example/api/".into()),
            &Overrides::default(),
        );
        assert_eq!(from_env.base_url, "http://env.example/api");

        let from_flag = resolve_config(
            file.clone(),
            Some("http://env.example/api".into()),
            &Overrides {
                base_url: Some("https://flag.example/api".into()),
                legacy: true,
                data_dir: None,
            },
        );
        assert_eq!(from_flag.base_url, "https://flag.example/api");
        assert_eq!(from_flag.protocol, ProtocolVersion::Legacy);

        let untouched = resolve_config(file.clone(), Some("  ".into()), &Overrides::default());
        assert_eq!(untouched, file);
    }
}
