//! Client configuration file storage.
//!
//! Reads and writes `config.toml` through `AtomicFile`, so a crash while
//! saving never leaves a half written config behind.

use std::path::PathBuf;

use greenroute_core::config::ClientConfig;
use greenroute_core::error::Result;

use super::atomic_file::AtomicFile;

pub struct ConfigStorage {
    file: AtomicFile,
}

impl ConfigStorage {
    /// # Arguments
    ///
    /// * `path` - The path to the config file (usually `config.toml`)
    pub fn new(path: PathBuf) -> Self {
        Self {
            file: AtomicFile::new(path),
        }
    }

    /// Loads the config.
    ///
    /// # Returns
    ///
    /// - `Ok(Some(ClientConfig))`: File parsed, missing keys filled with defaults
    /// - `Ok(None)`: File doesn't exist or is empty
    /// - `Err`: Failed to read or parse the file
    pub fn load(&self) -> Result<Option<ClientConfig>> {
        let Some(content) = self.file.read()? else {
            return Ok(None);
        };
        let config: ClientConfig = toml::from_str(&content)?;
        Ok(Some(config))
    }

    /// Loads the config, falling back to defaults when no file exists.
    pub fn load_or_default(&self) -> Result<ClientConfig> {
        Ok(self.load()?.unwrap_or_default())
    }

    /// Saves the config atomically.
    pub fn save(&self, config: &ClientConfig) -> Result<()> {
        let toml_string = toml::to_string_pretty(config)?;
        self.file.write(&toml_string)
    }
}
