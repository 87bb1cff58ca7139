//! Unified path management for GreenRoute files.
//!
//! All paths are resolved via `AppPaths` from the version-migrate crate.
//!
//! ```text
//! ~/.config/greenroute/          # Config directory
//! └── config.toml                # Client configuration
//!
//! ~/.local/share/greenroute/     # Data directory
//! ├── active_session.json        # The single active session
//! └── logs/
//!     └── greenroute.log.YYYY-MM-DD
//! ```

use std::path::PathBuf;
use version_migrate::AppPaths;

use greenroute_core::error::{Result, RouteError};
use greenroute_core::session::ACTIVE_SESSION_KEY;

pub struct GreenRoutePaths;

impl GreenRoutePaths {
    fn app_paths() -> AppPaths {
        AppPaths::new("greenroute")
    }

    pub fn config_dir() -> Result<PathBuf> {
        Self::app_paths()
            .config_dir()
            .map_err(|_| RouteError::config("Cannot resolve config directory"))
    }

    pub fn data_dir() -> Result<PathBuf> {
        Self::app_paths()
            .data_dir()
            .map_err(|_| RouteError::config("Cannot resolve data directory"))
    }

    pub fn logs_dir() -> Result<PathBuf> {
        Ok(Self::data_dir()?.join("logs"))
    }

    pub fn config_file() -> Result<PathBuf> {
        Ok(Self::config_dir()?.join("config.toml"))
    }

    pub fn session_file() -> Result<PathBuf> {
        Ok(Self::session_file_in(&Self::data_dir()?))
    }

    /// `<dir>/active_session.json`
    pub fn session_file_in(dir: &std::path::Path) -> PathBuf {
        dir.join(format!("{ACTIVE_SESSION_KEY}.json"))
    }
}
