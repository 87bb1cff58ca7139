//! JSON file backed session store.
//!
//! Keeps the single active session in `<data_dir>/active_session.json`.

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tokio::task;

use greenroute_core::error::{Result, RouteError};
use greenroute_core::session::{Session, SessionStore};

use crate::dto::{SESSION_ENTITY, create_session_record_migrator};
use crate::paths::GreenRoutePaths;
use crate::storage::AtomicFile;

/// File based `SessionStore`.
///
/// # Features
///
/// - **Atomic writes**: tmp file + fsync + rename under an fs2 lock
/// - **Version migration**: records carry a `version` field and go through
///   version-migrate on load
/// - **Async-safe**: blocking I/O runs in `tokio::task::spawn_blocking`
pub struct FileSessionStore {
    file: AtomicFile,
}

impl FileSessionStore {
    /// Creates a store that keeps its record inside `data_dir`.
    pub fn new(data_dir: &Path) -> Self {
        Self::with_file(GreenRoutePaths::session_file_in(data_dir))
    }

    pub fn with_file(path: PathBuf) -> Self {
        Self {
            file: AtomicFile::new(path),
        }
    }

    /// Store at the platform default location.
    pub fn default_location() -> Result<Self> {
        Ok(Self::with_file(GreenRoutePaths::session_file()?))
    }

    pub fn path(&self) -> &Path {
        self.file.path()
    }

    fn load_sync(file: &AtomicFile) -> Result<Option<Session>> {
        let Some(content) = file.read()? else {
            return Ok(None);
        };

        let json_value: serde_json::Value = serde_json::from_str(&content)?;
        let migrator = create_session_record_migrator();
        let session: Session = migrator
            .load_flat_from(SESSION_ENTITY, json_value)
            .map_err(|e| {
                RouteError::storage(format!(
                    "Failed to migrate session from '{}': {}",
                    file.path().display(),
                    e
                ))
            })?;
        Ok(Some(session))
    }

    fn save_sync(file: &AtomicFile, session: &Session) -> Result<()> {
        let migrator = create_session_record_migrator();
        let json_str = migrator.save_domain_flat(SESSION_ENTITY, session)?;
        file.write(&json_str)
    }
}

#[async_trait]
impl SessionStore for FileSessionStore {
    async fn get(&self) -> Result<Option<Session>> {
        let file = self.file.clone();
        task::spawn_blocking(move || Self::load_sync(&file))
            .await
            .map_err(|e| RouteError::internal(format!("Failed to spawn blocking task: {}", e)))?
    }

    async fn put(&self, session: &Session) -> Result<()> {
        let file = self.file.clone();
        let session = session.clone();
        task::spawn_blocking(move || Self::save_sync(&file, &session))
            .await
            .map_err(|e| RouteError::internal(format!("Failed to spawn blocking task: {}", e)))??;

        tracing::debug!(path = %self.file.path().display(), "Session persisted");
        Ok(())
    }

    async fn delete(&self) -> Result<()> {
        let file = self.file.clone();
        task::spawn_blocking(move || file.remove())
            .await
            .map_err(|e| RouteError::internal(format!("Failed to spawn blocking task: {}", e)))?
    }
}
