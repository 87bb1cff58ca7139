//! Session persistence contract.

use async_trait::async_trait;

use super::model::Session;
use crate::error::Result;

/// Key under which the single active session lives.
pub const ACTIVE_SESSION_KEY: &str = "active_session";

/// Durable storage for the one active session.
///
/// Writes are last-write-wins and must be durable before the call
/// returns. `delete` succeeds when nothing is stored.
#[async_trait]
pub trait SessionStore: Send + Sync {
    async fn get(&self) -> Result<Option<Session>>;

    async fn put(&self, session: &Session) -> Result<()>;

    async fn delete(&self) -> Result<()>;
}
