//! Protocol adapters.
//!
//! Each backend protocol gets one adapter behind `ProtocolAdapter`; the
//! sequencing rules live once in `RouteProgress`, which only ever talks to
//! the adapter selected by the stored session's protocol tag.

mod current;
mod legacy;

pub use current::CurrentProtocol;
pub use legacy::LegacyProtocol;

use async_trait::async_trait;

use greenroute_core::error::Result;
use greenroute_core::gateway::wire::{RemoteProgress, StopStarted};
use greenroute_core::protocol::ProtocolVersion;
use greenroute_core::session::Session;
use greenroute_core::stop::{CompletionPayload, StopView};
use greenroute_core::validation::Credentials;

/// Operations that only one of the protocols offers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    StartStop,
    Skip,
    RemoteProgress,
    RefreshPickups,
}

impl Operation {
    pub fn name(&self) -> &'static str {
        match self {
            Operation::StartStop => "start stop",
            Operation::Skip => "skip stop",
            Operation::RemoteProgress => "remote progress",
            Operation::RefreshPickups => "refresh pickups",
        }
    }
}

/// How the current stop is being resolved.
#[derive(Debug, Clone, Copy)]
pub enum Resolution<'a> {
    Complete(&'a CompletionPayload),
    Skip(&'a str),
}

impl Resolution<'_> {
    pub fn operation(&self) -> &'static str {
        match self {
            Resolution::Complete(_) => "complete stop",
            Resolution::Skip(_) => "skip stop",
        }
    }
}

#[async_trait]
pub trait ProtocolAdapter: Send + Sync {
    fn protocol(&self) -> ProtocolVersion;

    fn supports(&self, operation: Operation) -> bool;

    /// Whether the next stop must be fetched before the advanced position
    /// is persisted.
    fn confirms_next_before_advance(&self) -> bool;

    /// Logs in and builds a fresh session. Nothing is persisted here.
    async fn authenticate(&self, credentials: &Credentials) -> Result<Session>;

    /// Fetches the stop at the session's position and refreshes its cache.
    async fn refresh_current(&self, session: &mut Session) -> Result<StopView>;

    /// Starts timing the current stop and records the server timestamp.
    async fn start_stop(&self, session: &mut Session) -> Result<StopStarted>;

    /// Reports the current stop resolved on the server.
    async fn resolve(&self, session: &Session, resolution: Resolution<'_>) -> Result<()>;

    /// Closes the route on the server once the last stop is resolved.
    async fn finish_route(&self, session: &Session) -> Result<()>;

    async fn remote_progress(&self, session: &Session) -> Result<RemoteProgress>;

    /// Replaces the cached stop list; returns how many are cached.
    async fn refresh_pickups(&self, session: &mut Session) -> Result<usize>;
}
