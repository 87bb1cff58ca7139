//! Route progress state machine.
//!
//! `RouteProgress` owns the read-modify-persist cycle for the single active
//! session. Every operation holds one async guard for its whole duration,
//! so calls from a host are queued and never interleave.

use std::sync::Arc;
use tokio::sync::Mutex;

use greenroute_core::error::{Result, RouteError};
use greenroute_core::gateway::wire::{RemoteProgress, StopStarted};
use greenroute_core::gateway::{AssignmentGateway, LegacyGateway};
use greenroute_core::navigation::Navigation;
use greenroute_core::policy::CallPolicy;
use greenroute_core::protocol::ProtocolVersion;
use greenroute_core::session::{Progress, RouteState, Session, SessionStore};
use greenroute_core::stop::{CompletionPayload, StopOutcome, StopView};
use greenroute_core::validation::Credentials;

use crate::adapter::{CurrentProtocol, LegacyProtocol, Operation, ProtocolAdapter, Resolution};

/// Drives a driver through the stops of the active route.
///
/// # Responsibilities
///
/// - Creating the session on login (protocol chosen by configuration)
/// - Advancing the position only after the server confirmed the stop
/// - Closing the trip exactly once when the last stop is resolved
/// - Projecting progress and workflow state without network access
pub struct RouteProgress {
    store: Arc<dyn SessionStore>,
    current: CurrentProtocol,
    legacy: LegacyProtocol,
    /// Protocol used for new logins; stored sessions keep their own.
    login_protocol: ProtocolVersion,
    ops: Mutex<()>,
}

impl RouteProgress {
    pub fn new(
        store: Arc<dyn SessionStore>,
        assignment_gateway: Arc<dyn AssignmentGateway>,
        legacy_gateway: Arc<dyn LegacyGateway>,
        login_protocol: ProtocolVersion,
    ) -> Self {
        Self {
            store,
            current: CurrentProtocol::new(assignment_gateway),
            legacy: LegacyProtocol::new(legacy_gateway),
            login_protocol,
            ops: Mutex::new(()),
        }
    }

    /// Uses one gateway that speaks both protocols.
    pub fn with_gateway<G>(
        store: Arc<dyn SessionStore>,
        gateway: Arc<G>,
        login_protocol: ProtocolVersion,
    ) -> Self
    where
        G: AssignmentGateway + LegacyGateway + 'static,
    {
        Self::new(store, gateway.clone(), gateway, login_protocol)
    }

    pub fn login_protocol(&self) -> ProtocolVersion {
        self.login_protocol
    }

    fn adapter(&self, protocol: ProtocolVersion) -> &dyn ProtocolAdapter {
        match protocol {
            ProtocolVersion::Current => &self.current,
            ProtocolVersion::Legacy => &self.legacy,
        }
    }

    async fn require_session(&self) -> Result<Session> {
        self.store.get().await?.ok_or(RouteError::NoActiveSession)
    }

    fn ensure_supported(adapter: &dyn ProtocolAdapter, operation: Operation) -> Result<()> {
        if adapter.supports(operation) {
            Ok(())
        } else {
            Err(RouteError::unsupported(operation.name(), adapter.protocol()))
        }
    }

    /// Logs the driver in and replaces any stored session.
    ///
    /// Credentials are checked before any network call. Nothing is stored
    /// unless the server response carries every required field.
    pub async fn authenticate(&self, vehicle_number: &str, license_number: &str) -> Result<Session> {
        let _guard = self.ops.lock().await;
        let credentials = Credentials::new(vehicle_number, license_number)?;

        let session = self
            .adapter(self.login_protocol)
            .authenticate(&credentials)
            .await?;
        self.store.put(&session).await?;
        Ok(session)
    }

    /// The stop the driver is on, from cache when possible.
    ///
    /// Returns `None` without a session or once the route is complete.
    pub async fn current_stop(&self) -> Result<Option<StopView>> {
        let _guard = self.ops.lock().await;
        let Some(mut session) = self.store.get().await? else {
            return Ok(None);
        };
        if session.is_complete() {
            return Ok(None);
        }
        if let Some(view) = session.cached_view() {
            return Ok(Some(view));
        }

        let view = self
            .adapter(session.protocol())
            .refresh_current(&mut session)
            .await?;
        self.store.put(&session).await?;
        Ok(Some(view))
    }

    /// Directions to the current stop; `None` without coordinates.
    pub async fn navigation(&self) -> Result<Option<Navigation>> {
        Ok(self
            .current_stop()
            .await?
            .as_ref()
            .and_then(Navigation::for_stop))
    }

    /// Starts timing the current stop.
    ///
    /// Advisory: callers should surface a failure as a warning and carry on.
    pub async fn start_current_stop(&self) -> Result<StopStarted> {
        let _guard = self.ops.lock().await;
        let mut session = self.require_session().await?;
        let adapter = self.adapter(session.protocol());
        Self::ensure_supported(adapter, Operation::StartStop)?;
        if session.is_complete() {
            return Err(RouteError::RouteAlreadyComplete);
        }

        let started = adapter.start_stop(&mut session).await?;
        self.store.put(&session).await?;
        tracing::debug!(position = session.position(), "Stop started");
        Ok(started)
    }

    /// Completes the current stop, then moves to the next one.
    pub async fn complete_current_stop(&self, payload: &CompletionPayload) -> Result<StopOutcome> {
        let _guard = self.ops.lock().await;
        payload.validate()?;
        let session = self.require_session().await?;
        self.resolve_and_advance(session, Resolution::Complete(payload))
            .await
    }

    /// Skips the current stop (legacy protocol only).
    pub async fn skip_current_stop(&self, reason: &str) -> Result<StopOutcome> {
        let _guard = self.ops.lock().await;
        let session = self.require_session().await?;
        Self::ensure_supported(self.adapter(session.protocol()), Operation::Skip)?;
        self.resolve_and_advance(session, Resolution::Skip(reason))
            .await
    }

    async fn resolve_and_advance(
        &self,
        session: Session,
        resolution: Resolution<'_>,
    ) -> Result<StopOutcome> {
        let adapter = self.adapter(session.protocol());
        if session.is_complete() {
            return Err(RouteError::RouteAlreadyComplete);
        }

        let operation = resolution.operation();
        let resolved_position = session.position();
        CallPolicy::Required.settle(operation, adapter.resolve(&session, resolution).await)?;

        let mut next = session;
        next.advance();

        if next.is_complete() {
            self.store.put(&next).await?;
            let total = next.total();
            tracing::info!(total, "Route complete");
            CallPolicy::BestEffort.settle("end trip", adapter.finish_route(&next).await)?;
            return Ok(StopOutcome::RouteComplete { total });
        }

        let view = if adapter.confirms_next_before_advance() {
            let view = adapter.refresh_current(&mut next).await?;
            self.store.put(&next).await?;
            view
        } else {
            self.store.put(&next).await?;
            // Advance is committed from here; a lookup failure is not a
            // resolution failure.
            match adapter.refresh_current(&mut next).await {
                Ok(view) => {
                    self.store.put(&next).await?;
                    view
                }
                Err(err) => {
                    tracing::warn!(
                        error = %err,
                        position = next.position(),
                        "Next stop details unavailable"
                    );
                    StopView::unresolved(next.position(), next.total())
                }
            }
        };

        tracing::info!(
            operation,
            resolved = resolved_position,
            next = next.position(),
            total = next.total(),
            "Stop resolved"
        );
        Ok(StopOutcome::Next(view))
    }

    /// Local progress projection; no network access.
    pub async fn progress(&self) -> Result<Option<Progress>> {
        let _guard = self.ops.lock().await;
        Ok(self.store.get().await?.as_ref().map(Progress::from))
    }

    /// Server-side progress for the current assignment.
    pub async fn remote_progress(&self) -> Result<RemoteProgress> {
        let _guard = self.ops.lock().await;
        let session = self.require_session().await?;
        let adapter = self.adapter(session.protocol());
        Self::ensure_supported(adapter, Operation::RemoteProgress)?;
        adapter.remote_progress(&session).await
    }

    /// Re-downloads the legacy pickup list without moving the index.
    pub async fn refresh_pickups(&self) -> Result<usize> {
        let _guard = self.ops.lock().await;
        let mut session = self.require_session().await?;
        let adapter = self.adapter(session.protocol());
        Self::ensure_supported(adapter, Operation::RefreshPickups)?;

        let count = adapter.refresh_pickups(&mut session).await?;
        self.store.put(&session).await?;
        tracing::debug!(count, "Pickup list refreshed");
        Ok(count)
    }

    pub async fn state(&self) -> Result<RouteState> {
        let _guard = self.ops.lock().await;
        Ok(RouteState::of(self.store.get().await?.as_ref()))
    }

    pub async fn session(&self) -> Result<Option<Session>> {
        let _guard = self.ops.lock().await;
        self.store.get().await
    }

    pub async fn is_logged_in(&self) -> Result<bool> {
        Ok(self.session().await?.is_some())
    }

    /// Drops the stored session. Safe to call when logged out.
    pub async fn logout(&self) -> Result<()> {
        let _guard = self.ops.lock().await;
        self.store.delete().await?;
        tracing::info!("Logged out");
        Ok(())
    }
}
