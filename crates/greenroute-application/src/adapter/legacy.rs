//! Per-driver, per-pickup-index protocol.

use async_trait::async_trait;
use chrono::Utc;
use std::sync::Arc;

use greenroute_core::error::{Result, RouteError};
use greenroute_core::gateway::LegacyGateway;
use greenroute_core::gateway::wire::{
    LegacyAuthRequest, PickupStatusUpdate, RemoteProgress, StopStarted,
};
use greenroute_core::protocol::ProtocolVersion;
use greenroute_core::session::{DriverSession, Session};
use greenroute_core::stop::StopView;
use greenroute_core::validation::Credentials;

use super::{Operation, ProtocolAdapter, Resolution};

pub struct LegacyProtocol {
    gateway: Arc<dyn LegacyGateway>,
}

impl LegacyProtocol {
    pub fn new(gateway: Arc<dyn LegacyGateway>) -> Self {
        Self { gateway }
    }
}

fn driver(session: &Session) -> Result<&DriverSession> {
    match session {
        Session::Legacy(s) => Ok(s),
        other => Err(RouteError::internal(format!(
            "{} session handed to the legacy protocol adapter",
            other.protocol()
        ))),
    }
}

fn driver_mut(session: &mut Session) -> Result<&mut DriverSession> {
    match session {
        Session::Legacy(s) => Ok(s),
        other => Err(RouteError::internal(format!(
            "{} session handed to the legacy protocol adapter",
            other.protocol()
        ))),
    }
}

#[async_trait]
impl ProtocolAdapter for LegacyProtocol {
    fn protocol(&self) -> ProtocolVersion {
        ProtocolVersion::Legacy
    }

    fn supports(&self, operation: Operation) -> bool {
        matches!(operation, Operation::Skip | Operation::RefreshPickups)
    }

    // The index is only a client-side cursor, so it moves once the next
    // pickup is actually known.
    fn confirms_next_before_advance(&self) -> bool {
        true
    }

    async fn authenticate(&self, credentials: &Credentials) -> Result<Session> {
        let request = LegacyAuthRequest {
            vehicle_number: credentials.vehicle_number().to_string(),
            dl_number: credentials.license_number().to_string(),
        };
        let response = self.gateway.authenticate(&request).await?;
        let session = response.into_session(credentials.vehicle_number(), Utc::now())?;

        tracing::info!(
            driver_id = %session.driver_id,
            total_pickups = session.total_pickups,
            cached = session.pickups.len(),
            "Driver authenticated"
        );
        Ok(Session::Legacy(session))
    }

    async fn refresh_current(&self, session: &mut Session) -> Result<StopView> {
        let s = driver_mut(session)?;
        let index = s.current_pickup_index;
        let pickup = self.gateway.fetch_pickup(&s.driver_id, index).await?;

        let view = StopView::from_pickup(&pickup, index, s.total_pickups);
        if let Some(slot) = s.pickups.get_mut(index) {
            *slot = pickup;
        }
        Ok(view)
    }

    async fn start_stop(&self, _session: &mut Session) -> Result<StopStarted> {
        Err(RouteError::unsupported(
            Operation::StartStop.name(),
            self.protocol(),
        ))
    }

    async fn resolve(&self, session: &Session, resolution: Resolution<'_>) -> Result<()> {
        let s = driver(session)?;
        let update = match resolution {
            Resolution::Complete(payload) => PickupStatusUpdate::completed(payload, Utc::now()),
            Resolution::Skip(reason) => PickupStatusUpdate::skipped(reason, Utc::now()),
        };
        self.gateway
            .update_pickup_status(&s.driver_id, s.current_pickup_index, &update)
            .await?;
        Ok(())
    }

    async fn finish_route(&self, _session: &Session) -> Result<()> {
        Ok(())
    }

    async fn remote_progress(&self, _session: &Session) -> Result<RemoteProgress> {
        Err(RouteError::unsupported(
            Operation::RemoteProgress.name(),
            self.protocol(),
        ))
    }

    async fn refresh_pickups(&self, session: &mut Session) -> Result<usize> {
        let s = driver_mut(session)?;
        s.pickups = self.gateway.list_pickups(&s.driver_id).await?;
        Ok(s.pickups.len())
    }
}
