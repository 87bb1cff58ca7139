//! Per-assignment, per-sequence protocol.

use async_trait::async_trait;
use chrono::Utc;
use std::sync::Arc;

use greenroute_core::error::{Result, RouteError};
use greenroute_core::gateway::AssignmentGateway;
use greenroute_core::gateway::wire::{AssignmentAuthRequest, RemoteProgress, StopStarted};
use greenroute_core::policy::CallPolicy;
use greenroute_core::protocol::ProtocolVersion;
use greenroute_core::session::{AssignmentSession, Session};
use greenroute_core::stop::{StopSnapshot, StopView};
use greenroute_core::validation::Credentials;

use super::{Operation, ProtocolAdapter, Resolution};

pub struct CurrentProtocol {
    gateway: Arc<dyn AssignmentGateway>,
}

impl CurrentProtocol {
    pub fn new(gateway: Arc<dyn AssignmentGateway>) -> Self {
        Self { gateway }
    }
}

fn assignment(session: &Session) -> Result<&AssignmentSession> {
    match session {
        Session::Current(s) => Ok(s),
        other => Err(RouteError::internal(format!(
            "{} session handed to the current protocol adapter",
            other.protocol()
        ))),
    }
}

fn assignment_mut(session: &mut Session) -> Result<&mut AssignmentSession> {
    match session {
        Session::Current(s) => Ok(s),
        other => Err(RouteError::internal(format!(
            "{} session handed to the current protocol adapter",
            other.protocol()
        ))),
    }
}

#[async_trait]
impl ProtocolAdapter for CurrentProtocol {
    fn protocol(&self) -> ProtocolVersion {
        ProtocolVersion::Current
    }

    fn supports(&self, operation: Operation) -> bool {
        matches!(operation, Operation::StartStop | Operation::RemoteProgress)
    }

    fn confirms_next_before_advance(&self) -> bool {
        false
    }

    async fn authenticate(&self, credentials: &Credentials) -> Result<Session> {
        let request = AssignmentAuthRequest {
            vehicle_number: credentials.vehicle_number().to_string(),
            driving_license: credentials.license_number().to_string(),
        };
        let response = self.gateway.authenticate(&request).await?;
        let mut session = response.into_session(Utc::now())?;

        let started = CallPolicy::BestEffort.settle(
            "start trip",
            self.gateway.start_trip(&session.assignment_id).await,
        )?;
        session.trip_started_at = started.and_then(|s| s.trip_started_at);

        tracing::info!(
            assignment_id = %session.assignment_id,
            total_stops = session.total_stops,
            sequence = session.current_sequence,
            trip_started = session.trip_started_at.is_some(),
            "Assignment authenticated"
        );
        Ok(Session::Current(session))
    }

    async fn refresh_current(&self, session: &mut Session) -> Result<StopView> {
        let s = assignment_mut(session)?;
        let response = self
            .gateway
            .fetch_stop(&s.assignment_id, s.current_sequence)
            .await?;
        let stop: StopSnapshot = response
            .stop
            .ok_or_else(|| RouteError::malformed("stop response has no 'stop' object"))?;

        let mut view = StopView::from_snapshot(&stop, s.current_sequence, s.total_stops);
        if let Some(is_last) = response.is_last {
            view.is_last = is_last;
        }
        s.current_stop = Some(stop);
        Ok(view)
    }

    async fn start_stop(&self, session: &mut Session) -> Result<StopStarted> {
        let s = assignment_mut(session)?;
        let started = self
            .gateway
            .start_stop(&s.assignment_id, s.current_sequence)
            .await?;
        s.stop_started_at = Some(
            started
                .pickup_started_at
                .clone()
                .unwrap_or_else(|| Utc::now().to_rfc3339()),
        );
        Ok(started)
    }

    async fn resolve(&self, session: &Session, resolution: Resolution<'_>) -> Result<()> {
        let s = assignment(session)?;
        match resolution {
            Resolution::Complete(payload) => {
                self.gateway
                    .complete_stop(&s.assignment_id, s.current_sequence, payload)
                    .await?;
                Ok(())
            }
            Resolution::Skip(_) => Err(RouteError::unsupported(
                Operation::Skip.name(),
                self.protocol(),
            )),
        }
    }

    async fn finish_route(&self, session: &Session) -> Result<()> {
        let s = assignment(session)?;
        self.gateway.end_trip(&s.assignment_id).await?;
        Ok(())
    }

    async fn remote_progress(&self, session: &Session) -> Result<RemoteProgress> {
        let s = assignment(session)?;
        self.gateway.progress(&s.assignment_id).await
    }

    async fn refresh_pickups(&self, _session: &mut Session) -> Result<usize> {
        Err(RouteError::unsupported(
            Operation::RefreshPickups.name(),
            self.protocol(),
        ))
    }
}
