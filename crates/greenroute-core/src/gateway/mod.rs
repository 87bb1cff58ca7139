//! Remote gateway contracts, one trait per backend protocol.
//!
//! Implementations are stateless: every call is a single attempt bounded
//! by a timeout, and failures come back as `RouteError` without retries.

pub mod wire;

use async_trait::async_trait;

use crate::error::Result;
use crate::ids::{AssignmentId, DriverId};
use crate::stop::{CompletionPayload, PickupRecord};
use wire::{
    Ack, AssignmentAuthRequest, AssignmentAuthResponse, LegacyAuthRequest, LegacyAuthResponse,
    PickupStatusUpdate, RemoteProgress, StopResponse, StopStarted, TripStarted,
};

/// Per-assignment, per-sequence backend.
#[async_trait]
pub trait AssignmentGateway: Send + Sync {
    async fn authenticate(&self, request: &AssignmentAuthRequest) -> Result<AssignmentAuthResponse>;

    async fn fetch_stop(&self, assignment: &AssignmentId, sequence: u32) -> Result<StopResponse>;

    async fn start_trip(&self, assignment: &AssignmentId) -> Result<TripStarted>;

    async fn end_trip(&self, assignment: &AssignmentId) -> Result<Ack>;

    async fn start_stop(&self, assignment: &AssignmentId, sequence: u32) -> Result<StopStarted>;

    /// Marks the stop done server-side and uploads the photo, if any.
    async fn complete_stop(
        &self,
        assignment: &AssignmentId,
        sequence: u32,
        payload: &CompletionPayload,
    ) -> Result<Ack>;

    async fn progress(&self, assignment: &AssignmentId) -> Result<RemoteProgress>;
}

/// Per-driver, per-pickup-index backend.
#[async_trait]
pub trait LegacyGateway: Send + Sync {
    async fn authenticate(&self, request: &LegacyAuthRequest) -> Result<LegacyAuthResponse>;

    async fn fetch_pickup(&self, driver: &DriverId, index: usize) -> Result<PickupRecord>;

    async fn update_pickup_status(
        &self,
        driver: &DriverId,
        index: usize,
        update: &PickupStatusUpdate,
    ) -> Result<Ack>;

    async fn list_pickups(&self, driver: &DriverId) -> Result<Vec<PickupRecord>>;
}
