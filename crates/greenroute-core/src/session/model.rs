//! The persisted session aggregate.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::ids::{AssignmentId, DriverId};
use crate::protocol::ProtocolVersion;
use crate::stop::{PickupRecord, StopSnapshot, StopView};

/// A driver's route instance under the current protocol.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssignmentSession {
    pub assignment_id: AssignmentId,
    pub driver_name: String,
    pub driver_license: String,
    pub vehicle_number: String,
    pub route_date: String,
    pub total_stops: u32,
    /// 1-based; `total_stops + 1` means the route is complete.
    pub current_sequence: u32,
    /// Cached display data for `current_sequence`, cleared on advance.
    #[serde(default)]
    pub current_stop: Option<StopSnapshot>,
    #[serde(default)]
    pub trip_started_at: Option<String>,
    /// Set by start-stop for the current sequence, cleared on advance.
    #[serde(default)]
    pub stop_started_at: Option<String>,
    pub authenticated_at: DateTime<Utc>,
}

impl AssignmentSession {
    pub fn is_complete(&self) -> bool {
        self.current_sequence > self.total_stops
    }

    /// Moves to the next sequence and drops state tied to the old one.
    pub fn advance(&mut self) {
        self.current_sequence = self.current_sequence.saturating_add(1);
        self.current_stop = None;
        self.stop_started_at = None;
    }

    pub fn is_stop_in_progress(&self) -> bool {
        !self.is_complete() && self.stop_started_at.is_some()
    }

    pub fn cached_view(&self) -> Option<StopView> {
        if self.is_complete() {
            return None;
        }
        self.current_stop
            .as_ref()
            .map(|stop| StopView::from_snapshot(stop, self.current_sequence, self.total_stops))
    }
}

/// A driver's pickup list under the legacy protocol.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DriverSession {
    pub driver_id: DriverId,
    pub driver_name: String,
    pub vehicle_number: String,
    /// Zero-based index into `pickups`.
    pub current_pickup_index: usize,
    pub total_pickups: usize,
    #[serde(default)]
    pub pickups: Vec<PickupRecord>,
    pub authenticated_at: DateTime<Utc>,
}

impl DriverSession {
    pub fn is_complete(&self) -> bool {
        self.current_pickup_index >= self.total_pickups
    }

    pub fn advance(&mut self) {
        self.current_pickup_index = self.current_pickup_index.saturating_add(1);
    }

    pub fn cached_view(&self) -> Option<StopView> {
        if self.is_complete() {
            return None;
        }
        self.pickups
            .get(self.current_pickup_index)
            .map(|pickup| StopView::from_pickup(pickup, self.current_pickup_index, self.total_pickups))
    }
}

/// The single active session, tagged with the protocol that created it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "protocol", rename_all = "snake_case")]
pub enum Session {
    Current(AssignmentSession),
    Legacy(DriverSession),
}

impl Session {
    pub fn protocol(&self) -> ProtocolVersion {
        match self {
            Session::Current(_) => ProtocolVersion::Current,
            Session::Legacy(_) => ProtocolVersion::Legacy,
        }
    }

    pub fn is_complete(&self) -> bool {
        match self {
            Session::Current(s) => s.is_complete(),
            Session::Legacy(s) => s.is_complete(),
        }
    }

    /// 1-based position, unclamped (may be `total + 1`).
    pub fn position(&self) -> u32 {
        match self {
            Session::Current(s) => s.current_sequence,
            Session::Legacy(s) => s.current_pickup_index as u32 + 1,
        }
    }

    pub fn total(&self) -> u32 {
        match self {
            Session::Current(s) => s.total_stops,
            Session::Legacy(s) => s.total_pickups as u32,
        }
    }

    pub fn driver_name(&self) -> &str {
        match self {
            Session::Current(s) => &s.driver_name,
            Session::Legacy(s) => &s.driver_name,
        }
    }

    pub fn vehicle_number(&self) -> &str {
        match self {
            Session::Current(s) => &s.vehicle_number,
            Session::Legacy(s) => &s.vehicle_number,
        }
    }

    pub fn authenticated_at(&self) -> DateTime<Utc> {
        match self {
            Session::Current(s) => s.authenticated_at,
            Session::Legacy(s) => s.authenticated_at,
        }
    }

    pub fn advance(&mut self) {
        match self {
            Session::Current(s) => s.advance(),
            Session::Legacy(s) => s.advance(),
        }
    }

    pub fn cached_view(&self) -> Option<StopView> {
        match self {
            Session::Current(s) => s.cached_view(),
            Session::Legacy(s) => s.cached_view(),
        }
    }
}
