//! Request and response bodies exchanged with the backend.
//!
//! Responses are deliberately lenient (every field optional, ids accept
//! numbers or strings); the `into_session` conversions decide what is
//! actually required.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{Result, RouteError};
use crate::ids::{AssignmentId, DriverId, opaque_id};
use crate::session::{AssignmentSession, DriverSession};
use crate::stop::{CompletionPayload, PickupRecord, StopSnapshot};

/// POST `/driver/authenticate/v2`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssignmentAuthRequest {
    pub vehicle_number: String,
    pub driving_license: String,
}

/// POST `/driver/authenticate`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LegacyAuthRequest {
    pub vehicle_number: String,
    pub dl_number: String,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct AssignmentAuthResponse {
    #[serde(default, deserialize_with = "opaque_id")]
    pub assignment_id: Option<String>,
    #[serde(default)]
    pub driver_dl: Option<String>,
    #[serde(default)]
    pub vehicle_no: Option<String>,
    #[serde(default)]
    pub total_stops: Option<u32>,
    #[serde(default)]
    pub driver_name: Option<String>,
    #[serde(default)]
    pub route_date: Option<String>,
    #[serde(default)]
    pub current_stop: Option<StopSnapshot>,
}

fn present(value: &Option<String>) -> bool {
    value.as_deref().is_some_and(|v| !v.trim().is_empty())
}

impl AssignmentAuthResponse {
    /// Names of required fields that are absent or empty, in wire order.
    pub fn missing_fields(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if !present(&self.assignment_id) {
            missing.push("assignment_id");
        }
        if !present(&self.driver_dl) {
            missing.push("driver_dl");
        }
        if !present(&self.vehicle_no) {
            missing.push("vehicle_no");
        }
        if self.total_stops.unwrap_or(0) == 0 {
            missing.push("total_stops");
        }
        if !present(&self.driver_name) {
            missing.push("driver_name");
        }
        if !present(&self.route_date) {
            missing.push("route_date");
        }
        if self.current_stop.is_none() {
            missing.push("current_stop");
        }
        missing
    }

    /// Builds the session, starting at the sequence the server reports for
    /// `current_stop` (a partly worked route resumes where it left off).
    pub fn into_session(self, authenticated_at: DateTime<Utc>) -> Result<AssignmentSession> {
        let missing = self.missing_fields();
        if !missing.is_empty() {
            return Err(RouteError::incomplete(missing));
        }
        let (
            Some(assignment_id),
            Some(driver_license),
            Some(vehicle_number),
            Some(total_stops),
            Some(driver_name),
            Some(route_date),
            Some(current_stop),
        ) = (
            self.assignment_id,
            self.driver_dl,
            self.vehicle_no,
            self.total_stops,
            self.driver_name,
            self.route_date,
            self.current_stop,
        )
        else {
            return Err(RouteError::internal("required fields vanished after check"));
        };

        let current_sequence = current_stop.sequence.unwrap_or(1).max(1);
        if current_sequence > total_stops {
            return Err(RouteError::malformed(format!(
                "current_stop sequence {current_sequence} is past the last stop ({total_stops})"
            )));
        }

        Ok(AssignmentSession {
            assignment_id: AssignmentId::new(assignment_id),
            driver_name,
            driver_license,
            vehicle_number,
            route_date,
            total_stops,
            current_sequence,
            current_stop: Some(current_stop),
            trip_started_at: None,
            stop_started_at: None,
            authenticated_at,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct LegacyAuthResponse {
    #[serde(default, deserialize_with = "opaque_id")]
    pub driver_id: Option<String>,
    #[serde(default)]
    pub driver_name: Option<String>,
    #[serde(default)]
    pub vehicle_number: Option<String>,
    #[serde(default)]
    pub pickups: Vec<PickupRecord>,
    #[serde(default)]
    pub total_pickups: Option<usize>,
}

impl LegacyAuthResponse {
    /// `vehicle_number` falls back to what the driver typed.
    pub fn into_session(
        self,
        typed_vehicle_number: &str,
        authenticated_at: DateTime<Utc>,
    ) -> Result<DriverSession> {
        let driver_id = match self.driver_id {
            Some(id) => id,
            None => return Err(RouteError::incomplete(["driver_id"])),
        };
        let total_pickups = self.total_pickups.unwrap_or(self.pickups.len());
        Ok(DriverSession {
            driver_id: DriverId::new(driver_id),
            driver_name: self.driver_name.unwrap_or_default(),
            vehicle_number: self
                .vehicle_number
                .filter(|v| !v.trim().is_empty())
                .unwrap_or_else(|| typed_vehicle_number.to_string()),
            current_pickup_index: 0,
            total_pickups,
            pickups: self.pickups,
            authenticated_at,
        })
    }
}

/// GET `/assignments/{id}/stops/{seq}`
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct StopResponse {
    #[serde(default)]
    pub stop: Option<StopSnapshot>,
    #[serde(default)]
    pub sequence: Option<u32>,
    #[serde(default, rename = "isLast", alias = "is_last")]
    pub is_last: Option<bool>,
}

/// POST `/assignments/{id}/start-trip`
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct TripStarted {
    #[serde(default)]
    pub trip_started_at: Option<String>,
}

/// POST `/assignments/{id}/stops/{seq}/start`
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct StopStarted {
    #[serde(default)]
    pub pickup_started_at: Option<String>,
}

/// Generic acknowledgement (end-trip, complete-stop, status update).
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Ack {
    #[serde(default)]
    pub success: Option<bool>,
    #[serde(default)]
    pub message: Option<String>,
}

/// GET `/assignments/{id}/progress`
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct RemoteProgress {
    #[serde(default)]
    pub current: Option<u32>,
    #[serde(default)]
    pub total: Option<u32>,
    #[serde(default, alias = "nextStop")]
    pub next_stop: Option<StopSnapshot>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PickupStatus {
    Completed,
    Skipped,
}

/// POST `/driver/{driver}/pickup/{index}/update`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PickupStatusUpdate {
    pub status: PickupStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub skipped_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub skip_reason: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weight: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl PickupStatusUpdate {
    pub fn completed(payload: &CompletionPayload, at: DateTime<Utc>) -> Self {
        Self {
            status: PickupStatus::Completed,
            completed_at: Some(at.to_rfc3339()),
            skipped_at: None,
            skip_reason: None,
            weight: payload.weight,
            notes: payload.trimmed_notes(),
        }
    }

    pub fn skipped(reason: &str, at: DateTime<Utc>) -> Self {
        let reason = reason.trim();
        Self {
            status: PickupStatus::Skipped,
            completed_at: None,
            skipped_at: Some(at.to_rfc3339()),
            skip_reason: (!reason.is_empty()).then(|| reason.to_string()),
            weight: None,
            notes: None,
        }
    }
}

/// Error body the backend sends with non-success statuses.
#[derive(Debug, Clone, Deserialize)]
pub struct ErrorBody {
    pub error: Option<String>,
}
