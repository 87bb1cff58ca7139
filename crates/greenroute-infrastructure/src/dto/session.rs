//! Session DTOs and migrations

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use version_migrate::{FromDomain, IntoDomain, Versioned};

use greenroute_core::ids::{AssignmentId, DriverId};
use greenroute_core::session::{AssignmentSession, DriverSession, Session};
use greenroute_core::stop::{PickupRecord, StopSnapshot};

/// Assignment fields as stored in V1.0.0 records.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssignmentRecordV1_0_0 {
    pub assignment_id: String,
    pub driver_name: String,
    #[serde(default)]
    pub driver_license: String,
    pub vehicle_number: String,
    pub route_date: String,
    pub total_stops: u32,
    pub current_sequence: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_stop: Option<StopSnapshot>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trip_started_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stop_started_at: Option<String>,
    pub authenticated_at: DateTime<Utc>,
}

/// Legacy driver fields as stored in V1.0.0 records.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DriverRecordV1_0_0 {
    pub driver_id: String,
    pub driver_name: String,
    pub vehicle_number: String,
    pub current_pickup_index: usize,
    pub total_pickups: usize,
    #[serde(default)]
    pub pickups: Vec<PickupRecord>,
    pub authenticated_at: DateTime<Utc>,
}

/// Active session record V1.0.0, discriminated by `protocol`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Versioned)]
#[versioned(version = "1.0.0")]
#[serde(tag = "protocol", rename_all = "snake_case")]
pub enum SessionRecordV1_0_0 {
    Current(AssignmentRecordV1_0_0),
    Legacy(DriverRecordV1_0_0),
}

/// Convert SessionRecordV1_0_0 DTO to domain model
impl IntoDomain<Session> for SessionRecordV1_0_0 {
    fn into_domain(self) -> Session {
        match self {
            SessionRecordV1_0_0::Current(r) => Session::Current(AssignmentSession {
                assignment_id: AssignmentId::new(r.assignment_id),
                driver_name: r.driver_name,
                driver_license: r.driver_license,
                vehicle_number: r.vehicle_number,
                route_date: r.route_date,
                total_stops: r.total_stops,
                current_sequence: r.current_sequence,
                current_stop: r.current_stop,
                trip_started_at: r.trip_started_at,
                stop_started_at: r.stop_started_at,
                authenticated_at: r.authenticated_at,
            }),
            SessionRecordV1_0_0::Legacy(r) => Session::Legacy(DriverSession {
                driver_id: DriverId::new(r.driver_id),
                driver_name: r.driver_name,
                vehicle_number: r.vehicle_number,
                current_pickup_index: r.current_pickup_index,
                total_pickups: r.total_pickups,
                pickups: r.pickups,
                authenticated_at: r.authenticated_at,
            }),
        }
    }
}

/// Convert domain model to SessionRecordV1_0_0 DTO for persistence
impl FromDomain<Session> for SessionRecordV1_0_0 {
    fn from_domain(session: Session) -> Self {
        match session {
            Session::Current(s) => SessionRecordV1_0_0::Current(AssignmentRecordV1_0_0 {
                assignment_id: s.assignment_id.as_str().to_string(),
                driver_name: s.driver_name,
                driver_license: s.driver_license,
                vehicle_number: s.vehicle_number,
                route_date: s.route_date,
                total_stops: s.total_stops,
                current_sequence: s.current_sequence,
                current_stop: s.current_stop,
                trip_started_at: s.trip_started_at,
                stop_started_at: s.stop_started_at,
                authenticated_at: s.authenticated_at,
            }),
            Session::Legacy(s) => SessionRecordV1_0_0::Legacy(DriverRecordV1_0_0 {
                driver_id: s.driver_id.as_str().to_string(),
                driver_name: s.driver_name,
                vehicle_number: s.vehicle_number,
                current_pickup_index: s.current_pickup_index,
                total_pickups: s.total_pickups,
                pickups: s.pickups,
                authenticated_at: s.authenticated_at,
            }),
        }
    }
}

// ============================================================================
// Migrator factory
// ============================================================================

/// Entity name used in the flat `version` format.
pub const SESSION_ENTITY: &str = "active_session";

/// Creates a Migrator for the active session record.
pub fn create_session_record_migrator() -> version_migrate::Migrator {
    let mut migrator = version_migrate::Migrator::builder().build();
    let path = version_migrate::Migrator::define(SESSION_ENTITY)
        .from::<SessionRecordV1_0_0>()
        .into_with_save::<Session>();
    migrator
        .register(path)
        .expect("Failed to register active_session migration path");
    migrator
}
