//! Stop data as it arrives from the backend, and the views built from it.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{Result, RouteError};
use crate::ids::{lenient_f64, opaque_id};

pub const DEFAULT_CUSTOMER_NAME: &str = "Customer";
pub const DEFAULT_ADDRESS: &str = "Address not available";

/// Lightest weight (kg) a completion may report.
pub const MIN_WEIGHT: f64 = 0.1;
/// Heaviest weight (kg) a completion may report.
pub const MAX_WEIGHT: f64 = 1000.0;

/// Display data for one stop under the current protocol.
///
/// The backend fills either the live customer fields or the `*_snapshot`
/// copies taken when the route was planned, so both are kept.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct StopSnapshot {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub customer_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name_snapshot: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address_snapshot: Option<String>,
    #[serde(default, deserialize_with = "lenient_f64", skip_serializing_if = "Option::is_none")]
    pub latitude: Option<f64>,
    #[serde(default, deserialize_with = "lenient_f64", skip_serializing_if = "Option::is_none")]
    pub longitude: Option<f64>,
    #[serde(default, deserialize_with = "opaque_id", skip_serializing_if = "Option::is_none")]
    pub customer_id: Option<String>,
    #[serde(default, deserialize_with = "opaque_id", skip_serializing_if = "Option::is_none")]
    pub customer_id_snapshot: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sequence: Option<u32>,
}

/// One pickup under the legacy protocol.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct PickupRecord {
    #[serde(default, deserialize_with = "opaque_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub customer_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(default, deserialize_with = "lenient_f64", skip_serializing_if = "Option::is_none")]
    pub latitude: Option<f64>,
    #[serde(default, deserialize_with = "lenient_f64", skip_serializing_if = "Option::is_none")]
    pub longitude: Option<f64>,
    #[serde(default, deserialize_with = "opaque_id", skip_serializing_if = "Option::is_none")]
    pub customer_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_pickup_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
}

/// What the host shows for the stop the driver is on.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StopView {
    pub customer_name: String,
    pub address: String,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub customer_id: Option<String>,
    /// Only the legacy backend schedules the next visit.
    pub next_pickup_date: Option<String>,
    /// 1-based position within the route.
    pub position: u32,
    pub total: u32,
    pub is_last: bool,
}

fn non_blank(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

impl StopView {
    pub fn from_snapshot(snapshot: &StopSnapshot, position: u32, total: u32) -> Self {
        Self {
            customer_name: non_blank(&snapshot.customer_name)
                .or_else(|| non_blank(&snapshot.name_snapshot))
                .unwrap_or_else(|| DEFAULT_CUSTOMER_NAME.to_string()),
            address: non_blank(&snapshot.address)
                .or_else(|| non_blank(&snapshot.address_snapshot))
                .unwrap_or_else(|| DEFAULT_ADDRESS.to_string()),
            latitude: snapshot.latitude,
            longitude: snapshot.longitude,
            customer_id: snapshot
                .customer_id
                .clone()
                .or_else(|| snapshot.customer_id_snapshot.clone()),
            next_pickup_date: None,
            position,
            total,
            is_last: position >= total,
        }
    }

    /// A stop whose details could not be fetched; shows the defaults.
    pub fn unresolved(position: u32, total: u32) -> Self {
        Self::from_snapshot(&StopSnapshot::default(), position, total)
    }

    /// `index` is the zero-based legacy index.
    pub fn from_pickup(pickup: &PickupRecord, index: usize, total: usize) -> Self {
        let position = index as u32 + 1;
        let total = total as u32;
        Self {
            customer_name: non_blank(&pickup.customer_name)
                .unwrap_or_else(|| DEFAULT_CUSTOMER_NAME.to_string()),
            address: non_blank(&pickup.address).unwrap_or_else(|| DEFAULT_ADDRESS.to_string()),
            latitude: pickup.latitude,
            longitude: pickup.longitude,
            customer_id: pickup.customer_id.clone(),
            next_pickup_date: pickup.next_pickup_date.clone(),
            position,
            total,
            is_last: position >= total,
        }
    }
}

/// A photo to upload alongside a completion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PhotoAttachment {
    pub path: PathBuf,
    pub file_name: Option<String>,
    pub content_type: Option<String>,
}

impl PhotoAttachment {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            file_name: None,
            content_type: None,
        }
    }

    pub fn with_file_name(mut self, name: impl Into<String>) -> Self {
        self.file_name = Some(name.into());
        self
    }

    pub fn with_content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = Some(content_type.into());
        self
    }

    /// Upload name; falls back to `photo_<unix-millis>.jpg`.
    pub fn resolved_file_name(&self) -> String {
        self.file_name.clone().unwrap_or_else(|| {
            format!("photo_{}.jpg", chrono::Utc::now().timestamp_millis())
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// Optional data captured when a stop is resolved.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct CompletionPayload {
    pub weight: Option<f64>,
    pub notes: Option<String>,
    pub photo: Option<PhotoAttachment>,
}

impl CompletionPayload {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_weight(mut self, weight: f64) -> Self {
        self.weight = Some(weight);
        self
    }

    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into());
        self
    }

    pub fn with_photo(mut self, photo: PhotoAttachment) -> Self {
        self.photo = Some(photo);
        self
    }

    /// Rejects out-of-range weights before anything touches the network.
    pub fn validate(&self) -> Result<()> {
        if let Some(weight) = self.weight {
            if !weight.is_finite() || !(MIN_WEIGHT..=MAX_WEIGHT).contains(&weight) {
                return Err(RouteError::validation(format!(
                    "weight must be between {MIN_WEIGHT} and {MAX_WEIGHT} kg, got {weight}"
                )));
            }
        }
        Ok(())
    }

    /// Notes with surrounding whitespace removed; blank notes are dropped.
    pub fn trimmed_notes(&self) -> Option<String> {
        non_blank(&self.notes)
    }
}

/// Result of resolving the current stop.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum StopOutcome {
    Next(StopView),
    RouteComplete { total: u32 },
}

impl StopOutcome {
    pub fn is_route_complete(&self) -> bool {
        matches!(self, StopOutcome::RouteComplete { .. })
    }
}
