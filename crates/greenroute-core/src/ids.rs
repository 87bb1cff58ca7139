//! Opaque identifiers handed out by the backend.
//!
//! The backend is inconsistent about whether ids are JSON numbers or
//! strings, so every id is normalized to a string on the way in.

use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// Identifies one driver's route instance under the current protocol.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AssignmentId(String);

impl AssignmentId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AssignmentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Identifies a driver under the legacy protocol.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DriverId(String);

impl DriverId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DriverId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawId {
    Text(String),
    Integer(i64),
    Float(f64),
}

/// Deserializes an optional id that may arrive as a string or a number.
///
/// Empty strings are treated as absent.
pub fn opaque_id<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<RawId>::deserialize(deserializer)?;
    Ok(match raw {
        Some(RawId::Text(text)) if !text.trim().is_empty() => Some(text),
        Some(RawId::Text(_)) | None => None,
        Some(RawId::Integer(n)) => Some(n.to_string()),
        Some(RawId::Float(n)) => Some(n.to_string()),
    })
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawNumber {
    Number(f64),
    Text(String),
}

/// Deserializes an optional coordinate that may arrive as a number or a
/// numeric string. Unparseable strings become `None`.
pub fn lenient_f64<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<RawNumber>::deserialize(deserializer)?;
    Ok(match raw {
        Some(RawNumber::Number(n)) => Some(n),
        Some(RawNumber::Text(text)) => text.trim().parse().ok(),
        None => None,
    })
}
