//! Backend protocol discriminant.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::RouteError;

/// Which backend data model a session belongs to.
///
/// `Current` is the per-assignment/per-sequence API, `Legacy` the older
/// per-pickup-index API. A session never mixes the two.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProtocolVersion {
    #[default]
    Current,
    Legacy,
}

impl ProtocolVersion {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProtocolVersion::Current => "current",
            ProtocolVersion::Legacy => "legacy",
        }
    }
}

impl fmt::Display for ProtocolVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProtocolVersion {
    type Err = RouteError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "current" | "v2" => Ok(ProtocolVersion::Current),
            "legacy" | "v1" => Ok(ProtocolVersion::Legacy),
            other => Err(RouteError::config(format!(
                "unknown protocol '{other}', expected 'current' or 'legacy'"
            ))),
        }
    }
}
