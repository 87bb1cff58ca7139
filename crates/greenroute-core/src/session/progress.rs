//! Read-only progress projection.

use serde::{Deserialize, Serialize};

use super::model::Session;

/// How far along the route the driver is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Progress {
    /// 1-based, clamped to `total` once complete.
    pub current: u32,
    pub total: u32,
    /// `round(current / total * 100)`, always within `0..=100`.
    pub percentage: u8,
    pub remaining: u32,
    pub complete: bool,
}

impl Progress {
    /// Builds the projection from an unclamped 1-based position.
    pub fn from_position(position: u32, total: u32) -> Self {
        let complete = position > total;
        let current = position.min(total);
        let percentage = if total == 0 {
            100
        } else {
            let ratio = f64::from(current) / f64::from(total) * 100.0;
            ratio.round().clamp(0.0, 100.0) as u8
        };
        Self {
            current,
            total,
            percentage,
            remaining: total - current,
            complete,
        }
    }
}

impl From<&Session> for Progress {
    fn from(session: &Session) -> Self {
        Progress::from_position(session.position(), session.total())
    }
}
