//! Coarse workflow state derived from the stored session.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::model::Session;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RouteState {
    Unauthenticated,
    Authenticated,
    PickupInProgress,
    RouteComplete,
}

impl RouteState {
    pub fn of(session: Option<&Session>) -> Self {
        match session {
            None => RouteState::Unauthenticated,
            Some(s) if s.is_complete() => RouteState::RouteComplete,
            Some(Session::Current(s)) if s.is_stop_in_progress() => RouteState::PickupInProgress,
            Some(_) => RouteState::Authenticated,
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, RouteState::RouteComplete)
    }
}

impl fmt::Display for RouteState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            RouteState::Unauthenticated => "unauthenticated",
            RouteState::Authenticated => "authenticated",
            RouteState::PickupInProgress => "pickup in progress",
            RouteState::RouteComplete => "route complete",
        };
        f.write_str(label)
    }
}
