//! Session domain module.
//!
//! - `model`: the persisted aggregate (`Session` and its two protocol variants)
//! - `state`: workflow state derived from a session (`RouteState`)
//! - `progress`: read-only progress projection (`Progress`)
//! - `repository`: persistence trait (`SessionStore`)

mod model;
mod progress;
mod repository;
mod state;

pub use model::{AssignmentSession, DriverSession, Session};
pub use progress::Progress;
pub use repository::{ACTIVE_SESSION_KEY, SessionStore};
pub use state::RouteState;

#[cfg(test)]
pub(crate) use model::fixtures;
