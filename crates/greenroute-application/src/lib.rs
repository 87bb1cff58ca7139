//! Application layer for GreenRoute.
//!
//! Coordinates the session store and the remote gateways to move a driver
//! through a route.

pub mod adapter;
pub mod route_progress;

#[cfg(test)]
mod route_progress_test;

pub use adapter::{CurrentProtocol, LegacyProtocol, ProtocolAdapter};
pub use route_progress::RouteProgress;
