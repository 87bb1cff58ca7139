//! reqwest implementation of the remote gateways.

mod gateway;

pub use gateway::HttpGateway;
