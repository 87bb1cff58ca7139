pub mod config;
pub mod error;
pub mod gateway;
pub mod ids;
pub mod navigation;
pub mod policy;
pub mod protocol;
pub mod session;
pub mod stop;
pub mod validation;

// Re-export common types
pub use config::ClientConfig;
pub use error::{Result, RouteError};
pub use ids::{AssignmentId, DriverId};
pub use navigation::Navigation;
pub use policy::CallPolicy;
pub use protocol::ProtocolVersion;
pub use session::{
    ACTIVE_SESSION_KEY, AssignmentSession, DriverSession, Progress, RouteState, Session,
    SessionStore,
};
pub use stop::{CompletionPayload, PhotoAttachment, StopOutcome, StopView};
pub use validation::Credentials;
