pub mod dto;
pub mod file_session_store;
pub mod http;
pub mod paths;
pub mod storage;

pub use crate::file_session_store::FileSessionStore;
pub use crate::http::HttpGateway;
pub use crate::paths::GreenRoutePaths;
pub use crate::storage::{AtomicFile, ConfigStorage};
