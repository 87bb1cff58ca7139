//! Data Transfer Objects (DTOs) for persistence.
//!
//! DTOs are versioned with version-migrate so that stored records written
//! by older clients keep loading after schema changes.

mod session;

pub use session::{
    AssignmentRecordV1_0_0, DriverRecordV1_0_0, SESSION_ENTITY, SessionRecordV1_0_0,
    create_session_record_migrator,
};
