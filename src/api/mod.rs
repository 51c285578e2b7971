//! REST collaborator types.
//!
//! The auth, course and profile services are opaque collaborators; the core
//! consumes only their uniform `{success, message, data, errorCode}`
//! envelope and the course fields that seed a tutoring context.

pub mod envelope;
pub mod models;

pub use envelope::{ApiEnvelope, ApiError};
pub use models::{CourseLevel, CourseSummary};
