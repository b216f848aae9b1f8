//! Shared domain types for the scrybe document-extraction backend.
//!
//! Everything here is storage- and transport-agnostic: prefixed ids,
//! the job state machine, and the common error type.

pub mod error;
pub mod ids;
pub mod status;
pub mod types;

pub use error::CoreError;
pub use status::{JobStatus, JobType};
