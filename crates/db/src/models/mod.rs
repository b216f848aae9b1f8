//! Row models and DTOs, one module per table family.

pub mod identity;
pub mod job;
pub mod schema;
pub mod usage;
