//! Repository layer: stateless structs with associated async functions,
//! one per table family.

mod api_key_repo;
mod job_repo;
mod schema_repo;
mod usage_repo;

pub use api_key_repo::ApiKeyRepo;
pub use job_repo::JobRepo;
pub use schema_repo::SchemaRepo;
pub use usage_repo::UsageRepo;
