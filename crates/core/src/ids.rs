//! Prefixed opaque id generation.
//!
//! Every persisted entity gets a globally unique id of the form
//! `<prefix>_<32 hex chars>`, e.g. `job_6f2c…`. The prefix makes ids
//! self-describing in logs and API payloads.

use uuid::Uuid;

/// Id prefix for job records.
pub const PREFIX_JOB: &str = "job";

/// Id prefix for usage events.
pub const PREFIX_USAGE_EVENT: &str = "ue";

/// Id prefix for API keys.
pub const PREFIX_API_KEY: &str = "ak";

/// Id prefix for organizations.
pub const PREFIX_ORGANIZATION: &str = "org";

/// Id prefix for users.
pub const PREFIX_USER: &str = "usr";

/// Id prefix for extraction schemas.
pub const PREFIX_SCHEMA: &str = "sch";

/// Generate a new prefixed id from a v4 UUID.
pub fn new_id(prefix: &str) -> String {
    format!("{prefix}_{}", Uuid::new_v4().simple())
}
