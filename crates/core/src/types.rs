/// All primary keys are opaque prefixed strings (e.g. `job_1f9a…`).
pub type EntityId = String;

/// All timestamps are UTC.
pub type Timestamp = chrono::DateTime<chrono::Utc>;
