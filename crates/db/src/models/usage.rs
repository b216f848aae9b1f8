//! Usage accounting models: per-job events and the daily rollup.

use chrono::NaiveDate;
use serde::Serialize;
use sqlx::FromRow;

use scrybe_core::types::{EntityId, Timestamp};

/// A row from the `usage_events` table — one completed job's billable
/// consumption. At most one row exists per job (`uq_usage_events_job`).
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct UsageEvent {
    pub id: EntityId,
    pub api_key_id: EntityId,
    pub job_id: EntityId,
    pub page_count: i32,
    pub prompt_tokens: i32,
    pub completion_tokens: i32,
    pub model: Option<String>,
    pub created_at: Timestamp,
}

/// A row from the `usage_daily` table — the `(api_key_id, day)` rollup.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct UsageDaily {
    pub api_key_id: EntityId,
    pub day: NaiveDate,
    pub pages: i64,
    pub jobs_count: i64,
    pub prompt_tokens: i64,
    pub completion_tokens: i64,
}
