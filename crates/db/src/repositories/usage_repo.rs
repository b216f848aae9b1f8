//! Repository for usage accounting: the per-job event insert and the
//! `(api_key_id, day)` daily rollup.
//!
//! Both writes run on the caller's transaction so the event and the
//! aggregate can never diverge. The event insert uses conflict-ignore
//! semantics keyed on `job_id`, which is what makes completion delivery
//! safe under at-least-once retries.

use chrono::NaiveDate;
use sqlx::{PgPool, Postgres, Transaction};

use scrybe_core::ids::{self, PREFIX_USAGE_EVENT};

use crate::models::usage::{UsageDaily, UsageEvent};

/// Column list for `usage_events` queries.
const EVENT_COLUMNS: &str = "\
    id, api_key_id, job_id, page_count, prompt_tokens, completion_tokens, \
    model, created_at";

/// Column list for `usage_daily` queries.
const DAILY_COLUMNS: &str = "\
    api_key_id, day, pages, jobs_count, prompt_tokens, completion_tokens";

/// Provides the at-most-once usage recording operation and read helpers
/// for tests.
pub struct UsageRepo;

impl UsageRepo {
    /// Record one completed job's consumption.
    ///
    /// Inserts the usage event with `ON CONFLICT (job_id) DO NOTHING`;
    /// only when that insert was new does the daily aggregate for
    /// `(api_key_id, today)` get incremented (or created). Returns
    /// whether the event was new — `false` signals a duplicate
    /// completion, which is a no-op, not an error.
    pub async fn record(
        tx: &mut Transaction<'_, Postgres>,
        api_key_id: &str,
        job_id: &str,
        page_count: i32,
        prompt_tokens: i32,
        completion_tokens: i32,
        model: Option<&str>,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "INSERT INTO usage_events \
                 (id, api_key_id, job_id, page_count, prompt_tokens, completion_tokens, model) \
             VALUES ($1, $2, $3, $4, $5, $6, $7) \
             ON CONFLICT (job_id) DO NOTHING",
        )
        .bind(ids::new_id(PREFIX_USAGE_EVENT))
        .bind(api_key_id)
        .bind(job_id)
        .bind(page_count)
        .bind(prompt_tokens)
        .bind(completion_tokens)
        .bind(model)
        .execute(&mut **tx)
        .await?;

        let is_new = result.rows_affected() > 0;
        if !is_new {
            return Ok(false);
        }

        sqlx::query(
            "INSERT INTO usage_daily \
                 (api_key_id, day, pages, jobs_count, prompt_tokens, completion_tokens) \
             VALUES ($1, (NOW() AT TIME ZONE 'utc')::date, $2, 1, $3, $4) \
             ON CONFLICT (api_key_id, day) DO UPDATE \
             SET pages = usage_daily.pages + EXCLUDED.pages, \
                 jobs_count = usage_daily.jobs_count + 1, \
                 prompt_tokens = usage_daily.prompt_tokens + EXCLUDED.prompt_tokens, \
                 completion_tokens = usage_daily.completion_tokens + EXCLUDED.completion_tokens",
        )
        .bind(api_key_id)
        .bind(page_count as i64)
        .bind(prompt_tokens as i64)
        .bind(completion_tokens as i64)
        .execute(&mut **tx)
        .await?;

        Ok(true)
    }

    /// Find the usage event for a job, if one exists.
    pub async fn find_event_by_job(
        pool: &PgPool,
        job_id: &str,
    ) -> Result<Option<UsageEvent>, sqlx::Error> {
        let query = format!("SELECT {EVENT_COLUMNS} FROM usage_events WHERE job_id = $1");
        sqlx::query_as::<_, UsageEvent>(&query)
            .bind(job_id)
            .fetch_optional(pool)
            .await
    }

    /// Count usage events for a job (0 or 1 by constraint).
    pub async fn count_events_for_job(pool: &PgPool, job_id: &str) -> Result<i64, sqlx::Error> {
        let row: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM usage_events WHERE job_id = $1")
            .bind(job_id)
            .fetch_one(pool)
            .await?;
        Ok(row.0)
    }

    /// Fetch the daily aggregate row for an API key and day.
    pub async fn find_daily(
        pool: &PgPool,
        api_key_id: &str,
        day: NaiveDate,
    ) -> Result<Option<UsageDaily>, sqlx::Error> {
        let query = format!(
            "SELECT {DAILY_COLUMNS} FROM usage_daily WHERE api_key_id = $1 AND day = $2"
        );
        sqlx::query_as::<_, UsageDaily>(&query)
            .bind(api_key_id)
            .bind(day)
            .fetch_optional(pool)
            .await
    }
}
