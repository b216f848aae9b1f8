//! Repository for the `jobs` table.
//!
//! Plain durable writes only — transition legality and notification
//! publishing are the Job Store's concern (`scrybe-pipeline`). Status
//! literals always go through `JobStatus`, never inline strings.

use sqlx::{PgPool, Postgres, Transaction};

use scrybe_core::ids::{self, PREFIX_JOB};
use scrybe_core::JobStatus;

use crate::models::job::{
    CompletedJob, CreateJob, FileInfo, Job, JobListQuery, JobWithSchema, StatusUpdate,
};
use crate::models::schema::ExtractionSchema;

/// Column list for `jobs` queries.
const COLUMNS: &str = "\
    id, organization_id, user_id, api_key_id, job_type, status, \
    file_name, file_key, file_size, mime_type, source_url, \
    schema_id, extraction_hints, llm_provider, llm_model, \
    markdown_result, json_result, page_count, token_count, \
    error_code, error_message, retry_count, \
    started_at, completed_at, processing_time_ms, \
    created_at, updated_at";

/// Maximum page size for job listing.
const MAX_LIMIT: i64 = 100;

/// Default page size for job listing.
const DEFAULT_LIMIT: i64 = 50;

/// Provides CRUD operations for job records.
pub struct JobRepo;

impl JobRepo {
    /// Create a new pending job. Returns the inserted row.
    pub async fn create(pool: &PgPool, input: &CreateJob<'_>) -> Result<Job, sqlx::Error> {
        let query = format!(
            "INSERT INTO jobs \
                 (id, organization_id, user_id, api_key_id, job_type, status, \
                  file_name, file_size, mime_type, source_url, schema_id, extraction_hints) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Job>(&query)
            .bind(ids::new_id(PREFIX_JOB))
            .bind(input.organization_id)
            .bind(input.user_id)
            .bind(input.api_key_id)
            .bind(input.input.job_type.as_str())
            .bind(JobStatus::Pending.as_str())
            .bind(&input.input.file_name)
            .bind(input.input.file_size)
            .bind(&input.input.mime_type)
            .bind(&input.input.source_url)
            .bind(&input.input.schema_id)
            .bind(&input.input.extraction_hints)
            .fetch_one(pool)
            .await
    }

    /// Find a job by its ID.
    pub async fn find_by_id(pool: &PgPool, id: &str) -> Result<Option<Job>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM jobs WHERE id = $1");
        sqlx::query_as::<_, Job>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find a job scoped to an organization.
    ///
    /// A miss is indistinguishable between "no such job" and "job belongs
    /// to another organization" — callers must not leak the difference.
    pub async fn find_for_org(
        pool: &PgPool,
        id: &str,
        organization_id: &str,
    ) -> Result<Option<Job>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM jobs WHERE id = $1 AND organization_id = $2");
        sqlx::query_as::<_, Job>(&query)
            .bind(id)
            .bind(organization_id)
            .fetch_optional(pool)
            .await
    }

    /// Find a job by ID, enriched with its extraction schema when present.
    pub async fn find_with_schema(
        pool: &PgPool,
        id: &str,
    ) -> Result<Option<JobWithSchema>, sqlx::Error> {
        let job = Self::find_by_id(pool, id).await?;
        match job {
            Some(job) => {
                let schema = match &job.schema_id {
                    Some(schema_id) => {
                        sqlx::query_as::<_, ExtractionSchema>(
                            "SELECT id, organization_id, name, definition, created_at, updated_at \
                             FROM extraction_schemas WHERE id = $1",
                        )
                        .bind(schema_id)
                        .fetch_optional(pool)
                        .await?
                    }
                    None => None,
                };
                Ok(Some(JobWithSchema { job, schema }))
            }
            None => Ok(None),
        }
    }

    /// Fetch only the current status text of a job.
    pub async fn status_of(pool: &PgPool, id: &str) -> Result<Option<String>, sqlx::Error> {
        let row: Option<(String,)> = sqlx::query_as("SELECT status FROM jobs WHERE id = $1")
            .bind(id)
            .fetch_optional(pool)
            .await?;
        Ok(row.map(|(status,)| status))
    }

    /// Apply an intermediate status plus any optional timing/LLM fields.
    ///
    /// `started_at` is stamped on first entry into `processing`. Returns
    /// the number of rows updated (0 when the job does not exist).
    pub async fn apply_status(
        pool: &PgPool,
        id: &str,
        status: JobStatus,
        update: &StatusUpdate,
    ) -> Result<u64, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE jobs \
             SET status = $2, \
                 started_at = CASE \
                     WHEN $2 = 'processing' AND started_at IS NULL THEN NOW() \
                     ELSE started_at END, \
                 processing_time_ms = COALESCE($3, processing_time_ms), \
                 llm_provider = COALESCE($4, llm_provider), \
                 llm_model = COALESCE($5, llm_model), \
                 updated_at = NOW() \
             WHERE id = $1",
        )
        .bind(id)
        .bind(status.as_str())
        .bind(update.processing_time_ms)
        .bind(&update.llm_provider)
        .bind(&update.llm_model)
        .execute(pool)
        .await?;
        Ok(result.rows_affected())
    }

    /// Terminal completion write, inside the caller's transaction.
    ///
    /// Returns the job's owning `api_key_id` (`None` row means the job
    /// does not exist; inner `None` means no owning key).
    pub async fn complete(
        tx: &mut Transaction<'_, Postgres>,
        id: &str,
        result: &CompletedJob,
    ) -> Result<Option<Option<String>>, sqlx::Error> {
        let row: Option<(Option<String>,)> = sqlx::query_as(
            "UPDATE jobs \
             SET status = $2, markdown_result = $3, json_result = $4, \
                 page_count = $5, token_count = $6, \
                 llm_model = COALESCE($7, llm_model), \
                 processing_time_ms = $8, \
                 completed_at = NOW(), updated_at = NOW() \
             WHERE id = $1 \
             RETURNING api_key_id",
        )
        .bind(id)
        .bind(JobStatus::Completed.as_str())
        .bind(&result.markdown_result)
        .bind(&result.json_result)
        .bind(result.page_count)
        .bind(result.token_count)
        .bind(&result.llm_model)
        .bind(result.processing_time_ms)
        .fetch_optional(&mut **tx)
        .await?;
        Ok(row.map(|(api_key_id,)| api_key_id))
    }

    /// Terminal failure write: error fields plus an unconditional
    /// `retry_count` increment. Returns the number of rows updated.
    pub async fn fail(
        pool: &PgPool,
        id: &str,
        error_code: &str,
        error_message: &str,
    ) -> Result<u64, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE jobs \
             SET status = $2, error_code = $3, error_message = $4, \
                 retry_count = retry_count + 1, updated_at = NOW() \
             WHERE id = $1",
        )
        .bind(id)
        .bind(JobStatus::Failed.as_str())
        .bind(error_code)
        .bind(error_message)
        .execute(pool)
        .await?;
        Ok(result.rows_affected())
    }

    /// Write storage metadata after upload. No status change.
    pub async fn update_file_info(
        pool: &PgPool,
        id: &str,
        info: &FileInfo,
    ) -> Result<u64, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE jobs \
             SET file_name = $2, file_key = $3, file_size = $4, mime_type = $5, \
                 updated_at = NOW() \
             WHERE id = $1",
        )
        .bind(id)
        .bind(&info.file_name)
        .bind(&info.file_key)
        .bind(info.file_size)
        .bind(&info.mime_type)
        .execute(pool)
        .await?;
        Ok(result.rows_affected())
    }

    /// List an organization's jobs with optional status filter and
    /// pagination, newest first.
    pub async fn list_for_org(
        pool: &PgPool,
        organization_id: &str,
        params: &JobListQuery,
    ) -> Result<Vec<Job>, sqlx::Error> {
        let limit = params.limit.unwrap_or(DEFAULT_LIMIT).min(MAX_LIMIT);
        let offset = params.offset.unwrap_or(0);

        let mut conditions = vec!["organization_id = $1".to_string()];
        let mut bind_idx: u32 = 2;

        if params.status.is_some() {
            conditions.push(format!("status = ${bind_idx}"));
            bind_idx += 1;
        }

        let query = format!(
            "SELECT {COLUMNS} FROM jobs \
             WHERE {} \
             ORDER BY created_at DESC \
             LIMIT ${bind_idx} OFFSET ${}",
            conditions.join(" AND "),
            bind_idx + 1,
        );

        let mut q = sqlx::query_as::<_, Job>(&query).bind(organization_id);

        if let Some(status) = &params.status {
            q = q.bind(status);
        }

        q = q.bind(limit).bind(offset);

        q.fetch_all(pool).await
    }
}
