//! Job Store implementation.

use std::sync::Arc;

use sqlx::PgPool;

use scrybe_core::JobStatus;
use scrybe_db::models::job::{CompletedJob, FileInfo, JobWithSchema, StatusUpdate};
use scrybe_db::repositories::{JobRepo, UsageRepo};
use scrybe_events::{JobNotification, NotificationBus};

/// Errors produced by Job Store operations.
///
/// Database faults propagate unmodified — the store performs no
/// retries; retry orchestration belongs to the calling worker.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Job not found: {0}")]
    NotFound(String),

    #[error("Invalid status transition for {job_id}: {from} -> {to}")]
    InvalidTransition {
        job_id: String,
        from: &'static str,
        to: &'static str,
    },

    #[error(transparent)]
    Database(#[from] sqlx::Error),
}

/// Owns job state transitions and the notifications they emit.
///
/// Cheaply cloneable; the pool and bus are shared handles. This is the
/// sole entry point external code uses to drive job state — the worker
/// process calls these operations, and the API's real-time sessions
/// observe their notifications.
#[derive(Clone)]
pub struct JobStore {
    pool: PgPool,
    bus: Arc<NotificationBus>,
}

impl JobStore {
    pub fn new(pool: PgPool, bus: Arc<NotificationBus>) -> Self {
        Self { pool, bus }
    }

    /// The bus this store publishes to.
    pub fn bus(&self) -> &Arc<NotificationBus> {
        &self.bus
    }

    /// Apply an intermediate status transition (`processing` or
    /// `extracting`) plus optional timing/LLM fields, then emit a
    /// `status` notification.
    ///
    /// The transition is validated against the current row: illegal
    /// moves (including any regression out of a terminal state) return
    /// [`StoreError::InvalidTransition`]. Terminal statuses are not
    /// accepted here — completion and failure have dedicated operations
    /// that own their side effects.
    pub async fn update_status(
        &self,
        job_id: &str,
        status: JobStatus,
        update: StatusUpdate,
    ) -> Result<(), StoreError> {
        if !matches!(status, JobStatus::Processing | JobStatus::Extracting) {
            return Err(StoreError::InvalidTransition {
                job_id: job_id.to_string(),
                from: "(any)",
                to: status.as_str(),
            });
        }

        let current = self.current_status(job_id).await?;
        if !current.can_transition_to(status) {
            return Err(StoreError::InvalidTransition {
                job_id: job_id.to_string(),
                from: current.as_str(),
                to: status.as_str(),
            });
        }

        let updated = JobRepo::apply_status(&self.pool, job_id, status, &update).await?;
        if updated == 0 {
            return Err(StoreError::NotFound(job_id.to_string()));
        }

        self.bus
            .publish(
                job_id,
                JobNotification::status(job_id, status, update.processing_time_ms),
            )
            .await;

        Ok(())
    }

    /// Terminal success: persist results and, when the job is owned by
    /// an API key, record usage — all in one transaction — then emit a
    /// `completed` notification.
    ///
    /// Safe to call more than once for the same job: the usage event is
    /// keyed uniquely by job id and a duplicate insert is a silent
    /// no-op that also skips the aggregate increment. The job row write
    /// itself is repeated and the notification is re-published.
    pub async fn complete_job(&self, job_id: &str, result: CompletedJob) -> Result<(), StoreError> {
        let mut tx = self.pool.begin().await?;

        let api_key_id = JobRepo::complete(&mut tx, job_id, &result)
            .await?
            .ok_or_else(|| StoreError::NotFound(job_id.to_string()))?;

        if let Some(api_key_id) = &api_key_id {
            let usage = result.llm_usage.unwrap_or_default();
            let is_new = UsageRepo::record(
                &mut tx,
                api_key_id,
                job_id,
                result.page_count,
                usage.prompt_tokens,
                usage.completion_tokens,
                result.llm_model.as_deref(),
            )
            .await?;
            if !is_new {
                tracing::debug!(job_id, "Duplicate completion; usage already recorded");
            }
        }

        tx.commit().await?;

        self.bus
            .publish(
                job_id,
                JobNotification::completed(
                    job_id,
                    result.markdown_result,
                    result.json_result,
                    result.processing_time_ms,
                ),
            )
            .await;

        Ok(())
    }

    /// Terminal failure: persist error fields and bump the retry count
    /// (the count increments on every failure, retried or not).
    ///
    /// The transition is validated against the current row, so a job
    /// that already reached `completed` (or is already `failed`) cannot
    /// be flipped to `failed` — a late failure report for a finished
    /// job returns [`StoreError::InvalidTransition`]. A retry that
    /// fails again has re-entered `processing` first.
    ///
    /// An `error` notification is emitted only when `should_retry` is
    /// false — a retryable failure stays silent because the job is
    /// expected to re-enter `processing` shortly, and subscribers
    /// should not see the error state flicker.
    pub async fn fail_job(
        &self,
        job_id: &str,
        error_code: &str,
        error_message: &str,
        should_retry: bool,
    ) -> Result<(), StoreError> {
        let current = self.current_status(job_id).await?;
        if !current.can_transition_to(JobStatus::Failed) {
            return Err(StoreError::InvalidTransition {
                job_id: job_id.to_string(),
                from: current.as_str(),
                to: JobStatus::Failed.as_str(),
            });
        }

        let updated = JobRepo::fail(&self.pool, job_id, error_code, error_message).await?;
        if updated == 0 {
            return Err(StoreError::NotFound(job_id.to_string()));
        }

        if !should_retry {
            self.bus
                .publish(job_id, JobNotification::error(job_id, error_message))
                .await;
        }

        Ok(())
    }

    /// Read-only fetch including the associated extraction schema.
    /// Absence is `Ok(None)`, not an error.
    pub async fn get_job(&self, job_id: &str) -> Result<Option<JobWithSchema>, StoreError> {
        Ok(JobRepo::find_with_schema(&self.pool, job_id).await?)
    }

    /// Write storage metadata. Pre-processing bookkeeping, so no
    /// notification is emitted.
    pub async fn update_file_info(&self, job_id: &str, info: FileInfo) -> Result<(), StoreError> {
        let updated = JobRepo::update_file_info(&self.pool, job_id, &info).await?;
        if updated == 0 {
            return Err(StoreError::NotFound(job_id.to_string()));
        }
        Ok(())
    }

    /// Read and parse the job's current status for transition checks.
    async fn current_status(&self, job_id: &str) -> Result<JobStatus, StoreError> {
        let current_text = JobRepo::status_of(&self.pool, job_id)
            .await?
            .ok_or_else(|| StoreError::NotFound(job_id.to_string()))?;
        JobStatus::parse(&current_text).ok_or_else(|| {
            StoreError::Database(sqlx::Error::Decode(
                format!("unknown job status {current_text:?}").into(),
            ))
        })
    }
}
