//! Job entity model and DTOs for the parse/extract pipeline.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use scrybe_core::types::{EntityId, Timestamp};
use scrybe_core::JobType;

use super::schema::ExtractionSchema;

/// A row from the `jobs` table.
///
/// `status` holds the TEXT representation of `scrybe_core::JobStatus`;
/// use [`Job::status`](scrybe_core::JobStatus::parse) helpers when the
/// enum form is needed.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Job {
    pub id: EntityId,
    pub organization_id: EntityId,
    pub user_id: EntityId,
    pub api_key_id: Option<EntityId>,
    pub job_type: String,
    pub status: String,
    pub file_name: Option<String>,
    pub file_key: Option<String>,
    pub file_size: Option<i64>,
    pub mime_type: Option<String>,
    pub source_url: Option<String>,
    pub schema_id: Option<EntityId>,
    pub extraction_hints: Option<String>,
    pub llm_provider: Option<String>,
    pub llm_model: Option<String>,
    pub markdown_result: Option<String>,
    pub json_result: Option<serde_json::Value>,
    pub page_count: Option<i32>,
    pub token_count: Option<i32>,
    pub error_code: Option<String>,
    pub error_message: Option<String>,
    pub retry_count: i32,
    pub started_at: Option<Timestamp>,
    pub completed_at: Option<Timestamp>,
    pub processing_time_ms: Option<i64>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// A job together with its associated extraction schema, if any.
#[derive(Debug, Clone, Serialize)]
pub struct JobWithSchema {
    #[serde(flatten)]
    pub job: Job,
    pub schema: Option<ExtractionSchema>,
}

/// DTO for submitting a new job via `POST /api/v1/jobs`.
#[derive(Debug, Deserialize)]
pub struct SubmitJob {
    pub job_type: JobType,
    pub file_name: Option<String>,
    pub file_size: Option<i64>,
    pub mime_type: Option<String>,
    pub source_url: Option<String>,
    pub schema_id: Option<EntityId>,
    pub extraction_hints: Option<String>,
}

/// Internal creation input: the submission DTO plus resolved ownership.
#[derive(Debug)]
pub struct CreateJob<'a> {
    pub organization_id: &'a str,
    pub user_id: &'a str,
    pub api_key_id: Option<&'a str>,
    pub input: &'a SubmitJob,
}

/// Optional fields carried alongside an intermediate status transition.
#[derive(Debug, Default, Deserialize)]
pub struct StatusUpdate {
    pub processing_time_ms: Option<i64>,
    pub llm_provider: Option<String>,
    pub llm_model: Option<String>,
}

/// Token consumption reported by the LLM provider for one job.
#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct LlmUsage {
    pub prompt_tokens: i32,
    pub completion_tokens: i32,
}

/// Result payload for a successful job completion.
#[derive(Debug, Deserialize)]
pub struct CompletedJob {
    pub markdown_result: String,
    pub json_result: Option<serde_json::Value>,
    pub page_count: i32,
    pub token_count: i32,
    pub llm_usage: Option<LlmUsage>,
    pub llm_model: Option<String>,
    pub processing_time_ms: i64,
}

/// Storage metadata written after upload, before processing begins.
#[derive(Debug, Deserialize)]
pub struct FileInfo {
    pub file_name: String,
    pub file_key: String,
    pub file_size: i64,
    pub mime_type: String,
}

/// Query parameters for `GET /api/v1/jobs`.
#[derive(Debug, Default, Deserialize)]
pub struct JobListQuery {
    /// Filter by status text (e.g. `"pending"`, `"failed"`).
    pub status: Option<String>,
    /// Maximum number of results. Defaults to 50, capped at 100.
    pub limit: Option<i64>,
    /// Number of results to skip. Defaults to 0.
    pub offset: Option<i64>,
}
