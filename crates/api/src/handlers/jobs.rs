//! Handlers for the `/jobs` resource.
//!
//! All endpoints require authentication via [`AuthContext`] and are
//! scoped to the caller's organization. Job state transitions are not
//! exposed over HTTP — the worker drives those through the Job Store.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;

use scrybe_core::CoreError;
use scrybe_db::models::job::{CreateJob, JobListQuery, SubmitJob};
use scrybe_db::repositories::{JobRepo, SchemaRepo};

use crate::auth::AuthContext;
use crate::error::{AppError, AppResult};
use crate::response::DataResponse;
use crate::state::AppState;

/// POST /api/v1/jobs
///
/// Submit a new parse/extract job. Returns 201 with the created row;
/// the job starts in `pending` status and is picked up by the worker.
pub async fn submit_job(
    auth: AuthContext,
    State(state): State<AppState>,
    Json(input): Json<SubmitJob>,
) -> AppResult<impl IntoResponse> {
    if let Some(schema_id) = &input.schema_id {
        SchemaRepo::find_for_org(&state.pool, schema_id, &auth.organization_id)
            .await?
            .ok_or_else(|| {
                AppError::BadRequest(format!("Unknown extraction schema: {schema_id}"))
            })?;
    }

    let job = JobRepo::create(
        &state.pool,
        &CreateJob {
            organization_id: &auth.organization_id,
            user_id: &auth.user_id,
            api_key_id: auth.api_key_id.as_deref(),
            input: &input,
        },
    )
    .await?;

    tracing::info!(
        job_id = %job.id,
        job_type = %job.job_type,
        organization_id = %auth.organization_id,
        "Job submitted",
    );

    Ok((StatusCode::CREATED, Json(DataResponse { data: job })))
}

/// GET /api/v1/jobs/{id}
///
/// Get a single job, including its extraction schema when one is
/// attached. A job outside the caller's organization is reported as
/// not found, never as forbidden.
pub async fn get_job(
    auth: AuthContext,
    State(state): State<AppState>,
    Path(job_id): Path<String>,
) -> AppResult<impl IntoResponse> {
    let found = state
        .jobs
        .get_job(&job_id)
        .await?
        .filter(|found| found.job.organization_id == auth.organization_id)
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Job",
            id: job_id,
        }))?;

    Ok(Json(DataResponse { data: found }))
}

/// GET /api/v1/jobs
///
/// List the organization's jobs, newest first. Supports optional
/// `status`, `limit`, and `offset` query parameters.
pub async fn list_jobs(
    auth: AuthContext,
    State(state): State<AppState>,
    Query(params): Query<JobListQuery>,
) -> AppResult<impl IntoResponse> {
    let jobs = JobRepo::list_for_org(&state.pool, &auth.organization_id, &params).await?;
    Ok(Json(DataResponse { data: jobs }))
}
