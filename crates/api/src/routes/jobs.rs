//! Route definitions for the `/jobs` resource.
//!
//! All endpoints require authentication; the WebSocket route carries
//! its credential as a query parameter because browsers cannot set
//! headers on WebSocket upgrades.

use axum::routing::get;
use axum::Router;

use crate::handlers::jobs;
use crate::state::AppState;
use crate::ws;

/// Routes mounted at `/jobs`.
///
/// ```text
/// GET    /            -> list_jobs
/// POST   /            -> submit_job
/// GET    /{id}        -> get_job
/// GET    /{id}/ws     -> real-time gateway (WebSocket upgrade)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(jobs::list_jobs).post(jobs::submit_job))
        .route("/{id}", get(jobs::get_job))
        .route("/{id}/ws", get(ws::job_ws_handler))
}
