//! Route definitions, composed by the router builder.

pub mod health;
pub mod jobs;

use axum::Router;

use crate::state::AppState;

/// All `/api/v1` routes.
pub fn api_routes() -> Router<AppState> {
    Router::new().nest("/jobs", jobs::router())
}
