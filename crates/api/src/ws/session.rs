//! Per-connection gateway session.

use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::extract::{Path, Query, State};
use axum::response::IntoResponse;
use futures::{SinkExt, StreamExt};
use serde::Deserialize;

use scrybe_core::JobStatus;
use scrybe_db::models::job::Job;
use scrybe_db::repositories::JobRepo;
use scrybe_events::JobNotification;

use crate::auth::resolve_token;
use crate::state::AppState;
use crate::ws::protocol::{
    error_frame, parse_client_message, pong_frame, ClientMessage, ERR_JOB_NOT_FOUND,
    ERR_UNAUTHORIZED,
};

/// Query parameters accepted on the upgrade request.
#[derive(Debug, Deserialize)]
pub struct WsQuery {
    /// API key or session JWT. A query parameter because browsers
    /// cannot set headers on WebSocket upgrades.
    pub token: Option<String>,
}

/// GET /api/v1/jobs/{id}/ws
///
/// Upgrade to a WebSocket session watching one job. Authentication and
/// authorization happen after the upgrade so failures surface as an
/// in-band `error` frame followed by a close, per the wire contract.
pub async fn job_ws_handler(
    ws: WebSocketUpgrade,
    Path(job_id): Path<String>,
    Query(query): Query<WsQuery>,
    State(state): State<AppState>,
) -> impl IntoResponse {
    ws.on_upgrade(move |socket| session(socket, state, job_id, query.token))
}

/// Run one gateway session to completion.
///
/// On a successful open the session subscribes to the notification bus
/// and immediately sends the job's current status as a synthetic first
/// message, so a client attaching after a transition still learns the
/// latest state. The subscription is removed on every exit path.
async fn session(mut socket: WebSocket, state: AppState, job_id: String, token: Option<String>) {
    let auth = match &token {
        Some(token) => match resolve_token(&state, token).await {
            Ok(auth) => auth,
            Err(e) => {
                tracing::error!(error = %e, "Identity lookup failed");
                None
            }
        },
        None => None,
    };
    let Some(auth) = auth else {
        reject(socket, ERR_UNAUTHORIZED).await;
        return;
    };

    // Scoped by job AND organization: a foreign job looks identical to
    // a missing one.
    let job = match JobRepo::find_for_org(&state.pool, &job_id, &auth.organization_id).await {
        Ok(job) => job,
        Err(e) => {
            tracing::error!(job_id, error = %e, "Job lookup failed");
            None
        }
    };
    let Some(job) = job else {
        reject(socket, ERR_JOB_NOT_FOUND).await;
        return;
    };

    let (sub_id, mut rx) = state.bus.subscribe(&job_id).await;
    tracing::info!(job_id, user_id = %auth.user_id, "Real-time session opened");

    let (mut sink, mut stream) = socket.split();

    // Synthetic first message: the job's current status.
    let first = current_status_notification(&job);
    if send_json(&mut sink, &first).await.is_err() {
        state.bus.unsubscribe(&job_id, sub_id).await;
        return;
    }

    loop {
        tokio::select! {
            note = rx.recv() => match note {
                Some(note) => {
                    if send_json(&mut sink, &note).await.is_err() {
                        break;
                    }
                }
                // Bus dropped; nothing more will arrive.
                None => break,
            },
            msg = stream.next() => match msg {
                Some(Ok(Message::Text(text))) => {
                    if let Some(ClientMessage::Ping) = parse_client_message(&text) {
                        if sink.send(Message::Text(pong_frame().into())).await.is_err() {
                            break;
                        }
                    }
                }
                Some(Ok(Message::Close(_))) | None => break,
                Some(Ok(_)) => {}
                Some(Err(e)) => {
                    tracing::debug!(job_id, error = %e, "WebSocket receive error");
                    break;
                }
            }
        }
    }

    state.bus.unsubscribe(&job_id, sub_id).await;
    tracing::info!(job_id, "Real-time session closed");
}

/// Build the synthetic first message from the persisted row.
fn current_status_notification(job: &Job) -> JobNotification {
    match JobStatus::parse(&job.status) {
        Some(JobStatus::Completed) => JobNotification::completed(
            &job.id,
            job.markdown_result.clone().unwrap_or_default(),
            job.json_result.clone(),
            job.processing_time_ms.unwrap_or_default(),
        ),
        Some(JobStatus::Failed) => JobNotification::error(
            &job.id,
            job.error_message.clone().unwrap_or_default(),
        ),
        Some(status) => JobNotification::status(&job.id, status, job.processing_time_ms),
        // Unknown text in the status column; report pending rather than
        // failing the session.
        None => JobNotification::status(&job.id, JobStatus::Pending, None),
    }
}

/// Send an error frame and close. Best-effort: the peer may already be
/// gone.
async fn reject(mut socket: WebSocket, error: &str) {
    let _ = socket.send(Message::Text(error_frame(error).into())).await;
    let _ = socket.close().await;
}

async fn send_json(
    sink: &mut (impl SinkExt<Message, Error = axum::Error> + Unpin),
    notification: &JobNotification,
) -> Result<(), axum::Error> {
    let text = serde_json::to_string(notification)
        .map_err(axum::Error::new)?;
    sink.send(Message::Text(text.into())).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn job(status: &str) -> Job {
        Job {
            id: "job_1".into(),
            organization_id: "org_1".into(),
            user_id: "usr_1".into(),
            api_key_id: None,
            job_type: "parse".into(),
            status: status.into(),
            file_name: None,
            file_key: None,
            file_size: None,
            mime_type: None,
            source_url: None,
            schema_id: None,
            extraction_hints: None,
            llm_provider: None,
            llm_model: None,
            markdown_result: Some("# done".into()),
            json_result: None,
            page_count: None,
            token_count: None,
            error_code: None,
            error_message: Some("boom".into()),
            retry_count: 0,
            started_at: None,
            completed_at: None,
            processing_time_ms: Some(7),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn synthetic_first_message_reflects_current_state() {
        assert!(matches!(
            current_status_notification(&job("processing")),
            JobNotification::Status { .. }
        ));
        assert!(matches!(
            current_status_notification(&job("completed")),
            JobNotification::Completed { .. }
        ));
        assert!(matches!(
            current_status_notification(&job("failed")),
            JobNotification::Error { .. }
        ));
        // Unknown status text degrades to pending, not a panic.
        assert!(matches!(
            current_status_notification(&job("garbage")),
            JobNotification::Status { .. }
        ));
    }
}
