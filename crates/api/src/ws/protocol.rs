//! Client-facing WebSocket message vocabulary.
//!
//! Inbound, the only recognized payload is a liveness ping; anything
//! else — malformed JSON included — is silently ignored, never a
//! connection error. Outbound control messages are `pong` and the
//! pre-subscription `error` frame.

use serde::Deserialize;
use serde_json::json;

/// Connection-level error text for failed authentication.
pub const ERR_UNAUTHORIZED: &str = "Unauthorized";

/// Connection-level error text for a missing or foreign job. The two
/// causes are deliberately indistinguishable.
pub const ERR_JOB_NOT_FOUND: &str = "Job not found";

/// Messages a client may send.
#[derive(Debug, PartialEq, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ClientMessage {
    /// `{ "type": "ping" }` — answered with a pong.
    Ping,
}

/// Parse an inbound text frame. Unrecognized or malformed input is
/// `None`, which callers treat as "ignore".
pub fn parse_client_message(text: &str) -> Option<ClientMessage> {
    serde_json::from_str(text).ok()
}

/// `{ "type": "pong" }`
pub fn pong_frame() -> String {
    json!({ "type": "pong" }).to_string()
}

/// `{ "type": "error", "error": … }` — sent before the connection is
/// closed when authentication or authorization fails.
pub fn error_frame(error: &str) -> String {
    json!({ "type": "error", "error": error }).to_string()
}
