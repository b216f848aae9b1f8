//! Real-Time Gateway: per-connection WebSocket sessions that relay
//! job notifications to a remote peer.
//!
//! One connection watches exactly one job. The session authenticates,
//! authorizes against the job's organization, subscribes to the
//! notification bus, and forwards every notification until disconnect.

mod protocol;
mod session;

pub use protocol::{ERR_JOB_NOT_FOUND, ERR_UNAUTHORIZED};
pub use session::job_ws_handler;
