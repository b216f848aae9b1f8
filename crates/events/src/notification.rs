//! Job notification messages and their JSON wire shape.
//!
//! Every message is tagged by a `type` field and carries the job id
//! plus a `data` object:
//!
//! ```json
//! { "type": "status",    "jobId": "job_…", "data": { "status": "processing" } }
//! { "type": "completed", "jobId": "job_…", "data": { "status": "completed", "markdownResult": "…", "processingTimeMs": 1200 } }
//! { "type": "error",     "jobId": "job_…", "data": { "status": "failed", "error": "…" } }
//! ```

use serde::{Deserialize, Serialize};

use scrybe_core::JobStatus;

/// A status-change notification for one job.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum JobNotification {
    /// Non-terminal status change (also used as the synthetic first
    /// message when a client attaches).
    Status {
        #[serde(rename = "jobId")]
        job_id: String,
        data: StatusData,
    },
    /// Terminal success with full results.
    Completed {
        #[serde(rename = "jobId")]
        job_id: String,
        data: CompletedData,
    },
    /// Terminal (non-retryable) failure.
    Error {
        #[serde(rename = "jobId")]
        job_id: String,
        data: ErrorData,
    },
}

/// Payload of a `status` notification.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusData {
    pub status: JobStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub processing_time_ms: Option<i64>,
}

/// Payload of a `completed` notification.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompletedData {
    pub status: JobStatus,
    pub markdown_result: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub json_result: Option<serde_json::Value>,
    pub processing_time_ms: i64,
}

/// Payload of an `error` notification.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorData {
    pub status: JobStatus,
    pub error: String,
}

impl JobNotification {
    /// Build a `status` notification.
    pub fn status(
        job_id: impl Into<String>,
        status: JobStatus,
        processing_time_ms: Option<i64>,
    ) -> Self {
        JobNotification::Status {
            job_id: job_id.into(),
            data: StatusData {
                status,
                processing_time_ms,
            },
        }
    }

    /// Build a `completed` notification.
    pub fn completed(
        job_id: impl Into<String>,
        markdown_result: impl Into<String>,
        json_result: Option<serde_json::Value>,
        processing_time_ms: i64,
    ) -> Self {
        JobNotification::Completed {
            job_id: job_id.into(),
            data: CompletedData {
                status: JobStatus::Completed,
                markdown_result: markdown_result.into(),
                json_result,
                processing_time_ms,
            },
        }
    }

    /// Build an `error` notification.
    pub fn error(job_id: impl Into<String>, error: impl Into<String>) -> Self {
        JobNotification::Error {
            job_id: job_id.into(),
            data: ErrorData {
                status: JobStatus::Failed,
                error: error.into(),
            },
        }
    }

    /// The job this notification belongs to.
    pub fn job_id(&self) -> &str {
        match self {
            JobNotification::Status { job_id, .. }
            | JobNotification::Completed { job_id, .. }
            | JobNotification::Error { job_id, .. } => job_id,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_wire_shape() {
        let note = JobNotification::status("job_abc", JobStatus::Processing, None);
        let json = serde_json::to_value(&note).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "type": "status",
                "jobId": "job_abc",
                "data": { "status": "processing" }
            })
        );
    }

    #[test]
    fn status_wire_shape_with_duration() {
        let note = JobNotification::status("job_abc", JobStatus::Extracting, Some(850));
        let json = serde_json::to_value(&note).unwrap();
        assert_eq!(json["data"]["processingTimeMs"], 850);
    }

    #[test]
    fn completed_wire_shape() {
        let note = JobNotification::completed(
            "job_abc",
            "# Hi",
            Some(serde_json::json!({"total": 42})),
            1200,
        );
        let json = serde_json::to_value(&note).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "type": "completed",
                "jobId": "job_abc",
                "data": {
                    "status": "completed",
                    "markdownResult": "# Hi",
                    "jsonResult": { "total": 42 },
                    "processingTimeMs": 1200
                }
            })
        );
    }

    #[test]
    fn completed_omits_absent_json_result() {
        let note = JobNotification::completed("job_abc", "# Hi", None, 10);
        let json = serde_json::to_value(&note).unwrap();
        assert!(json["data"].get("jsonResult").is_none());
    }

    #[test]
    fn error_wire_shape() {
        let note = JobNotification::error("job_abc", "OCR engine timed out");
        let json = serde_json::to_value(&note).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "type": "error",
                "jobId": "job_abc",
                "data": { "status": "failed", "error": "OCR engine timed out" }
            })
        );
    }
}
