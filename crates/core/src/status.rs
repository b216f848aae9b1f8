//! Job status and type vocabularies, stored as TEXT in the database.
//!
//! The status state machine is monotonic forward:
//!
//! ```text
//! pending -> processing -> extracting -> completed
//!                \______________\______> failed
//! failed -> processing   (retry re-entry only)
//! ```
//!
//! `completed`, and `failed` with no further retry, are terminal.

use serde::{Deserialize, Serialize};

/// Lifecycle status of a job.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JobStatus {
    Pending,
    Processing,
    Extracting,
    Completed,
    Failed,
}

impl JobStatus {
    /// Database / wire representation.
    pub fn as_str(self) -> &'static str {
        match self {
            JobStatus::Pending => "pending",
            JobStatus::Processing => "processing",
            JobStatus::Extracting => "extracting",
            JobStatus::Completed => "completed",
            JobStatus::Failed => "failed",
        }
    }

    /// Parse the database representation. Returns `None` for unknown text.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "pending" => Some(JobStatus::Pending),
            "processing" => Some(JobStatus::Processing),
            "extracting" => Some(JobStatus::Extracting),
            "completed" => Some(JobStatus::Completed),
            "failed" => Some(JobStatus::Failed),
            _ => None,
        }
    }

    /// Whether no further automatic transition leaves this status.
    ///
    /// `failed` counts as terminal here; a retry re-enters `processing`
    /// explicitly via the transition table rather than by exemption.
    pub fn is_terminal(self) -> bool {
        matches!(self, JobStatus::Completed | JobStatus::Failed)
    }

    /// Whether `self -> to` is a legal state-machine transition.
    pub fn can_transition_to(self, to: JobStatus) -> bool {
        use JobStatus::*;
        matches!(
            (self, to),
            (Pending, Processing)
                | (Processing, Extracting)
                | (Processing, Completed)
                | (Extracting, Completed)
                | (Pending, Failed)
                | (Processing, Failed)
                | (Extracting, Failed)
                | (Failed, Processing)
        )
    }
}

impl std::fmt::Display for JobStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Kind of work a job performs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JobType {
    /// OCR parse to markdown.
    Parse,
    /// OCR parse followed by structured LLM extraction.
    Extract,
}

impl JobType {
    pub fn as_str(self) -> &'static str {
        match self {
            JobType::Parse => "parse",
            JobType::Extract => "extract",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "parse" => Some(JobType::Parse),
            "extract" => Some(JobType::Extract),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_round_trips_through_text() {
        for status in [
            JobStatus::Pending,
            JobStatus::Processing,
            JobStatus::Extracting,
            JobStatus::Completed,
            JobStatus::Failed,
        ] {
            assert_eq!(JobStatus::parse(status.as_str()), Some(status));
        }
        assert_eq!(JobStatus::parse("cancelled"), None);
    }

    #[test]
    fn forward_transitions_are_legal() {
        assert!(JobStatus::Pending.can_transition_to(JobStatus::Processing));
        assert!(JobStatus::Processing.can_transition_to(JobStatus::Extracting));
        assert!(JobStatus::Processing.can_transition_to(JobStatus::Completed));
        assert!(JobStatus::Extracting.can_transition_to(JobStatus::Completed));
        assert!(JobStatus::Extracting.can_transition_to(JobStatus::Failed));
    }

    #[test]
    fn terminal_states_do_not_regress() {
        assert!(!JobStatus::Completed.can_transition_to(JobStatus::Processing));
        assert!(!JobStatus::Completed.can_transition_to(JobStatus::Failed));
        assert!(!JobStatus::Extracting.can_transition_to(JobStatus::Processing));
        assert!(!JobStatus::Extracting.can_transition_to(JobStatus::Pending));
    }

    #[test]
    fn failed_may_reenter_processing_for_retry() {
        assert!(JobStatus::Failed.can_transition_to(JobStatus::Processing));
        assert!(!JobStatus::Failed.can_transition_to(JobStatus::Extracting));
    }

    #[test]
    fn terminal_flags() {
        assert!(JobStatus::Completed.is_terminal());
        assert!(JobStatus::Failed.is_terminal());
        assert!(!JobStatus::Extracting.is_terminal());
    }
}
