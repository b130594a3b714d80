//! External job status events
//!
//! The badge-application job runner lives outside this engine; it only
//! surfaces a status event the session may react to. A succeeded job means
//! the server may have normalized or rewritten settings, so the session
//! reloads on it.

use serde::{Deserialize, Serialize};

/// Status of an externally executed badge job.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum JobStatus {
    Running,
    Succeeded,
    Failed,
}

impl JobStatus {
    /// Terminal statuses emit no further events.
    pub fn is_terminal(&self) -> bool {
        matches!(self, JobStatus::Succeeded | JobStatus::Failed)
    }
}
