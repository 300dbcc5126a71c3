use std::fmt;

use serde::Deserialize;
use thiserror::Error;

/// Monotonic identifier for one research run, assigned by the core.
pub type Generation = u64;

/// Opaque job identifier assigned by the backend.
pub type JobId = String;

/// Job lifecycle as reported by the backend.
///
/// Any value the client does not recognize is treated as non-terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JobStatus {
    Queued,
    Processing,
    Completed,
    Failed,
    #[serde(other)]
    Other,
}

impl JobStatus {
    pub fn is_terminal(self) -> bool {
        matches!(self, JobStatus::Completed | JobStatus::Failed)
    }
}

impl fmt::Display for JobStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            JobStatus::Queued => "queued",
            JobStatus::Processing => "processing",
            JobStatus::Completed => "completed",
            JobStatus::Failed => "failed",
            JobStatus::Other => "in progress",
        };
        f.write_str(label)
    }
}

/// One status response for a job.
#[derive(Debug, Clone, Deserialize)]
pub struct JobSnapshot {
    pub status: JobStatus,
    #[serde(default)]
    pub result: Option<serde_json::Value>,
    #[serde(default)]
    pub error: Option<String>,
}

/// Events reported by the engine while a research run executes.
#[derive(Debug, Clone, PartialEq)]
pub enum EngineEvent {
    /// The backend accepted the query and assigned a job id.
    Submitted {
        generation: Generation,
        job_id: JobId,
    },
    /// One status check completed without reaching a terminal state.
    Progress {
        generation: Generation,
        attempt: u32,
        status: JobStatus,
    },
    /// The run finished; carries the extracted display markdown.
    Completed {
        generation: Generation,
        markdown: String,
    },
    /// The run aborted.
    Failed {
        generation: Generation,
        error: ResearchError,
    },
}

/// Terminal failures of a research run.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResearchError {
    /// Job creation was rejected; carries the backend's detail message.
    #[error("{0}")]
    Submission(String),
    /// A status poll returned a non-success HTTP code.
    #[error("status check failed (http {0})")]
    StatusCheck(u16),
    /// The job reached its failed state; carries the job's error message.
    #[error("{0}")]
    JobFailed(String),
    /// The job never reached a terminal state within the attempt ceiling.
    #[error("research timed out after {attempts} status checks")]
    Timeout { attempts: u32 },
    /// The HTTP exchange itself failed.
    #[error("network error: {0}")]
    Network(String),
    /// The run was cancelled before reaching a terminal state.
    #[error("research cancelled")]
    Cancelled,
    /// The backend answered with a body the client could not parse.
    #[error("invalid response from backend: {0}")]
    InvalidResponse(String),
}
