//! Research engine: job API client, poll loop, and extraction pipeline.
mod client;
mod engine;
mod extract;
mod poll;
mod types;

pub use client::{ApiSettings, HttpResearchApi, ResearchApi, SUBMIT_ERROR_FALLBACK};
pub use engine::{EngineConfig, EngineHandle};
pub use extract::{
    extract_display_text, ContentBlock, ResultPayload, EMPTY_RESULT_PLACEHOLDER,
};
pub use poll::{
    poll_job, PollSettings, ProgressSink, Sleeper, TokioSleeper, JOB_ERROR_FALLBACK,
};
pub use types::{EngineEvent, Generation, JobId, JobSnapshot, JobStatus, ResearchError};
