use std::time::Duration;

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

use crate::{EngineEvent, Generation, JobStatus, ResearchApi, ResearchError};

/// Fallback when a failed job carries no error message.
pub const JOB_ERROR_FALLBACK: &str = "Research failed";

/// Timing and bounds for the status poll loop.
#[derive(Debug, Clone)]
pub struct PollSettings {
    /// Delay between the completion of one status check and the next.
    pub interval: Duration,
    /// Ceiling on status checks before the run times out.
    pub max_attempts: u32,
}

impl Default for PollSettings {
    fn default() -> Self {
        Self {
            interval: Duration::from_millis(3000),
            max_attempts: 300,
        }
    }
}

/// Inter-poll delay, injectable so tests run without wall-clock waits.
#[async_trait]
pub trait Sleeper: Send + Sync {
    async fn sleep(&self, duration: Duration);
}

/// Production sleeper backed by the tokio timer.
#[derive(Debug, Default, Clone, Copy)]
pub struct TokioSleeper;

#[async_trait]
impl Sleeper for TokioSleeper {
    async fn sleep(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}

/// Receives progress events while the poll loop runs.
pub trait ProgressSink: Send + Sync {
    fn emit(&self, event: EngineEvent);
}

/// Polls the job until a terminal state, the attempt ceiling, or cancellation.
///
/// Polls are strictly sequential: the next status check is only issued after
/// the previous response has been processed and the interval has elapsed.
/// The attempt counter is checked before the request goes out, so with a
/// ceiling of N exactly N requests are issued and attempt N + 1 raises the
/// timeout instead of being sent. Status-check failures abort the loop; there
/// is no retry of transient errors.
pub async fn poll_job(
    api: &dyn ResearchApi,
    sleeper: &dyn Sleeper,
    settings: &PollSettings,
    generation: Generation,
    job_id: &str,
    cancel: &CancellationToken,
    sink: &dyn ProgressSink,
) -> Result<Option<serde_json::Value>, ResearchError> {
    for attempt in 1u32.. {
        if cancel.is_cancelled() {
            return Err(ResearchError::Cancelled);
        }
        if attempt > settings.max_attempts {
            return Err(ResearchError::Timeout {
                attempts: settings.max_attempts,
            });
        }

        let snapshot = api.status(job_id).await?;
        match snapshot.status {
            JobStatus::Completed => return Ok(snapshot.result),
            JobStatus::Failed => {
                let message = snapshot
                    .error
                    .filter(|message| !message.is_empty())
                    .unwrap_or_else(|| JOB_ERROR_FALLBACK.to_string());
                return Err(ResearchError::JobFailed(message));
            }
            status => {
                sink.emit(EngineEvent::Progress {
                    generation,
                    attempt,
                    status,
                });
            }
        }

        sleeper.sleep(settings.interval).await;
    }
    unreachable!("the poll loop exits through a terminal outcome")
}
