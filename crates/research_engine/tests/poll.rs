use std::collections::VecDeque;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use pretty_assertions::assert_eq;
use research_engine::{
    poll_job, EngineEvent, JobId, JobSnapshot, JobStatus, PollSettings, ProgressSink, ResearchApi,
    ResearchError, Sleeper, JOB_ERROR_FALLBACK,
};
use serde_json::{json, Value};
use tokio_util::sync::CancellationToken;

fn snapshot(status: JobStatus) -> JobSnapshot {
    serde_json::from_value(json!({ "status": format!("{status}") })).unwrap()
}

fn completed(result: Value) -> JobSnapshot {
    serde_json::from_value(json!({ "status": "completed", "result": result })).unwrap()
}

fn failed(error: Option<&str>) -> JobSnapshot {
    serde_json::from_value(json!({ "status": "failed", "error": error })).unwrap()
}

/// API stub that replays a scripted sequence of status responses, then keeps
/// repeating the final `fallback` response.
struct ScriptedApi {
    script: Mutex<VecDeque<Result<JobSnapshot, ResearchError>>>,
    fallback: JobSnapshot,
    calls: AtomicU32,
}

impl ScriptedApi {
    fn new(
        script: Vec<Result<JobSnapshot, ResearchError>>,
        fallback: JobSnapshot,
    ) -> Self {
        Self {
            script: Mutex::new(script.into()),
            fallback,
            calls: AtomicU32::new(0),
        }
    }

    fn calls(&self) -> u32 {
        self.calls.load(Ordering::Relaxed)
    }
}

#[async_trait]
impl ResearchApi for ScriptedApi {
    async fn submit(&self, _query: &str) -> Result<JobId, ResearchError> {
        Ok("job-1".to_string())
    }

    async fn status(&self, _job_id: &str) -> Result<JobSnapshot, ResearchError> {
        self.calls.fetch_add(1, Ordering::Relaxed);
        match self.script.lock().unwrap().pop_front() {
            Some(response) => response,
            None => Ok(self.fallback.clone()),
        }
    }
}

/// Sleeper that returns immediately; optionally cancels a token on its
/// first nap so cancellation mid-loop can be exercised without timers.
#[derive(Default)]
struct InstantSleeper {
    naps: AtomicU32,
    cancel_on_first_nap: Option<CancellationToken>,
}

#[async_trait]
impl Sleeper for InstantSleeper {
    async fn sleep(&self, _duration: Duration) {
        if self.naps.fetch_add(1, Ordering::Relaxed) == 0 {
            if let Some(token) = &self.cancel_on_first_nap {
                token.cancel();
            }
        }
    }
}

#[derive(Default)]
struct TestSink {
    events: Mutex<Vec<EngineEvent>>,
}

impl TestSink {
    fn take(&self) -> Vec<EngineEvent> {
        self.events.lock().unwrap().drain(..).collect()
    }
}

impl ProgressSink for TestSink {
    fn emit(&self, event: EngineEvent) {
        self.events.lock().unwrap().push(event);
    }
}

fn settings(max_attempts: u32) -> PollSettings {
    PollSettings {
        interval: Duration::from_millis(3000),
        max_attempts,
    }
}

#[tokio::test]
async fn completes_after_nonterminal_polls() {
    let api = ScriptedApi::new(
        vec![
            Ok(snapshot(JobStatus::Queued)),
            Ok(snapshot(JobStatus::Processing)),
        ],
        completed(json!("Hello")),
    );
    let sleeper = InstantSleeper::default();
    let sink = TestSink::default();
    let cancel = CancellationToken::new();

    let payload = poll_job(&api, &sleeper, &settings(300), 1, "job-1", &cancel, &sink)
        .await
        .expect("poll ok");

    assert_eq!(payload, Some(json!("Hello")));
    assert_eq!(api.calls(), 3);
    assert_eq!(
        sink.take(),
        vec![
            EngineEvent::Progress {
                generation: 1,
                attempt: 1,
                status: JobStatus::Queued,
            },
            EngineEvent::Progress {
                generation: 1,
                attempt: 2,
                status: JobStatus::Processing,
            },
        ]
    );
}

#[tokio::test]
async fn failed_job_uses_its_error_message() {
    let api = ScriptedApi::new(Vec::new(), failed(Some("quota exceeded")));
    let sleeper = InstantSleeper::default();
    let sink = TestSink::default();
    let cancel = CancellationToken::new();

    let err = poll_job(&api, &sleeper, &settings(300), 1, "job-1", &cancel, &sink)
        .await
        .unwrap_err();

    assert_eq!(err, ResearchError::JobFailed("quota exceeded".to_string()));
    assert_eq!(err.to_string(), "quota exceeded");
}

#[tokio::test]
async fn failed_job_without_message_uses_fallback() {
    let api = ScriptedApi::new(Vec::new(), failed(None));
    let sleeper = InstantSleeper::default();
    let sink = TestSink::default();
    let cancel = CancellationToken::new();

    let err = poll_job(&api, &sleeper, &settings(300), 1, "job-1", &cancel, &sink)
        .await
        .unwrap_err();

    assert_eq!(err, ResearchError::JobFailed(JOB_ERROR_FALLBACK.to_string()));
}

#[tokio::test]
async fn attempt_ceiling_times_out_without_issuing_the_extra_request() {
    // The job never leaves processing; the 301st iteration must time out
    // before sending, leaving exactly 300 status requests on the wire.
    let api = ScriptedApi::new(Vec::new(), snapshot(JobStatus::Processing));
    let sleeper = InstantSleeper::default();
    let sink = TestSink::default();
    let cancel = CancellationToken::new();

    let err = poll_job(&api, &sleeper, &settings(300), 1, "job-1", &cancel, &sink)
        .await
        .unwrap_err();

    assert_eq!(err, ResearchError::Timeout { attempts: 300 });
    assert_eq!(api.calls(), 300);
}

#[tokio::test]
async fn status_check_error_aborts_without_retry() {
    let api = ScriptedApi::new(
        vec![
            Ok(snapshot(JobStatus::Queued)),
            Err(ResearchError::StatusCheck(502)),
        ],
        completed(json!("unreached")),
    );
    let sleeper = InstantSleeper::default();
    let sink = TestSink::default();
    let cancel = CancellationToken::new();

    let err = poll_job(&api, &sleeper, &settings(300), 1, "job-1", &cancel, &sink)
        .await
        .unwrap_err();

    assert_eq!(err, ResearchError::StatusCheck(502));
    assert_eq!(api.calls(), 2);
}

#[tokio::test]
async fn cancelled_before_first_poll_issues_no_requests() {
    let api = ScriptedApi::new(Vec::new(), snapshot(JobStatus::Processing));
    let sleeper = InstantSleeper::default();
    let sink = TestSink::default();
    let cancel = CancellationToken::new();
    cancel.cancel();

    let err = poll_job(&api, &sleeper, &settings(300), 1, "job-1", &cancel, &sink)
        .await
        .unwrap_err();

    assert_eq!(err, ResearchError::Cancelled);
    assert_eq!(api.calls(), 0);
}

#[tokio::test]
async fn cancellation_mid_loop_stops_before_the_next_request() {
    let cancel = CancellationToken::new();
    let api = ScriptedApi::new(Vec::new(), snapshot(JobStatus::Processing));
    let sleeper = InstantSleeper {
        naps: AtomicU32::new(0),
        cancel_on_first_nap: Some(cancel.clone()),
    };
    let sink = TestSink::default();

    let err = poll_job(&api, &sleeper, &settings(300), 1, "job-1", &cancel, &sink)
        .await
        .unwrap_err();

    assert_eq!(err, ResearchError::Cancelled);
    assert_eq!(api.calls(), 1);
}
