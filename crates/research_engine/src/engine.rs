use std::sync::{mpsc, Arc};
use std::thread;

use client_logging::{client_info, client_warn};
use tokio_util::sync::CancellationToken;

use crate::client::{ApiSettings, HttpResearchApi};
use crate::extract::extract_display_text;
use crate::poll::{poll_job, PollSettings, ProgressSink, Sleeper, TokioSleeper};
use crate::{EngineEvent, Generation, ResearchApi, ResearchError};

/// Engine configuration: where the backend lives and how to poll it.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    pub api: ApiSettings,
    pub poll: PollSettings,
}

impl EngineConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            api: ApiSettings::new(base_url),
            poll: PollSettings::default(),
        }
    }
}

enum EngineCommand {
    Start {
        generation: Generation,
        query: String,
    },
    Cancel,
}

/// Handle to the engine's background runtime.
///
/// Commands go in over one channel; events come back over the receiver
/// returned by `new`, which the caller drains from its own thread. At most
/// one research run is live: starting a new run cancels the previous run's
/// token first.
pub struct EngineHandle {
    cmd_tx: mpsc::Sender<EngineCommand>,
}

struct ChannelSink {
    tx: mpsc::Sender<EngineEvent>,
}

impl ProgressSink for ChannelSink {
    fn emit(&self, event: EngineEvent) {
        let _ = self.tx.send(event);
    }
}

impl EngineHandle {
    pub fn new(config: EngineConfig) -> (Self, mpsc::Receiver<EngineEvent>) {
        let (cmd_tx, cmd_rx) = mpsc::channel();
        let (event_tx, event_rx) = mpsc::channel::<EngineEvent>();

        thread::spawn(move || {
            let runtime = tokio::runtime::Runtime::new().expect("tokio runtime");
            let sleeper: Arc<dyn Sleeper> = Arc::new(TokioSleeper);
            let mut current: Option<CancellationToken> = None;
            while let Ok(command) = cmd_rx.recv() {
                match command {
                    EngineCommand::Start { generation, query } => {
                        if let Some(token) = current.take() {
                            token.cancel();
                        }
                        let token = CancellationToken::new();
                        current = Some(token.clone());
                        let config = config.clone();
                        let sleeper = sleeper.clone();
                        let event_tx = event_tx.clone();
                        runtime.spawn(async move {
                            run_research(config, sleeper, generation, query, token, event_tx)
                                .await;
                        });
                    }
                    EngineCommand::Cancel => {
                        if let Some(token) = current.take() {
                            token.cancel();
                        }
                    }
                }
            }
        });

        (Self { cmd_tx }, event_rx)
    }

    /// Starts a research run; any previous run is cancelled first.
    pub fn start(&self, generation: Generation, query: impl Into<String>) {
        let _ = self.cmd_tx.send(EngineCommand::Start {
            generation,
            query: query.into(),
        });
    }

    /// Cancels the research run currently in flight, if any.
    pub fn cancel(&self) {
        let _ = self.cmd_tx.send(EngineCommand::Cancel);
    }
}

async fn run_research(
    config: EngineConfig,
    sleeper: Arc<dyn Sleeper>,
    generation: Generation,
    query: String,
    cancel: CancellationToken,
    event_tx: mpsc::Sender<EngineEvent>,
) {
    let outcome = research_pipeline(
        &config,
        sleeper.as_ref(),
        generation,
        &query,
        &cancel,
        &event_tx,
    )
    .await;

    match outcome {
        Ok(markdown) => {
            let _ = event_tx.send(EngineEvent::Completed {
                generation,
                markdown,
            });
        }
        Err(ResearchError::Cancelled) => {
            // The core already left Loading when it requested the cancel;
            // a Failed event here would only race the next run.
            client_info!("research generation={} cancelled", generation);
        }
        Err(error) => {
            client_warn!("research generation={} failed: {}", generation, error);
            let _ = event_tx.send(EngineEvent::Failed { generation, error });
        }
    }
}

async fn research_pipeline(
    config: &EngineConfig,
    sleeper: &dyn Sleeper,
    generation: Generation,
    query: &str,
    cancel: &CancellationToken,
    event_tx: &mpsc::Sender<EngineEvent>,
) -> Result<String, ResearchError> {
    let api = HttpResearchApi::new(config.api.clone())?;
    let job_id = api.submit(query).await?;
    client_info!(
        "research generation={} started job_id={}",
        generation,
        job_id
    );
    let _ = event_tx.send(EngineEvent::Submitted {
        generation,
        job_id: job_id.clone(),
    });

    let sink = ChannelSink {
        tx: event_tx.clone(),
    };
    let payload = poll_job(
        &api,
        sleeper,
        &config.poll,
        generation,
        &job_id,
        cancel,
        &sink,
    )
    .await?;

    Ok(extract_display_text(payload))
}
