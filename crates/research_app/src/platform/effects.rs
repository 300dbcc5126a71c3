use std::sync::mpsc;
use std::thread;

use client_logging::{client_info, client_warn};
use research_core::{Effect, Msg};
use research_engine::{EngineConfig, EngineEvent, EngineHandle};

use super::app::AppEvent;

/// Executes the effects requested by the core: engine commands, clipboard
/// writes, and the copy-acknowledgment timer.
pub(super) struct EffectRunner {
    engine: EngineHandle,
    event_tx: mpsc::Sender<AppEvent>,
}

impl EffectRunner {
    pub(super) fn new(base_url: String, event_tx: mpsc::Sender<AppEvent>) -> Self {
        let (engine, engine_events) = EngineHandle::new(EngineConfig::new(base_url));
        spawn_event_pump(engine_events, event_tx.clone());
        Self { engine, event_tx }
    }

    pub(super) fn run(&self, effects: Vec<Effect>) {
        for effect in effects {
            match effect {
                Effect::StartResearch { generation, query } => {
                    client_info!(
                        "StartResearch generation={} query_len={}",
                        generation,
                        query.len()
                    );
                    self.engine.start(generation, query);
                }
                Effect::CancelResearch => {
                    self.engine.cancel();
                }
                Effect::CopyResults { text } => {
                    let event_tx = self.event_tx.clone();
                    thread::spawn(move || {
                        let ok = copy_to_clipboard(&text);
                        if !ok {
                            client_warn!("clipboard write failed");
                        }
                        let _ = event_tx.send(AppEvent::Core(Msg::CopyFinished { ok }));
                    });
                }
                Effect::ScheduleCopyRevert { after } => {
                    let event_tx = self.event_tx.clone();
                    thread::spawn(move || {
                        thread::sleep(after);
                        let _ = event_tx.send(AppEvent::Core(Msg::CopyAckExpired));
                    });
                }
            }
        }
    }

    pub(super) fn shutdown(&self) {
        self.engine.cancel();
    }
}

fn spawn_event_pump(
    engine_events: mpsc::Receiver<EngineEvent>,
    event_tx: mpsc::Sender<AppEvent>,
) {
    thread::spawn(move || {
        while let Ok(event) = engine_events.recv() {
            if event_tx.send(AppEvent::Core(map_engine_event(event))).is_err() {
                break;
            }
        }
    });
}

fn map_engine_event(event: EngineEvent) -> Msg {
    match event {
        EngineEvent::Submitted { generation, job_id } => {
            Msg::ResearchStarted { generation, job_id }
        }
        EngineEvent::Progress {
            generation,
            attempt,
            status,
        } => Msg::PollProgress {
            generation,
            attempt,
            status: status.to_string(),
        },
        EngineEvent::Completed {
            generation,
            markdown,
        } => Msg::ResearchCompleted {
            generation,
            markdown,
        },
        EngineEvent::Failed { generation, error } => Msg::ResearchFailed {
            generation,
            message: error.to_string(),
        },
    }
}

fn copy_to_clipboard(text: &str) -> bool {
    match arboard::Clipboard::new() {
        Ok(mut clipboard) => clipboard.set_text(text).is_ok(),
        Err(err) => {
            client_warn!("clipboard unavailable: {}", err);
            false
        }
    }
}
