use std::io::BufRead;
use std::sync::mpsc;
use std::thread;

use anyhow::Result;
use client_logging::client_info;
use research_core::{update, AppState, AppViewModel, Msg};

use super::effects::EffectRunner;
use super::logging::{self, LogDestination};
use super::ui;

/// Default backend address; matches the development server.
const DEFAULT_BASE_URL: &str = "http://127.0.0.1:8000";

/// Events consumed by the main loop.
pub(super) enum AppEvent {
    Core(Msg),
    UnknownCommand(String),
    Quit,
}

pub fn run_app() -> Result<()> {
    logging::initialize(LogDestination::File);

    let base_url = resolve_base_url();
    client_info!("research client starting, backend={}", base_url);

    let (event_tx, event_rx) = mpsc::channel::<AppEvent>();
    let runner = EffectRunner::new(base_url, event_tx.clone());

    spawn_input_thread(event_tx);

    ui::render::print_banner();

    let mut state = AppState::new();
    let mut last_view: Option<AppViewModel> = None;

    while let Ok(event) = event_rx.recv() {
        match event {
            AppEvent::Core(msg) => dispatch(&mut state, msg, &runner, &mut last_view),
            AppEvent::UnknownCommand(command) => ui::render::print_unknown_command(&command),
            AppEvent::Quit => break,
        }
    }

    runner.shutdown();
    client_info!("research client exiting");
    Ok(())
}

fn dispatch(
    state: &mut AppState,
    msg: Msg,
    runner: &EffectRunner,
    last_view: &mut Option<AppViewModel>,
) {
    let current = std::mem::take(state);
    let (mut next, effects) = update(current, msg);
    runner.run(effects);
    if next.consume_dirty() {
        let view = next.view();
        ui::render::print_changes(last_view.as_ref(), &view);
        *last_view = Some(view);
    }
    *state = next;
}

fn spawn_input_thread(event_tx: mpsc::Sender<AppEvent>) {
    thread::spawn(move || {
        let stdin = std::io::stdin();
        for line in stdin.lock().lines() {
            let Ok(line) = line else { break };
            let event = parse_line(&line);
            let quitting = matches!(event, AppEvent::Quit);
            if event_tx.send(event).is_err() || quitting {
                return;
            }
        }
        // Stdin closed; shut the app down cleanly.
        let _ = event_tx.send(AppEvent::Quit);
    });
}

/// Maps one input line to an app event. Lines starting with ':' are
/// commands; anything else is a query submission.
fn parse_line(line: &str) -> AppEvent {
    let trimmed = line.trim();
    match trimmed {
        ":quit" | ":q" => AppEvent::Quit,
        ":copy" => AppEvent::Core(Msg::CopyRequested),
        ":cancel" => AppEvent::Core(Msg::CancelRequested),
        command if command.starts_with(':') => AppEvent::UnknownCommand(command.to_string()),
        _ => AppEvent::Core(Msg::QuerySubmitted(line.to_string())),
    }
}

fn resolve_base_url() -> String {
    std::env::args()
        .nth(1)
        .or_else(|| std::env::var("RESEARCH_API_URL").ok())
        .filter(|url| !url.is_empty())
        .unwrap_or_else(|| DEFAULT_BASE_URL.to_string())
}
