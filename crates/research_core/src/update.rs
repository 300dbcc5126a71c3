use crate::{AppState, Effect, Msg, COPY_ACK_WINDOW};

/// Pure update function: applies a message to state and returns any effects.
pub fn update(mut state: AppState, msg: Msg) -> (AppState, Vec<Effect>) {
    let effects = match msg {
        Msg::QuerySubmitted(raw) => {
            // Invariant: whitespace-only input never reaches the network.
            let Some(query) = normalize_query(&raw) else {
                return (state, Vec::new());
            };
            if state.is_loading() {
                state.set_notice("Research already in progress; wait for it or use :cancel.");
                return (state, Vec::new());
            }
            let generation = state.begin_research();
            vec![Effect::StartResearch { generation, query }]
        }
        Msg::CancelRequested => {
            if state.is_loading() {
                state.cancel_active();
                state.set_notice("Research cancelled.");
                vec![Effect::CancelResearch]
            } else {
                Vec::new()
            }
        }
        Msg::ResearchStarted { generation, job_id } => {
            if state.is_active(generation) {
                state.apply_started(job_id);
            }
            Vec::new()
        }
        Msg::PollProgress {
            generation,
            attempt,
            status,
        } => {
            if state.is_active(generation) {
                state.apply_progress(attempt, status);
            }
            Vec::new()
        }
        Msg::ResearchCompleted {
            generation,
            markdown,
        } => {
            if state.is_active(generation) {
                state.apply_completed(markdown);
            }
            Vec::new()
        }
        Msg::ResearchFailed {
            generation,
            message,
        } => {
            if state.is_active(generation) {
                state.apply_failed(message);
            }
            Vec::new()
        }
        Msg::CopyRequested => match state.results_text().map(ToOwned::to_owned) {
            Some(text) => vec![Effect::CopyResults { text }],
            None => {
                state.set_notice("No results to copy yet.");
                Vec::new()
            }
        },
        Msg::CopyFinished { ok: true } => {
            state.set_copy_acknowledged(true);
            vec![Effect::ScheduleCopyRevert {
                after: COPY_ACK_WINDOW,
            }]
        }
        Msg::CopyFinished { ok: false } => {
            state.set_notice("Clipboard unavailable; results were not copied.");
            Vec::new()
        }
        Msg::CopyAckExpired => {
            state.set_copy_acknowledged(false);
            Vec::new()
        }
        Msg::NoOp => Vec::new(),
    };

    (state, effects)
}

/// Trims the raw input line; whitespace-only input yields no query.
fn normalize_query(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_owned())
    }
}
