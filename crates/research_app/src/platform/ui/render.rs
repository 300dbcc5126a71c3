use std::io::Write;

use research_core::{AppViewModel, COPY_LABEL_ACKNOWLEDGED};

use super::constants::{BANNER, PROMPT, RESULTS_HINT, RESULTS_RULE};
use super::markdown::{self, ansi};

pub fn print_banner() {
    println!("{BANNER}");
    print_prompt();
}

pub fn print_changes(previous: Option<&AppViewModel>, view: &AppViewModel) {
    for line in render_changes(previous, view) {
        println!("{line}");
    }
    let was_enabled = previous.map_or(true, |p| p.input_enabled);
    if view.input_enabled && !was_enabled {
        print_prompt();
    }
    let _ = std::io::stdout().flush();
}

pub fn print_unknown_command(command: &str) {
    println!(
        "{}Unknown command {command}; available: :copy, :cancel, :quit{}",
        ansi::DIM_ON,
        ansi::DIM_OFF
    );
    let _ = std::io::stdout().flush();
}

fn print_prompt() {
    print!("{PROMPT}");
    let _ = std::io::stdout().flush();
}

/// Computes the lines to print for a view transition.
///
/// The terminal is append-only, so rendering is a diff: only parts of the
/// view that changed since the previous render produce output.
pub fn render_changes(previous: Option<&AppViewModel>, view: &AppViewModel) -> Vec<String> {
    let mut lines = Vec::new();

    if let Some(notice) = fresh(
        previous.and_then(|p| p.notice.as_deref()),
        view.notice.as_deref(),
    ) {
        lines.push(format!("{}{notice}{}", ansi::DIM_ON, ansi::DIM_OFF));
    }

    if let Some(status) = fresh(
        previous.and_then(|p| p.status_line.as_deref()),
        view.status_line.as_deref(),
    ) {
        lines.push(format!("{}{status}{}", ansi::DIM_ON, ansi::DIM_OFF));
    }

    if let Some(markdown_text) = fresh(
        previous.and_then(|p| p.results_markdown.as_deref()),
        view.results_markdown.as_deref(),
    ) {
        lines.push(RESULTS_RULE.to_string());
        lines.push(markdown::render_markdown(markdown_text));
        lines.push(RESULTS_RULE.to_string());
        lines.push(format!("{}{RESULTS_HINT}{}", ansi::DIM_ON, ansi::DIM_OFF));
    }

    if let Some(error) = fresh(
        previous.and_then(|p| p.error.as_deref()),
        view.error.as_deref(),
    ) {
        lines.push(format!("{}Error:{} {error}", ansi::RED_BOLD, ansi::RESET));
    }

    let previous_label = previous.map(|p| p.copy_label);
    if previous_label != Some(view.copy_label) && view.copy_label == COPY_LABEL_ACKNOWLEDGED {
        lines.push(format!("[{}]", view.copy_label));
    }

    lines
}

/// Returns the current value when it differs from the previous render.
fn fresh<'a>(previous: Option<&'a str>, current: Option<&'a str>) -> Option<&'a str> {
    match current {
        Some(current) if previous != Some(current) => Some(current),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use research_core::{update, AppState, AppViewModel, Msg};

    use super::render_changes;

    fn view_after(msgs: Vec<Msg>) -> AppViewModel {
        let mut state = AppState::new();
        for msg in msgs {
            let (next, _effects) = update(std::mem::take(&mut state), msg);
            state = next;
        }
        state.view()
    }

    #[test]
    fn error_block_carries_the_label_and_message() {
        let view = view_after(vec![
            Msg::QuerySubmitted("query".to_string()),
            Msg::ResearchFailed {
                generation: 1,
                message: "bad query".to_string(),
            },
        ]);

        let lines = render_changes(None, &view);
        let error_line = lines
            .iter()
            .find(|line| line.contains("Error:"))
            .expect("error line");
        assert!(error_line.contains("bad query"));
    }

    #[test]
    fn unchanged_view_renders_nothing() {
        let view = view_after(vec![
            Msg::QuerySubmitted("query".to_string()),
            Msg::ResearchCompleted {
                generation: 1,
                markdown: "Hello".to_string(),
            },
        ]);

        let first = render_changes(None, &view);
        assert!(!first.is_empty());

        let second = render_changes(Some(&view), &view);
        assert_eq!(second, Vec::<String>::new());
    }

    #[test]
    fn status_line_changes_render_incrementally() {
        let loading = view_after(vec![Msg::QuerySubmitted("query".to_string())]);
        let polling = view_after(vec![
            Msg::QuerySubmitted("query".to_string()),
            Msg::ResearchStarted {
                generation: 1,
                job_id: "abc".to_string(),
            },
            Msg::PollProgress {
                generation: 1,
                attempt: 1,
                status: "queued".to_string(),
            },
        ]);

        let lines = render_changes(Some(&loading), &polling);
        assert_eq!(lines.len(), 1);
        assert!(lines[0].contains("Job abc: queued (check 1)"));
    }

    #[test]
    fn copy_acknowledgment_prints_once() {
        let shown = view_after(vec![
            Msg::QuerySubmitted("query".to_string()),
            Msg::ResearchCompleted {
                generation: 1,
                markdown: "Hello".to_string(),
            },
        ]);
        let acknowledged = view_after(vec![
            Msg::QuerySubmitted("query".to_string()),
            Msg::ResearchCompleted {
                generation: 1,
                markdown: "Hello".to_string(),
            },
            Msg::CopyFinished { ok: true },
        ]);

        let lines = render_changes(Some(&shown), &acknowledged);
        assert_eq!(lines, vec!["[Copied!]".to_string()]);

        // Reverting the label prints nothing; the terminal is append-only.
        let reverted = view_after(vec![
            Msg::QuerySubmitted("query".to_string()),
            Msg::ResearchCompleted {
                generation: 1,
                markdown: "Hello".to_string(),
            },
            Msg::CopyFinished { ok: true },
            Msg::CopyAckExpired,
        ]);
        assert!(render_changes(Some(&acknowledged), &reverted).is_empty());
    }
}
