use crate::Generation;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Msg {
    /// User submitted a line of input as a research query.
    QuerySubmitted(String),
    /// User asked to cancel the research run in flight.
    CancelRequested,
    /// Engine accepted the query and obtained a job id.
    ResearchStarted {
        generation: Generation,
        job_id: String,
    },
    /// Engine completed one status check without reaching a terminal state.
    PollProgress {
        generation: Generation,
        attempt: u32,
        status: String,
    },
    /// Engine finished the pipeline with displayable markdown.
    ResearchCompleted {
        generation: Generation,
        markdown: String,
    },
    /// Engine aborted the pipeline with an error message.
    ResearchFailed {
        generation: Generation,
        message: String,
    },
    /// User asked to copy the current results.
    CopyRequested,
    /// Clipboard write finished.
    CopyFinished { ok: bool },
    /// The copy acknowledgment window elapsed.
    CopyAckExpired,
    /// Fallback for placeholder wiring.
    NoOp,
}
