use std::time::Duration;

use crate::Generation;

/// How long the copy control shows its acknowledgment label.
pub const COPY_ACK_WINDOW: Duration = Duration::from_millis(2000);

/// Side effects requested by `update` and executed by the app shell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Submit the query to the backend and start polling.
    StartResearch {
        generation: Generation,
        query: String,
    },
    /// Cancel the research run currently in flight.
    CancelResearch,
    /// Write the given text to the system clipboard.
    CopyResults { text: String },
    /// Deliver `Msg::CopyAckExpired` after the given delay.
    ScheduleCopyRevert { after: Duration },
}
