//! Research core: pure state machine and view-model helpers.
mod effect;
mod msg;
mod state;
mod update;
mod view_model;

pub use effect::{Effect, COPY_ACK_WINDOW};
pub use msg::Msg;
pub use state::{AppState, Generation, LoadingProgress, Mode};
pub use update::update;
pub use view_model::{AppViewModel, COPY_LABEL_ACKNOWLEDGED, COPY_LABEL_IDLE};
