use crate::view_model::{AppViewModel, COPY_LABEL_ACKNOWLEDGED, COPY_LABEL_IDLE};

pub type Generation = u64;

/// Poll progress shown while a research run is in flight.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct LoadingProgress {
    pub job_id: Option<String>,
    pub attempt: u32,
    pub last_status: Option<String>,
}

/// Exclusive UI mode; exactly one is active at any time.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Mode {
    #[default]
    Idle,
    Loading(LoadingProgress),
    Result {
        markdown: String,
    },
    Error {
        message: String,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AppState {
    mode: Mode,
    generation: Generation,
    active: Option<Generation>,
    copy_acknowledged: bool,
    notice: Option<String>,
    dirty: bool,
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn view(&self) -> AppViewModel {
        AppViewModel {
            input_enabled: !self.is_loading(),
            loading: self.is_loading(),
            status_line: self.status_line(),
            results_markdown: self.results_text().map(ToOwned::to_owned),
            error: match &self.mode {
                Mode::Error { message } => Some(message.clone()),
                _ => None,
            },
            copy_label: if self.copy_acknowledged {
                COPY_LABEL_ACKNOWLEDGED
            } else {
                COPY_LABEL_IDLE
            },
            can_copy: matches!(self.mode, Mode::Result { .. }),
            notice: self.notice.clone(),
            dirty: self.dirty,
        }
    }

    /// Returns the dirty flag and clears it.
    pub fn consume_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    pub fn mode(&self) -> &Mode {
        &self.mode
    }

    fn status_line(&self) -> Option<String> {
        let Mode::Loading(progress) = &self.mode else {
            return None;
        };
        let line = match (&progress.job_id, &progress.last_status) {
            (None, _) => "Submitting query...".to_string(),
            (Some(job_id), None) => format!("Job {job_id} started"),
            (Some(job_id), Some(status)) => {
                format!("Job {job_id}: {status} (check {})", progress.attempt)
            }
        };
        Some(line)
    }

    pub(crate) fn is_loading(&self) -> bool {
        matches!(self.mode, Mode::Loading(_))
    }

    pub(crate) fn is_active(&self, generation: Generation) -> bool {
        self.active == Some(generation)
    }

    pub(crate) fn results_text(&self) -> Option<&str> {
        match &self.mode {
            Mode::Result { markdown } => Some(markdown),
            _ => None,
        }
    }

    fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    /// Enters Loading for a fresh run and returns its generation.
    ///
    /// Any previous results, error, notice, and copy acknowledgment are
    /// cleared so the view reflects only the new run.
    pub(crate) fn begin_research(&mut self) -> Generation {
        self.generation += 1;
        self.active = Some(self.generation);
        self.mode = Mode::Loading(LoadingProgress::default());
        self.copy_acknowledged = false;
        self.notice = None;
        self.mark_dirty();
        self.generation
    }

    pub(crate) fn apply_started(&mut self, job_id: String) {
        if let Mode::Loading(progress) = &mut self.mode {
            progress.job_id = Some(job_id);
            self.mark_dirty();
        }
    }

    pub(crate) fn apply_progress(&mut self, attempt: u32, status: String) {
        if let Mode::Loading(progress) = &mut self.mode {
            progress.attempt = attempt;
            progress.last_status = Some(status);
            self.mark_dirty();
        }
    }

    pub(crate) fn apply_completed(&mut self, markdown: String) {
        self.active = None;
        self.mode = Mode::Result { markdown };
        self.mark_dirty();
    }

    pub(crate) fn apply_failed(&mut self, message: String) {
        self.active = None;
        self.mode = Mode::Error { message };
        self.mark_dirty();
    }

    pub(crate) fn cancel_active(&mut self) {
        self.active = None;
        self.mode = Mode::Idle;
        self.mark_dirty();
    }

    pub(crate) fn set_notice(&mut self, notice: impl Into<String>) {
        self.notice = Some(notice.into());
        self.mark_dirty();
    }

    pub(crate) fn set_copy_acknowledged(&mut self, acknowledged: bool) {
        if self.copy_acknowledged != acknowledged {
            self.copy_acknowledged = acknowledged;
            self.mark_dirty();
        }
    }
}
