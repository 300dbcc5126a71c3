/// Label shown on the copy control when idle.
pub const COPY_LABEL_IDLE: &str = "Copy";
/// Label shown on the copy control after a successful clipboard write.
pub const COPY_LABEL_ACKNOWLEDGED: &str = "Copied!";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppViewModel {
    pub input_enabled: bool,
    pub loading: bool,
    pub status_line: Option<String>,
    pub results_markdown: Option<String>,
    pub error: Option<String>,
    pub copy_label: &'static str,
    pub can_copy: bool,
    pub notice: Option<String>,
    pub dirty: bool,
}

impl Default for AppViewModel {
    fn default() -> Self {
        Self {
            input_enabled: true,
            loading: false,
            status_line: None,
            results_markdown: None,
            error: None,
            copy_label: COPY_LABEL_IDLE,
            can_copy: false,
            notice: None,
            dirty: false,
        }
    }
}
