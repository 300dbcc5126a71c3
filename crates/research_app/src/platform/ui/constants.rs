//! Fixed strings for the terminal surface.

/// Prompt printed whenever the client is ready for a new query.
pub const PROMPT: &str = "research> ";
/// Banner printed at startup.
pub const BANNER: &str =
    "Research client. Type a query and press Enter. Commands: :copy, :cancel, :quit.";
/// Rule printed around rendered results.
pub const RESULTS_RULE: &str = "----------------------------------------";
/// Hint printed under rendered results.
pub const RESULTS_HINT: &str = ":copy puts the result text on the clipboard";
