//! Platform logging initialization for research_app.
//!
//! The interactive terminal belongs to the renderer, so the default
//! destination is a file in the current working directory.

use std::fs::File;

use log::LevelFilter;
use simplelog::{
    ColorChoice, CombinedLogger, Config, ConfigBuilder, SharedLogger, TermLogger, TerminalMode,
    WriteLogger,
};

const LOG_PATH: &str = "./research_client.log";

/// Destination for log output.
#[allow(dead_code)]
pub enum LogDestination {
    /// Write to ./research_client.log in the current directory.
    File,
    /// Write to the terminal (stderr-style mixed mode).
    Terminal,
}

/// Initialize the global logger; logging is best effort and failure to
/// create the log file only prints a warning.
pub fn initialize(destination: LogDestination) {
    let level = LevelFilter::Info;
    let config = build_config();

    let logger: Option<Box<dyn SharedLogger>> = match destination {
        LogDestination::File => match File::create(LOG_PATH) {
            Ok(file) => Some(WriteLogger::new(level, config, file)),
            Err(err) => {
                eprintln!("Warning: could not create log file at {LOG_PATH}: {err}");
                None
            }
        },
        LogDestination::Terminal => Some(TermLogger::new(
            level,
            config,
            TerminalMode::Mixed,
            ColorChoice::Auto,
        )),
    };

    if let Some(logger) = logger {
        let _ = CombinedLogger::init(vec![logger]);
    }
}

fn build_config() -> Config {
    ConfigBuilder::new()
        .set_time_format_rfc3339()
        .set_target_level(LevelFilter::Error)
        .build()
}
