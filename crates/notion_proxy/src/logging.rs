//! Logger initialization for the proxy server.
//!
//! Terminal output by default; the file destination writes `./notion_proxy.log`
//! in the current working directory.

use std::fs::File;
use std::path::Path;

use log::LevelFilter;
use serde::{Deserialize, Serialize};
use simplelog::{
    ColorChoice, CombinedLogger, Config, ConfigBuilder, SharedLogger, TermLogger, TerminalMode,
    WriteLogger,
};

const LOG_FILENAME: &str = "./notion_proxy.log";

/// Where the proxy writes its log lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum LogDestination {
    File,
    #[default]
    Terminal,
    Both,
}

impl LogDestination {
    pub fn writes_terminal(self) -> bool {
        matches!(self, LogDestination::Terminal | LogDestination::Both)
    }

    pub fn writes_file(self) -> bool {
        matches!(self, LogDestination::File | LogDestination::Both)
    }
}

/// Install the global logger. A second call is a no-op.
///
/// When the log file cannot be created the proxy keeps running; with
/// [`LogDestination::File`] alone it then runs without a logger.
pub fn initialize(destination: LogDestination, level: LevelFilter) {
    let config = proxy_log_config();
    let mut sinks: Vec<Box<dyn SharedLogger>> = Vec::new();

    if destination.writes_terminal() {
        sinks.push(TermLogger::new(
            level,
            config.clone(),
            TerminalMode::Mixed,
            ColorChoice::Auto,
        ));
    }
    if destination.writes_file() {
        match File::create(Path::new(LOG_FILENAME)) {
            Ok(file) => sinks.push(WriteLogger::new(level, config, file)),
            Err(err) => eprintln!("notion_proxy: cannot open {LOG_FILENAME}: {err}"),
        }
    }

    if !sinks.is_empty() {
        let _ = CombinedLogger::init(sinks);
    }
}

// Request tokens never reach these targets, but hyper and reqwest are chatty
// at debug level.
fn proxy_log_config() -> Config {
    ConfigBuilder::new()
        .set_time_format_rfc3339()
        .set_target_level(LevelFilter::Error)
        .add_filter_ignore_str("hyper")
        .add_filter_ignore_str("reqwest")
        .build()
}
