//! Logger setup for the generator binary.
//!
//! Always logs to the terminal; additionally writes to a file when
//! `NEWS_LOG_FILE` is set.

use std::fs::File;
use std::path::Path;

use log::LevelFilter;
use simplelog::{
    ColorChoice, CombinedLogger, Config, ConfigBuilder, SharedLogger, TermLogger, TerminalMode,
    WriteLogger,
};

use crate::config::LoggingConfig;

pub fn initialize(config: &LoggingConfig) {
    let log_config = build_config();

    let mut loggers: Vec<Box<dyn SharedLogger>> = vec![TermLogger::new(
        config.level,
        log_config.clone(),
        TerminalMode::Mixed,
        ColorChoice::Auto,
    )];
    if let Some(path) = config.file.as_deref() {
        if let Some(file_logger) = create_file_logger(path, config.level, log_config) {
            loggers.push(file_logger);
        }
    }

    let _ = CombinedLogger::init(loggers);
}

fn build_config() -> Config {
    ConfigBuilder::new()
        .set_time_format_rfc3339()
        .set_target_level(LevelFilter::Error)
        // reqwest/hyper internals are noise at info level
        .add_filter_ignore_str("hyper")
        .add_filter_ignore_str("reqwest")
        .add_filter_ignore_str("html5ever")
        .build()
}

fn create_file_logger(
    path: &Path,
    level: LevelFilter,
    config: Config,
) -> Option<Box<WriteLogger<File>>> {
    match File::create(path) {
        Ok(file) => Some(WriteLogger::new(level, config, file)),
        Err(err) => {
            eprintln!("Warning: Could not create log file at {:?}: {}", path, err);
            None
        }
    }
}
