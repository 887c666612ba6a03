#![deny(missing_docs)]
//! Shared logging utilities for the news generator workspace.
//!
//! This crate provides the `news_*` logging macros used across the codebase
//! and a minimal test initializer for the global logger. The macros expand
//! through the re-exported `log` facade, so callers do not need their own
//! `log` dependency.

/// The facade the macros expand to.
#[doc(hidden)]
pub use log;

/// Logs a trace-level message using the global logging facade.
#[macro_export]
macro_rules! news_trace {
    ($($arg:tt)*) => {{
        $crate::log::trace!($($arg)*);
    }};
}

/// Logs a debug-level message using the global logging facade.
#[macro_export]
macro_rules! news_debug {
    ($($arg:tt)*) => {{
        $crate::log::debug!($($arg)*);
    }};
}

/// Logs an info-level message using the global logging facade.
#[macro_export]
macro_rules! news_info {
    ($($arg:tt)*) => {{
        $crate::log::info!($($arg)*);
    }};
}

/// Logs a warn-level message using the global logging facade.
#[macro_export]
macro_rules! news_warn {
    ($($arg:tt)*) => {{
        $crate::log::warn!($($arg)*);
    }};
}

/// Logs an error-level message using the global logging facade.
#[macro_export]
macro_rules! news_error {
    ($($arg:tt)*) => {{
        $crate::log::error!($($arg)*);
    }};
}

/// Parses a level name such as `info` or `DEBUG` into a filter.
///
/// Unknown names yield `None` so callers can fall back to their own default.
pub fn parse_level(name: &str) -> Option<log::LevelFilter> {
    name.trim().parse::<log::LevelFilter>().ok()
}

/// Initializes a simple terminal logger for use in tests.
///
/// This safely no-ops if another logger has already been initialized.
pub fn initialize_for_tests() {
    use simplelog::{ColorChoice, Config, TermLogger, TerminalMode};

    let level = if cfg!(debug_assertions) {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Info
    };

    // Another test in the same binary may already own the global logger.
    let _ = TermLogger::init(
        level,
        Config::default(),
        TerminalMode::Mixed,
        ColorChoice::Never,
    );
}
