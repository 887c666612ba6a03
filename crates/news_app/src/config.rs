//! Process configuration, read from environment variables.
//!
//! Only `ISSUE_BODY` is required; everything else overlays the library
//! defaults.

use std::path::PathBuf;
use std::time::Duration;

use log::LevelFilter;
use news_core::MissingHeadingPolicy;
use news_engine::GeneratorConfig;

pub const ISSUE_BODY: &str = "ISSUE_BODY";
pub const OUTPUT_DIR: &str = "NEWS_OUTPUT_DIR";
pub const IMAGES_DIR: &str = "NEWS_IMAGES_DIR";
pub const STRICT_HEADINGS: &str = "NEWS_STRICT_HEADINGS";
pub const REQUEST_TIMEOUT_SECS: &str = "NEWS_REQUEST_TIMEOUT_SECS";
pub const CONNECT_TIMEOUT_SECS: &str = "NEWS_CONNECT_TIMEOUT_SECS";
pub const LOG_LEVEL: &str = "NEWS_LOG_LEVEL";
pub const LOG_FILE: &str = "NEWS_LOG_FILE";

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{0} is not set")]
    Missing(&'static str),
    #[error("{var} has invalid value {value:?}: expected {expected}")]
    Invalid {
        var: &'static str,
        value: String,
        expected: &'static str,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoggingConfig {
    pub level: LevelFilter,
    pub file: Option<PathBuf>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: LevelFilter::Info,
            file: None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub issue_body: String,
    pub generator: GeneratorConfig,
    pub logging: LoggingConfig,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Builds the configuration from `lookup`, which maps a variable name to
    /// its value.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let issue_body = lookup(ISSUE_BODY).ok_or(ConfigError::Missing(ISSUE_BODY))?;
        let mut generator = GeneratorConfig::default();

        if let Some(dir) = non_empty(lookup(OUTPUT_DIR)) {
            generator.output_dir = PathBuf::from(dir);
        }
        if let Some(dir) = non_empty(lookup(IMAGES_DIR)) {
            generator.images_dir = PathBuf::from(dir);
        }
        if let Some(value) = non_empty(lookup(STRICT_HEADINGS)) {
            if parse_flag(STRICT_HEADINGS, &value)? {
                generator.missing_heading_policy = MissingHeadingPolicy::Empty;
            }
        }
        if let Some(value) = non_empty(lookup(REQUEST_TIMEOUT_SECS)) {
            generator.fetch.request_timeout = parse_secs(REQUEST_TIMEOUT_SECS, &value)?;
        }
        if let Some(value) = non_empty(lookup(CONNECT_TIMEOUT_SECS)) {
            generator.fetch.connect_timeout = parse_secs(CONNECT_TIMEOUT_SECS, &value)?;
        }

        let mut logging = LoggingConfig::default();
        if let Some(value) = non_empty(lookup(LOG_LEVEL)) {
            logging.level = news_logging::parse_level(&value).ok_or(ConfigError::Invalid {
                var: LOG_LEVEL,
                value,
                expected: "a log level (off, error, warn, info, debug, trace)",
            })?;
        }
        logging.file = non_empty(lookup(LOG_FILE)).map(PathBuf::from);

        Ok(Self {
            issue_body,
            generator,
            logging,
        })
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn parse_flag(var: &'static str, value: &str) -> Result<bool, ConfigError> {
    match value.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::Invalid {
            var,
            value: value.to_string(),
            expected: "a boolean flag",
        }),
    }
}

fn parse_secs(var: &'static str, value: &str) -> Result<Duration, ConfigError> {
    match value.parse::<u64>() {
        Ok(secs) if secs > 0 => Ok(Duration::from_secs(secs)),
        _ => Err(ConfigError::Invalid {
            var,
            value: value.to_string(),
            expected: "a positive number of seconds",
        }),
    }
}
