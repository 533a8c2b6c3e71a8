//! Logging setup
//!
//! Installs a `tracing` subscriber with an `EnvFilter`. `RUST_LOG` directives
//! are honoured and the configured level is added on top. Log lines go to
//! stderr so they stay out of the console's menus on stdout.

use std::str::FromStr;

use tracing::Level;
use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::EnvFilter;

use crate::error::{PhoneSimError, PhoneSimResult};

/// Configuration for the logging system
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    /// The log level to use
    pub level: Level,
    /// Whether to include file and line information
    pub file_info: bool,
    /// Whether to log span open/close
    pub log_spans: bool,
    /// Whether to print the target module
    pub with_target: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        LoggingConfig {
            level: Level::INFO,
            file_info: false,
            log_spans: false,
            with_target: false,
        }
    }
}

impl LoggingConfig {
    pub fn new(level: Level) -> Self {
        LoggingConfig {
            level,
            ..Default::default()
        }
    }

    /// Build from a level name such as `"debug"`
    pub fn from_level_name(level: &str) -> PhoneSimResult<Self> {
        Ok(Self::new(parse_log_level(level)?))
    }

    pub fn with_file_info(mut self) -> Self {
        self.file_info = true;
        self
    }

    pub fn with_spans(mut self) -> Self {
        self.log_spans = true;
        self
    }

    pub fn with_target(mut self) -> Self {
        self.with_target = true;
        self
    }
}

/// Install the global subscriber
///
/// Fails if a subscriber was already installed.
pub fn setup_logging(config: LoggingConfig) -> PhoneSimResult<()> {
    let filter = EnvFilter::from_default_env().add_directive(config.level.into());

    let span_events = if config.log_spans {
        FmtSpan::ACTIVE
    } else {
        FmtSpan::NONE
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_span_events(span_events)
        .with_target(config.with_target)
        .with_file(config.file_info)
        .with_line_number(config.file_info)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|e| PhoneSimError::Logging {
            message: e.to_string(),
        })
}

/// Parse a log level from a string
pub fn parse_log_level(level: &str) -> PhoneSimResult<Level> {
    Level::from_str(level).map_err(|_| PhoneSimError::config(format!("Invalid log level: {}", level)))
}
