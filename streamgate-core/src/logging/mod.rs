//! Logging setup
//!
//! The engine only emits `tracing` events; hosts that do not install their
//! own subscriber can call [`init_logging`] or [`init_logging_with_config`].
//! `RUST_LOG` overrides the configured level when set.

use crate::config::LoggingConfig;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

mod error;
mod level;

pub use error::LoggingError;
pub use level::LogLevel;

/// Subscriber settings
#[derive(Debug, Clone)]
pub struct LogConfig {
    pub level: LogLevel,
    pub with_timestamp: bool,
    pub with_target: bool,
    pub json_format: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: LogLevel::Info,
            with_timestamp: true,
            with_target: true,
            json_format: false,
        }
    }
}

impl LogConfig {
    pub fn new(level: LogLevel) -> Self {
        Self {
            level,
            ..Default::default()
        }
    }

    /// Build from the `[logging]` section of a [`Config`](crate::config::Config)
    pub fn from_settings(settings: &LoggingConfig) -> Result<Self, LoggingError> {
        Ok(Self {
            level: settings.level.parse()?,
            with_timestamp: settings.with_timestamp,
            with_target: settings.with_target,
            json_format: settings.json_format,
        })
    }

    pub fn with_timestamp(mut self, enabled: bool) -> Self {
        self.with_timestamp = enabled;
        self
    }

    pub fn with_target(mut self, enabled: bool) -> Self {
        self.with_target = enabled;
        self
    }

    pub fn json_format(mut self, enabled: bool) -> Self {
        self.json_format = enabled;
        self
    }

    fn filter(&self) -> EnvFilter {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(self.level.as_str()))
    }
}

/// Install a global subscriber with the default settings
pub fn init_logging() -> Result<(), LoggingError> {
    init_logging_with_config(LogConfig::default())
}

/// Install a global subscriber
///
/// # Example
/// ```
/// use streamgate_core::logging::{init_logging_with_config, LogConfig, LogLevel};
///
/// let config = LogConfig::new(LogLevel::Debug).with_target(false);
/// init_logging_with_config(config).expect("Failed to initialize logging");
/// ```
pub fn init_logging_with_config(config: LogConfig) -> Result<(), LoggingError> {
    let registry = tracing_subscriber::registry().with(config.filter());
    let fmt_layer = fmt::layer().with_target(config.with_target);

    let result = match (config.json_format, config.with_timestamp) {
        (true, true) => registry.with(fmt_layer.json()).try_init(),
        (true, false) => registry.with(fmt_layer.json().without_time()).try_init(),
        (false, true) => registry.with(fmt_layer).try_init(),
        (false, false) => registry.with(fmt_layer.without_time()).try_init(),
    };
    result.map_err(|e| LoggingError::InitializationFailed(e.to_string()))
}
