//! Configuration for the authorization engine
//!
//! Defaults, then a TOML file or `STREAMGATE_*` environment overrides, then
//! [`Config::validate`].

use crate::core_authz::PostOwnerMatch;
use crate::logging::LogLevel;
use serde::{Deserialize, Serialize};
use std::env;
use std::path::Path;
use std::str::FromStr;
use std::time::Duration;

mod error;

pub use error::ConfigError;

const ENV_PREFIX: &str = "STREAMGATE_";

/// Top-level configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub logging: LoggingConfig,

    pub policy: PolicyConfig,

    pub metrics: MetricsConfig,
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    pub level: String,

    pub json_format: bool,

    pub with_timestamp: bool,

    /// Include the emitting module
    pub with_target: bool,
}

/// Decision policy knobs
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PolicyConfig {
    /// How ownership of a personal stream is decided when posting
    pub post_owner_match: PostOwnerMatch,

    /// Ignore ASCII case when comparing account ids for stream ownership
    pub case_insensitive_account_ids: bool,

    /// Decisions slower than this are logged as warnings
    #[serde(with = "humantime_serde")]
    pub slow_decision_threshold: Duration,
}

/// Metrics configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MetricsConfig {
    /// Record decision counters and latency histograms
    pub enabled: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json_format: false,
            with_timestamp: true,
            with_target: true,
        }
    }
}

impl Default for PolicyConfig {
    fn default() -> Self {
        Self {
            post_owner_match: PostOwnerMatch::default(),
            case_insensitive_account_ids: true,
            slow_decision_threshold: Duration::from_millis(250),
        }
    }
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self { enabled: true }
    }
}

fn env_override<T>(key: &'static str, target: &mut T) -> Result<(), ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    if let Ok(raw) = env::var(format!("{ENV_PREFIX}{key}")) {
        *target = raw.parse().map_err(|e: T::Err| ConfigError::InvalidValue {
            key,
            message: e.to_string(),
        })?;
    }
    Ok(())
}

impl Config {
    /// Load defaults overridden by environment variables
    ///
    /// Variables follow the pattern `STREAMGATE_<SECTION>_<KEY>`, e.g.
    /// `STREAMGATE_POLICY_POST_OWNER_MATCH=actor_entity_id`.
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut config = Self::default();

        env_override("LOG_LEVEL", &mut config.logging.level)?;
        env_override("LOG_JSON", &mut config.logging.json_format)?;

        env_override("POLICY_POST_OWNER_MATCH", &mut config.policy.post_owner_match)?;
        env_override(
            "POLICY_CASE_INSENSITIVE_ACCOUNT_IDS",
            &mut config.policy.case_insensitive_account_ids,
        )?;
        if let Ok(raw) = env::var(format!("{ENV_PREFIX}POLICY_SLOW_DECISION_THRESHOLD")) {
            config.policy.slow_decision_threshold =
                humantime_serde::re::humantime::parse_duration(&raw).map_err(|e| {
                    ConfigError::InvalidValue {
                        key: "POLICY_SLOW_DECISION_THRESHOLD",
                        message: e.to_string(),
                    }
                })?;
        }

        env_override("METRICS_ENABLED", &mut config.metrics.enabled)?;

        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a TOML file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let contents =
            std::fs::read_to_string(path).map_err(|e| ConfigError::FileReadError(e.to_string()))?;

        let config: Self =
            toml::from_str(&contents).map_err(|e| ConfigError::ParseError(e.to_string()))?;

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if LogLevel::from_str(&self.logging.level).is_err() {
            return Err(ConfigError::ValidationFailed(format!(
                "Invalid log level: {}",
                self.logging.level
            )));
        }

        if self.policy.slow_decision_threshold.is_zero() {
            return Err(ConfigError::ValidationFailed(
                "slow_decision_threshold must be greater than 0".to_string(),
            ));
        }

        Ok(())
    }

    pub fn save_to_file(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let contents =
            toml::to_string_pretty(self).map_err(|e| ConfigError::SerializeError(e.to_string()))?;

        std::fs::write(path, contents).map_err(|e| ConfigError::FileWriteError(e.to_string()))?;

        Ok(())
    }
}
