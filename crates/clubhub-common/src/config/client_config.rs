//! Client configuration structs
//!
//! Loads configuration from `CLUBHUB_*` environment variables, or from an
//! optional config file layered under `CLUBHUB__*` overrides.

use serde::Deserialize;
use std::env;
use std::path::Path;
use std::str::FromStr;
use std::time::Duration;

/// Main client configuration
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    pub api: ApiConfig,
    pub chat: ChatConfig,
    pub retry: RetrySettings,
    pub rate_limit: RateLimitSettings,
    pub log: LogSettings,
}

/// REST backend settings
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    pub base_url: String,
    /// Bearer token sent with every request, if present
    pub token: Option<String>,
    pub timeout_secs: u64,
}

/// Chat WebSocket settings
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ChatConfig {
    pub url: String,
}

/// Retry settings for callers composing `retry_with_backoff`
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RetrySettings {
    pub max_retries: u32,
    pub base_delay_ms: u64,
}

/// Minimum spacing between requests for callers using a `RateLimiter`
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RateLimitSettings {
    pub min_interval_ms: u64,
}

/// Logging settings
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LogSettings {
    /// Default filter when `RUST_LOG` is unset
    pub level: String,
    pub json: bool,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            token: None,
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl ApiConfig {
    #[must_use]
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            url: default_chat_url(),
        }
    }
}

impl Default for RetrySettings {
    fn default() -> Self {
        Self {
            max_retries: default_max_retries(),
            base_delay_ms: default_base_delay_ms(),
        }
    }
}

impl RetrySettings {
    #[must_use]
    pub fn base_delay(&self) -> Duration {
        Duration::from_millis(self.base_delay_ms)
    }
}

impl Default for RateLimitSettings {
    fn default() -> Self {
        Self {
            min_interval_ms: default_min_interval_ms(),
        }
    }
}

impl RateLimitSettings {
    #[must_use]
    pub fn min_interval(&self) -> Duration {
        Duration::from_millis(self.min_interval_ms)
    }
}

impl Default for LogSettings {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json: false,
        }
    }
}

// Default value functions
fn default_base_url() -> String {
    "http://localhost:5000".to_string()
}

fn default_chat_url() -> String {
    "ws://localhost:8080/ws/chat".to_string()
}

fn default_timeout_secs() -> u64 {
    10
}

fn default_max_retries() -> u32 {
    3
}

fn default_base_delay_ms() -> u64 {
    1000
}

fn default_min_interval_ms() -> u64 {
    1000
}

fn default_log_level() -> String {
    "info".to_string()
}

impl ClientConfig {
    /// Load configuration from `CLUBHUB_*` environment variables
    ///
    /// Every variable is optional; unset values fall back to defaults.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration from an optional file plus `CLUBHUB__SECTION__KEY` overrides
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let _ = dotenvy::dotenv();

        let mut builder = config::Config::builder();
        if let Some(path) = path {
            builder = builder.add_source(config::File::from(path).required(true));
        }

        let config: Self = builder
            .add_source(
                config::Environment::with_prefix("CLUBHUB")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()?;

        config.validate()?;
        Ok(config)
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let config = Self {
            api: ApiConfig {
                base_url: lookup("CLUBHUB_API_URL").unwrap_or_else(default_base_url),
                token: lookup("CLUBHUB_TOKEN").filter(|t| !t.trim().is_empty()),
                timeout_secs: parse_var(&lookup, "CLUBHUB_TIMEOUT_SECS")?
                    .unwrap_or_else(default_timeout_secs),
            },
            chat: ChatConfig {
                url: lookup("CLUBHUB_CHAT_URL").unwrap_or_else(default_chat_url),
            },
            retry: RetrySettings {
                max_retries: parse_var(&lookup, "CLUBHUB_RETRY_MAX")?
                    .unwrap_or_else(default_max_retries),
                base_delay_ms: parse_var(&lookup, "CLUBHUB_RETRY_BASE_DELAY_MS")?
                    .unwrap_or_else(default_base_delay_ms),
            },
            rate_limit: RateLimitSettings {
                min_interval_ms: parse_var(&lookup, "CLUBHUB_RATE_LIMIT_INTERVAL_MS")?
                    .unwrap_or_else(default_min_interval_ms),
            },
            log: LogSettings {
                level: lookup("CLUBHUB_LOG_LEVEL").unwrap_or_else(default_log_level),
                json: parse_var(&lookup, "CLUBHUB_LOG_JSON")?.unwrap_or(false),
            },
        };

        config.validate()?;
        Ok(config)
    }

    /// Check URL schemes
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.api.base_url.starts_with("http://") || self.api.base_url.starts_with("https://"))
        {
            return Err(ConfigError::InvalidValue(
                "api.base_url",
                self.api.base_url.clone(),
            ));
        }
        if !(self.chat.url.starts_with("ws://") || self.chat.url.starts_with("wss://")) {
            return Err(ConfigError::InvalidValue("chat.url", self.chat.url.clone()));
        }
        Ok(())
    }
}

fn parse_var<T: FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &'static str,
) -> Result<Option<T>, ConfigError> {
    lookup(key)
        .map(|raw| {
            raw.trim()
                .parse()
                .map_err(|_| ConfigError::InvalidValue(key, raw))
        })
        .transpose()
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for {0}: {1}")]
    InvalidValue(&'static str, String),

    #[error("Failed to load configuration: {0}")]
    Load(String),
}

impl From<config::ConfigError> for ConfigError {
    fn from(err: config::ConfigError) -> Self {
        Self::Load(err.to_string())
    }
}
