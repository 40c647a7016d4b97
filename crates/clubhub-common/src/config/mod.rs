//! Configuration structs

mod client_config;

pub use client_config::{
    ApiConfig, ChatConfig, ClientConfig, ConfigError, LogSettings, RateLimitSettings,
    RetrySettings,
};
