//! Startup configuration read from the environment.

use std::net::SocketAddr;
use std::path::PathBuf;

use crate::telemetry::{LogFormat, DEFAULT_LOG_LEVEL};

pub const ENV_BIND: &str = "ROLLCALLD_BIND";
pub const ENV_DATA_DIR: &str = "ROLLCALLD_DATA_DIR";
pub const ENV_LOG_FORMAT: &str = "ROLLCALLD_LOG_FORMAT";
pub const ENV_LOG_LEVEL: &str = "ROLLCALLD_LOG_LEVEL";

pub const DEFAULT_BIND: &str = "127.0.0.1:5000";

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid value {value:?} for {key}")]
    Invalid { key: &'static str, value: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub bind: SocketAddr,
    pub data_dir: PathBuf,
    pub log_format: LogFormat,
    /// Filter used when `RUST_LOG` is unset.
    pub log_level: String,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let bind_raw = get(ENV_BIND).unwrap_or_else(|| DEFAULT_BIND.to_string());
        let bind = bind_raw
            .trim()
            .parse::<SocketAddr>()
            .map_err(|_| ConfigError::Invalid {
                key: ENV_BIND,
                value: bind_raw.clone(),
            })?;

        let log_format = match get(ENV_LOG_FORMAT) {
            Some(raw) => raw.parse().map_err(|_| ConfigError::Invalid {
                key: ENV_LOG_FORMAT,
                value: raw,
            })?,
            None => LogFormat::default(),
        };

        Ok(Self {
            bind,
            data_dir: get(ENV_DATA_DIR).map_or_else(|| PathBuf::from("."), PathBuf::from),
            log_format,
            log_level: get(ENV_LOG_LEVEL).unwrap_or_else(|| DEFAULT_LOG_LEVEL.to_string()),
        })
    }
}
