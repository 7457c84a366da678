use std::time::Duration;

use config::ConfigError;
use serde::Deserialize;
use serde::Serialize;

use crate::constants::DEFAULT_MAX_KEY_SIZE;
use crate::constants::DEFAULT_MAX_VALUE_SIZE;
use crate::constants::MAX_EXPIRATION;
use crate::Error;
use crate::Result;

/// Client-side limits and defaults applied before a request reaches the transport
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Maximum key length in bytes
    /// Default: 250
    #[serde(default = "default_max_key_size")]
    pub max_key_size: usize,

    /// Maximum value length in bytes
    /// Default: 1MB
    #[serde(default = "default_max_value_size")]
    pub max_value_size: usize,

    /// Expiration applied by `SetOptions::default()`, 0 means items never expire
    /// Must not exceed 30 days
    #[serde(default)]
    pub default_expiration_secs: u64,

    /// Record per-operation prometheus counters
    /// Default: true
    #[serde(default = "default_enable_metrics")]
    pub enable_metrics: bool,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            max_key_size: default_max_key_size(),
            max_value_size: default_max_value_size(),
            default_expiration_secs: 0,
            enable_metrics: default_enable_metrics(),
        }
    }
}

impl ClientConfig {
    /// Validates configuration and returns validated instance.
    pub fn validate(self) -> Result<Self> {
        if self.max_key_size == 0 {
            return Err(Error::Config(ConfigError::Message(
                "max_key_size must be greater than 0".into(),
            )));
        }

        if self.max_value_size == 0 {
            return Err(Error::Config(ConfigError::Message(
                "max_value_size must be greater than 0".into(),
            )));
        }

        if self.default_expiration_secs > MAX_EXPIRATION.as_secs() {
            return Err(Error::Config(ConfigError::Message(format!(
                "default_expiration_secs {} exceeds maximum of {} seconds",
                self.default_expiration_secs,
                MAX_EXPIRATION.as_secs()
            ))));
        }

        Ok(self)
    }

    pub fn default_expiration(&self) -> Option<Duration> {
        match self.default_expiration_secs {
            0 => None,
            secs => Some(Duration::from_secs(secs)),
        }
    }
}

fn default_max_key_size() -> usize {
    DEFAULT_MAX_KEY_SIZE
}
fn default_max_value_size() -> usize {
    DEFAULT_MAX_VALUE_SIZE
}
fn default_enable_metrics() -> bool {
    true
}
