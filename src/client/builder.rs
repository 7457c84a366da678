use std::sync::Arc;
use std::time::Duration;

use super::CacheClient;
use crate::ClientConfig;
use crate::ClientMetrics;
use crate::Result;
use crate::Transport;

pub struct ClientBuilder<T: Transport> {
    transport: Arc<T>,
    config: ClientConfig,
}

impl<T: Transport> ClientBuilder<T> {
    /// Create a new builder with default config over `transport`
    pub fn new(transport: Arc<T>) -> Self {
        Self {
            transport,
            config: ClientConfig::default(),
        }
    }

    /// Set maximum key length in bytes (default: 250)
    pub fn max_key_size(
        mut self,
        size: usize,
    ) -> Self {
        self.config.max_key_size = size;
        self
    }

    /// Set maximum value length in bytes (default: 1MB)
    pub fn max_value_size(
        mut self,
        size: usize,
    ) -> Self {
        self.config.max_value_size = size;
        self
    }

    /// Expiration used when a set call does not name one (default: none)
    pub fn default_expiration(
        mut self,
        expiration: Duration,
    ) -> Self {
        let round_up = u64::from(expiration.subsec_nanos() > 0);
        self.config.default_expiration_secs = expiration.as_secs().saturating_add(round_up);
        self
    }

    /// Enable/disable prometheus counters (default: enabled)
    pub fn enable_metrics(
        mut self,
        enable: bool,
    ) -> Self {
        self.config.enable_metrics = enable;
        self
    }

    /// Completely replaces the default configuration
    ///
    /// # Warning: Configuration Override
    /// This will discard all previous settings configured through individual
    /// methods like [`max_key_size`](ClientBuilder::max_key_size) or
    /// [`enable_metrics`](ClientBuilder::enable_metrics).
    ///
    /// # Example
    /// ```ignore
    /// let config = ClientConfig::new()?;
    /// let client = CacheClient::builder(transport).set_config(config).build()?;
    /// ```
    pub fn set_config(
        mut self,
        config: ClientConfig,
    ) -> Self {
        self.config = config;
        self
    }

    /// Validate the configuration and build the client
    pub fn build(self) -> Result<CacheClient<T>> {
        let config = self.config.validate()?;
        Ok(CacheClient {
            transport: self.transport,
            metrics: Arc::new(ClientMetrics::new(config.enable_metrics)),
            config: Arc::new(config),
        })
    }
}
