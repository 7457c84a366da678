use std::collections::HashMap;
use std::sync::Arc;

use bytes::Bytes;
use tracing::debug;
use tracing::error;

use super::reducer;
use super::translator;
use super::CasClient;
use super::ClientBuilder;
use super::SetOptions;
use crate::codec::normalize_key;
use crate::codec::normalize_value;
use crate::metrics::OUTCOME_OK;
use crate::scoped_timer::ScopedTimer;
use crate::ByteKey;
use crate::CasRegistry;
use crate::ClientConfig;
use crate::ClientMetrics;
use crate::Payload;
use crate::Result;
use crate::Transport;

/// Key-value cache client
///
/// Single-key calls travel as one-element batches. Multi-key calls keep the
/// caller's order and fail as a whole on the first failing item.
///
/// Cloning is cheap: clones share the transport, configuration and metrics.
pub struct CacheClient<T: Transport> {
    pub(super) transport: Arc<T>,
    pub(super) config: Arc<ClientConfig>,
    pub(super) metrics: Arc<ClientMetrics>,
}

impl<T: Transport> Clone for CacheClient<T> {
    fn clone(&self) -> Self {
        Self {
            transport: self.transport.clone(),
            config: self.config.clone(),
            metrics: self.metrics.clone(),
        }
    }
}

impl<T: Transport> CacheClient<T> {
    /// Client with default configuration
    pub fn new(transport: Arc<T>) -> Self {
        let config = ClientConfig::default();
        Self {
            transport,
            metrics: Arc::new(ClientMetrics::new(config.enable_metrics)),
            config: Arc::new(config),
        }
    }

    pub fn builder(transport: Arc<T>) -> ClientBuilder<T> {
        ClientBuilder::new(transport)
    }

    /// CAS-tracking sibling sharing this client's transport.
    ///
    /// Each call returns a client with its own, empty registry.
    pub fn with_cas(&self) -> CasClient<T> {
        CasClient::new(self.clone())
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn metrics(&self) -> &ClientMetrics {
        &self.metrics
    }

    pub fn transport(&self) -> &Arc<T> {
        &self.transport
    }

    /// Retrieves a single key's value
    ///
    /// # Returns
    /// - `Ok(Some(Payload::Text))` if the key exists and `as_binary` is false
    /// - `Ok(Some(Payload::Bytes))` if the key exists and `as_binary` is true
    /// - `Ok(None)` if the key does not exist
    pub async fn get(
        &self,
        key: impl Into<Payload>,
        as_binary: bool,
    ) -> Result<Option<Payload>> {
        let key = normalize_key(key, &self.config)?;
        self.get_one(key, as_binary, None).await
    }

    /// Fetches values for multiple keys in one batch
    ///
    /// Missing keys map to `None`. Repeated keys are still sent once per
    /// occurrence but share a single entry in the returned map.
    ///
    /// # Errors
    /// - [`crate::Error::InvalidArgument`] if no keys are provided
    /// - the first per-item failure, no partial results are returned
    pub async fn get_all<K: Into<Payload>>(
        &self,
        keys: impl IntoIterator<Item = K>,
        as_binary: bool,
    ) -> Result<HashMap<ByteKey, Option<Payload>>> {
        let keys = self.normalize_keys(keys)?;
        let values = self.fetch("get_all", keys, as_binary, None).await?;
        Ok(values.into_iter().collect())
    }

    /// Stores a value unconditionally with the default expiration
    pub async fn set(
        &self,
        key: impl Into<Payload>,
        value: impl Into<Payload>,
    ) -> Result<()> {
        self.set_with(key, value, SetOptions::default()).await
    }

    /// Stores a value with explicit mode and expiration
    ///
    /// # Errors
    /// - [`crate::Error::InvalidArgument`] if the expiration exceeds 30 days
    /// - [`crate::OperationError::NotStored`] if an ADD/REPLACE precondition failed
    /// - [`crate::OperationError::Modified`] if a CAS precondition failed
    pub async fn set_with(
        &self,
        key: impl Into<Payload>,
        value: impl Into<Payload>,
        options: SetOptions,
    ) -> Result<()> {
        let entry = self.normalize_entry(key, value)?;
        self.store("set", vec![entry], options, None).await
    }

    pub async fn set_all<K: Into<Payload>, V: Into<Payload>>(
        &self,
        entries: impl IntoIterator<Item = (K, V)>,
    ) -> Result<()> {
        self.set_all_with(entries, SetOptions::default()).await
    }

    pub async fn set_all_with<K: Into<Payload>, V: Into<Payload>>(
        &self,
        entries: impl IntoIterator<Item = (K, V)>,
        options: SetOptions,
    ) -> Result<()> {
        let entries = self.normalize_entries(entries)?;
        self.store("set_all", entries, options, None).await
    }

    /// Deletes a key. Succeeds whether or not the key exists.
    pub async fn remove(
        &self,
        key: impl Into<Payload>,
    ) -> Result<()> {
        let key = normalize_key(key, &self.config)?;
        self.delete("remove", vec![key]).await
    }

    pub async fn remove_all<K: Into<Payload>>(
        &self,
        keys: impl IntoIterator<Item = K>,
    ) -> Result<()> {
        let keys = self.normalize_keys(keys)?;
        self.delete("remove_all", keys).await
    }

    /// Adds `delta` to a counter, creating it with `initial` if missing.
    /// A negative `delta` decrements.
    ///
    /// # Returns
    /// The counter value after the operation
    pub async fn increment(
        &self,
        key: impl Into<Payload>,
        delta: i64,
        initial: u64,
    ) -> Result<u64> {
        let key = normalize_key(key, &self.config)?;
        self.adjust("increment", key, delta, initial).await
    }

    /// Same as `increment(key, -delta, initial)`
    pub async fn decrement(
        &self,
        key: impl Into<Payload>,
        delta: i64,
        initial: u64,
    ) -> Result<u64> {
        let key = normalize_key(key, &self.config)?;
        let delta = translator::negate_delta(delta)?;
        self.adjust("decrement", key, delta, initial).await
    }

    /// Drops every item held by the service
    pub async fn clear(&self) -> Result<()> {
        let _timer = ScopedTimer::start("clear");
        let result = self.transport.clear().await;
        if let Err(e) = &result {
            error!("[:CacheClient:clear] transport failure: {:?}", e);
        }
        self.observe("clear", result)
    }

    // ---------------------------------------------------------------------
    // Shared with CasClient

    pub(crate) fn normalize_keys<K: Into<Payload>>(
        &self,
        keys: impl IntoIterator<Item = K>,
    ) -> Result<Vec<ByteKey>> {
        keys.into_iter().map(|key| normalize_key(key, &self.config)).collect()
    }

    pub(crate) fn normalize_entry(
        &self,
        key: impl Into<Payload>,
        value: impl Into<Payload>,
    ) -> Result<(ByteKey, Bytes)> {
        Ok((
            normalize_key(key, &self.config)?,
            normalize_value(value, &self.config)?,
        ))
    }

    pub(crate) fn normalize_entries<K: Into<Payload>, V: Into<Payload>>(
        &self,
        entries: impl IntoIterator<Item = (K, V)>,
    ) -> Result<Vec<(ByteKey, Bytes)>> {
        entries
            .into_iter()
            .map(|(key, value)| self.normalize_entry(key, value))
            .collect()
    }

    pub(crate) async fn get_one(
        &self,
        key: ByteKey,
        as_binary: bool,
        registry: Option<&CasRegistry>,
    ) -> Result<Option<Payload>> {
        let mut values = self.fetch("get", vec![key], as_binary, registry).await?;
        Ok(values.pop().and_then(|(_, value)| value))
    }

    pub(crate) async fn fetch(
        &self,
        op: &'static str,
        keys: Vec<ByteKey>,
        as_binary: bool,
        registry: Option<&CasRegistry>,
    ) -> Result<Vec<(ByteKey, Option<Payload>)>> {
        let mut timer = ScopedTimer::start(op);
        timer.set_items(keys.len());

        let result = async {
            let batch = translator::get_batch(&keys)?;
            debug!("[:CacheClient:{}] dispatching {} operations", op, batch.len());
            let results = self.transport.get(batch).await.inspect_err(|e| {
                error!("[:CacheClient:{}] transport failure: {:?}", op, e);
            })?;
            reducer::reduce_get(keys, results, as_binary, registry, &self.metrics)
        }
        .await;
        self.observe(op, result)
    }

    pub(crate) async fn store(
        &self,
        op: &'static str,
        entries: Vec<(ByteKey, Bytes)>,
        options: SetOptions,
        registry: Option<&CasRegistry>,
    ) -> Result<()> {
        let mut timer = ScopedTimer::start(op);
        timer.set_items(entries.len());

        let result = async {
            let expiration = options.expiration.or_else(|| self.config.default_expiration());
            let ttl_seconds = translator::ttl_seconds(expiration)?;
            let batch =
                translator::set_batch(&entries, options.mode, ttl_seconds, registry, &self.metrics)?;
            let expected = batch.len();
            debug!(
                "[:CacheClient:{}] dispatching {} operations, mode={:?}, ttl={}s",
                op, expected, options.mode, ttl_seconds
            );
            let results = self.transport.set(batch).await.inspect_err(|e| {
                error!("[:CacheClient:{}] transport failure: {:?}", op, e);
            })?;
            reducer::reduce_set(expected, results)
        }
        .await;
        self.observe(op, result)
    }

    async fn delete(
        &self,
        op: &'static str,
        keys: Vec<ByteKey>,
    ) -> Result<()> {
        let mut timer = ScopedTimer::start(op);
        timer.set_items(keys.len());

        let result = async {
            let batch = translator::remove_batch(&keys)?;
            let expected = batch.len();
            debug!("[:CacheClient:{}] dispatching {} operations", op, expected);
            let results = self.transport.remove(batch).await.inspect_err(|e| {
                error!("[:CacheClient:{}] transport failure: {:?}", op, e);
            })?;
            reducer::reduce_remove(expected, results)
        }
        .await;
        self.observe(op, result)
    }

    async fn adjust(
        &self,
        op: &'static str,
        key: ByteKey,
        delta: i64,
        initial: u64,
    ) -> Result<u64> {
        let _timer = ScopedTimer::start(op);

        let result = async {
            let operation = translator::increment_operation(&key, delta, initial);
            debug!("[:CacheClient:{}] {:?}", op, operation);
            let results = self.transport.increment(vec![operation]).await.inspect_err(|e| {
                error!("[:CacheClient:{}] transport failure: {:?}", op, e);
            })?;
            reducer::reduce_increment(results)
        }
        .await;
        self.observe(op, result)
    }

    fn observe<R>(
        &self,
        op: &'static str,
        result: Result<R>,
    ) -> Result<R> {
        match &result {
            Ok(_) => self.metrics.observe(op, OUTCOME_OK),
            Err(e) => self.metrics.observe(op, e.kind()),
        }
        result
    }
}
