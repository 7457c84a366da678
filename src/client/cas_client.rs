use std::collections::HashMap;

use super::CacheClient;
use super::SetOptions;
use crate::codec::normalize_key;
use crate::ByteKey;
use crate::CasRegistry;
use crate::ClientConfig;
use crate::ClientMetrics;
use crate::Payload;
use crate::Result;
use crate::Transport;

/// Cache client with optimistic concurrency tracking
///
/// Reads remember the CAS token returned for each key. A later unconditional
/// `set` of the same key carries that token, so the write fails with
/// [`crate::OperationError::Modified`] if another actor changed the key in between.
/// ADD and REPLACE writes never carry a token.
///
/// Remove, increment, decrement and clear go straight to the wrapped client.
/// The registry belongs to this instance alone, it is not shared with the
/// client it was derived from nor with other CAS siblings.
pub struct CasClient<T: Transport> {
    client: CacheClient<T>,
    registry: CasRegistry,
}

impl<T: Transport> CasClient<T> {
    pub(super) fn new(client: CacheClient<T>) -> Self {
        Self {
            client,
            registry: CasRegistry::new(),
        }
    }

    /// Another CAS-tracking client over the same transport, with an empty registry
    pub fn with_cas(&self) -> CasClient<T> {
        self.client.with_cas()
    }

    /// The plain client this one wraps
    pub fn inner(&self) -> &CacheClient<T> {
        &self.client
    }

    pub fn cas_registry(&self) -> &CasRegistry {
        &self.registry
    }

    pub fn config(&self) -> &ClientConfig {
        self.client.config()
    }

    pub fn metrics(&self) -> &ClientMetrics {
        self.client.metrics()
    }

    /// Same as [`CacheClient::get`], recording the returned token
    pub async fn get(
        &self,
        key: impl Into<Payload>,
        as_binary: bool,
    ) -> Result<Option<Payload>> {
        let key = normalize_key(key, self.client.config())?;
        self.client.get_one(key, as_binary, Some(&self.registry)).await
    }

    /// Same as [`CacheClient::get_all`], recording a token for every hit.
    /// Repeated keys collapse into one map entry.
    pub async fn get_all<K: Into<Payload>>(
        &self,
        keys: impl IntoIterator<Item = K>,
        as_binary: bool,
    ) -> Result<HashMap<ByteKey, Option<Payload>>> {
        let keys = self.client.normalize_keys(keys)?;
        let values = self
            .client
            .fetch("get_all", keys, as_binary, Some(&self.registry))
            .await?;
        Ok(values.into_iter().collect())
    }

    /// Unconditional store guarded by the last token read for `key`, if any
    pub async fn set(
        &self,
        key: impl Into<Payload>,
        value: impl Into<Payload>,
    ) -> Result<()> {
        self.set_with(key, value, SetOptions::default()).await
    }

    pub async fn set_with(
        &self,
        key: impl Into<Payload>,
        value: impl Into<Payload>,
        options: SetOptions,
    ) -> Result<()> {
        let entry = self.client.normalize_entry(key, value)?;
        self.client
            .store("set", vec![entry], options, Some(&self.registry))
            .await
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
        let entries = self.client.normalize_entries(entries)?;
        self.client
            .store("set_all", entries, options, Some(&self.registry))
            .await
    }

    pub async fn remove(
        &self,
        key: impl Into<Payload>,
    ) -> Result<()> {
        self.client.remove(key).await
    }

    pub async fn remove_all<K: Into<Payload>>(
        &self,
        keys: impl IntoIterator<Item = K>,
    ) -> Result<()> {
        self.client.remove_all(keys).await
    }

    pub async fn increment(
        &self,
        key: impl Into<Payload>,
        delta: i64,
        initial: u64,
    ) -> Result<u64> {
        self.client.increment(key, delta, initial).await
    }

    pub async fn decrement(
        &self,
        key: impl Into<Payload>,
        delta: i64,
        initial: u64,
    ) -> Result<u64> {
        self.client.decrement(key, delta, initial).await
    }

    pub async fn clear(&self) -> Result<()> {
        self.client.clear().await
    }
}
