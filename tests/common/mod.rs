use std::sync::atomic::AtomicUsize;
use std::sync::atomic::Ordering;
use std::sync::Arc;

use async_trait::async_trait;
use d_cache::CacheClient;
use d_cache::GetOperation;
use d_cache::GetResult;
use d_cache::IncrementOperation;
use d_cache::IncrementResult;
use d_cache::MemoryTransport;
use d_cache::RemoveOperation;
use d_cache::Result;
use d_cache::SetOperation;
use d_cache::StoreResult;
use d_cache::Transport;

pub fn memory_client() -> (Arc<MemoryTransport>, CacheClient<MemoryTransport>) {
    let transport = Arc::new(MemoryTransport::new());
    let client = CacheClient::builder(transport.clone())
        .build()
        .expect("default config is valid");
    (transport, client)
}

/// Wraps a [`MemoryTransport`], counting round-trips and optionally dropping
/// the last result of every batch to break the batch contract.
#[derive(Default)]
pub struct RecordingTransport {
    pub inner: MemoryTransport,
    pub calls: AtomicUsize,
    pub truncate: bool,
}

impl RecordingTransport {
    pub fn truncating() -> Self {
        Self {
            truncate: true,
            ..Self::default()
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn finish<R>(
        &self,
        mut results: Vec<R>,
    ) -> Vec<R> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.truncate {
            results.pop();
        }
        results
    }
}

#[async_trait]
impl Transport for RecordingTransport {
    async fn get(
        &self,
        batch: Vec<GetOperation>,
    ) -> Result<Vec<GetResult>> {
        Ok(self.finish(self.inner.get(batch).await?))
    }

    async fn set(
        &self,
        batch: Vec<SetOperation>,
    ) -> Result<Vec<StoreResult>> {
        Ok(self.finish(self.inner.set(batch).await?))
    }

    async fn remove(
        &self,
        batch: Vec<RemoveOperation>,
    ) -> Result<Vec<StoreResult>> {
        Ok(self.finish(self.inner.remove(batch).await?))
    }

    async fn increment(
        &self,
        batch: Vec<IncrementOperation>,
    ) -> Result<Vec<IncrementResult>> {
        Ok(self.finish(self.inner.increment(batch).await?))
    }

    async fn clear(&self) -> Result<()> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.inner.clear().await
    }
}
