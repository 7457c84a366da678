use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use parking_lot::Mutex;
use tokio::time::Instant;
use tracing::debug;

use super::Direction;
use super::GetOperation;
use super::GetResult;
use super::IncrementOperation;
use super::IncrementResult;
use super::RemoveOperation;
use super::SetMode;
use super::SetOperation;
use super::Status;
use super::StoreResult;
use super::Transport;
use crate::CasToken;
use crate::Result;

/// Status code reported when incrementing a value that is not a decimal counter
pub const NON_NUMERIC_VALUE: u16 = 0x0006;

#[derive(Debug, Clone)]
struct Item {
    value: Bytes,
    cas: u64,
    expires_at: Option<Instant>,
}

impl Item {
    fn is_live(
        &self,
        now: Instant,
    ) -> bool {
        self.expires_at.map_or(true, |at| now < at)
    }
}

#[derive(Debug, Default)]
struct Inner {
    items: HashMap<Bytes, Item>,
    /// Last CAS version handed out; versions start at 1
    version: u64,
}

impl Inner {
    fn next_version(&mut self) -> u64 {
        self.version += 1;
        self.version
    }

    fn live(
        &mut self,
        key: &Bytes,
        now: Instant,
    ) -> Option<&mut Item> {
        let expired = self.items.get(key).is_some_and(|item| !item.is_live(now));
        if expired {
            self.items.remove(key);
            return None;
        }
        self.items.get_mut(key)
    }

    fn apply_set(
        &mut self,
        op: SetOperation,
        now: Instant,
    ) -> Status {
        let exists = self.live(&op.key, now).is_some();
        let current = self.items.get(&op.key).map(|item| item.cas);

        match op.mode {
            SetMode::Add if exists => return Status::NotStored,
            SetMode::Replace if !exists => return Status::NotStored,
            _ => {}
        }
        if let Some(CasToken(expected)) = op.cas {
            match current {
                None => return Status::KeyNotFound,
                Some(cas) if cas != expected => return Status::KeyExists,
                _ => {}
            }
        }

        let expires_at = match op.ttl_seconds {
            0 => None,
            secs => Some(now + Duration::from_secs(secs as u64)),
        };
        let cas = self.next_version();
        self.items.insert(
            op.key,
            Item {
                value: op.value,
                cas,
                expires_at,
            },
        );
        Status::Success
    }

    fn apply_increment(
        &mut self,
        op: IncrementOperation,
        now: Instant,
    ) -> IncrementResult {
        let current = match self.live(&op.key, now) {
            None => None,
            Some(item) => match parse_counter(&item.value) {
                Some(counter) => Some((counter, item.expires_at)),
                None => {
                    return IncrementResult::status(Status::Error {
                        code: NON_NUMERIC_VALUE,
                        message: "cannot increment or decrement non-numeric value".to_string(),
                    })
                }
            },
        };

        let (value, expires_at) = match current {
            None => (op.initial, None),
            Some((counter, expires_at)) => {
                let value = match op.direction {
                    Direction::Up => counter.wrapping_add(op.delta),
                    Direction::Down => counter.saturating_sub(op.delta),
                };
                (value, expires_at)
            }
        };

        let cas = self.next_version();
        self.items.insert(
            op.key,
            Item {
                value: Bytes::from(value.to_string()),
                cas,
                expires_at,
            },
        );
        IncrementResult::success(value)
    }
}

fn parse_counter(value: &[u8]) -> Option<u64> {
    std::str::from_utf8(value).ok()?.trim().parse().ok()
}

/// In-process cache service speaking the [`Transport`] contract.
///
/// Useful to embed the client without a remote service and to exercise it in
/// tests. Every write bumps a store-wide version that serves as CAS token.
/// Expired items are dropped when next touched. There is no capacity limit
/// and nothing is persisted.
#[derive(Debug, Default)]
pub struct MemoryTransport {
    inner: Mutex<Inner>,
}

impl MemoryTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored items, expired ones included until touched
    pub fn len(&self) -> usize {
        self.inner.lock().items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl Transport for MemoryTransport {
    async fn get(
        &self,
        batch: Vec<GetOperation>,
    ) -> Result<Vec<GetResult>> {
        let now = Instant::now();
        let mut inner = self.inner.lock();
        Ok(batch
            .into_iter()
            .map(|op| match inner.live(&op.key, now) {
                Some(item) => GetResult::hit(item.value.clone(), CasToken(item.cas)),
                None => GetResult::miss(),
            })
            .collect())
    }

    async fn set(
        &self,
        batch: Vec<SetOperation>,
    ) -> Result<Vec<StoreResult>> {
        let now = Instant::now();
        let mut inner = self.inner.lock();
        Ok(batch
            .into_iter()
            .map(|op| StoreResult::new(inner.apply_set(op, now)))
            .collect())
    }

    async fn remove(
        &self,
        batch: Vec<RemoveOperation>,
    ) -> Result<Vec<StoreResult>> {
        let now = Instant::now();
        let mut inner = self.inner.lock();
        Ok(batch
            .into_iter()
            .map(|op| {
                let status = if inner.live(&op.key, now).is_some() {
                    inner.items.remove(&op.key);
                    Status::Success
                } else {
                    Status::KeyNotFound
                };
                StoreResult::new(status)
            })
            .collect())
    }

    async fn increment(
        &self,
        batch: Vec<IncrementOperation>,
    ) -> Result<Vec<IncrementResult>> {
        let now = Instant::now();
        let mut inner = self.inner.lock();
        Ok(batch
            .into_iter()
            .map(|op| inner.apply_increment(op, now))
            .collect())
    }

    async fn clear(&self) -> Result<()> {
        let mut inner = self.inner.lock();
        debug!("[:MemoryTransport:clear] dropping {} items", inner.items.len());
        inner.items.clear();
        Ok(())
    }
}
