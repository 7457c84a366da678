use dashmap::DashMap;
use tracing::trace;

use super::CasToken;
use crate::ByteKey;

/// Last observed CAS token per key.
///
/// Keys are compared by content, so tokens recorded through one buffer are
/// found through any other buffer holding the same bytes. Entries are never
/// evicted: the registry grows with the set of distinct keys read through its
/// owning client. A stale token can only make a write fail with
/// `OperationError::Modified`, it never lets a write through.
///
/// Access to a single key is serialized by the map's shard locks. Concurrent
/// `record` calls for the same key resolve as last writer wins, so a lookup
/// sees some token recorded for that key, eventually the latest one.
#[derive(Debug, Default)]
pub struct CasRegistry {
    tokens: DashMap<ByteKey, CasToken>,
}

impl CasRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Upsert the token observed for `key`
    pub fn record(
        &self,
        key: ByteKey,
        token: CasToken,
    ) {
        trace!("record cas token {} for {:?}", token, key);
        self.tokens.insert(key, token);
    }

    pub fn lookup(
        &self,
        key: &ByteKey,
    ) -> Option<CasToken> {
        self.tokens.get(key).map(|entry| *entry.value())
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }
}
