//! Transport abstraction for the remote cache service
//!
//! The client never speaks a wire protocol itself. It hands ordered batches of
//! same-kind operations to a [`Transport`] and expects, for every batch, an
//! ordered sequence of results of exactly the same length.
//!
//! [`MemoryTransport`] is an in-process implementation of the contract.

mod memory;
pub use memory::*;


use std::fmt;

use async_trait::async_trait;
use bytes::Bytes;
#[cfg(test)]
use mockall::automock;

use crate::CasToken;
use crate::Result;

/// Store semantics of a set operation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SetMode {
    /// Unconditional store. The only mode that carries a CAS token
    #[default]
    Set,
    /// Store only if the key does not exist
    Add,
    /// Store only if the key already exists
    Replace,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
}

/// Per-item outcome reported by the service
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Status {
    Success,
    KeyNotFound,
    KeyExists,
    NotStored,
    Error { code: u16, message: String },
}

impl fmt::Display for Status {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        match self {
            Status::Success => write!(f, "success"),
            Status::KeyNotFound => write!(f, "key not found"),
            Status::KeyExists => write!(f, "key exists"),
            Status::NotStored => write!(f, "not stored"),
            Status::Error { code, message } => write!(f, "error {code}: {message}"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GetOperation {
    pub key: Bytes,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SetOperation {
    pub key: Bytes,
    pub value: Bytes,
    pub mode: SetMode,
    /// Relative expiration in seconds, 0 means no expiration
    pub ttl_seconds: u32,
    pub cas: Option<CasToken>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoveOperation {
    pub key: Bytes,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IncrementOperation {
    pub key: Bytes,
    /// Magnitude of the change, the sign lives in `direction`
    pub delta: u64,
    pub direction: Direction,
    /// Stored when the counter does not exist yet
    pub initial: u64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GetResult {
    pub status: Status,
    pub value: Option<Bytes>,
    pub cas: Option<CasToken>,
}

impl GetResult {
    pub fn hit(
        value: impl Into<Bytes>,
        cas: CasToken,
    ) -> Self {
        Self {
            status: Status::Success,
            value: Some(value.into()),
            cas: Some(cas),
        }
    }

    pub fn miss() -> Self {
        Self::status(Status::KeyNotFound)
    }

    pub fn status(status: Status) -> Self {
        Self {
            status,
            value: None,
            cas: None,
        }
    }
}

/// Outcome of a set or remove item
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreResult {
    pub status: Status,
}

impl StoreResult {
    pub fn new(status: Status) -> Self {
        Self { status }
    }

    pub fn success() -> Self {
        Self::new(Status::Success)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IncrementResult {
    pub status: Status,
    /// Counter value after the operation was applied
    pub value: u64,
}

impl IncrementResult {
    pub fn success(value: u64) -> Self {
        Self {
            status: Status::Success,
            value,
        }
    }

    pub fn status(status: Status) -> Self {
        Self { status, value: 0 }
    }
}

/// Batched entry points of the remote cache service.
///
/// Every batch is non-empty and homogeneous. Implementations must answer with
/// one result per operation, in request order, or fail the whole batch.
/// Timeouts and cancellation are the implementation's business.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait Transport: Send + Sync + 'static {
    async fn get(
        &self,
        batch: Vec<GetOperation>,
    ) -> Result<Vec<GetResult>>;

    async fn set(
        &self,
        batch: Vec<SetOperation>,
    ) -> Result<Vec<StoreResult>>;

    async fn remove(
        &self,
        batch: Vec<RemoveOperation>,
    ) -> Result<Vec<StoreResult>>;

    async fn increment(
        &self,
        batch: Vec<IncrementOperation>,
    ) -> Result<Vec<IncrementResult>>;

    /// Drops every item held by the service
    async fn clear(&self) -> Result<()>;
}
