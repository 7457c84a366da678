//! # d-cache
//!
//! Async client layer for key-value cache services.
//!
//! The client translates single- and multi-key calls (get, set, remove,
//! increment/decrement, clear) into ordered batches for a pluggable
//! [`Transport`], and maps the per-item statuses back to values or errors.
//!
//! [`CacheClient::with_cas`] derives a [`CasClient`] that remembers the CAS
//! token of every key it reads and attaches it to the next unconditional write
//! of that key, turning lost updates into [`OperationError::Modified`].
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//!
//! use d_cache::{CacheClient, MemoryTransport, SetOptions};
//!
//! #[tokio::main]
//! async fn main() -> d_cache::Result<()> {
//!     let client = CacheClient::builder(Arc::new(MemoryTransport::new())).build()?;
//!
//!     client.set_with("greeting", "hello", SetOptions::add()).await?;
//!     let views = client.increment("views", 1, 0).await?;
//!     assert_eq!(views, 0);
//!
//!     let cas = client.with_cas();
//!     if let Some(value) = cas.get("greeting", false).await? {
//!         println!("{:?}", value);
//!         cas.set("greeting", "hello again").await?;
//!     }
//!     Ok(())
//! }
//! ```

mod cas;
mod client;
mod codec;
mod config;
mod constants;
mod errors;
mod metrics;
mod scoped_timer;
mod transport;

pub use cas::*;
pub use client::*;
pub use codec::ByteKey;
pub use codec::Payload;
pub use codec::one_at_a_time;
pub use config::*;
pub use constants::MAX_EXPIRATION;
pub use errors::*;
pub use metrics::*;
pub use transport::*;
