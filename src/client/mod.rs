//! Client facade for the cache service
//!
//! Provides the public entry points:
//! - [`CacheClient`] - plain key-value operations over a [`crate::Transport`]
//! - [`CasClient`] - the same operations with CAS token tracking
//! - [`ClientBuilder`] - configurable client construction
//!
//! # Basic Usage
//! ```no_run
//! use std::sync::Arc;
//!
//! use d_cache::CacheClient;
//! use d_cache::MemoryTransport;
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> d_cache::Result<()> {
//!     let client = CacheClient::builder(Arc::new(MemoryTransport::new())).build()?;
//!
//!     client.set("user:1001", "Alice").await?;
//!     let value = client.get("user:1001", false).await?;
//!     println!("User data: {:?}", value);
//!
//!     // Writes after a read fail if someone else modified the key meanwhile
//!     let cas = client.with_cas();
//!     cas.get("user:1001", false).await?;
//!     cas.set("user:1001", "Bob").await?;
//!     Ok(())
//! }
//! ```

mod builder;
mod cache_client;
mod cas_client;
mod options;
mod reducer;
mod translator;

pub use builder::*;
pub use cache_client::*;
pub use cas_client::*;
pub use options::*;
