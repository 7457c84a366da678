//! CAS token tracking
//!
//! A [`CasRegistry`] remembers, per key, the last version token a read
//! returned. Unconditional writes consult it so that they only succeed if
//! nobody modified the key since that read.

mod registry;
pub use registry::*;


use std::fmt;

/// Opaque version marker handed out by the service on reads.
///
/// Only the service interprets it. The client passes it back unchanged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CasToken(pub u64);

impl fmt::Display for CasToken {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        write!(f, "{:#x}", self.0)
    }
}
