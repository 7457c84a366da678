//! Key Codec
//!
//! Turns caller input (text or raw bytes) into the canonical byte form used on
//! the transport, and decodes read values back to the representation the caller
//! asked for.

mod hash;
pub use hash::*;


use std::fmt;
use std::hash::Hash;
use std::hash::Hasher;
use std::sync::OnceLock;

use bytes::Bytes;

use crate::ClientConfig;
use crate::Error;
use crate::Result;

/// Text or raw bytes, resolved once at the API boundary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Payload {
    Text(String),
    Bytes(Bytes),
}

impl Payload {
    pub fn as_bytes(&self) -> &[u8] {
        match self {
            Payload::Text(s) => s.as_bytes(),
            Payload::Bytes(b) => b,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Payload::Text(s) => Some(s),
            Payload::Bytes(_) => None,
        }
    }

    pub fn into_bytes(self) -> Bytes {
        match self {
            Payload::Text(s) => Bytes::from(s.into_bytes()),
            Payload::Bytes(b) => b,
        }
    }

    /// Decode a stored value. Invalid UTF-8 sequences are replaced rather than
    /// rejected when text is requested.
    pub(crate) fn decode(
        raw: Bytes,
        as_binary: bool,
    ) -> Self {
        if as_binary {
            Payload::Bytes(raw)
        } else {
            Payload::Text(String::from_utf8_lossy(&raw).into_owned())
        }
    }
}

impl From<&str> for Payload {
    fn from(s: &str) -> Self {
        Payload::Text(s.to_owned())
    }
}

impl From<String> for Payload {
    fn from(s: String) -> Self {
        Payload::Text(s)
    }
}

impl From<&[u8]> for Payload {
    fn from(b: &[u8]) -> Self {
        Payload::Bytes(Bytes::copy_from_slice(b))
    }
}

impl<const N: usize> From<&[u8; N]> for Payload {
    fn from(b: &[u8; N]) -> Self {
        Payload::Bytes(Bytes::copy_from_slice(b))
    }
}

impl From<Vec<u8>> for Payload {
    fn from(b: Vec<u8>) -> Self {
        Payload::Bytes(Bytes::from(b))
    }
}

impl From<Bytes> for Payload {
    fn from(b: Bytes) -> Self {
        Payload::Bytes(b)
    }
}

/// Immutable byte-sequence key with content equality.
///
/// Two keys built from different containers holding the same bytes are equal
/// and hash identically. The content hash is computed at most once per
/// instance and dies with it.
#[derive(Clone)]
pub struct ByteKey {
    bytes: Bytes,
    hash: OnceLock<u32>,
}

impl ByteKey {
    pub fn new(bytes: impl Into<Bytes>) -> Self {
        Self {
            bytes: bytes.into(),
            hash: OnceLock::new(),
        }
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Cheap handle on the underlying buffer, no copy
    pub fn to_bytes(&self) -> Bytes {
        self.bytes.clone()
    }

    pub fn content_hash(&self) -> u32 {
        *self.hash.get_or_init(|| one_at_a_time(&self.bytes))
    }
}

impl PartialEq for ByteKey {
    fn eq(
        &self,
        other: &Self,
    ) -> bool {
        self.bytes == other.bytes
    }
}

impl Eq for ByteKey {}

impl Hash for ByteKey {
    fn hash<H: Hasher>(
        &self,
        state: &mut H,
    ) {
        state.write_u32(self.content_hash());
    }
}

impl fmt::Debug for ByteKey {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        write!(f, "ByteKey({:?})", self.bytes)
    }
}

macro_rules! byte_key_from {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for ByteKey {
                fn from(input: $ty) -> Self {
                    ByteKey::new(Payload::from(input).into_bytes())
                }
            }
        )*
    };
}

byte_key_from!(&str, String, &[u8], Vec<u8>, Bytes);

impl<const N: usize> From<&[u8; N]> for ByteKey {
    fn from(input: &[u8; N]) -> Self {
        ByteKey::new(Bytes::copy_from_slice(input))
    }
}

impl From<ByteKey> for Payload {
    fn from(key: ByteKey) -> Self {
        Payload::Bytes(key.bytes)
    }
}

impl From<&ByteKey> for Payload {
    fn from(key: &ByteKey) -> Self {
        Payload::Bytes(key.to_bytes())
    }
}

/// Normalize a caller key. Keys must be non-empty and fit `max_key_size`.
pub(crate) fn normalize_key(
    input: impl Into<Payload>,
    config: &ClientConfig,
) -> Result<ByteKey> {
    let key = ByteKey::new(input.into().into_bytes());
    if key.is_empty() {
        return Err(Error::invalid_argument("key must not be empty"));
    }
    if key.len() > config.max_key_size {
        return Err(Error::invalid_argument(format!(
            "key of {} bytes exceeds maximum of {} bytes",
            key.len(),
            config.max_key_size
        )));
    }
    Ok(key)
}

/// Normalize a caller value. Empty values are allowed.
pub(crate) fn normalize_value(
    input: impl Into<Payload>,
    config: &ClientConfig,
) -> Result<Bytes> {
    let value = input.into().into_bytes();
    if value.len() > config.max_value_size {
        return Err(Error::invalid_argument(format!(
            "value of {} bytes exceeds maximum of {} bytes",
            value.len(),
            config.max_value_size
        )));
    }
    Ok(value)
}
