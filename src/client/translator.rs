//! Builds transport batches from high-level calls.
//!
//! Every builder preserves the caller's order and never produces an empty
//! batch. All validation happens here, before anything is dispatched.

use std::time::Duration;

use bytes::Bytes;

use crate::constants::MAX_EXPIRATION;
use crate::ByteKey;
use crate::CasRegistry;
use crate::ClientMetrics;
use crate::Direction;
use crate::Error;
use crate::GetOperation;
use crate::IncrementOperation;
use crate::RemoveOperation;
use crate::Result;
use crate::SetMode;
use crate::SetOperation;

/// Relative expiration in whole seconds, rounded up so that a sub-second
/// expiration never turns into "no expiration".
pub(crate) fn ttl_seconds(expiration: Option<Duration>) -> Result<u32> {
    let Some(expiration) = expiration else {
        return Ok(0);
    };
    if expiration > MAX_EXPIRATION {
        return Err(Error::invalid_argument(format!(
            "expiration of {}s exceeds maximum of {}s (30 days)",
            expiration.as_secs(),
            MAX_EXPIRATION.as_secs()
        )));
    }
    let mut secs = expiration.as_secs();
    if expiration.subsec_nanos() > 0 {
        secs += 1;
    }
    Ok(secs as u32)
}

fn ensure_not_empty(
    op: &'static str,
    len: usize,
) -> Result<()> {
    if len == 0 {
        return Err(Error::invalid_argument(format!("{op} requires at least one key")));
    }
    Ok(())
}

pub(crate) fn get_batch(keys: &[ByteKey]) -> Result<Vec<GetOperation>> {
    ensure_not_empty("get", keys.len())?;
    Ok(keys.iter().map(|key| GetOperation { key: key.to_bytes() }).collect())
}

/// Only `SetMode::Set` consults the registry. ADD and REPLACE never carry a
/// token, whatever the registry holds.
pub(crate) fn set_batch(
    entries: &[(ByteKey, Bytes)],
    mode: SetMode,
    ttl_seconds: u32,
    registry: Option<&CasRegistry>,
    metrics: &ClientMetrics,
) -> Result<Vec<SetOperation>> {
    ensure_not_empty("set", entries.len())?;
    Ok(entries
        .iter()
        .map(|(key, value)| {
            let cas = match (mode, registry) {
                (SetMode::Set, Some(registry)) => registry.lookup(key),
                _ => None,
            };
            if cas.is_some() {
                metrics.cas_token_attached();
            }
            SetOperation {
                key: key.to_bytes(),
                value: value.clone(),
                mode,
                ttl_seconds,
                cas,
            }
        })
        .collect())
}

pub(crate) fn remove_batch(keys: &[ByteKey]) -> Result<Vec<RemoveOperation>> {
    ensure_not_empty("remove", keys.len())?;
    Ok(keys.iter().map(|key| RemoveOperation { key: key.to_bytes() }).collect())
}

/// Direction follows the sign of `delta`, the wire carries its magnitude
pub(crate) fn increment_operation(
    key: &ByteKey,
    delta: i64,
    initial: u64,
) -> IncrementOperation {
    let direction = if delta < 0 { Direction::Down } else { Direction::Up };
    IncrementOperation {
        key: key.to_bytes(),
        delta: delta.unsigned_abs(),
        direction,
        initial,
    }
}

/// Decrement is increment with the sign flipped
pub(crate) fn negate_delta(delta: i64) -> Result<i64> {
    delta
        .checked_neg()
        .ok_or_else(|| Error::invalid_argument(format!("delta {delta} cannot be negated")))
}
