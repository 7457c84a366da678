//! Maps transport responses back to call outcomes.
//!
//! The batch length is checked before any status is looked at. Multi-item
//! reductions stop at the first failing item.

use tracing::debug;
use tracing::warn;

use crate::ByteKey;
use crate::CasRegistry;
use crate::ClientMetrics;
use crate::GetResult;
use crate::IncrementResult;
use crate::OperationError;
use crate::Payload;
use crate::Result;
use crate::Status;
use crate::StoreResult;

pub(crate) fn ensure_batch_len(
    op: &'static str,
    expected: usize,
    actual: usize,
) -> Result<()> {
    if expected != actual {
        warn!(
            "[:reducer:{}] protocol violation: {} operations answered with {} results",
            op, expected, actual
        );
        return Err(OperationError::Internal(format!(
            "{op} batch of {expected} operations answered with {actual} results"
        ))
        .into());
    }
    Ok(())
}

fn service_error(status: Status) -> OperationError {
    OperationError::Service { status }
}

/// Pairs every requested key with its value. Missing keys map to `None`.
/// When `registry` is set, the token of every hit is recorded.
pub(crate) fn reduce_get(
    keys: Vec<ByteKey>,
    results: Vec<GetResult>,
    as_binary: bool,
    registry: Option<&CasRegistry>,
    metrics: &ClientMetrics,
) -> Result<Vec<(ByteKey, Option<Payload>)>> {
    ensure_batch_len("get", keys.len(), results.len())?;

    let mut values = Vec::with_capacity(keys.len());
    for (key, result) in keys.into_iter().zip(results) {
        match result.status {
            Status::KeyNotFound => values.push((key, None)),
            Status::Success => {
                if let (Some(registry), Some(token)) = (registry, result.cas) {
                    registry.record(key.clone(), token);
                    metrics.cas_token_recorded();
                }
                let raw = result.value.unwrap_or_default();
                values.push((key, Some(Payload::decode(raw, as_binary))));
            }
            status => {
                debug!("[:reducer:get] {:?} failed: {}", key, status);
                return Err(service_error(status).into());
            }
        }
    }
    Ok(values)
}

pub(crate) fn reduce_set(
    expected: usize,
    results: Vec<StoreResult>,
) -> Result<()> {
    ensure_batch_len("set", expected, results.len())?;

    for result in results {
        match result.status {
            Status::Success => {}
            Status::NotStored => return Err(OperationError::NotStored.into()),
            Status::KeyExists => {
                warn!("[:reducer:set] cas precondition failed");
                return Err(OperationError::Modified.into());
            }
            status => return Err(service_error(status).into()),
        }
    }
    Ok(())
}

/// Removing a missing key counts as success
pub(crate) fn reduce_remove(
    expected: usize,
    results: Vec<StoreResult>,
) -> Result<()> {
    ensure_batch_len("remove", expected, results.len())?;

    for result in results {
        match result.status {
            Status::Success | Status::KeyNotFound => {}
            status => return Err(service_error(status).into()),
        }
    }
    Ok(())
}

pub(crate) fn reduce_increment(mut results: Vec<IncrementResult>) -> Result<u64> {
    ensure_batch_len("increment", 1, results.len())?;

    // Length checked above
    let result = results.remove(0);
    match result.status {
        Status::Success => Ok(result.value),
        status => Err(service_error(status).into()),
    }
}
