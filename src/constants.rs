use std::time::Duration;

/// Longest relative expiration the service accepts (30 days)
pub const MAX_EXPIRATION: Duration = Duration::from_secs(30 * 24 * 60 * 60);

/// Default upper bound for key length in bytes
pub(crate) const DEFAULT_MAX_KEY_SIZE: usize = 250;

/// Default upper bound for value length in bytes (1MB)
pub(crate) const DEFAULT_MAX_VALUE_SIZE: usize = 1 << 20;

/// Prefix of environment variables overriding [`crate::ClientConfig`]
pub(crate) const ENV_PREFIX: &str = "DCACHE";
