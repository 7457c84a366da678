use std::time::Duration;

use crate::SetMode;

/// Per-call options of set operations
///
/// `expiration: None` falls back to the client's configured default expiration.
/// `Some(Duration::ZERO)` stores the item without expiration.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SetOptions {
    pub mode: SetMode,
    pub expiration: Option<Duration>,
}

impl SetOptions {
    /// Store only if the key does not exist yet
    pub fn add() -> Self {
        Self::default().mode(SetMode::Add)
    }

    /// Store only if the key already exists
    pub fn replace() -> Self {
        Self::default().mode(SetMode::Replace)
    }

    pub fn mode(
        mut self,
        mode: SetMode,
    ) -> Self {
        self.mode = mode;
        self
    }

    pub fn expiration(
        mut self,
        expiration: Duration,
    ) -> Self {
        self.expiration = Some(expiration);
        self
    }
}
