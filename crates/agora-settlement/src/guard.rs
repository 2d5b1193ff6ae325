//! Reentrancy guard for the settlement coordinator.
//!
//! A callback-driven collaborator (custody hook, oracle, delegate) must
//! not be able to re-enter settlement while one is in flight. The guard is
//! a plain flag claimed at every public entry point and released after the
//! attempt's result is captured, so the release runs on both the success
//! and the failure path.

use agora_types::{AgoraError, Result};

#[derive(Debug, Default)]
pub struct ReentrancyGuard {
    entered: bool,
}

impl ReentrancyGuard {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Claim the guard. Fails fast when a settlement is already in flight.
    pub fn enter(&mut self) -> Result<()> {
        if self.entered {
            return Err(AgoraError::ReentrancyDetected);
        }
        self.entered = true;
        Ok(())
    }

    /// Release the guard. Safe to call when not held.
    pub fn exit(&mut self) {
        self.entered = false;
    }

    #[must_use]
    pub fn is_entered(&self) -> bool {
        self.entered
    }
}
