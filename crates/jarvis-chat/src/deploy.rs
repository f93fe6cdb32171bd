//! The single-slot deploy confirmation gate.
//!
//! At most one URL waits for confirmation. Proposing a new one replaces
//! whatever was pending; there is no queue.

use std::sync::{Mutex, MutexGuard, PoisonError};

use jarvis_core::types::Timestamp;

/// A URL awaiting explicit user confirmation before navigation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingDeploy {
    pub url: String,
    pub proposed_at: Timestamp,
}

/// Holds the pending deploy, if any.
#[derive(Debug, Default)]
pub struct DeployGate {
    slot: Mutex<Option<PendingDeploy>>,
}

impl DeployGate {
    pub fn new() -> Self {
        Self::default()
    }

    fn slot(&self) -> MutexGuard<'_, Option<PendingDeploy>> {
        self.slot.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Hold `url` for confirmation. Returns the deploy it displaced.
    pub fn propose(&self, url: impl Into<String>) -> Option<PendingDeploy> {
        let pending = PendingDeploy {
            url: url.into(),
            proposed_at: Timestamp::now(),
        };
        let replaced = self.slot().replace(pending);
        if let Some(old) = &replaced {
            tracing::debug!(url = %old.url, "Pending deploy replaced");
        }
        replaced
    }

    /// Remove and return the pending deploy for confirmation.
    pub fn take(&self) -> Option<PendingDeploy> {
        self.slot().take()
    }

    /// Discard the pending deploy without navigating.
    ///
    /// Returns `true` if something was pending.
    pub fn dismiss(&self) -> bool {
        self.slot().take().is_some()
    }

    pub fn pending(&self) -> Option<PendingDeploy> {
        self.slot().clone()
    }

    pub fn is_pending(&self) -> bool {
        self.slot().is_some()
    }
}
