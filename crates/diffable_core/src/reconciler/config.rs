//! Reconciler configuration.

use serde::{Deserialize, Serialize};

/// What happens to a mutation requested while a batch is in flight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BusyPolicy {
    /// Ignore the request; the store is left untouched.
    #[default]
    Drop,
    /// Apply the request to the store now and queue its batches.
    Queue,
}

/// Per-instance reconciler settings. Fixed for the instance lifetime.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ReconcilerConfig {
    pub busy_policy: BusyPolicy,
}

impl ReconcilerConfig {
    pub fn with_busy_policy(busy_policy: BusyPolicy) -> Self {
        Self { busy_policy }
    }
}
