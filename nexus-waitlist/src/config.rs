//! Waitlist configuration.

use serde::{Deserialize, Serialize};

/// When the waitlist reorders itself by priority.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReorderPolicy {
    /// Order only changes on an explicit
    /// [`sort_by_priority`](crate::Waitlist::sort_by_priority) call.
    #[default]
    Explicit,
    /// Every successful enqueue is followed by a stable priority sort.
    OnEnqueue,
}

/// Settings for a [`Waitlist`](crate::Waitlist).
///
/// Missing fields fall back to their defaults when deserialized:
///
/// ```
/// use nexus_waitlist::{ReorderPolicy, WaitlistConfig};
///
/// let config: WaitlistConfig = serde_json::from_str(r#"{"reorder":"on_enqueue"}"#).unwrap();
/// assert_eq!(config.reorder, ReorderPolicy::OnEnqueue);
/// assert_eq!(config.capacity, WaitlistConfig::DEFAULT_CAPACITY);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WaitlistConfig {
    /// Reordering policy.
    pub reorder: ReorderPolicy,
    /// Number of entries to pre-allocate room for.
    pub capacity: usize,
}

impl WaitlistConfig {
    /// Default pre-allocated capacity.
    pub const DEFAULT_CAPACITY: usize = 16;

    /// Returns a config with the given reorder policy.
    #[must_use]
    pub const fn with_reorder(mut self, reorder: ReorderPolicy) -> Self {
        self.reorder = reorder;
        self
    }

    /// Returns a config with the given pre-allocated capacity.
    #[must_use]
    pub const fn with_capacity(mut self, capacity: usize) -> Self {
        self.capacity = capacity;
        self
    }
}

impl Default for WaitlistConfig {
    fn default() -> Self {
        Self {
            reorder: ReorderPolicy::Explicit,
            capacity: Self::DEFAULT_CAPACITY,
        }
    }
}
