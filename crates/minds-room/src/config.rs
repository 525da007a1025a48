//! Registry configuration.

use serde::{Deserialize, Serialize};

/// Configuration for the [`RoomRegistry`](crate::RoomRegistry).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegistryConfig {
    /// Maximum number of concurrent rooms. Joins to unknown names fail
    /// with `room limit reached` once this many rooms exist.
    pub max_rooms: usize,

    /// Fixed deck seed for every room. `None` (the default) seeds each
    /// room from OS entropy; tests set this for deterministic deals.
    pub deck_seed: Option<u64>,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        // The deployed instance runs a single room.
        Self {
            max_rooms: 1,
            deck_seed: None,
        }
    }
}
