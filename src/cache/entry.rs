//! Cache Record Module
//!
//! Defines the on-disk record shape for individual cache entries.

use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::Value;

// == Cache Record ==
/// A single cache entry as serialized to disk.
///
/// The record is a JSON object with exactly three fields: `created`,
/// `remove` and `data`. A `remove` of null means the entry never expires.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheRecord {
    /// Creation timestamp (Unix seconds)
    pub created: i64,
    /// Expiration timestamp (Unix seconds), None = no expiration
    #[serde(default)]
    pub remove: Option<i64>,
    /// The stored payload, opaque to the cache
    pub data: Value,
}

impl CacheRecord {
    // == Constructor ==
    /// Creates a new record with optional expiry interval.
    ///
    /// # Arguments
    /// * `data` - The payload to store
    /// * `interval` - Optional lifetime in seconds; `Some(0)` stamps
    ///   `remove` equal to `created`, so the entry expires as soon as the
    ///   current second has passed
    pub fn new(data: Value, interval: Option<u64>) -> Self {
        let now = current_timestamp();

        Self {
            created: now,
            remove: interval.map(|secs| now + secs as i64),
            data,
        }
    }

    // == Is Expired ==
    /// Checks whether the record's expiry time has passed.
    ///
    /// Boundary condition: an entry is expired only when the expiry second
    /// is strictly less than the current second. At `remove == now` the
    /// entry is still valid.
    pub fn is_expired(&self) -> bool {
        match self.remove {
            Some(deadline) => deadline < current_timestamp(),
            None => false,
        }
    }

    // == Time To Live ==
    /// Returns remaining lifetime in seconds, or None for entries without
    /// expiry. Expired entries report zero.
    pub fn ttl_remaining(&self) -> Option<i64> {
        self.remove.map(|deadline| {
            let now = current_timestamp();
            if deadline > now {
                deadline - now
            } else {
                0
            }
        })
    }
}

// == Utility Functions ==
/// Returns the current Unix timestamp in seconds.
pub fn current_timestamp() -> i64 {
    Utc::now().timestamp()
}
