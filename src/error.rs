//! Error types for the file cache
//!
//! Provides unified error handling using thiserror.

use thiserror::Error;

// == Cache Error Enum ==
/// Failure reasons for cache lookups.
///
/// A lookup that does not produce a payload fails for one of four
/// distinguishable reasons. `NotFound` is the "absent" case; the other
/// variants are failures for keys that may well have a file on disk.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CacheError {
    /// Caching is switched off for this instance
    #[error("cache is disabled")]
    Disabled,

    /// No entry exists for the key
    #[error("key not found: {0}")]
    NotFound(String),

    /// An entry exists but its expiry time has passed
    #[error("key expired: {0}")]
    Expired(String),

    /// An entry exists but holds a null payload
    #[error("empty payload for key: {0}")]
    EmptyPayload(String),
}

// == Result Type Alias ==
/// Convenience Result type for cache lookups.
pub type Result<T> = std::result::Result<T, CacheError>;
