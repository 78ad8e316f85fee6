//! File Cache - a lightweight file-backed key-value cache
//!
//! Stores serialized values under hashed filesystem paths, with optional
//! time-based expiry, recursive invalidation and a per-instance
//! enable/disable flag.

pub mod cache;
pub mod config;
pub mod error;

pub use cache::{CacheRecord, CacheStats, FileCache};
pub use config::{CacheConfig, CacheConfigOverrides};
pub use error::{CacheError, Result};
