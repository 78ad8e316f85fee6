//! Configuration Module
//!
//! Owns the per-instance cache configuration and the override merging used
//! at construction and by `FileCache::config`.

use std::path::PathBuf;

/// Cache configuration parameters.
///
/// Each `FileCache` owns its configuration; instances never share state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheConfig {
    /// Whether get/set operations are active
    pub enabled: bool,
    /// Base directory under which all entries are stored
    pub directory: PathBuf,
}

impl CacheConfig {
    /// Creates a configuration with the given root directory and caching
    /// enabled.
    pub fn new(directory: impl Into<PathBuf>) -> Self {
        Self {
            enabled: true,
            directory: directory.into(),
        }
    }

    /// Shallow-merges the supplied overrides into this configuration.
    ///
    /// Fields present in `overrides` take precedence; absent fields keep
    /// their current value.
    pub fn merge(&mut self, overrides: CacheConfigOverrides) {
        if let Some(enabled) = overrides.enabled {
            self.enabled = enabled;
        }
        if let Some(directory) = overrides.directory {
            self.directory = directory;
        }
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            directory: PathBuf::from("cache"),
        }
    }
}

// == Overrides ==
/// Partial configuration supplied by the caller.
///
/// All fields are optional; see [`CacheConfig::merge`].
#[derive(Debug, Clone, Default)]
pub struct CacheConfigOverrides {
    pub enabled: Option<bool>,
    pub directory: Option<PathBuf>,
}
