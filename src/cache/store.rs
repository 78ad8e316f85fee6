//! Cache Store Module
//!
//! The file-backed cache engine: maps keys to hashed paths under the
//! configured root and persists JSON records with optional expiry.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::Context;
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::cache::path::resolve_path;
use crate::cache::{CacheRecord, CacheStats};
use crate::config::{CacheConfig, CacheConfigOverrides};
use crate::error::{CacheError, Result};

// == File Cache ==
/// File-backed key-value cache with optional per-entry expiry.
///
/// Values are serialized to JSON records stored under hashed paths below
/// the configured root directory. Expired entries fail on read but stay on
/// disk until explicitly deleted or overwritten.
#[derive(Debug)]
pub struct FileCache {
    /// Instance configuration
    config: CacheConfig,
    /// Activity counters
    stats: CacheStats,
}

impl FileCache {
    // == Constructor ==
    /// Creates a cache over the given configuration.
    ///
    /// The root directory is not created here; `set` creates missing
    /// directories on demand.
    pub fn new(config: CacheConfig) -> Self {
        info!(
            directory = %config.directory.display(),
            enabled = config.enabled,
            "file cache initialized"
        );

        Self {
            config,
            stats: CacheStats::new(),
        }
    }

    /// Creates a cache from the default configuration merged with the
    /// supplied overrides. Supplied fields win.
    pub fn with_overrides(overrides: CacheConfigOverrides) -> Self {
        let mut config = CacheConfig::default();
        config.merge(overrides);
        Self::new(config)
    }

    // == Get ==
    /// Retrieves the payload stored under `key`.
    ///
    /// The failure cases are kept distinguishable:
    /// - `Disabled` when caching is switched off (no disk access)
    /// - `NotFound` when no readable record exists at the resolved path
    /// - `Expired` when the record's expiry second has passed; the stale
    ///   file is left in place
    /// - `EmptyPayload` when the record holds a null payload
    ///
    /// A record that cannot be read, parsed, or deserialized into `T` is
    /// treated as absent.
    pub fn get<T: DeserializeOwned>(&mut self, key: &str) -> Result<T> {
        if !self.config.enabled {
            return Err(CacheError::Disabled);
        }

        let path = resolve_path(&self.config.directory, key);
        if !path.is_file() {
            self.stats.record_miss();
            return Err(CacheError::NotFound(key.to_string()));
        }

        let record = match read_record(&path) {
            Ok(record) => record,
            Err(err) => {
                debug!(key, error = %err, "unreadable record treated as absent");
                self.stats.record_miss();
                return Err(CacheError::NotFound(key.to_string()));
            }
        };

        if record.is_expired() {
            debug!(key, "cache entry expired");
            self.stats.record_miss();
            return Err(CacheError::Expired(key.to_string()));
        }

        if record.data.is_null() {
            self.stats.record_miss();
            return Err(CacheError::EmptyPayload(key.to_string()));
        }

        let ttl_remaining = record.ttl_remaining();
        match serde_json::from_value(record.data) {
            Ok(value) => {
                debug!(key, ?ttl_remaining, "cache hit");
                self.stats.record_hit();
                Ok(value)
            }
            Err(err) => {
                debug!(key, error = %err, "payload type mismatch treated as absent");
                self.stats.record_miss();
                Err(CacheError::NotFound(key.to_string()))
            }
        }
    }

    // == Set ==
    /// Stores a value under `key`, overwriting any existing entry.
    ///
    /// # Arguments
    /// * `key` - The key to store under
    /// * `value` - The value to serialize
    /// * `interval` - Optional lifetime in seconds; None = never expires
    ///
    /// Returns true only when the full serialized record reached the
    /// destination. Filesystem and serialization failures are logged and
    /// reported as false.
    pub fn set<T: Serialize>(&mut self, key: &str, value: &T, interval: Option<u64>) -> bool {
        if !self.config.enabled {
            return false;
        }

        match self.write_record(key, value, interval) {
            Ok(path) => {
                debug!(key, path = %path.display(), "cache entry written");
                self.stats.record_write();
                true
            }
            Err(err) => {
                warn!(key, error = %err, "cache write failed");
                false
            }
        }
    }

    // == Delete ==
    /// Removes the entry stored under `key`.
    ///
    /// A key resolving to a directory (a structured key prefix) is emptied
    /// recursively. Returns false when the path never existed or removal
    /// failed.
    pub fn delete(&mut self, key: &str) -> bool {
        let path = resolve_path(&self.config.directory, key);
        let removed = remove_recursive(&path);

        if removed {
            debug!(key, "cache entry removed");
            self.stats.record_removal();
        }

        removed
    }

    // == Clear ==
    /// Recursively empties and removes the entire cache root.
    pub fn clear(&mut self) -> bool {
        let directory = self.config.directory.clone();
        let removed = remove_recursive(&directory);

        if removed {
            info!(directory = %directory.display(), "cache cleared");
            self.stats.record_removal();
        }

        removed
    }

    // == Has ==
    /// Returns whether a lookup for `key` would currently succeed:
    /// caching enabled, record present and readable, not expired, and
    /// carrying a non-null payload. Does not touch the hit/miss counters.
    pub fn has(&self, key: &str) -> bool {
        if !self.config.enabled {
            return false;
        }

        let path = resolve_path(&self.config.directory, key);
        if !path.is_file() {
            return false;
        }

        match read_record(&path) {
            Ok(record) => !record.is_expired() && !record.data.is_null(),
            Err(_) => false,
        }
    }

    // == Status ==
    /// Checks and optionally switches the enabled flag.
    ///
    /// With `Some`, sets the flag; always returns the current state.
    /// Disabling hides previously written entries; re-enabling restores
    /// their visibility.
    pub fn status(&mut self, status: Option<bool>) -> bool {
        if let Some(enabled) = status {
            if enabled != self.config.enabled {
                info!(enabled, "cache status changed");
            }
            self.config.enabled = enabled;
        }

        self.config.enabled
    }

    // == Config ==
    /// Shallow-merges the supplied overrides into the live configuration
    /// and returns the resulting full configuration.
    pub fn config(&mut self, overrides: CacheConfigOverrides) -> &CacheConfig {
        self.config.merge(overrides);
        &self.config
    }

    // == Stats ==
    /// Returns a snapshot of the activity counters.
    pub fn stats(&self) -> CacheStats {
        self.stats.clone()
    }

    // == Directory ==
    /// The configured cache root directory.
    pub fn directory(&self) -> &Path {
        &self.config.directory
    }

    /// Builds the record and writes it through a temp file in the target
    /// directory, persisted over the destination in one rename.
    fn write_record<T: Serialize>(
        &self,
        key: &str,
        value: &T,
        interval: Option<u64>,
    ) -> anyhow::Result<PathBuf> {
        let path = resolve_path(&self.config.directory, key);
        let parent = path.parent().unwrap_or(&self.config.directory);
        create_private_dirs(parent)?;

        let payload = serde_json::to_value(value).context("failed to serialize payload")?;
        let record = CacheRecord::new(payload, interval);
        let bytes = serde_json::to_vec(&record).context("failed to serialize cache record")?;

        let mut tmp = tempfile::NamedTempFile::new_in(parent)
            .context("failed to create temp file for cache write")?;
        tmp.write_all(&bytes).context("failed to write cache record")?;
        tmp.persist(&path)
            .with_context(|| format!("failed to persist cache record: {:?}", path))?;

        Ok(path)
    }
}

impl Default for FileCache {
    fn default() -> Self {
        Self::new(CacheConfig::default())
    }
}

// == Filesystem Helpers ==

/// Reads and parses a record file.
fn read_record(path: &Path) -> anyhow::Result<CacheRecord> {
    let bytes =
        fs::read(path).with_context(|| format!("failed to read cache record: {:?}", path))?;
    serde_json::from_slice(&bytes)
        .with_context(|| format!("failed to parse cache record: {:?}", path))
}

/// Creates `dir` and any missing ancestors with owner-only permissions.
fn create_private_dirs(dir: &Path) -> anyhow::Result<()> {
    if dir.is_dir() {
        return Ok(());
    }

    let mut builder = fs::DirBuilder::new();
    builder.recursive(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::DirBuilderExt;
        builder.mode(0o700);
    }
    builder
        .create(dir)
        .with_context(|| format!("failed to create cache directory: {:?}", dir))
}

/// Removes a file, or recursively empties and removes a directory.
///
/// The walk is bottom-up: a directory is removed only after its contents,
/// so the final `remove_dir` succeeds exactly when the directory ended up
/// empty. Returns false when the path does not exist or removal failed.
fn remove_recursive(path: &Path) -> bool {
    if path.is_dir() {
        let entries = match fs::read_dir(path) {
            Ok(entries) => entries,
            Err(err) => {
                warn!(path = %path.display(), error = %err, "failed to read cache directory");
                return false;
            }
        };

        for entry in entries.flatten() {
            let child = entry.path();
            if child.is_dir() {
                remove_recursive(&child);
            } else if let Err(err) = fs::remove_file(&child) {
                warn!(path = %child.display(), error = %err, "failed to remove cache file");
            }
        }

        fs::remove_dir(path).is_ok()
    } else if path.is_file() {
        fs::remove_file(path).is_ok()
    } else {
        false
    }
}
