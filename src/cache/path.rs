//! Path Resolution Module
//!
//! Maps dot-delimited cache keys to filesystem paths under the cache root.

use std::path::{Path, PathBuf, MAIN_SEPARATOR_STR};

use sha2::{Digest, Sha256};

/// Width in hex characters of each fan-out directory name.
const FANOUT_WIDTH: usize = 2;

// == Resolve Path ==
/// Resolves a cache key to its on-disk path.
///
/// Dots in the key map to directory separators, producing a candidate path
/// under `directory`. When a file or directory already exists at the
/// candidate it is used as-is, which supports pre-existing structured
/// keys. Otherwise the final path segment is hashed and fanned out into
/// two levels of two-character dot-prefixed subdirectories, bounding the
/// number of files per directory.
///
/// The resolution only inspects existence; it never creates files or
/// directories.
pub(crate) fn resolve_path(directory: &Path, key: &str) -> PathBuf {
    let candidate = directory.join(key.replace('.', MAIN_SEPARATOR_STR));

    if candidate.is_dir() || candidate.is_file() {
        return candidate;
    }

    let name = candidate
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();
    let digest = hex::encode(Sha256::digest(name.as_bytes()));
    let parent = candidate.parent().unwrap_or(directory);

    parent
        .join(format!(".{}", &digest[..FANOUT_WIDTH]))
        .join(format!(".{}", &digest[FANOUT_WIDTH..FANOUT_WIDTH * 2]))
        .join(format!(".{}", digest))
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_resolve_is_deterministic() {
        let root = tempfile::tempdir().unwrap();

        let first = resolve_path(root.path(), "session.user.42");
        let second = resolve_path(root.path(), "session.user.42");

        assert_eq!(first, second);
    }

    #[test]
    fn test_resolve_nests_dotted_keys() {
        let root = tempfile::tempdir().unwrap();

        let path = resolve_path(root.path(), "a.b");

        // Leading segments become directories under the root
        assert!(path.starts_with(root.path().join("a")));
    }

    #[test]
    fn test_resolve_fans_out_hashed_segments() {
        let root = tempfile::tempdir().unwrap();

        let path = resolve_path(root.path(), "token");
        let relative = path.strip_prefix(root.path()).unwrap();
        let parts: Vec<String> = relative
            .components()
            .map(|c| c.as_os_str().to_string_lossy().into_owned())
            .collect();

        assert_eq!(parts.len(), 3);
        assert_eq!(parts[0].len(), 1 + FANOUT_WIDTH);
        assert_eq!(parts[1].len(), 1 + FANOUT_WIDTH);
        assert!(parts.iter().all(|p| p.starts_with('.')));
        // Final file name is the dot-prefixed full hex digest
        assert_eq!(parts[2].len(), 1 + 64);
        // Fan-out directories are prefixes of the digest
        assert!(parts[2][1..].starts_with(&parts[0][1..]));
        assert!(parts[2][1 + FANOUT_WIDTH..].starts_with(&parts[1][1..]));
    }

    #[test]
    fn test_resolve_prefers_existing_candidate() {
        let root = tempfile::tempdir().unwrap();
        let candidate = root.path().join("a").join("b");
        fs::create_dir_all(candidate.parent().unwrap()).unwrap();
        fs::write(&candidate, b"existing").unwrap();

        let path = resolve_path(root.path(), "a.b");

        assert_eq!(path, candidate);
    }

    #[test]
    fn test_resolve_has_no_side_effects() {
        let root = tempfile::tempdir().unwrap();

        resolve_path(root.path(), "a.b.c");

        let entries: Vec<_> = fs::read_dir(root.path()).unwrap().collect();
        assert!(entries.is_empty(), "resolution must not create anything");
    }

    #[test]
    fn test_resolve_hashes_final_segment_only() {
        let root = tempfile::tempdir().unwrap();

        let first = resolve_path(root.path(), "users.session");
        let second = resolve_path(root.path(), "posts.session");

        // Same hashed filename, different parent branches
        assert_eq!(first.file_name(), second.file_name());
        assert_ne!(first, second);
        assert!(first.starts_with(root.path().join("users")));
        assert!(second.starts_with(root.path().join("posts")));
    }
}
