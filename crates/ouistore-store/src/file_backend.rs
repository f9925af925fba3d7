//! File-based shard persistence.
//!
//! One file per shard under `{base_dir}/{class_dir}/{key}.json`.

use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::StoreError;
use crate::router::ShardPath;
use crate::traits::ShardBackend;

/// Shard backend writing one JSON file per shard.
///
/// Writes are atomic: data goes to a temporary file first, then is
/// renamed into place, so a crash mid-write never leaves a
/// half-written shard on disk.
pub struct FileBackend {
    base_dir: PathBuf,
}

impl FileBackend {
    /// Create a file backend rooted at the given directory.
    ///
    /// The directory is created if it does not exist.
    pub fn new(base_dir: impl AsRef<Path>) -> Result<Self, StoreError> {
        let base_dir = base_dir.as_ref().to_path_buf();
        std::fs::create_dir_all(&base_dir)?;
        Ok(Self { base_dir })
    }

    fn full_path(&self, shard: &ShardPath) -> PathBuf {
        self.base_dir.join(shard.rel_path())
    }
}

impl ShardBackend for FileBackend {
    fn read(&self, shard: &ShardPath) -> Result<Option<Vec<u8>>, StoreError> {
        match std::fs::read(self.full_path(shard)) {
            Ok(data) => Ok(Some(data)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(StoreError::Io(e)),
        }
    }

    fn write(&self, shard: &ShardPath, data: &[u8]) -> Result<(), StoreError> {
        let path = self.full_path(shard);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        // Atomic write: temp file in the same directory, then rename.
        let tmp_path = path.with_extension("tmp");
        std::fs::write(&tmp_path, data)?;
        std::fs::rename(&tmp_path, &path)?;

        debug!(%shard, size = data.len(), "wrote shard file");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ouistore_types::BlockClass;
    use tempfile::TempDir;

    fn make_backend() -> (FileBackend, TempDir) {
        let dir = TempDir::new().unwrap();
        let backend = FileBackend::new(dir.path()).unwrap();
        (backend, dir)
    }

    #[test]
    fn test_read_missing_returns_none() {
        let (backend, _dir) = make_backend();
        let shard = ShardPath::new(BlockClass::Large, "AABB");
        assert_eq!(backend.read(&shard).unwrap(), None);
    }

    #[test]
    fn test_write_read_roundtrip() {
        let (backend, _dir) = make_backend();
        let shard = ShardPath::new(BlockClass::Medium, "AA");
        backend.write(&shard, b"{\"AABBCC\":{\"D\":\"Org\"}}").unwrap();
        assert_eq!(
            backend.read(&shard).unwrap().as_deref(),
            Some(b"{\"AABBCC\":{\"D\":\"Org\"}}".as_slice())
        );
    }

    #[test]
    fn test_write_creates_class_directory() {
        let (backend, dir) = make_backend();
        let shard = ShardPath::new(BlockClass::Small, "DE");
        backend.write(&shard, b"{}").unwrap();
        assert!(dir.path().join("small").join("DE.json").is_file());
    }

    #[test]
    fn test_write_leaves_no_tmp_file() {
        let (backend, dir) = make_backend();
        let shard = ShardPath::new(BlockClass::Large, "AABB");
        backend.write(&shard, b"{}").unwrap();
        assert!(!dir.path().join("large").join("AABB.tmp").exists());
    }

    #[test]
    fn test_overwrite_replaces_content() {
        let (backend, _dir) = make_backend();
        let shard = ShardPath::new(BlockClass::Large, "AABB");
        backend.write(&shard, b"old").unwrap();
        backend.write(&shard, b"new").unwrap();
        assert_eq!(backend.read(&shard).unwrap().as_deref(), Some(b"new".as_slice()));
    }
}
