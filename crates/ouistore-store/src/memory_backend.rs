//! In-memory shard persistence.

use std::collections::HashMap;
use std::sync::RwLock;

use tracing::debug;

use crate::error::StoreError;
use crate::router::ShardPath;
use crate::traits::ShardBackend;

/// Shard backend keeping everything in a `RwLock<HashMap>`.
///
/// Useful for tests and for throwaway runs where persistence is not
/// wanted.
#[derive(Default)]
pub struct MemoryBackend {
    shards: RwLock<HashMap<ShardPath, Vec<u8>>>,
}

impl MemoryBackend {
    /// Create an empty in-memory backend.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of shards currently held.
    pub fn shard_count(&self) -> usize {
        self.shards.read().expect("lock poisoned").len()
    }
}

impl ShardBackend for MemoryBackend {
    fn read(&self, shard: &ShardPath) -> Result<Option<Vec<u8>>, StoreError> {
        let map = self.shards.read().expect("lock poisoned");
        Ok(map.get(shard).cloned())
    }

    fn write(&self, shard: &ShardPath, data: &[u8]) -> Result<(), StoreError> {
        let mut map = self.shards.write().expect("lock poisoned");
        debug!(%shard, size = data.len(), "storing shard in memory");
        map.insert(shard.clone(), data.to_vec());
        Ok(())
    }
}
