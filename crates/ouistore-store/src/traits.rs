//! Core trait for shard persistence backends.

use crate::error::StoreError;
use crate::router::ShardPath;

/// Raw byte-level persistence for shard files.
///
/// Backends only move bytes; all merge semantics live in
/// [`OuiStore`](crate::OuiStore). Implementations must be `Send + Sync`
/// so a store handle can be shared, but the store itself never issues
/// concurrent operations against the same shard.
pub trait ShardBackend: Send + Sync {
    /// Read a shard's current content. `None` if it does not exist yet.
    fn read(&self, shard: &ShardPath) -> Result<Option<Vec<u8>>, StoreError>;

    /// Write a shard's content, creating it (and any parent directory)
    /// as needed.
    fn write(&self, shard: &ShardPath, data: &[u8]) -> Result<(), StoreError>;
}
