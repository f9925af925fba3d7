//! A [`ShardBackend`] wrapper that counts IO operations.
//!
//! `CountingBackend` wraps any backend and tracks how many reads and
//! writes pass through it. Tests use it to assert the minimal-write
//! policy: re-merging unchanged records must not hit the backend's
//! write path at all.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use crate::error::StoreError;
use crate::router::ShardPath;
use crate::traits::ShardBackend;

/// Pass-through backend wrapper with read/write counters.
pub struct CountingBackend {
    inner: Arc<dyn ShardBackend>,
    reads: AtomicU64,
    writes: AtomicU64,
}

impl CountingBackend {
    /// Wrap an existing backend.
    pub fn new(inner: Arc<dyn ShardBackend>) -> Self {
        Self {
            inner,
            reads: AtomicU64::new(0),
            writes: AtomicU64::new(0),
        }
    }

    /// Reads performed so far.
    pub fn reads(&self) -> u64 {
        self.reads.load(Ordering::Relaxed)
    }

    /// Writes performed so far.
    pub fn writes(&self) -> u64 {
        self.writes.load(Ordering::Relaxed)
    }
}

impl ShardBackend for CountingBackend {
    fn read(&self, shard: &ShardPath) -> Result<Option<Vec<u8>>, StoreError> {
        self.reads.fetch_add(1, Ordering::Relaxed);
        self.inner.read(shard)
    }

    fn write(&self, shard: &ShardPath, data: &[u8]) -> Result<(), StoreError> {
        self.writes.fetch_add(1, Ordering::Relaxed);
        self.inner.write(shard, data)
    }
}
