//! Partitioned, file-backed storage for OUI assignments.
//!
//! This crate defines the [`ShardBackend`] trait for persisting shard
//! files, two concrete backends, and the store itself:
//!
//! - [`MemoryBackend`] — in-memory storage backed by a `RwLock<HashMap>`.
//! - [`FileBackend`] — one JSON file per shard with atomic writes.
//! - [`OuiStore`] — load-merge-write over one shard at a time, plus
//!   the address lookup that probes granularities from most to least
//!   specific.

mod counting_backend;
mod error;
mod file_backend;
mod memory_backend;
mod router;
mod store;
mod traits;

pub use counting_backend::CountingBackend;
pub use error::StoreError;
pub use file_backend::FileBackend;
pub use memory_backend::MemoryBackend;
pub use router::ShardPath;
pub use store::{MergeOutcome, OuiStore};
pub use traits::ShardBackend;
