//! Error types for the ingestion pipeline.

use ouistore_store::StoreError;

/// Errors that abort an ingestion run.
///
/// Per-record parse failures never become an `IngestError`; they are
/// logged and skipped. Only store and I/O failures propagate, since a
/// partial shard write could leave the store inconsistent.
#[derive(Debug, thiserror::Error)]
pub enum IngestError {
    /// Failed to read or write a shard.
    #[error("store error: {0}")]
    Store(#[from] StoreError),

    /// Failed to read a feed file or directory.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}
