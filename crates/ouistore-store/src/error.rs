//! Error types for shard storage operations.

/// Errors that can occur during shard storage operations.
///
/// None of these are recovered in place: a failed read or write aborts
/// the merge for that shard, since continuing after a partial write
/// could leave the shard inconsistent.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// An I/O error occurred.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// A shard's mapping could not be serialized.
    #[error("shard encode failed: {0}")]
    Encode(#[source] serde_json::Error),

    /// A shard file on disk is not valid JSON for its class.
    #[error("corrupt shard {shard}: {source}")]
    Corrupt {
        /// Relative path of the offending shard.
        shard: String,
        /// The underlying decode failure.
        #[source]
        source: serde_json::Error,
    },
}
