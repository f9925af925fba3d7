//! Error types for feed parsing.

use ouistore_types::RecordError;

/// A single record could not be parsed.
///
/// Every variant carries the raw triggering text so a skipped record
/// can be logged with enough context to diagnose the feed.
#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    /// Fewer logical fields than the tabular layout requires.
    #[error("expected at least {expected} fields, found {found}: {raw}")]
    FieldCount {
        /// Fields required by the layout.
        expected: usize,
        /// Fields actually present.
        found: usize,
        /// The offending line.
        raw: String,
    },

    /// A quoted field never closed before the end of the line.
    #[error("unterminated quoted field: {raw}")]
    UnterminatedQuote {
        /// The offending line.
        raw: String,
    },

    /// The block-type tag is not one of `MA-L`, `MA-M`, `MA-S`.
    #[error("unrecognized block type tag {tag:?}: {raw}")]
    UnknownTag {
        /// The rejected tag.
        tag: String,
        /// The offending line.
        raw: String,
    },

    /// A registry-text group has a prefix token but no organization name.
    #[error("missing organization name: {raw}")]
    MissingAssignee {
        /// The offending line.
        raw: String,
    },

    /// A range line matched neither the medium nor the small pattern.
    #[error("block type not identifiable from range: {raw}")]
    UnknownRange {
        /// The offending range line.
        raw: String,
    },

    /// The parsed fields failed canonical record validation.
    #[error("{source}: {raw}")]
    Record {
        /// The validation failure.
        #[source]
        source: RecordError,
        /// The offending input.
        raw: String,
    },
}

/// Errors yielded while reading a feed.
///
/// Parse failures are per-record and recoverable (the caller skips the
/// record); I/O failures abort the feed.
#[derive(Debug, thiserror::Error)]
pub enum FeedError {
    /// A malformed record. Skip it and continue.
    #[error("parse error: {0}")]
    Parse(#[from] ParseError),

    /// The underlying reader failed.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}
