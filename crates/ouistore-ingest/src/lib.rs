//! Ingestion pipeline for OUI assignment feeds.
//!
//! Orchestrates the parse → route → merge path: for each feed file,
//! every record the applicable parser yields is merged into the
//! partitioned store. Malformed records are logged and skipped;
//! storage failures abort the run.

mod error;
mod pipeline;

pub use error::IngestError;
pub use pipeline::{FeedFormat, IngestReport, ingest_dir, ingest_file, ingest_records};
