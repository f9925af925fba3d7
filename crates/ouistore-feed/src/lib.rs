//! Feed format parsers for OUI assignment records.
//!
//! Two structurally different source feeds normalize into the same
//! [`OuiRecord`](ouistore_types::OuiRecord):
//!
//! - [`TabularReader`] — comma-delimited rows with quoted fields.
//! - [`RegistryReader`] — blank-line-delimited paired-line groups with
//!   base-16 range lines.
//!
//! Both readers yield per-record results so a malformed record can be
//! skipped without aborting the feed.

mod error;
pub mod registry;
pub mod tabular;

pub use error::{FeedError, ParseError};
pub use registry::RegistryReader;
pub use tabular::TabularReader;
