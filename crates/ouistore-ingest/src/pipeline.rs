//! Feed ingestion: parse, route, merge.

use std::fmt;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use ouistore_feed::{FeedError, RegistryReader, TabularReader};
use ouistore_store::{MergeOutcome, OuiStore};
use ouistore_types::OuiRecord;
use tracing::{debug, info, warn};

use crate::error::IngestError;

/// Which parser handles a feed file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeedFormat {
    /// Comma-delimited rows with quoted fields.
    Tabular,
    /// Blank-line-delimited registry text groups.
    RegistryText,
}

impl FeedFormat {
    /// Detect the format from a file extension: `.csv` is tabular,
    /// `.txt` is registry text. Anything else is not a feed.
    pub fn from_path(path: &Path) -> Option<Self> {
        match path.extension()?.to_str()? {
            ext if ext.eq_ignore_ascii_case("csv") => Some(FeedFormat::Tabular),
            ext if ext.eq_ignore_ascii_case("txt") => Some(FeedFormat::RegistryText),
            _ => None,
        }
    }
}

/// Counters for one ingestion run.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct IngestReport {
    /// Feed files processed.
    pub files: usize,
    /// New entries added to shards.
    pub created: usize,
    /// Existing entries overwritten with a different assignee.
    pub updated: usize,
    /// Records already present; no write performed.
    pub unchanged: usize,
    /// Malformed records skipped.
    pub skipped: usize,
}

impl IngestReport {
    /// Total records merged into the store.
    pub fn merged(&self) -> usize {
        self.created + self.updated + self.unchanged
    }

    fn count(&mut self, outcome: MergeOutcome) {
        match outcome {
            MergeOutcome::Created => self.created += 1,
            MergeOutcome::Updated => self.updated += 1,
            MergeOutcome::Unchanged => self.unchanged += 1,
        }
    }
}

impl fmt::Display for IngestReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} files, {} created, {} updated, {} unchanged, {} skipped",
            self.files, self.created, self.updated, self.unchanged, self.skipped
        )
    }
}

/// Ingest every recognized feed file directly under `dir`.
///
/// Files are visited in name order. Files whose extension matches no
/// known format are skipped with a warning.
pub fn ingest_dir(store: &OuiStore, dir: &Path) -> Result<IngestReport, IngestError> {
    let mut paths: Vec<_> = std::fs::read_dir(dir)?
        .collect::<Result<Vec<_>, _>>()?
        .into_iter()
        .map(|entry| entry.path())
        .filter(|path| path.is_file())
        .collect();
    paths.sort();

    let mut report = IngestReport::default();
    for path in paths {
        match FeedFormat::from_path(&path) {
            Some(format) => ingest_file_into(store, &path, format, &mut report)?,
            None => warn!(path = %path.display(), "unrecognized feed extension, skipping"),
        }
    }
    Ok(report)
}

/// Ingest a single feed file, detecting its format from the extension.
pub fn ingest_file(store: &OuiStore, path: &Path) -> Result<IngestReport, IngestError> {
    let format = FeedFormat::from_path(path).ok_or_else(|| {
        IngestError::Io(std::io::Error::new(
            std::io::ErrorKind::InvalidInput,
            format!("not a recognized feed file: {}", path.display()),
        ))
    })?;

    let mut report = IngestReport::default();
    ingest_file_into(store, path, format, &mut report)?;
    Ok(report)
}

fn ingest_file_into(
    store: &OuiStore,
    path: &Path,
    format: FeedFormat,
    report: &mut IngestReport,
) -> Result<(), IngestError> {
    info!(path = %path.display(), ?format, "ingesting feed");
    let reader = BufReader::new(File::open(path)?);

    match format {
        FeedFormat::Tabular => ingest_records(store, TabularReader::new(reader), report),
        FeedFormat::RegistryText => ingest_records(store, RegistryReader::new(reader), report),
    }
}

/// Merge every record from a feed iterator into the store.
///
/// Parse failures are logged with the offending text and skipped; the
/// batch continues. I/O and store failures abort.
pub fn ingest_records<I>(
    store: &OuiStore,
    records: I,
    report: &mut IngestReport,
) -> Result<(), IngestError>
where
    I: Iterator<Item = Result<OuiRecord, FeedError>>,
{
    report.files += 1;
    for result in records {
        match result {
            Ok(record) => {
                let outcome = store.merge(&record)?;
                debug!(%record, ?outcome, "merged");
                report.count(outcome);
            }
            Err(FeedError::Parse(e)) => {
                warn!(error = %e, "skipping malformed record");
                report.skipped += 1;
            }
            Err(FeedError::Io(e)) => return Err(e.into()),
        }
    }
    Ok(())
}
