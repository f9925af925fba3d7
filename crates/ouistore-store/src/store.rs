//! Load-merge-write logic over partitioned shard files.

use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Arc;

use ouistore_types::{BlockClass, HwAddr, OuiRecord, PREFIX_LEN};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::debug;

use crate::error::StoreError;
use crate::file_backend::FileBackend;
use crate::memory_backend::MemoryBackend;
use crate::router::ShardPath;
use crate::traits::ShardBackend;

/// Large shards map prefix directly to assignee.
type FlatShard = BTreeMap<String, String>;

/// Medium and small shards map prefix to a sub-block table.
type NestedShard = BTreeMap<String, BTreeMap<String, String>>;

/// What a merge did to the target shard.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MergeOutcome {
    /// A new entry was added (possibly creating the shard itself).
    Created,
    /// An existing entry's assignee was overwritten.
    Updated,
    /// The entry was already present with the same assignee; no write
    /// was performed.
    Unchanged,
}

/// Handle over the partitioned OUI assignment store.
///
/// Each merge reads, mutates, and rewrites exactly one shard, and
/// persists it only when the content actually changed, so re-ingesting
/// the same feeds converges without disk writes.
///
/// One `OuiStore` issues no concurrent operations. If callers
/// parallelize ingestion they must keep at most one writer per shard
/// at a time; merges targeting different shards are independent.
pub struct OuiStore {
    backend: Arc<dyn ShardBackend>,
}

impl OuiStore {
    /// Build a store over an existing backend.
    pub fn new(backend: Arc<dyn ShardBackend>) -> Self {
        Self { backend }
    }

    /// Open a file-backed store rooted at the given directory.
    pub fn open(dir: impl AsRef<Path>) -> Result<Self, StoreError> {
        Ok(Self::new(Arc::new(FileBackend::new(dir)?)))
    }

    /// Build a store that keeps everything in memory.
    pub fn in_memory() -> Self {
        Self::new(Arc::new(MemoryBackend::new()))
    }

    /// Merge one record into its shard.
    ///
    /// Idempotent: applying the same record twice leaves identical
    /// shard bytes and the second application performs no write.
    pub fn merge(&self, record: &OuiRecord) -> Result<MergeOutcome, StoreError> {
        let shard = ShardPath::for_record(record);
        let outcome = match record.class() {
            BlockClass::Large => self.merge_flat(&shard, record)?,
            BlockClass::Medium | BlockClass::Small => self.merge_nested(&shard, record)?,
        };
        debug!(%shard, prefix = record.prefix(), ?outcome, "merged record");
        Ok(outcome)
    }

    /// Resolve a hardware address to its assignee, if any.
    ///
    /// Probes shards in order of decreasing specificity (small, then
    /// medium, then large) and returns the first exact match; the
    /// store makes no guarantee about which granularity holds a match.
    pub fn lookup(&self, addr: &HwAddr) -> Result<Option<String>, StoreError> {
        let digits = addr.digits();
        let prefix = &digits[..PREFIX_LEN];

        let small = ShardPath::new(BlockClass::Small, &digits[6..8]);
        if let Some(map) = self.load::<NestedShard>(&small)?
            && let Some(name) = map.get(prefix).and_then(|subs| subs.get(&digits[6..9]))
        {
            return Ok(Some(name.clone()));
        }

        let medium = ShardPath::new(BlockClass::Medium, &digits[..2]);
        if let Some(map) = self.load::<NestedShard>(&medium)?
            && let Some(name) = map.get(prefix).and_then(|subs| subs.get(&digits[6..7]))
        {
            return Ok(Some(name.clone()));
        }

        let large = ShardPath::new(BlockClass::Large, &digits[..4]);
        if let Some(map) = self.load::<FlatShard>(&large)?
            && let Some(name) = map.get(prefix)
        {
            return Ok(Some(name.clone()));
        }

        Ok(None)
    }

    fn merge_flat(&self, shard: &ShardPath, record: &OuiRecord) -> Result<MergeOutcome, StoreError> {
        // A missing shard is written unconditionally; there is nothing
        // to diff against.
        let Some(bytes) = self.backend.read(shard)? else {
            let map = FlatShard::from([(record.prefix().to_string(), record.assignee().to_string())]);
            self.persist(shard, &map)?;
            return Ok(MergeOutcome::Created);
        };

        let mut map: FlatShard = decode(shard, &bytes)?;
        let outcome = match map.get(record.prefix()) {
            Some(current) if current == record.assignee() => MergeOutcome::Unchanged,
            Some(_) => {
                map.insert(record.prefix().to_string(), record.assignee().to_string());
                MergeOutcome::Updated
            }
            None => {
                map.insert(record.prefix().to_string(), record.assignee().to_string());
                MergeOutcome::Created
            }
        };

        if outcome != MergeOutcome::Unchanged {
            self.persist(shard, &map)?;
        }
        Ok(outcome)
    }

    fn merge_nested(
        &self,
        shard: &ShardPath,
        record: &OuiRecord,
    ) -> Result<MergeOutcome, StoreError> {
        let Some(bytes) = self.backend.read(shard)? else {
            let map = NestedShard::from([(
                record.prefix().to_string(),
                BTreeMap::from([(record.sub().to_string(), record.assignee().to_string())]),
            )]);
            self.persist(shard, &map)?;
            return Ok(MergeOutcome::Created);
        };

        let mut map: NestedShard = decode(shard, &bytes)?;
        let subs = map.entry(record.prefix().to_string()).or_default();
        let outcome = match subs.get(record.sub()) {
            Some(current) if current == record.assignee() => MergeOutcome::Unchanged,
            Some(_) => {
                subs.insert(record.sub().to_string(), record.assignee().to_string());
                MergeOutcome::Updated
            }
            None => {
                subs.insert(record.sub().to_string(), record.assignee().to_string());
                MergeOutcome::Created
            }
        };

        if outcome != MergeOutcome::Unchanged {
            self.persist(shard, &map)?;
        }
        Ok(outcome)
    }

    fn load<T: DeserializeOwned>(&self, shard: &ShardPath) -> Result<Option<T>, StoreError> {
        match self.backend.read(shard)? {
            Some(bytes) => Ok(Some(decode(shard, &bytes)?)),
            None => Ok(None),
        }
    }

    fn persist<T: Serialize>(&self, shard: &ShardPath, map: &T) -> Result<(), StoreError> {
        let bytes = serde_json::to_vec(map).map_err(StoreError::Encode)?;
        self.backend.write(shard, &bytes)
    }
}

fn decode<T: DeserializeOwned>(shard: &ShardPath, bytes: &[u8]) -> Result<T, StoreError> {
    serde_json::from_slice(bytes).map_err(|source| StoreError::Corrupt {
        shard: shard.to_string(),
        source,
    })
}
