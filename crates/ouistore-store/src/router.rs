//! Partition routing: canonical record to shard identifier.

use std::fmt;
use std::path::PathBuf;

use ouistore_types::{BlockClass, OuiRecord};

/// Identifier of one shard: a block class plus a routing key.
///
/// Maps 1:1 to a persisted file at `{class_dir}/{key}.json`. The key is
/// chosen so shards stay small while grouping records that are likely
/// to be queried together:
///
/// - large blocks fan out by the first 4 prefix digits (there is no
///   sub-block to group by);
/// - medium blocks group by the first 2 prefix digits;
/// - small blocks group by the first 2 sub-block digits.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ShardPath {
    class: BlockClass,
    key: String,
}

impl ShardPath {
    /// Build a shard path from a class and routing key.
    pub fn new(class: BlockClass, key: impl Into<String>) -> Self {
        Self {
            class,
            key: key.into(),
        }
    }

    /// Route a validated record to its shard.
    pub fn for_record(record: &OuiRecord) -> Self {
        let class = record.class();
        let key = match class {
            BlockClass::Large => &record.prefix()[..4],
            BlockClass::Medium => &record.prefix()[..2],
            BlockClass::Small => &record.sub()[..2],
        };
        Self::new(class, key)
    }

    /// The block class this shard holds.
    pub fn class(&self) -> BlockClass {
        self.class
    }

    /// The routing key.
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Path of the shard file relative to the store root.
    pub fn rel_path(&self) -> PathBuf {
        PathBuf::from(self.class.dir()).join(format!("{}.json", self.key))
    }
}

impl fmt::Display for ShardPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}.json", self.class.dir(), self.key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ouistore_types::Block;

    fn record(block: Block) -> OuiRecord {
        OuiRecord::new("AABBCC", block, "Example", None).unwrap()
    }

    #[test]
    fn test_large_routes_by_four_prefix_digits() {
        let shard = ShardPath::for_record(&record(Block::Large));
        assert_eq!(shard.class(), BlockClass::Large);
        assert_eq!(shard.key(), "AABB");
        assert_eq!(shard.to_string(), "large/AABB.json");
    }

    #[test]
    fn test_medium_routes_by_two_prefix_digits() {
        let shard = ShardPath::for_record(&record(Block::Medium { sub: "D".into() }));
        assert_eq!(shard.key(), "AA");
        assert_eq!(shard.to_string(), "med/AA.json");
    }

    #[test]
    fn test_small_routes_by_two_sub_digits() {
        let shard = ShardPath::for_record(&record(Block::Small { sub: "DEF".into() }));
        assert_eq!(shard.key(), "DE");
        assert_eq!(shard.to_string(), "small/DE.json");
    }

    #[test]
    fn test_rel_path_matches_display() {
        let shard = ShardPath::new(BlockClass::Large, "AABB");
        assert_eq!(shard.rel_path(), PathBuf::from("large/AABB.json"));
    }
}
