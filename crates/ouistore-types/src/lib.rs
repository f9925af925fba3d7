//! Shared types for the ouistore workspace.
//!
//! This crate defines the canonical, format-independent shape of one
//! OUI assignment ([`OuiRecord`]), the block granularity variants
//! ([`Block`], [`BlockClass`]), and the normalized hardware address
//! used on the lookup path ([`HwAddr`]).

use std::fmt;
use std::str::FromStr;

/// Width of the assigned prefix in hex digits, for every block class.
pub const PREFIX_LEN: usize = 6;

/// Number of hex digits in a full hardware address.
pub const ADDR_LEN: usize = 12;

// ---------------------------------------------------------------------------
// Block granularity
// ---------------------------------------------------------------------------

/// Block granularity tag, without the sub-block payload.
///
/// Used for shard routing and for deriving lookup probes; the directory
/// layout of the store is keyed by this tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BlockClass {
    /// Largest allocation unit: the prefix covers the whole block.
    Large,
    /// Prefix plus one sub-block hex digit.
    Medium,
    /// Prefix plus three sub-block hex digits.
    Small,
}

impl BlockClass {
    /// Directory name this class's shards live under.
    pub fn dir(self) -> &'static str {
        match self {
            BlockClass::Large => "large",
            BlockClass::Medium => "med",
            BlockClass::Small => "small",
        }
    }

    /// Sub-block width in hex digits.
    pub const fn sub_len(self) -> usize {
        match self {
            BlockClass::Large => 0,
            BlockClass::Medium => 1,
            BlockClass::Small => 3,
        }
    }
}

impl fmt::Display for BlockClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.dir())
    }
}

/// Block granularity with its class-specific sub-block payload.
///
/// This is a closed set: an unrecognized block type is a parse failure,
/// not a variant, so it can never reach the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Block {
    /// No sub-block; the prefix alone identifies the assignment.
    Large,
    /// One extra hex digit narrowing the prefix.
    Medium {
        /// The sub-block digit.
        sub: String,
    },
    /// Three extra hex digits narrowing the prefix.
    Small {
        /// The sub-block digits.
        sub: String,
    },
}

impl Block {
    /// The granularity tag for this block.
    pub fn class(&self) -> BlockClass {
        match self {
            Block::Large => BlockClass::Large,
            Block::Medium { .. } => BlockClass::Medium,
            Block::Small { .. } => BlockClass::Small,
        }
    }

    /// The sub-block digits; empty for [`Block::Large`].
    pub fn sub(&self) -> &str {
        match self {
            Block::Large => "",
            Block::Medium { sub } | Block::Small { sub } => sub,
        }
    }
}

// ---------------------------------------------------------------------------
// Canonical record
// ---------------------------------------------------------------------------

/// Reasons an [`OuiRecord`] can fail validation.
#[derive(Debug, thiserror::Error)]
pub enum RecordError {
    /// The prefix is not exactly six hex digits.
    #[error("invalid prefix {value:?}: expected {PREFIX_LEN} hex digits")]
    BadPrefix {
        /// The rejected prefix.
        value: String,
    },

    /// The sub-block width does not match the block class.
    #[error("invalid {class} sub-block {value:?}: expected {expected} hex digits")]
    BadSubBlock {
        /// The block class being validated against.
        class: BlockClass,
        /// The rejected sub-block.
        value: String,
        /// The width the class requires.
        expected: usize,
    },

    /// The assignee is empty after trimming.
    #[error("missing assignee")]
    EmptyAssignee,
}

/// One canonical OUI assignment, independent of the source feed format.
///
/// Construction via [`OuiRecord::new`] validates the prefix and
/// sub-block widths and rejects empty assignees, so every value of this
/// type is safe to persist. Hex digits are normalized to uppercase.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OuiRecord {
    prefix: String,
    block: Block,
    assignee: String,
    address: Option<String>,
}

impl OuiRecord {
    /// Validate and build a record.
    pub fn new(
        prefix: &str,
        block: Block,
        assignee: &str,
        address: Option<&str>,
    ) -> Result<Self, RecordError> {
        if prefix.len() != PREFIX_LEN || !is_hex(prefix) {
            return Err(RecordError::BadPrefix {
                value: prefix.to_string(),
            });
        }

        let expected = block.class().sub_len();
        let sub = block.sub();
        if sub.len() != expected || !is_hex(sub) {
            return Err(RecordError::BadSubBlock {
                class: block.class(),
                value: sub.to_string(),
                expected,
            });
        }

        let assignee = assignee.trim();
        if assignee.is_empty() {
            return Err(RecordError::EmptyAssignee);
        }

        let block = match block {
            Block::Large => Block::Large,
            Block::Medium { sub } => Block::Medium {
                sub: sub.to_ascii_uppercase(),
            },
            Block::Small { sub } => Block::Small {
                sub: sub.to_ascii_uppercase(),
            },
        };

        Ok(Self {
            prefix: prefix.to_ascii_uppercase(),
            block,
            assignee: assignee.to_string(),
            address: address.map(|a| a.trim().to_string()).filter(|a| !a.is_empty()),
        })
    }

    /// The assigned prefix, six uppercase hex digits.
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// The block granularity and sub-block digits.
    pub fn block(&self) -> &Block {
        &self.block
    }

    /// The granularity tag.
    pub fn class(&self) -> BlockClass {
        self.block.class()
    }

    /// The sub-block digits; empty for large blocks.
    pub fn sub(&self) -> &str {
        self.block.sub()
    }

    /// The owning organization.
    pub fn assignee(&self) -> &str {
        &self.assignee
    }

    /// Postal address, when the source feed carries one.
    pub fn address(&self) -> Option<&str> {
        self.address.as_deref()
    }
}

impl fmt::Display for OuiRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{} {}", self.prefix, self.class(), self.assignee)
    }
}

fn is_hex(s: &str) -> bool {
    s.bytes().all(|b| b.is_ascii_hexdigit())
}

// ---------------------------------------------------------------------------
// Hardware address
// ---------------------------------------------------------------------------

/// Error parsing a hardware address string.
#[derive(Debug, thiserror::Error)]
#[error("invalid hardware address {0:?}: expected {ADDR_LEN} hex digits")]
pub struct AddrError(pub String);

/// A 48-bit hardware address, normalized to twelve uppercase hex digits.
///
/// Accepts the usual separator conventions on parse (`AA:BB:CC:DD:EE:FF`,
/// `AA-BB-CC-DD-EE-FF`, `AABB.CCDD.EEFF`, or bare digits).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct HwAddr(String);

impl HwAddr {
    /// The address as twelve contiguous uppercase hex digits.
    pub fn digits(&self) -> &str {
        &self.0
    }
}

impl FromStr for HwAddr {
    type Err = AddrError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let digits: String = s
            .chars()
            .filter(|c| !matches!(c, ':' | '-' | '.'))
            .collect();
        if digits.len() != ADDR_LEN || !is_hex(&digits) {
            return Err(AddrError(s.to_string()));
        }
        Ok(Self(digits.to_ascii_uppercase()))
    }
}

impl fmt::Display for HwAddr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
