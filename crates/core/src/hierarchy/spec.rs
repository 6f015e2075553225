//! Cache hierarchy records as read from a hierarchy document.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::common::error::LoadError;
use crate::common::units::MemorySize;
use crate::config::Clusivity;

/// `type` of the L1 instruction cache entry.
pub const L1I_NAME: &str = "L1I";

/// `type` of the L1 data cache entry.
pub const L1D_NAME: &str = "L1D";

/// One entry of the `caches` list.
///
/// Every parameter is optional at this stage. Validation decides which
/// omissions are filled from defaults and which are errors.
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct CacheLevelSpec {
    /// Level tag: `L1I`, `L1D`, or `L<n>`.
    #[serde(rename = "type")]
    pub kind: String,
    /// Capacity.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<MemorySize>,
    /// Associativity.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assoc: Option<u32>,
    /// Tag latency in cycles.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tag_latency: Option<u32>,
    /// Data latency in cycles.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_latency: Option<u32>,
    /// Response latency in cycles.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub response_latency: Option<u32>,
    /// Miss-status holding registers.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mshrs: Option<u32>,
    /// Targets per MSHR.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tgts_per_mshr: Option<u32>,
    /// Inclusion policy.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub clusivity: Option<Clusivity>,
    /// Write back clean lines on eviction.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub writeback_clean: Option<bool>,
}

impl CacheLevelSpec {
    /// Creates an entry with the given `type` and no parameters.
    pub fn named(kind: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            ..Self::default()
        }
    }
}

/// The full hierarchy record: a level count and its ordered entries.
///
/// `level_count` counts numbered levels, so a two-level hierarchy has three
/// entries (L1I, L1D, L2). A level count of zero means no caches at all.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct HierarchySpec {
    /// Number of cache levels.
    pub level_count: usize,
    /// Entries in hierarchy order.
    pub entries: Vec<CacheLevelSpec>,
}

impl HierarchySpec {
    /// Creates a record from its parts.
    pub const fn new(level_count: usize, entries: Vec<CacheLevelSpec>) -> Self {
        Self {
            level_count,
            entries,
        }
    }
}

/// Document form of a hierarchy, before the level count is range-checked.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct HierarchyDocument {
    /// Declared number of levels; may be negative in a malformed document.
    #[serde(rename = "num_levels", alias = "levelCount", alias = "level_count")]
    pub num_levels: i64,
    /// Cache entries; may be omitted when there are no levels.
    #[serde(default)]
    pub caches: Vec<CacheLevelSpec>,
}

impl TryFrom<HierarchyDocument> for HierarchySpec {
    type Error = LoadError;

    fn try_from(doc: HierarchyDocument) -> Result<Self, Self::Error> {
        let level_count = usize::try_from(doc.num_levels)
            .map_err(|_| LoadError::InvalidLevelCount(doc.num_levels))?;
        Ok(Self::new(level_count, doc.caches))
    }
}

/// Classified level of a validated entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum CacheKind {
    /// First-level instruction cache.
    L1Instruction,
    /// First-level data cache.
    L1Data,
    /// Unified cache at level `n >= 2`.
    Level(usize),
}

impl CacheKind {
    /// Numeric level; both L1 caches are level 1.
    pub const fn level(self) -> usize {
        match self {
            Self::L1Instruction | Self::L1Data => 1,
            Self::Level(n) => n,
        }
    }

    /// Whether this is one of the two first-level caches.
    pub const fn is_l1(self) -> bool {
        matches!(self, Self::L1Instruction | Self::L1Data)
    }
}

impl fmt::Display for CacheKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::L1Instruction => f.write_str(L1I_NAME),
            Self::L1Data => f.write_str(L1D_NAME),
            Self::Level(n) => write!(f, "L{n}"),
        }
    }
}

/// Parses a numbered level name of the form `L<n>`.
///
/// Returns `None` unless the name is `L` followed only by ASCII digits
/// forming a positive integer.
pub fn parse_level_name(name: &str) -> Option<usize> {
    let digits = name.strip_prefix('L')?;
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    digits.parse::<usize>().ok().filter(|&level| level > 0)
}
