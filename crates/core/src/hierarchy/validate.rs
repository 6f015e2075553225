//! Validation pass for hierarchy records.
//!
//! Validation is pure: it reads a `HierarchySpec` and either returns a
//! `ValidatedHierarchy` with every parameter resolved, or the first rule the
//! record breaks. Checks run in this order:
//! 1. **Level count zero:** the entry list must be empty.
//! 2. **L1 entries:** index 0 is `L1I`, index 1 is `L1D`.
//! 3. **Entry count:** exactly `level_count + 1` entries.
//! 4. **Level names:** index `i >= 2` is named `L<i>`.
//! 5. **Parameters:** L1 gaps take baseline values; other levels must be complete and sane.

use crate::common::error::HierarchyError;
use crate::config::{CacheParams, Config};

use super::spec::{CacheKind, CacheLevelSpec, HierarchySpec, L1D_NAME, L1I_NAME, parse_level_name};

/// Options the validator needs from the surrounding system.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HierarchyOptions {
    /// Cache line size in bytes.
    pub cache_line_size: u64,
}

impl Default for HierarchyOptions {
    fn default() -> Self {
        Self::from(&Config::default())
    }
}

impl From<&Config> for HierarchyOptions {
    fn from(config: &Config) -> Self {
        Self {
            cache_line_size: config.system.cache_line_size,
        }
    }
}

/// A validated entry with its level and concrete parameters.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct ResolvedCache {
    /// Classified level.
    pub kind: CacheKind,
    /// Parameters the cache component is built from.
    pub params: CacheParams,
}

/// A hierarchy that passed validation.
///
/// `levels()[i]` is built from `entries[i]` of the source record.
#[derive(Debug, Clone, PartialEq, Eq, Default, serde::Serialize)]
pub struct ValidatedHierarchy {
    levels: Vec<ResolvedCache>,
}

impl ValidatedHierarchy {
    /// Number of numbered cache levels (0 when there are no caches).
    pub fn level_count(&self) -> usize {
        self.levels.len().saturating_sub(1)
    }

    /// Whether the hierarchy has no caches.
    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }

    /// Resolved entries in hierarchy order.
    pub fn levels(&self) -> &[ResolvedCache] {
        &self.levels
    }
}

/// Validates a hierarchy record and resolves every cache's parameters.
///
/// # Errors
///
/// Returns the first broken rule, in the order listed in the module docs.
pub fn validate(
    spec: &HierarchySpec,
    options: &HierarchyOptions,
) -> Result<ValidatedHierarchy, HierarchyError> {
    let level_count = spec.level_count;

    if level_count == 0 {
        if !spec.entries.is_empty() {
            return Err(HierarchyError::CountMismatch {
                level_count,
                expected: 0,
                found: spec.entries.len(),
            });
        }
        tracing::info!("no cache levels configured; CPU ports attach to the memory bus");
        return Ok(ValidatedHierarchy::default());
    }

    let first = spec.entries.first();
    if first.map(|e| e.kind.as_str()) != Some(L1I_NAME) {
        return Err(HierarchyError::InvalidFirstEntry {
            found: first.map(|e| e.kind.clone()),
        });
    }
    let second = spec.entries.get(1);
    if second.map(|e| e.kind.as_str()) != Some(L1D_NAME) {
        return Err(HierarchyError::InvalidSecondEntry {
            found: second.map(|e| e.kind.clone()),
        });
    }

    let expected = level_count
        .checked_add(1)
        .ok_or(HierarchyError::LevelCountOverflow { level_count })?;
    if spec.entries.len() != expected {
        return Err(HierarchyError::CountMismatch {
            level_count,
            expected,
            found: spec.entries.len(),
        });
    }

    let mut kinds = Vec::with_capacity(expected);
    kinds.push(CacheKind::L1Instruction);
    kinds.push(CacheKind::L1Data);
    for (index, entry) in spec.entries.iter().enumerate().skip(2) {
        let got = parse_level_name(&entry.kind).ok_or_else(|| {
            HierarchyError::MalformedLevelName {
                index,
                name: entry.kind.clone(),
            }
        })?;
        if got != index {
            return Err(HierarchyError::OutOfOrderLevel {
                index,
                expected: index,
                got,
            });
        }
        kinds.push(CacheKind::Level(got));
    }

    let levels = spec
        .entries
        .iter()
        .zip(kinds)
        .enumerate()
        .map(|(index, (entry, kind))| resolve(index, kind, entry, options))
        .collect::<Result<Vec<_>, _>>()?;

    tracing::info!(levels = level_count, caches = levels.len(), "cache hierarchy validated");
    Ok(ValidatedHierarchy { levels })
}

/// Resolves one entry's parameters and checks they describe a real cache.
fn resolve(
    index: usize,
    kind: CacheKind,
    entry: &CacheLevelSpec,
    options: &HierarchyOptions,
) -> Result<ResolvedCache, HierarchyError> {
    let params = if kind.is_l1() {
        let base = CacheParams::l1_baseline();
        if entry.mshrs.is_none() {
            tracing::debug!(index, cache = %kind, mshrs = base.mshrs, "using baseline MSHR count");
        }
        CacheParams {
            size: entry.size.unwrap_or(base.size),
            assoc: entry.assoc.unwrap_or(base.assoc),
            tag_latency: entry.tag_latency.unwrap_or(base.tag_latency),
            data_latency: entry.data_latency.unwrap_or(base.data_latency),
            response_latency: entry.response_latency.unwrap_or(base.response_latency),
            mshrs: entry.mshrs.unwrap_or(base.mshrs),
            tgts_per_mshr: entry.tgts_per_mshr.unwrap_or(base.tgts_per_mshr),
            clusivity: entry.clusivity.unwrap_or(base.clusivity),
            writeback_clean: entry.writeback_clean.unwrap_or(base.writeback_clean),
        }
    } else {
        let missing = |field: &'static str| HierarchyError::MissingParameter {
            index,
            name: entry.kind.clone(),
            field,
        };
        CacheParams {
            size: entry.size.ok_or_else(|| missing("size"))?,
            assoc: entry.assoc.ok_or_else(|| missing("assoc"))?,
            tag_latency: entry.tag_latency.ok_or_else(|| missing("tag_latency"))?,
            data_latency: entry.data_latency.ok_or_else(|| missing("data_latency"))?,
            response_latency: entry
                .response_latency
                .ok_or_else(|| missing("response_latency"))?,
            mshrs: entry.mshrs.ok_or_else(|| missing("mshrs"))?,
            tgts_per_mshr: entry.tgts_per_mshr.ok_or_else(|| missing("tgts_per_mshr"))?,
            clusivity: entry.clusivity.ok_or_else(|| missing("clusivity"))?,
            writeback_clean: entry
                .writeback_clean
                .ok_or_else(|| missing("writeback_clean"))?,
        }
    };

    check_geometry(index, &entry.kind, &params, options.cache_line_size)?;
    Ok(ResolvedCache { kind, params })
}

fn check_geometry(
    index: usize,
    name: &str,
    params: &CacheParams,
    line_size: u64,
) -> Result<(), HierarchyError> {
    let invalid = |field: &'static str, reason: String| HierarchyError::InvalidParameter {
        index,
        name: name.to_string(),
        field,
        reason,
    };

    if params.size.bytes() == 0 {
        return Err(invalid("size", "capacity must be non-zero".to_string()));
    }
    if params.assoc == 0 {
        return Err(invalid("assoc", "associativity must be non-zero".to_string()));
    }
    if params.mshrs == 0 {
        return Err(invalid("mshrs", "at least one MSHR is required".to_string()));
    }
    if params.tgts_per_mshr == 0 {
        return Err(invalid(
            "tgts_per_mshr",
            "each MSHR needs at least one target".to_string(),
        ));
    }
    if params.sets(line_size).is_none() {
        return Err(invalid(
            "size",
            format!(
                "{} is not a whole number of {}-way sets of {line_size}-byte lines",
                params.size, params.assoc
            ),
        ));
    }
    Ok(())
}
