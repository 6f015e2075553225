//! Cache hierarchy description, validation, and construction.
//!
//! A hierarchy is described as a level count plus an ordered list of cache
//! entries: `L1I`, `L1D`, then `L2` through `L<n>`. This module provides:
//! 1. **Records:** The typed form of the JSON document (`spec`).
//! 2. **Validation:** Ordering and naming rules plus parameter resolution (`validate`).
//! 3. **Construction:** Caches and crossbars created and wired on a `Host` (`builder`).

/// Component construction and wiring.
pub mod builder;
/// Hierarchy records as read from a document.
pub mod spec;
/// Ordering, naming, and parameter checks.
pub mod validate;

pub use builder::{BuiltHierarchy, HierarchyBuilder, build_hierarchy};
pub use spec::{CacheKind, CacheLevelSpec, HierarchyDocument, HierarchySpec};
pub use validate::{HierarchyOptions, ResolvedCache, ValidatedHierarchy, validate};
