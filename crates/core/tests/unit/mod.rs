//! # Unit Tests
//!
//! Tests grouped by the crate module they exercise.


/// Configuration defaults, deserialization, and option validation.
pub mod config;

/// Hierarchy validation, construction, and properties over level counts.
///
/// This module aggregates tests for:
/// - Ordering and naming rules, in the order the validator applies them.
/// - Component creation and port wiring for each hierarchy shape.
/// - Generated hierarchies of every depth.
pub mod hierarchy;


/// System components, port rules, and topology checks.
pub mod soc;
