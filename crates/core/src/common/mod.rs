//! Common types shared across the loader, builder, and host system.
//!
//! This module provides:
//! 1. **Errors:** One error enum per configuration phase, plus the top-level `Error`.
//! 2. **Units:** Typed sizes, frequencies, and voltages parsed from gem5-style strings.

/// Error types for every configuration phase.
pub mod error;

/// Unit-suffixed hardware quantities.
pub mod units;

pub use error::{
    BuildError, ConnectError, Error, HierarchyError, LoadError, SetupError, TopologyError,
    ValueParseError,
};
pub use units::{Frequency, MemorySize, Voltage};
