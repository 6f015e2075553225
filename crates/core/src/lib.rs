//! Declarative cache hierarchy builder for trace-driven system simulation.
//!
//! This crate turns a JSON description of a cache hierarchy into a wired system graph:
//! 1. **Configuration:** System, memory, and trace options with defaults (`config`).
//! 2. **Hierarchy:** Document records, ordering and naming validation, and construction
//!    of caches and crossbars onto a host (`hierarchy`).
//! 3. **SoC:** The system that owns every component, the memory bus, memory controllers,
//!    and port connection rules (`soc`).
//! 4. **Runs:** Document loading and end-to-end platform assembly (`sim`).

/// Error types and unit-suffixed quantities.
pub mod common;
/// System configuration (defaults, enums, cache parameters).
pub mod config;
/// Trace replay CPU.
pub mod core;
/// Cache hierarchy records, validation, and construction.
pub mod hierarchy;
/// Document loading and platform assembly.
pub mod sim;
/// System components, ports, and topology checks.
pub mod soc;

/// Root configuration type; use `Config::default()` or deserialize from JSON.
pub use crate::config::Config;
/// Top-level error of a configuration run.
pub use crate::common::error::Error;
/// Validate-then-build entry point for a hierarchy.
pub use crate::hierarchy::build_hierarchy;
/// A fully assembled and checked system.
pub use crate::sim::Platform;
/// The system that owns every component; construct with `System::new`.
pub use crate::soc::System;
