//! System components and their assembly.
//!
//! This module organizes everything the cache hierarchy is attached to:
//! the system object, the CPU, the memory bus, crossbars, memory controllers,
//! and the `Host` interface the hierarchy builder drives.

/// System builder and the top-level `System` type.
pub mod builder;

/// Component kinds owned by the system.
pub mod component;

/// Crossbar interconnects.
pub mod interconnect;

/// Address ranges and memory controllers.
pub mod memory;

/// Component ids, ports, and connections.
pub mod port;

/// Connectivity checks and topology reports.
pub mod topology;

/// Host interface consumed by the hierarchy builder.
pub mod traits;

pub use builder::System;
pub use port::{ComponentId, CpuPorts, Port, PortRole};
pub use topology::TopologyReport;
pub use traits::Host;
