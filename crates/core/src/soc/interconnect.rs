//! Crossbar interconnects.
//!
//! This module models the two crossbar flavours the system uses:
//! 1. **System crossbar:** The memory bus. Every cacheless requestor and the last-level
//!    crossbar feed into it, and it fans out to the memory controllers.
//! 2. **L2 crossbar:** Joins the caches of one level to the cache (or memory bus) below.
//!
//! Both expose a vector slave port facing the CPU and a vector master port facing memory.

use std::fmt;

use serde::Serialize;

/// Crossbar flavour; selects the default width and latencies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CrossbarKind {
    /// System memory bus.
    System,
    /// Crossbar between cache levels.
    L2,
}

impl fmt::Display for CrossbarKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::System => f.write_str("SystemXBar"),
            Self::L2 => f.write_str("L2XBar"),
        }
    }
}

/// A crossbar component with its timing parameters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Crossbar {
    /// Flavour.
    pub kind: CrossbarKind,
    /// Datapath width in bytes.
    pub width_bytes: u64,
    /// Cycles to accept a request at the frontend.
    pub frontend_latency: u64,
    /// Cycles to forward a request to the destination layer.
    pub forward_latency: u64,
    /// Cycles to return a response.
    pub response_latency: u64,
    /// Cycles to return a snoop response.
    pub snoop_response_latency: u64,
}

impl Crossbar {
    /// Creates a crossbar with the default parameters for its flavour.
    ///
    /// The memory bus is narrower and slower than the crossbars between cache
    /// levels, which sit closer to the CPU.
    pub const fn new(kind: CrossbarKind) -> Self {
        match kind {
            CrossbarKind::System => Self {
                kind,
                width_bytes: 16,
                frontend_latency: 3,
                forward_latency: 4,
                response_latency: 2,
                snoop_response_latency: 4,
            },
            CrossbarKind::L2 => Self {
                kind,
                width_bytes: 32,
                frontend_latency: 1,
                forward_latency: 0,
                response_latency: 1,
                snoop_response_latency: 1,
            },
        }
    }

    /// Returns the number of cycles to move the given number of bytes across this crossbar.
    ///
    /// Cycles = frontend plus forward latency plus ceiling(bytes / width_bytes) beats.
    pub const fn transit_cycles(&self, bytes: u64) -> u64 {
        let beats = bytes.div_ceil(self.width_bytes);
        self.frontend_latency + self.forward_latency + beats
    }
}
