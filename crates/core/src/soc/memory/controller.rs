//! Memory controller components.
//!
//! This module provides:
//! 1. **Fixed timing:** Every access takes the same number of cycles.
//! 2. **DRAM timing:** Row-buffer parameters (CAS, RAS, precharge) for a DRAM channel.
//!
//! Each controller serves one `AddrRange` and exposes a single responder port
//! that the memory bus master connects to.

use serde::Serialize;

use super::AddrRange;
use crate::config::{MemoryConfig, MemoryController};

/// CAS latency in DRAM cycles.
const T_CAS: u64 = 14;

/// RAS latency in DRAM cycles.
const T_RAS: u64 = 14;

/// Precharge latency in DRAM cycles.
const T_PRE: u64 = 14;

/// Access timing of a controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "model", rename_all = "snake_case")]
pub enum ControllerTiming {
    /// Fixed latency per access.
    Fixed {
        /// Cycles per access.
        latency: u64,
    },
    /// Row-buffer DRAM timing.
    Dram {
        /// Column access strobe latency.
        t_cas: u64,
        /// Row access strobe latency.
        t_ras: u64,
        /// Precharge latency.
        t_pre: u64,
    },
}

impl ControllerTiming {
    /// Worst-case cycles for one access (row miss for DRAM).
    pub const fn worst_case_latency(&self) -> u64 {
        match *self {
            Self::Fixed { latency } => latency,
            Self::Dram { t_cas, t_ras, t_pre } => t_pre + t_ras + t_cas,
        }
    }
}

/// A memory controller serving one channel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MemCtrl {
    /// Channel number.
    pub channel: usize,
    /// Addresses this controller serves.
    pub range: AddrRange,
    /// Access timing.
    pub timing: ControllerTiming,
}

impl MemCtrl {
    /// Creates the controller for `channel` from the memory configuration.
    pub const fn new(config: &MemoryConfig, channel: usize, range: AddrRange) -> Self {
        let timing = match config.controller {
            MemoryController::Simple => ControllerTiming::Fixed {
                latency: config.latency,
            },
            MemoryController::Dram => ControllerTiming::Dram {
                t_cas: T_CAS,
                t_ras: T_RAS,
                t_pre: T_PRE,
            },
        };
        Self {
            channel,
            range,
            timing,
        }
    }
}
