//! Trace replay CPU.
//!
//! The trace CPU replays an instruction fetch trace and a data dependency
//! trace through two memory ports: `icache_port` and `dcache_port`. Each port
//! binds to exactly one peer, either an L1 cache or the memory bus.

use std::path::PathBuf;

use serde::Serialize;

use crate::config::{Config, CpuType, MemMode};

/// CPU component.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Cpu {
    /// CPU index within the system.
    pub cpu_id: usize,
    /// CPU model.
    pub cpu_type: CpuType,
    /// Hardware threads.
    pub num_threads: usize,
    /// Instruction fetch trace replayed on `icache_port`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub inst_trace_file: Option<PathBuf>,
    /// Data dependency trace replayed on `dcache_port`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data_trace_file: Option<PathBuf>,
}

impl Cpu {
    /// Creates CPU `cpu_id` from the configuration.
    pub fn new(cpu_id: usize, config: &Config) -> Self {
        Self {
            cpu_id,
            cpu_type: config.system.cpu_type,
            num_threads: config.system.num_threads,
            inst_trace_file: config.trace.inst_trace_file.clone(),
            data_trace_file: config.trace.data_trace_file.clone(),
        }
    }

    /// Memory mode this CPU needs from the memory system.
    pub const fn mem_mode(&self) -> MemMode {
        self.cpu_type.mem_mode()
    }
}
