//! Configuration system for assembling a simulated system.
//!
//! This module defines every option that parameterizes system assembly. It provides:
//! 1. **Defaults:** Baseline hardware constants (clocks, memory, L1 cache geometry).
//! 2. **Structures:** Config for the system, main memory, and trace inputs.
//! 3. **Enums:** CPU model, memory mode, memory controller, and cache clusivity.
//! 4. **Cache parameters:** The resolved parameter set every cache component is built from.
//!
//! Configuration is supplied as JSON (`Config` deserializes with per-field defaults), by the
//! CLI flags, or from `Config::default()`. It is passed explicitly to the system and the
//! hierarchy builder; nothing reads options from global state.

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::common::error::{SetupError, ValueParseError};
use crate::common::units::{Frequency, MemorySize, Voltage};

/// Default configuration constants.
///
/// These values define the baseline system when not explicitly overridden
/// on the command line or in a JSON configuration document.
mod defaults {
    use crate::common::units::{Frequency, MemorySize, Voltage};

    /// Number of simulated CPUs.
    pub const NUM_CPUS: usize = 1;

    /// Hardware threads per CPU.
    pub const NUM_THREADS: usize = 1;

    /// Cache line size in bytes, shared by every cache in the system.
    pub const CACHE_LINE_SIZE: u64 = 64;

    /// System clock (crossbars and memory) at 1 GHz.
    pub const SYS_CLOCK: Frequency = Frequency::from_mhz(1_000);

    /// CPU clock at 2 GHz; with a trace CPU only its caches run in this domain.
    pub const CPU_CLOCK: Frequency = Frequency::from_mhz(2_000);

    /// Top-level supply voltage.
    pub const SYS_VOLTAGE: Voltage = Voltage::from_millivolts(1_000);

    /// CPU supply voltage.
    pub const CPU_VOLTAGE: Voltage = Voltage::from_millivolts(1_000);

    /// Main memory size (512 MiB).
    pub const MEM_SIZE: MemorySize = MemorySize::from_mib(512);

    /// Number of memory channels.
    pub const MEM_CHANNELS: usize = 1;

    /// Fixed access latency of the simple memory controller, in cycles.
    pub const MEM_LATENCY: u64 = 30;

    /// L1 capacity (32 KiB).
    pub const L1_SIZE: MemorySize = MemorySize::from_kib(32);

    /// L1 associativity.
    pub const L1_ASSOC: u32 = 4;

    /// L1 tag, data, and response latency in cycles.
    pub const L1_LATENCY: u32 = 1;

    /// L1 miss-status holding registers.
    pub const L1_MSHRS: u32 = 4;

    /// L1 targets per MSHR.
    pub const L1_TGTS_PER_MSHR: u32 = 8;
}

/// CPU models a configuration may request.
///
/// Only `TraceCpu` is accepted by `Config::validate`; the others are parsed so
/// that a wrong choice is reported by name instead of as an unknown option.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Deserialize, Serialize)]
pub enum CpuType {
    /// Elastic trace replay CPU.
    #[default]
    #[serde(rename = "TraceCPU")]
    TraceCpu,
    /// Functional CPU with atomic memory accesses.
    #[serde(rename = "AtomicSimpleCPU")]
    AtomicSimpleCpu,
    /// Single-issue CPU with timing memory accesses.
    #[serde(rename = "TimingSimpleCPU")]
    TimingSimpleCpu,
    /// In-order pipelined CPU.
    #[serde(rename = "MinorCPU")]
    MinorCpu,
    /// Out-of-order CPU.
    #[serde(rename = "DerivO3CPU")]
    DerivO3Cpu,
}

impl CpuType {
    /// Memory mode the CPU model requires from the memory system.
    pub const fn mem_mode(self) -> MemMode {
        match self {
            Self::AtomicSimpleCpu => MemMode::Atomic,
            Self::TraceCpu | Self::TimingSimpleCpu | Self::MinorCpu | Self::DerivO3Cpu => {
                MemMode::Timing
            }
        }
    }

    /// Canonical model name.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::TraceCpu => "TraceCPU",
            Self::AtomicSimpleCpu => "AtomicSimpleCPU",
            Self::TimingSimpleCpu => "TimingSimpleCPU",
            Self::MinorCpu => "MinorCPU",
            Self::DerivO3Cpu => "DerivO3CPU",
        }
    }
}

impl fmt::Display for CpuType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CpuType {
    type Err = ValueParseError;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        [
            Self::TraceCpu,
            Self::AtomicSimpleCpu,
            Self::TimingSimpleCpu,
            Self::MinorCpu,
            Self::DerivO3Cpu,
        ]
        .into_iter()
        .find(|cpu| cpu.as_str().eq_ignore_ascii_case(input))
        .ok_or_else(|| ValueParseError::UnknownVariant {
            quantity: "CPU type",
            input: input.to_string(),
            expected: "TraceCPU, AtomicSimpleCPU, TimingSimpleCPU, MinorCPU, DerivO3CPU",
        })
    }
}

/// How the memory system services requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MemMode {
    /// Requests complete immediately with an estimated latency.
    Atomic,
    /// Requests travel through the hierarchy as timed packets.
    #[default]
    Timing,
}

/// Memory controller implementation types.
///
/// Specifies the controller attached behind the memory bus on each channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "PascalCase")]
pub enum MemoryController {
    /// Simple fixed-latency memory controller.
    #[default]
    Simple,
    /// DRAM controller with row buffer modeling.
    #[serde(alias = "DRAM")]
    Dram,
}

impl FromStr for MemoryController {
    type Err = ValueParseError;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        match input.to_ascii_lowercase().as_str() {
            "simple" | "simple_memory" => Ok(Self::Simple),
            "dram" | "ddr3_1600_8x8" => Ok(Self::Dram),
            _ => Err(ValueParseError::UnknownVariant {
                quantity: "memory controller",
                input: input.to_string(),
                expected: "simple, dram",
            }),
        }
    }
}

impl fmt::Display for MemoryController {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Simple => f.write_str("simple"),
            Self::Dram => f.write_str("dram"),
        }
    }
}

/// Inclusion policy of a cache relative to the levels above it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Deserialize, Serialize)]
pub enum Clusivity {
    /// Lines filled from below are also allocated here.
    #[default]
    #[serde(rename = "mostly_incl", alias = "mostly_inclusive")]
    MostlyInclusive,
    /// Lines are only allocated here on eviction from the level above.
    #[serde(rename = "mostly_excl", alias = "mostly_exclusive")]
    MostlyExclusive,
}

impl fmt::Display for Clusivity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MostlyInclusive => f.write_str("mostly_incl"),
            Self::MostlyExclusive => f.write_str("mostly_excl"),
        }
    }
}

/// Fully resolved parameters of one cache component.
///
/// Produced by hierarchy validation; every field is concrete.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CacheParams {
    /// Capacity.
    pub size: MemorySize,
    /// Associativity (ways per set).
    pub assoc: u32,
    /// Tag lookup latency in cycles.
    pub tag_latency: u32,
    /// Data array access latency in cycles.
    pub data_latency: u32,
    /// Latency to forward a response upstream, in cycles.
    pub response_latency: u32,
    /// Miss-status holding registers.
    pub mshrs: u32,
    /// Outstanding targets per MSHR.
    pub tgts_per_mshr: u32,
    /// Inclusion policy.
    pub clusivity: Clusivity,
    /// Whether clean lines are written back on eviction.
    pub writeback_clean: bool,
}

impl CacheParams {
    /// Baseline parameters for the L1 instruction and data caches.
    ///
    /// Fields an L1 entry leaves out of the hierarchy document take these values.
    pub const fn l1_baseline() -> Self {
        Self {
            size: defaults::L1_SIZE,
            assoc: defaults::L1_ASSOC,
            tag_latency: defaults::L1_LATENCY,
            data_latency: defaults::L1_LATENCY,
            response_latency: defaults::L1_LATENCY,
            mshrs: defaults::L1_MSHRS,
            tgts_per_mshr: defaults::L1_TGTS_PER_MSHR,
            clusivity: Clusivity::MostlyInclusive,
            writeback_clean: true,
        }
    }

    /// Number of sets for the given line size, if the geometry divides evenly.
    pub const fn sets(&self, line_size: u64) -> Option<u64> {
        let way_bytes = self.assoc as u64 * line_size;
        if way_bytes == 0 || self.size.bytes() % way_bytes != 0 {
            None
        } else {
            Some(self.size.bytes() / way_bytes)
        }
    }
}

/// Root configuration structure containing all assembly settings.
///
/// # Examples
///
/// Creating a default configuration:
///
/// ```
/// use memhier_core::config::{Config, CpuType};
///
/// let config = Config::default();
/// assert_eq!(config.system.cpu_type, CpuType::TraceCpu);
/// assert_eq!(config.system.cache_line_size, 64);
/// assert!(config.validate().is_ok());
/// ```
///
/// Deserializing from JSON; omitted fields take their defaults:
///
/// ```
/// use memhier_core::config::{Config, MemoryController};
///
/// let json = r#"{
///     "system": { "cpu_clock": "3GHz", "cache_line_size": 128 },
///     "memory": { "controller": "Dram", "size": "2GB", "channels": 2 },
///     "cache_specs_file": "hierarchy.json"
/// }"#;
///
/// let config: Config = serde_json::from_str(json).unwrap();
/// assert_eq!(config.system.cpu_clock.hz(), 3_000_000_000);
/// assert_eq!(config.system.cache_line_size, 128);
/// assert_eq!(config.memory.controller, MemoryController::Dram);
/// assert_eq!(config.memory.size.bytes(), 2 << 30);
/// ```
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// CPU, clock, and voltage settings
    #[serde(default)]
    pub system: SystemConfig,
    /// Main memory configuration
    #[serde(default)]
    pub memory: MemoryConfig,
    /// Trace inputs for the trace CPU
    #[serde(default)]
    pub trace: TraceConfig,
    /// JSON document describing the cache hierarchy
    #[serde(default)]
    pub cache_specs_file: Option<PathBuf>,
}

impl Config {
    /// Checks that the options describe a system this flow can assemble.
    ///
    /// # Errors
    ///
    /// Returns the first unsupported option: a non-trace CPU, a CPU count other than one,
    /// the Ruby memory system, or an unusable line size or channel count.
    pub fn validate(&self) -> Result<(), SetupError> {
        if self.system.ruby {
            return Err(SetupError::RubyUnsupported);
        }
        if self.system.cpu_type != CpuType::TraceCpu {
            return Err(SetupError::UnsupportedCpuType(self.system.cpu_type));
        }
        if self.system.num_cpus != 1 {
            return Err(SetupError::UnsupportedCpuCount(self.system.num_cpus));
        }
        if !self.system.cache_line_size.is_power_of_two() {
            return Err(SetupError::InvalidCacheLineSize(self.system.cache_line_size));
        }
        if !self.memory.channels.is_power_of_two() {
            return Err(SetupError::InvalidChannelCount(self.memory.channels));
        }
        Ok(())
    }
}

/// CPU, clock domain, and voltage domain settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct SystemConfig {
    /// CPU model
    #[serde(default)]
    pub cpu_type: CpuType,

    /// Number of CPUs
    #[serde(default = "SystemConfig::default_num_cpus")]
    pub num_cpus: usize,

    /// Hardware threads per CPU
    #[serde(default = "SystemConfig::default_num_threads")]
    pub num_threads: usize,

    /// Cache line size in bytes
    #[serde(default = "SystemConfig::default_cache_line_size")]
    pub cache_line_size: u64,

    /// System clock (crossbars and memory)
    #[serde(default = "SystemConfig::default_sys_clock")]
    pub sys_clock: Frequency,

    /// CPU clock
    #[serde(default = "SystemConfig::default_cpu_clock")]
    pub cpu_clock: Frequency,

    /// Top-level supply voltage
    #[serde(default = "SystemConfig::default_sys_voltage")]
    pub sys_voltage: Voltage,

    /// CPU supply voltage
    #[serde(default = "SystemConfig::default_cpu_voltage")]
    pub cpu_voltage: Voltage,

    /// Request the Ruby memory system (rejected by `Config::validate`)
    #[serde(default)]
    pub ruby: bool,
}

impl SystemConfig {
    /// Returns the default CPU count.
    fn default_num_cpus() -> usize {
        defaults::NUM_CPUS
    }

    /// Returns the default thread count per CPU.
    fn default_num_threads() -> usize {
        defaults::NUM_THREADS
    }

    /// Returns the default cache line size in bytes.
    fn default_cache_line_size() -> u64 {
        defaults::CACHE_LINE_SIZE
    }

    /// Returns the default system clock.
    fn default_sys_clock() -> Frequency {
        defaults::SYS_CLOCK
    }

    /// Returns the default CPU clock.
    fn default_cpu_clock() -> Frequency {
        defaults::CPU_CLOCK
    }

    /// Returns the default system voltage.
    fn default_sys_voltage() -> Voltage {
        defaults::SYS_VOLTAGE
    }

    /// Returns the default CPU voltage.
    fn default_cpu_voltage() -> Voltage {
        defaults::CPU_VOLTAGE
    }
}

impl Default for SystemConfig {
    fn default() -> Self {
        Self {
            cpu_type: CpuType::default(),
            num_cpus: defaults::NUM_CPUS,
            num_threads: defaults::NUM_THREADS,
            cache_line_size: defaults::CACHE_LINE_SIZE,
            sys_clock: defaults::SYS_CLOCK,
            cpu_clock: defaults::CPU_CLOCK,
            sys_voltage: defaults::SYS_VOLTAGE,
            cpu_voltage: defaults::CPU_VOLTAGE,
            ruby: false,
        }
    }
}

/// Main memory configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct MemoryConfig {
    /// Memory size
    #[serde(default = "MemoryConfig::default_size")]
    pub size: MemorySize,

    /// Memory controller type
    #[serde(default)]
    pub controller: MemoryController,

    /// Number of channels; addresses interleave across them at line granularity
    #[serde(default = "MemoryConfig::default_channels")]
    pub channels: usize,

    /// Fixed latency of the simple controller, in cycles
    #[serde(default = "MemoryConfig::default_latency")]
    pub latency: u64,
}

impl MemoryConfig {
    /// Returns the default memory size.
    fn default_size() -> MemorySize {
        defaults::MEM_SIZE
    }

    /// Returns the default channel count.
    fn default_channels() -> usize {
        defaults::MEM_CHANNELS
    }

    /// Returns the default simple-controller latency.
    fn default_latency() -> u64 {
        defaults::MEM_LATENCY
    }
}

impl Default for MemoryConfig {
    fn default() -> Self {
        Self {
            size: defaults::MEM_SIZE,
            controller: MemoryController::default(),
            channels: defaults::MEM_CHANNELS,
            latency: defaults::MEM_LATENCY,
        }
    }
}

/// Trace files replayed by the trace CPU.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct TraceConfig {
    /// Instruction fetch trace
    #[serde(default)]
    pub inst_trace_file: Option<PathBuf>,
    /// Data dependency trace
    #[serde(default)]
    pub data_trace_file: Option<PathBuf>,
}
