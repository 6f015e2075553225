//! # Configuration Tests
//!
//! Tests for configuration defaults, deserialization, enum parsing, and
//! option validation.

use memhier_core::common::error::SetupError;
use memhier_core::config::*;
use pretty_assertions::assert_eq;
use rstest::rstest;

#[test]
fn test_config_default() {
    let config = Config::default();
    assert_eq!(config.system.cpu_type, CpuType::TraceCpu);
    assert_eq!(config.system.num_cpus, 1);
    assert_eq!(config.system.cache_line_size, 64);
    assert_eq!(config.system.sys_clock.hz(), 1_000_000_000);
    assert_eq!(config.system.cpu_clock.hz(), 2_000_000_000);
    assert_eq!(config.system.sys_voltage.millivolts(), 1_000);
    assert!(!config.system.ruby);
    assert_eq!(config.cache_specs_file, None);
}

#[test]
fn test_memory_config_defaults() {
    let memory = MemoryConfig::default();
    assert_eq!(memory.size.bytes(), 512 << 20);
    assert_eq!(memory.controller, MemoryController::Simple);
    assert_eq!(memory.channels, 1);
    assert_eq!(memory.latency, 30);
}

#[test]
fn test_l1_baseline() {
    let l1 = CacheParams::l1_baseline();
    assert_eq!(l1.size.bytes(), 32 * 1024);
    assert_eq!(l1.assoc, 4);
    assert_eq!(
        (l1.tag_latency, l1.data_latency, l1.response_latency),
        (1, 1, 1)
    );
    assert_eq!(l1.mshrs, 4);
    assert_eq!(l1.tgts_per_mshr, 8);
    assert_eq!(l1.clusivity, Clusivity::MostlyInclusive);
    assert!(l1.writeback_clean);
    assert_eq!(l1.sets(64), Some(128));
    assert_eq!(l1.sets(48), None);
}

#[test]
fn test_partial_document_keeps_defaults() {
    let json = r#"{
        "system": { "cpu_clock": "3GHz" },
        "trace": { "inst_trace_file": "fetch.proto.gz" }
    }"#;
    let config: Config = serde_json::from_str(json).unwrap();
    assert_eq!(config.system.cpu_clock.hz(), 3_000_000_000);
    assert_eq!(config.system.sys_clock.hz(), 1_000_000_000);
    assert_eq!(
        config.trace.inst_trace_file.as_deref(),
        Some(std::path::Path::new("fetch.proto.gz"))
    );
    assert_eq!(config.trace.data_trace_file, None);
    assert_eq!(config.memory.channels, 1);
}

#[test]
fn test_unknown_fields_rejected() {
    assert!(serde_json::from_str::<Config>(r#"{ "sytem": {} }"#).is_err());
    assert!(serde_json::from_str::<Config>(r#"{ "memory": { "ranks": 2 } }"#).is_err());
}

#[test]
fn test_enum_spellings() {
    let json = r#"{ "system": { "cpu_type": "DerivO3CPU" }, "memory": { "controller": "DRAM" } }"#;
    let config: Config = serde_json::from_str(json).unwrap();
    assert_eq!(config.system.cpu_type, CpuType::DerivO3Cpu);
    assert_eq!(config.memory.controller, MemoryController::Dram);

    assert_eq!("tracecpu".parse::<CpuType>().unwrap(), CpuType::TraceCpu);
    assert!("O3".parse::<CpuType>().is_err());
    assert_eq!(
        "DDR3_1600_8x8".parse::<MemoryController>().unwrap(),
        MemoryController::Dram
    );
    assert_eq!(
        "simple_memory".parse::<MemoryController>().unwrap(),
        MemoryController::Simple
    );
}

#[test]
fn test_mem_mode_follows_cpu() {
    assert_eq!(CpuType::TraceCpu.mem_mode(), MemMode::Timing);
    assert_eq!(CpuType::AtomicSimpleCpu.mem_mode(), MemMode::Atomic);
}

// ══════════════════════════════════════════════════════════
// Option validation
// ══════════════════════════════════════════════════════════

#[test]
fn test_default_config_is_valid() {
    assert_eq!(Config::default().validate(), Ok(()));
}

#[rstest]
#[case::ruby(|c: &mut Config| c.system.ruby = true, SetupError::RubyUnsupported)]
#[case::cpu_type(
    |c: &mut Config| c.system.cpu_type = CpuType::TimingSimpleCpu,
    SetupError::UnsupportedCpuType(CpuType::TimingSimpleCpu)
)]
#[case::two_cpus(|c: &mut Config| c.system.num_cpus = 2, SetupError::UnsupportedCpuCount(2))]
#[case::no_cpus(|c: &mut Config| c.system.num_cpus = 0, SetupError::UnsupportedCpuCount(0))]
#[case::line_size(
    |c: &mut Config| c.system.cache_line_size = 48,
    SetupError::InvalidCacheLineSize(48)
)]
#[case::channels(|c: &mut Config| c.memory.channels = 3, SetupError::InvalidChannelCount(3))]
fn test_unsupported_options(#[case] tweak: fn(&mut Config), #[case] expected: SetupError) {
    let mut config = Config::default();
    tweak(&mut config);
    assert_eq!(config.validate(), Err(expected));
}

#[test]
fn test_ruby_reported_before_cpu_type() {
    let mut config = Config::default();
    config.system.ruby = true;
    config.system.cpu_type = CpuType::MinorCpu;
    assert_eq!(config.validate(), Err(SetupError::RubyUnsupported));
}
