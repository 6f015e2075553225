//! Crossbar and memory controller unit tests.
//!
//! Verifies crossbar transit time, interleaved address ranges, and controller
//! timing selection.

use memhier_core::config::{MemoryConfig, MemoryController};
use memhier_core::soc::interconnect::{Crossbar, CrossbarKind};
use memhier_core::soc::memory::{AddrRange, Interleave};
use memhier_core::soc::memory::controller::{ControllerTiming, MemCtrl};

// ══════════════════════════════════════════════════════════
// 1. Crossbar transit time
// ══════════════════════════════════════════════════════════

#[test]
fn transit_single_beat() {
    let xbar = Crossbar::new(CrossbarKind::L2);
    // 32 bytes on a 32-byte crossbar = 1 beat + 1 frontend + 0 forward
    assert_eq!(xbar.transit_cycles(32), 2);
}

#[test]
fn transit_partial_beat_rounds_up() {
    let xbar = Crossbar::new(CrossbarKind::System);
    // 20 bytes on a 16-byte bus = 2 beats + 3 frontend + 4 forward
    assert_eq!(xbar.transit_cycles(20), 9);
}

#[test]
fn transit_zero_bytes_is_latency_only() {
    let xbar = Crossbar::new(CrossbarKind::System);
    assert_eq!(xbar.transit_cycles(0), 7);
}

#[test]
fn crossbar_flavour_names() {
    assert_eq!(CrossbarKind::System.to_string(), "SystemXBar");
    assert_eq!(CrossbarKind::L2.to_string(), "L2XBar");
}

// ══════════════════════════════════════════════════════════
// 2. Address ranges
// ══════════════════════════════════════════════════════════

#[test]
fn plain_range_bounds() {
    let range = AddrRange::new(0x1000, 0x1000);
    assert_eq!(range.end(), 0x2000);
    assert_eq!(range.interleave, None);
}

#[test]
fn range_end_saturates() {
    assert_eq!(AddrRange::new(u64::MAX - 1, 16).end(), u64::MAX);
}

#[test]
fn single_channel_not_interleaved() {
    let ranges = AddrRange::new(0, 4096).interleaved(1, 64);
    assert_eq!(ranges, vec![AddrRange::new(0, 4096)]);
}

#[test]
fn interleaved_channels_share_the_range() {
    let ranges = AddrRange::new(0, 4096).interleaved(4, 64);
    assert_eq!(ranges.len(), 4);
    for (index, range) in ranges.iter().enumerate() {
        assert_eq!((range.start, range.size), (0, 4096));
        assert_eq!(
            range.interleave,
            Some(Interleave {
                granularity: 64,
                ways: 4,
                index
            })
        );
    }
}

// ══════════════════════════════════════════════════════════
// 3. Controllers
// ══════════════════════════════════════════════════════════

#[test]
fn simple_controller_uses_configured_latency() {
    let config = MemoryConfig {
        latency: 45,
        ..MemoryConfig::default()
    };
    let ctrl = MemCtrl::new(&config, 0, AddrRange::new(0, 1024));
    assert_eq!(ctrl.timing, ControllerTiming::Fixed { latency: 45 });
    assert_eq!(ctrl.timing.worst_case_latency(), 45);
}

#[test]
fn dram_controller_row_miss_latency() {
    let config = MemoryConfig {
        controller: MemoryController::Dram,
        ..MemoryConfig::default()
    };
    let ctrl = MemCtrl::new(&config, 1, AddrRange::new(0, 1024));
    assert_eq!(ctrl.channel, 1);
    // precharge + activate + column access
    assert_eq!(ctrl.timing.worst_case_latency(), 42);
}
