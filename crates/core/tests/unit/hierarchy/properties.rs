//! Property tests over generated hierarchies.
//!
//! Uses proptest to check component and connection counts for every depth,
//! single-peer cache ports, validation purity, and rule ordering on random
//! level names.

use crate::common::fixtures::{hierarchy, l1d, l1i, level};
use crate::common::mocks::host::{Recorded, RecordingHost};
use memhier_core::common::error::HierarchyError;
use memhier_core::hierarchy::{
    CacheLevelSpec, HierarchyBuilder, HierarchyOptions, HierarchySpec, validate,
};
use memhier_core::soc::port::{Port, PortRole};
use proptest::prelude::*;

fn expected_counts(levels: usize) -> (usize, usize, usize) {
    match levels {
        0 => (0, 0, 2),
        1 => (2, 0, 4),
        n => (n + 1, n, 2 * n + 3),
    }
}

proptest! {
    #[test]
    fn counts_follow_level_count(levels in 0usize..12) {
        let validated = validate(&hierarchy(levels), &HierarchyOptions::default()).unwrap();
        let mut host = RecordingHost::new();
        let built = HierarchyBuilder::new(&validated)
            .build(&mut host, RecordingHost::cpu_ports(), RecordingHost::MEMBUS)
            .unwrap();

        let (caches, crossbars, connections) = expected_counts(levels);
        prop_assert_eq!(built.caches.len(), caches);
        prop_assert_eq!(built.crossbars.len(), crossbars);
        prop_assert_eq!(host.connections.len(), connections);
    }

    #[test]
    fn every_cache_port_has_one_peer(levels in 1usize..12) {
        let validated = validate(&hierarchy(levels), &HierarchyOptions::default()).unwrap();
        let mut host = RecordingHost::new();
        let built = HierarchyBuilder::new(&validated)
            .build(&mut host, RecordingHost::cpu_ports(), RecordingHost::MEMBUS)
            .unwrap();

        for &cache in &built.caches {
            prop_assert_eq!(host.peer_count(Port::cpu_side(cache)), 1);
            prop_assert_eq!(host.peer_count(Port::mem_side(cache)), 1);
        }
        prop_assert_eq!(host.peer_count(RecordingHost::cpu_ports().instruction), 1);
        prop_assert_eq!(host.peer_count(RecordingHost::cpu_ports().data), 1);
    }

    #[test]
    fn only_last_crossbar_reaches_membus(levels in 2usize..12) {
        let validated = validate(&hierarchy(levels), &HierarchyOptions::default()).unwrap();
        let mut host = RecordingHost::new();
        let built = HierarchyBuilder::new(&validated)
            .build(&mut host, RecordingHost::cpu_ports(), RecordingHost::MEMBUS)
            .unwrap();

        let into_membus: Vec<Port> = host
            .connections
            .iter()
            .filter(|(_, resp)| resp.component == RecordingHost::MEMBUS)
            .map(|&(req, _)| req)
            .collect();
        let last = built.crossbars[built.crossbars.len() - 1];
        prop_assert_eq!(into_membus, vec![Port::new(last, PortRole::Master)]);
        prop_assert_eq!(host.name_of(last), format!("l{levels}subsys.xbar"));
    }

    #[test]
    fn crossbars_all_l2_flavour(levels in 2usize..8) {
        let validated = validate(&hierarchy(levels), &HierarchyOptions::default()).unwrap();
        let mut host = RecordingHost::new();
        let _ = HierarchyBuilder::new(&validated)
            .build(&mut host, RecordingHost::cpu_ports(), RecordingHost::MEMBUS)
            .unwrap();
        let xbars = host
            .components
            .iter()
            .filter(|c| matches!(c, Recorded::Crossbar { .. }))
            .count();
        prop_assert_eq!(xbars, levels);
    }

    #[test]
    fn validation_is_repeatable(levels in 0usize..10) {
        let spec = hierarchy(levels);
        let options = HierarchyOptions::default();
        let first = validate(&spec, &options);
        let second = validate(&spec, &options);
        prop_assert_eq!(first, second);
        prop_assert_eq!(spec, hierarchy(levels));
    }

    #[test]
    fn wrong_second_entry_always_rejected(
        name in "[A-Za-z0-9]{0,5}".prop_filter("must not be L1D", |n| n != "L1D"),
        levels in 1usize..6,
    ) {
        let mut spec = hierarchy(levels);
        spec.entries[1] = CacheLevelSpec::named(name.clone());
        prop_assert_eq!(
            validate(&spec, &HierarchyOptions::default()),
            Err(HierarchyError::InvalidSecondEntry { found: Some(name) })
        );
    }

    #[test]
    fn displaced_level_reports_its_index(levels in 3usize..10, seed in any::<usize>()) {
        let index = 2 + seed % (levels - 1);
        let wrong = if index == levels { 2 } else { index + 1 };
        let mut spec = hierarchy(levels);
        spec.entries[index] = level(wrong);
        prop_assert_eq!(
            validate(&spec, &HierarchyOptions::default()),
            Err(HierarchyError::OutOfOrderLevel { index, expected: index, got: wrong })
        );
    }

    #[test]
    fn count_mismatch_for_any_other_length(levels in 1usize..8, extra in 1usize..4) {
        let mut entries = vec![l1i(), l1d()];
        entries.extend((2..=levels + extra).map(level));
        let spec = HierarchySpec::new(levels, entries);
        prop_assert_eq!(
            validate(&spec, &HierarchyOptions::default()),
            Err(HierarchyError::CountMismatch {
                level_count: levels,
                expected: levels + 1,
                found: levels + 1 + extra,
            })
        );
    }
}
