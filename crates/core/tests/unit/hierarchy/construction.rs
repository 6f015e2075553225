//! Hierarchy construction unit tests.
//!
//! Verifies the components created and the connections made for each
//! hierarchy shape, and that failures leave the host untouched or surface
//! as wiring defects.

use crate::common::fixtures::{hierarchy, l1d, level};
use crate::common::mocks::host::{MockHost, Recorded, RecordingHost};
use memhier_core::common::error::{BuildError, ConnectError, HierarchyError};
use memhier_core::config::CacheParams;
use memhier_core::hierarchy::{
    HierarchyBuilder, HierarchyOptions, HierarchySpec, build_hierarchy, validate,
};
use memhier_core::soc::interconnect::CrossbarKind;
use memhier_core::soc::port::{ComponentId, PortRole};
use mockall::Sequence;
use pretty_assertions::assert_eq;

fn build(levels: usize) -> RecordingHost {
    let mut host = RecordingHost::new();
    let _ = build_hierarchy(
        &hierarchy(levels),
        &HierarchyOptions::default(),
        &mut host,
        RecordingHost::cpu_ports(),
        RecordingHost::MEMBUS,
    )
    .unwrap();
    host
}

// ══════════════════════════════════════════════════════════
// 1. Shapes
// ══════════════════════════════════════════════════════════

#[test]
fn zero_levels_attach_cpu_to_membus() {
    let host = build(0);
    assert!(host.components.is_empty());
    assert_eq!(
        host.connection_labels(),
        vec![
            "cpu.icache_port -> membus.slave",
            "cpu.dcache_port -> membus.slave",
        ]
    );
}

#[test]
fn one_level_attaches_l1_to_membus() {
    let host = build(1);
    assert_eq!(host.component_names(), vec!["cpu.icache", "cpu.dcache"]);
    assert_eq!(
        host.connection_labels(),
        vec![
            "cpu.icache_port -> cpu.icache.cpu_side",
            "cpu.dcache_port -> cpu.dcache.cpu_side",
            "cpu.icache.mem_side -> membus.slave",
            "cpu.dcache.mem_side -> membus.slave",
        ]
    );
}

#[test]
fn two_levels_worked_example() {
    let host = build(2);
    assert_eq!(
        host.component_names(),
        vec![
            "cpu.icache",
            "cpu.dcache",
            "l2subsys.cache",
            "l2bus",
            "l2subsys.xbar",
        ]
    );
    assert_eq!(
        host.connection_labels(),
        vec![
            "cpu.icache_port -> cpu.icache.cpu_side",
            "cpu.dcache_port -> cpu.dcache.cpu_side",
            "cpu.icache.mem_side -> l2bus.slave",
            "cpu.dcache.mem_side -> l2bus.slave",
            "l2bus.master -> l2subsys.cache.cpu_side",
            "l2subsys.cache.mem_side -> l2subsys.xbar.slave",
            "l2subsys.xbar.master -> membus.slave",
        ]
    );
}

#[test]
fn three_levels_chain_through_subsystem_crossbars() {
    let host = build(3);
    assert_eq!(
        host.connection_labels()[4..].to_vec(),
        vec![
            "l2bus.master -> l2subsys.cache.cpu_side",
            "l2subsys.cache.mem_side -> l2subsys.xbar.slave",
            "l2subsys.xbar.master -> l3subsys.cache.cpu_side",
            "l3subsys.cache.mem_side -> l3subsys.xbar.slave",
            "l3subsys.xbar.master -> membus.slave",
        ]
    );
}

#[test]
fn caches_carry_resolved_params() {
    let host = build(2);
    match &host.components[2] {
        Recorded::Cache { name, params } => {
            assert_eq!(name, "l2subsys.cache");
            assert_eq!(params.assoc, 8);
            assert_eq!(params.mshrs, 20);
        }
        other => panic!("expected a cache, got {other:?}"),
    }
    assert_eq!(
        host.components[0],
        Recorded::Cache {
            name: "cpu.icache".to_string(),
            params: CacheParams::l1_baseline(),
        }
    );
    assert!(host.components[3..].iter().all(|c| matches!(
        c,
        Recorded::Crossbar {
            kind: CrossbarKind::L2,
            ..
        }
    )));
}

#[test]
fn built_ids_follow_entry_order() {
    let validated = validate(&hierarchy(3), &HierarchyOptions::default()).unwrap();
    let mut host = RecordingHost::new();
    let built = HierarchyBuilder::new(&validated)
        .build(&mut host, RecordingHost::cpu_ports(), RecordingHost::MEMBUS)
        .unwrap();
    assert_eq!(
        built.caches,
        vec![ComponentId(2), ComponentId(3), ComponentId(4), ComponentId(5)]
    );
    assert_eq!(
        built.crossbars,
        vec![ComponentId(6), ComponentId(7), ComponentId(8)]
    );
    assert_eq!(host.name_of(built.crossbars[0]), "l2bus");
}

// ══════════════════════════════════════════════════════════
// 2. Failures
// ══════════════════════════════════════════════════════════

#[test]
fn rejected_record_touches_nothing() {
    // Any call on a mock without expectations panics.
    let mut host = MockHost::new();
    let spec = HierarchySpec::new(2, vec![l1d(), level(2)]);
    let err = build_hierarchy(
        &spec,
        &HierarchyOptions::default(),
        &mut host,
        RecordingHost::cpu_ports(),
        RecordingHost::MEMBUS,
    )
    .unwrap_err();
    assert_eq!(
        err,
        BuildError::Validation(HierarchyError::InvalidFirstEntry {
            found: Some("L1D".to_string())
        })
    );
}

#[test]
fn refused_connection_surfaces_as_wiring_defect() {
    let mut host = MockHost::new();
    let mut next = 10;
    let _ = host.expect_add_cache().times(2).returning(move |_, _| {
        next += 1;
        ComponentId(next)
    });
    let mut calls = 0;
    let _ = host.expect_connect().times(2).returning(move |_, responder| {
        calls += 1;
        if calls == 1 {
            return Ok(());
        }
        Err(ConnectError::AlreadyConnected {
            component: "cpu.dcache".to_string(),
            role: responder.role,
        })
    });

    let err = build_hierarchy(
        &hierarchy(1),
        &HierarchyOptions::default(),
        &mut host,
        RecordingHost::cpu_ports(),
        RecordingHost::MEMBUS,
    )
    .unwrap_err();
    assert_eq!(
        err,
        BuildError::Wiring(ConnectError::AlreadyConnected {
            component: "cpu.dcache".to_string(),
            role: PortRole::CpuSide,
        })
    );
}

#[test]
fn caches_created_before_any_connection() {
    let mut host = MockHost::new();
    let mut seq = Sequence::new();
    let _ = host
        .expect_add_cache()
        .withf(|name, _| name.ends_with("icache"))
        .times(1)
        .in_sequence(&mut seq)
        .returning(|_, _| ComponentId(10));
    let _ = host
        .expect_add_cache()
        .withf(|name, _| name.ends_with("dcache"))
        .times(1)
        .in_sequence(&mut seq)
        .returning(|_, _| ComponentId(11));
    let _ = host
        .expect_connect()
        .times(4)
        .in_sequence(&mut seq)
        .returning(|_, _| Ok(()));

    let _ = build_hierarchy(
        &hierarchy(1),
        &HierarchyOptions::default(),
        &mut host,
        RecordingHost::cpu_ports(),
        RecordingHost::MEMBUS,
    )
    .unwrap();
}
