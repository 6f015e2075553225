//! Post-construction graph checks and topology reporting.
//!
//! This module inspects a fully assembled `System`. It provides:
//! 1. **Connectivity:** Every port of every component has at least one peer.
//! 2. **Acyclicity:** Following requests from requestor to responder never returns to a component.
//! 3. **Report:** A serializable listing of clocks, components, caches, crossbars, memory
//!    controllers, and connections.

use std::fmt;

use serde::Serialize;

use crate::common::error::TopologyError;
use crate::common::units::MemorySize;
use crate::config::Clusivity;
use crate::soc::builder::System;
use crate::soc::interconnect::CrossbarKind;
use crate::soc::port::{ComponentId, Port};

/// DFS visit state.
#[derive(Clone, Copy, PartialEq, Eq)]
enum Mark {
    Unvisited,
    InProgress,
    Done,
}

impl System {
    /// Checks that the graph is fully connected and acyclic.
    ///
    /// # Errors
    ///
    /// `TopologyError::DanglingPort` for the first port without a peer, then
    /// `TopologyError::Cycle` if requests can loop back to a component.
    pub fn check_topology(&self) -> Result<(), TopologyError> {
        for (index, component) in self.components().iter().enumerate() {
            for &role in component.kind.ports() {
                if !self.is_connected(Port::new(ComponentId(index), role)) {
                    return Err(TopologyError::DanglingPort {
                        component: component.name.clone(),
                        role,
                    });
                }
            }
        }

        let count = self.components().len();
        let mut edges = vec![Vec::new(); count];
        for connection in self.connections() {
            if let Some(out) = edges.get_mut(connection.requestor.component.index()) {
                out.push(connection.responder.component.index());
            }
        }

        let mut marks = vec![Mark::Unvisited; count];
        for start in 0..count {
            if marks[start] == Mark::Unvisited {
                self.visit(start, &edges, &mut marks)?;
            }
        }
        Ok(())
    }

    /// Iterative DFS from `start`; each stack frame is a node and its next edge.
    fn visit(
        &self,
        start: usize,
        edges: &[Vec<usize>],
        marks: &mut [Mark],
    ) -> Result<(), TopologyError> {
        let mut stack = vec![(start, 0usize)];
        marks[start] = Mark::InProgress;

        while let Some(frame) = stack.last_mut() {
            let (node, cursor) = *frame;
            let Some(&next) = edges[node].get(cursor) else {
                marks[node] = Mark::Done;
                let _ = stack.pop();
                continue;
            };
            frame.1 += 1;

            match marks[next] {
                Mark::InProgress => {
                    return Err(TopologyError::Cycle {
                        component: self.components()[next].name.clone(),
                    });
                }
                Mark::Unvisited => {
                    marks[next] = Mark::InProgress;
                    stack.push((next, 0));
                }
                Mark::Done => {}
            }
        }
        Ok(())
    }

    /// Summarizes the assembled system.
    pub fn report(&self) -> TopologyReport {
        let line = self.cache_line_size;
        let mut caches = Vec::new();
        let mut crossbars = Vec::new();
        let mut memories = Vec::new();
        for component in self.components() {
            if let Some(cache) = component.as_cache() {
                caches.push(CacheSummary {
                    name: component.name.clone(),
                    size: cache.params.size,
                    assoc: cache.params.assoc,
                    sets: cache.params.sets(line).unwrap_or(0),
                    hit_latency: u64::from(cache.params.tag_latency)
                        + u64::from(cache.params.data_latency),
                    clusivity: cache.params.clusivity,
                });
            } else if let Some(xbar) = component.as_crossbar() {
                crossbars.push(CrossbarSummary {
                    name: component.name.clone(),
                    kind: xbar.kind,
                    width_bytes: xbar.width_bytes,
                    line_transit_cycles: xbar.transit_cycles(line),
                });
            } else if let Some(ctrl) = component.as_mem_ctrl() {
                memories.push(MemCtrlSummary {
                    name: component.name.clone(),
                    channel: ctrl.channel,
                    start: ctrl.range.start,
                    size: ctrl.range.size,
                    channels: ctrl.range.interleave.map_or(1, |il| il.ways),
                    worst_case_latency: ctrl.timing.worst_case_latency(),
                });
            }
        }

        TopologyReport {
            sys_clock_period_ticks: self.clk_domain.period_ticks(),
            cpu_clock_period_ticks: self.cpu_clk_domain.period_ticks(),
            components: self
                .components()
                .iter()
                .map(|c| ComponentSummary {
                    name: c.name.clone(),
                    kind: c.kind.type_name(),
                })
                .collect(),
            caches,
            crossbars,
            memories,
            connections: self
                .connections()
                .iter()
                .map(|c| ConnectionSummary {
                    requestor: self.port_name(c.requestor),
                    responder: self.port_name(c.responder),
                })
                .collect(),
        }
    }
}

/// One component in a report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ComponentSummary {
    /// Label.
    pub name: String,
    /// Type name.
    pub kind: &'static str,
}

/// One cache in a report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CacheSummary {
    /// Label.
    pub name: String,
    /// Capacity.
    pub size: MemorySize,
    /// Associativity.
    pub assoc: u32,
    /// Number of sets at the system line size.
    pub sets: u64,
    /// Tag plus data latency in cycles.
    pub hit_latency: u64,
    /// Inclusion policy.
    pub clusivity: Clusivity,
}

/// One crossbar in a report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CrossbarSummary {
    /// Label.
    pub name: String,
    /// Flavour.
    pub kind: CrossbarKind,
    /// Datapath width in bytes.
    pub width_bytes: u64,
    /// Cycles to move one cache line across.
    pub line_transit_cycles: u64,
}

/// One memory controller in a report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MemCtrlSummary {
    /// Label.
    pub name: String,
    /// Channel number.
    pub channel: usize,
    /// First address of the backing range.
    pub start: u64,
    /// Length of the backing range in bytes.
    pub size: u64,
    /// Channels the range is interleaved across.
    pub channels: usize,
    /// Cycles for a worst-case access.
    pub worst_case_latency: u64,
}

/// One connection in a report, as dotted port labels.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConnectionSummary {
    /// Requesting port.
    pub requestor: String,
    /// Responding port.
    pub responder: String,
}

/// Serializable description of an assembled system.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TopologyReport {
    /// System clock period in ticks, if the clock has one.
    pub sys_clock_period_ticks: Option<u64>,
    /// CPU clock period in ticks, if the clock has one.
    pub cpu_clock_period_ticks: Option<u64>,
    /// Every component in creation order.
    pub components: Vec<ComponentSummary>,
    /// Caches in creation order.
    pub caches: Vec<CacheSummary>,
    /// Crossbars, memory bus included.
    pub crossbars: Vec<CrossbarSummary>,
    /// Memory controllers in channel order.
    pub memories: Vec<MemCtrlSummary>,
    /// Connections in the order they were made.
    pub connections: Vec<ConnectionSummary>,
}

impl fmt::Display for TopologyReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "clocks: system {} ps, cpu {} ps",
            Ticks(self.sys_clock_period_ticks),
            Ticks(self.cpu_clock_period_ticks)
        )?;
        writeln!(f, "caches ({}):", self.caches.len())?;
        for cache in &self.caches {
            writeln!(
                f,
                "  {:<18} {:>8} {:>3}-way {:>6} sets  hit {} cyc  {}",
                cache.name, cache.size, cache.assoc, cache.sets, cache.hit_latency, cache.clusivity
            )?;
        }
        writeln!(f, "crossbars ({}):", self.crossbars.len())?;
        for xbar in &self.crossbars {
            writeln!(
                f,
                "  {:<18} {:<10} {:>3} B wide  line transit {} cyc",
                xbar.name,
                xbar.kind.to_string(),
                xbar.width_bytes,
                xbar.line_transit_cycles
            )?;
        }
        writeln!(f, "memories ({}):", self.memories.len())?;
        for mem in &self.memories {
            writeln!(
                f,
                "  {:<18} channel {}/{}  {:#x}+{:#x}  worst case {} cyc",
                mem.name, mem.channel, mem.channels, mem.start, mem.size, mem.worst_case_latency
            )?;
        }
        writeln!(f, "connections ({}):", self.connections.len())?;
        for c in &self.connections {
            writeln!(f, "  {} -> {}", c.requestor, c.responder)?;
        }
        Ok(())
    }
}

/// Period that renders as `-` when the clock has none.
struct Ticks(Option<u64>);

impl fmt::Display for Ticks {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            Some(ticks) => write!(f, "{ticks}"),
            None => f.write_str("-"),
        }
    }
}
