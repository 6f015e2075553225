//! System construction and the top-level `System` type.
//!
//! This module assembles everything around the cache hierarchy. It performs:
//! 1. **Domains:** System and CPU voltage and clock domains from configuration.
//! 2. **Fixed components:** The system object, the trace CPU, and the memory bus.
//! 3. **Memory:** One controller per channel behind the memory bus, with interleaved ranges.
//! 4. **Host interface:** Caches and crossbars added by the hierarchy builder, and checked
//!    port connections between any two components.

use std::collections::HashSet;

use serde::Serialize;

use crate::common::error::ConnectError;
use crate::common::units::{Frequency, Voltage};
use crate::config::{CacheParams, Config, MemMode};
use crate::core::Cpu;
use crate::soc::component::{Cache, Component, ComponentKind};
use crate::soc::interconnect::{Crossbar, CrossbarKind};
use crate::soc::memory::AddrRange;
use crate::soc::memory::controller::MemCtrl;
use crate::soc::port::{ComponentId, Connection, CpuPorts, Direction, Port, PortRole};
use crate::soc::traits::Host;

/// Label of the system memory bus.
pub const MEMBUS_NAME: &str = "membus";

/// A supply voltage shared by the components of one or more clock domains.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct VoltageDomain {
    /// Supply voltage.
    pub voltage: Voltage,
}

/// A clock source and the voltage domain it runs in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SrcClockDomain {
    /// Clock frequency.
    pub clock: Frequency,
    /// Supply the domain draws from.
    pub voltage_domain: VoltageDomain,
}

impl SrcClockDomain {
    /// Clock period in picosecond ticks, if the frequency has one.
    pub const fn period_ticks(&self) -> Option<u64> {
        self.clock.period_ticks()
    }
}

/// Top-level system: owns every component and every connection.
///
/// Components live in an arena indexed by `ComponentId`. Connections are
/// recorded in the order they were made.
#[derive(Debug, Clone, Serialize)]
pub struct System {
    components: Vec<Component>,
    connections: Vec<Connection>,
    #[serde(skip)]
    bound: HashSet<Port>,
    /// Top-level voltage domain.
    pub voltage_domain: VoltageDomain,
    /// Clock domain of the memory bus, crossbars, and memory controllers.
    pub clk_domain: SrcClockDomain,
    /// Voltage domain of the CPU and its caches.
    pub cpu_voltage_domain: VoltageDomain,
    /// Clock domain of the CPU and its caches.
    pub cpu_clk_domain: SrcClockDomain,
    /// Memory mode required by the CPU model.
    pub mem_mode: MemMode,
    /// Physical address ranges backed by memory.
    pub mem_ranges: Vec<AddrRange>,
    /// Line size shared by every cache.
    pub cache_line_size: u64,
    system: ComponentId,
    cpu: ComponentId,
    membus: ComponentId,
}

impl System {
    /// Builds the system around an empty cache hierarchy.
    ///
    /// Creates the domains, the system object, the CPU, and the memory bus, connects the
    /// system port to the memory bus, and places one memory controller per channel behind it.
    /// The configuration is assumed to have passed `Config::validate`.
    pub fn new(config: &Config) -> Self {
        let voltage_domain = VoltageDomain {
            voltage: config.system.sys_voltage,
        };
        let cpu_voltage_domain = VoltageDomain {
            voltage: config.system.cpu_voltage,
        };
        let cpu_model = Cpu::new(0, config);
        let mem_range = AddrRange::new(0, config.memory.size.bytes());

        let mut system = Self {
            components: Vec::new(),
            connections: Vec::new(),
            bound: HashSet::new(),
            voltage_domain,
            clk_domain: SrcClockDomain {
                clock: config.system.sys_clock,
                voltage_domain,
            },
            cpu_voltage_domain,
            cpu_clk_domain: SrcClockDomain {
                clock: config.system.cpu_clock,
                voltage_domain: cpu_voltage_domain,
            },
            mem_mode: cpu_model.mem_mode(),
            mem_ranges: vec![mem_range],
            cache_line_size: config.system.cache_line_size,
            system: ComponentId(0),
            cpu: ComponentId(0),
            membus: ComponentId(0),
        };

        system.system = system.push(Component::new("system", ComponentKind::System));
        system.cpu = system.push(Component::new("cpu", ComponentKind::Cpu(cpu_model)));
        system.membus = system.push(Component::new(
            MEMBUS_NAME,
            ComponentKind::Crossbar(Crossbar::new(CrossbarKind::System)),
        ));
        system.link(
            Port::new(system.system, PortRole::SystemPort),
            Port::slave(system.membus),
        );

        let ranges = mem_range.interleaved(config.memory.channels, config.system.cache_line_size);
        for (channel, range) in ranges.into_iter().enumerate() {
            let ctrl = MemCtrl::new(&config.memory, channel, range);
            let id = system.push(Component::new(
                format!("mem_ctrls{channel}"),
                ComponentKind::MemCtrl(ctrl),
            ));
            system.link(Port::master(system.membus), Port::new(id, PortRole::MemPort));
        }

        tracing::info!(
            cpu = %config.system.cpu_type,
            mem_mode = ?system.mem_mode,
            memory = %config.memory.size,
            channels = config.memory.channels,
            "system created"
        );
        system
    }

    /// Id of the system object.
    pub const fn system_id(&self) -> ComponentId {
        self.system
    }

    /// Id of the CPU.
    pub const fn cpu_id(&self) -> ComponentId {
        self.cpu
    }

    /// Instruction and data ports of the CPU.
    pub const fn cpu_ports(&self) -> CpuPorts {
        CpuPorts::of(self.cpu)
    }

    /// Id of the memory bus.
    pub const fn membus(&self) -> ComponentId {
        self.membus
    }

    /// Looks up a component.
    pub fn component(&self, id: ComponentId) -> Option<&Component> {
        self.components.get(id.index())
    }

    /// All components in creation order.
    pub fn components(&self) -> &[Component] {
        &self.components
    }

    /// All connections in the order they were made.
    pub fn connections(&self) -> &[Connection] {
        &self.connections
    }

    /// Ports bound to `port`.
    pub fn peers(&self, port: Port) -> Vec<Port> {
        self.connections
            .iter()
            .filter_map(|c| {
                if c.requestor == port {
                    Some(c.responder)
                } else if c.responder == port {
                    Some(c.requestor)
                } else {
                    None
                }
            })
            .collect()
    }

    /// Whether `port` has at least one peer.
    pub fn is_connected(&self, port: Port) -> bool {
        self.bound.contains(&port)
    }

    /// Cache components with their ids, in creation order.
    pub fn caches(&self) -> impl Iterator<Item = (ComponentId, &Component)> {
        self.components
            .iter()
            .enumerate()
            .filter(|(_, c)| c.as_cache().is_some())
            .map(|(i, c)| (ComponentId(i), c))
    }

    /// Finds a component by its label.
    pub fn find(&self, name: &str) -> Option<ComponentId> {
        self.components
            .iter()
            .position(|c| c.name == name)
            .map(ComponentId)
    }

    /// Dotted `component.port` label, e.g. `cpu.icache.mem_side`.
    pub fn port_name(&self, port: Port) -> String {
        match self.component(port.component) {
            Some(component) => format!("{}.{}", component.name, port.role),
            None => format!("{}.{}", port.component, port.role),
        }
    }

    fn push(&mut self, component: Component) -> ComponentId {
        let id = ComponentId(self.components.len());
        self.components.push(component);
        id
    }

    fn link(&mut self, requestor: Port, responder: Port) {
        let _ = self.bound.insert(requestor);
        let _ = self.bound.insert(responder);
        self.connections.push(Connection {
            requestor,
            responder,
        });
    }

    fn check_port(&self, port: Port, expected: Direction) -> Result<(), ConnectError> {
        let component = self
            .component(port.component)
            .ok_or(ConnectError::UnknownComponent(port.component))?;
        if !component.kind.has_port(port.role) {
            return Err(ConnectError::NoSuchPort {
                component: component.name.clone(),
                role: port.role,
            });
        }
        if port.role.direction() != expected {
            return Err(ConnectError::WrongDirection {
                component: component.name.clone(),
                role: port.role,
                expected: expected.as_str(),
            });
        }
        if !port.role.accepts_many() && self.is_connected(port) {
            return Err(ConnectError::AlreadyConnected {
                component: component.name.clone(),
                role: port.role,
            });
        }
        Ok(())
    }
}

impl Host for System {
    fn add_cache(&mut self, name: &str, params: &CacheParams) -> ComponentId {
        self.push(Component::new(
            name,
            ComponentKind::Cache(Cache {
                params: params.clone(),
            }),
        ))
    }

    fn add_crossbar(&mut self, name: &str, kind: CrossbarKind) -> ComponentId {
        self.push(Component::new(
            name,
            ComponentKind::Crossbar(Crossbar::new(kind)),
        ))
    }

    fn connect(&mut self, requestor: Port, responder: Port) -> Result<(), ConnectError> {
        self.check_port(requestor, Direction::Requestor)?;
        self.check_port(responder, Direction::Responder)?;
        self.link(requestor, responder);
        tracing::debug!(
            from = %self.port_name(requestor),
            to = %self.port_name(responder),
            "connected"
        );
        Ok(())
    }
}
