//! Component identifiers and connection points.
//!
//! A `Port` names one connection point: the component it belongs to and the
//! role it plays there. Roles fix the direction of a connection. Requestor
//! ports send requests toward memory, responder ports accept them.

use std::fmt;

use serde::Serialize;

/// Index of a component in the host system's arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct ComponentId(pub usize);

impl ComponentId {
    /// Arena index.
    pub const fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for ComponentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Which way requests flow through a port.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    /// Issues requests toward memory.
    Requestor,
    /// Accepts requests from the CPU side.
    Responder,
}

impl Direction {
    /// Lower-case name used in messages.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Requestor => "requestor",
            Self::Responder => "responder",
        }
    }
}

/// The role a port plays on its component.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PortRole {
    /// CPU instruction fetch port.
    InstructionPort,
    /// CPU data access port.
    DataPort,
    /// Functional access port of the system object.
    SystemPort,
    /// Cache input facing the CPU.
    CpuSide,
    /// Cache output facing memory.
    MemSide,
    /// Crossbar input facing the CPU.
    Slave,
    /// Crossbar output facing memory.
    Master,
    /// Memory controller input.
    MemPort,
}

impl PortRole {
    /// Direction requests take through this port.
    pub const fn direction(self) -> Direction {
        match self {
            Self::InstructionPort
            | Self::DataPort
            | Self::SystemPort
            | Self::MemSide
            | Self::Master => Direction::Requestor,
            Self::CpuSide | Self::Slave | Self::MemPort => Direction::Responder,
        }
    }

    /// Whether the port is a vector port that accepts any number of peers.
    pub const fn accepts_many(self) -> bool {
        matches!(self, Self::Slave | Self::Master)
    }

    /// Port name as it appears in connection listings.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::InstructionPort => "icache_port",
            Self::DataPort => "dcache_port",
            Self::SystemPort => "system_port",
            Self::CpuSide => "cpu_side",
            Self::MemSide => "mem_side",
            Self::Slave => "slave",
            Self::Master => "master",
            Self::MemPort => "port",
        }
    }
}

impl fmt::Display for PortRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One connection point of one component.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct Port {
    /// Owning component.
    pub component: ComponentId,
    /// Role on that component.
    pub role: PortRole,
}

impl Port {
    /// Creates a port reference.
    pub const fn new(component: ComponentId, role: PortRole) -> Self {
        Self { component, role }
    }

    /// CPU-facing input of a cache.
    pub const fn cpu_side(cache: ComponentId) -> Self {
        Self::new(cache, PortRole::CpuSide)
    }

    /// Memory-facing output of a cache.
    pub const fn mem_side(cache: ComponentId) -> Self {
        Self::new(cache, PortRole::MemSide)
    }

    /// CPU-facing input of a crossbar.
    pub const fn slave(xbar: ComponentId) -> Self {
        Self::new(xbar, PortRole::Slave)
    }

    /// Memory-facing output of a crossbar.
    pub const fn master(xbar: ComponentId) -> Self {
        Self::new(xbar, PortRole::Master)
    }
}

/// A requestor port bound to a responder port.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Connection {
    /// Port issuing requests.
    pub requestor: Port,
    /// Port accepting them.
    pub responder: Port,
}

/// The two CPU memory ports the hierarchy attaches to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct CpuPorts {
    /// Instruction fetch port.
    pub instruction: Port,
    /// Data access port.
    pub data: Port,
}

impl CpuPorts {
    /// Ports of the CPU component `cpu`.
    pub const fn of(cpu: ComponentId) -> Self {
        Self {
            instruction: Port::new(cpu, PortRole::InstructionPort),
            data: Port::new(cpu, PortRole::DataPort),
        }
    }
}
