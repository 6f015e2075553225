//! Components owned by the host system.

use serde::Serialize;

use crate::config::CacheParams;
use crate::core::Cpu;
use crate::soc::interconnect::Crossbar;
use crate::soc::memory::controller::MemCtrl;
use crate::soc::port::PortRole;

/// A cache component.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Cache {
    /// Parameters it was built with; fixed for its lifetime.
    pub params: CacheParams,
}

/// What a component is.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ComponentKind {
    /// The system object itself; owns the functional system port.
    System,
    /// The CPU.
    Cpu(Cpu),
    /// A cache.
    Cache(Cache),
    /// A crossbar or the memory bus.
    Crossbar(Crossbar),
    /// A memory controller.
    MemCtrl(MemCtrl),
}

impl ComponentKind {
    /// Ports this kind of component exposes.
    pub const fn ports(&self) -> &'static [PortRole] {
        match self {
            Self::System => &[PortRole::SystemPort],
            Self::Cpu(_) => &[PortRole::InstructionPort, PortRole::DataPort],
            Self::Cache(_) => &[PortRole::CpuSide, PortRole::MemSide],
            Self::Crossbar(_) => &[PortRole::Slave, PortRole::Master],
            Self::MemCtrl(_) => &[PortRole::MemPort],
        }
    }

    /// Whether the component exposes a port with this role.
    pub fn has_port(&self, role: PortRole) -> bool {
        self.ports().contains(&role)
    }

    /// Short type name for listings.
    pub const fn type_name(&self) -> &'static str {
        match self {
            Self::System => "system",
            Self::Cpu(_) => "cpu",
            Self::Cache(_) => "cache",
            Self::Crossbar(_) => "crossbar",
            Self::MemCtrl(_) => "mem_ctrl",
        }
    }
}

/// A named component in the system arena.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Component {
    /// Hierarchical label, e.g. `cpu.icache` or `l3subsys.xbar`.
    pub name: String,
    /// The component itself.
    pub kind: ComponentKind,
}

impl Component {
    /// Creates a named component.
    pub fn new(name: impl Into<String>, kind: ComponentKind) -> Self {
        Self {
            name: name.into(),
            kind,
        }
    }

    /// The cache, if this component is one.
    pub const fn as_cache(&self) -> Option<&Cache> {
        match &self.kind {
            ComponentKind::Cache(cache) => Some(cache),
            _ => None,
        }
    }

    /// The crossbar, if this component is one.
    pub const fn as_crossbar(&self) -> Option<&Crossbar> {
        match &self.kind {
            ComponentKind::Crossbar(xbar) => Some(xbar),
            _ => None,
        }
    }

    /// The memory controller, if this component is one.
    pub const fn as_mem_ctrl(&self) -> Option<&MemCtrl> {
        match &self.kind {
            ComponentKind::MemCtrl(ctrl) => Some(ctrl),
            _ => None,
        }
    }
}
