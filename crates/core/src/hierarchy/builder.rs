//! Hierarchy construction.
//!
//! This module turns a `ValidatedHierarchy` into components and connections on a `Host`. It performs:
//! 1. **Cache creation:** One cache per entry, in entry order (`cpu.icache`, `cpu.dcache`,
//!    then `l<k>subsys.cache`).
//! 2. **L1 wiring:** CPU ports to the L1 caches, and the L1 caches to `l2bus` (or straight to
//!    the memory bus when there is a single level).
//! 3. **Lower levels:** Each level `k >= 2` gets its own crossbar `l<k>subsys.xbar` that feeds
//!    level `k + 1`, or the memory bus at the last level.
//!
//! With zero levels no caches are created and both CPU ports attach to the memory bus.

use crate::common::error::{BuildError, ConnectError};
use crate::soc::interconnect::CrossbarKind;
use crate::soc::port::{ComponentId, CpuPorts, Port};
use crate::soc::traits::Host;

use super::spec::HierarchySpec;
use super::validate::{HierarchyOptions, ValidatedHierarchy, validate};

/// Label of the crossbar joining both L1 caches to level 2.
pub const L2_BUS_NAME: &str = "l2bus";

/// Ids of everything the builder created.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct BuiltHierarchy {
    /// Caches in entry order; `caches[i]` was built from entry `i`.
    pub caches: Vec<ComponentId>,
    /// `l2bus` first, then the per-level crossbars from level 2 down.
    pub crossbars: Vec<ComponentId>,
}

/// Builds a validated hierarchy onto a host.
#[derive(Debug, Clone, Copy)]
pub struct HierarchyBuilder<'a> {
    hierarchy: &'a ValidatedHierarchy,
}

impl<'a> HierarchyBuilder<'a> {
    /// Creates a builder for `hierarchy`.
    pub const fn new(hierarchy: &'a ValidatedHierarchy) -> Self {
        Self { hierarchy }
    }

    /// Creates every cache and crossbar and wires them between `cpu` and `membus`.
    ///
    /// # Errors
    ///
    /// Returns the first connection the host refuses. Validation already ruled out
    /// every input-dependent failure, so an error here means the host and the
    /// builder disagree about port rules.
    pub fn build<H: Host + ?Sized>(
        &self,
        host: &mut H,
        cpu: CpuPorts,
        membus: ComponentId,
    ) -> Result<BuiltHierarchy, ConnectError> {
        let levels = self.hierarchy.levels();
        let mut built = BuiltHierarchy::default();

        if levels.is_empty() {
            tracing::debug!("attaching CPU ports directly to the memory bus");
            connect(host, cpu.instruction, Port::slave(membus))?;
            connect(host, cpu.data, Port::slave(membus))?;
            return Ok(built);
        }

        for (index, level) in levels.iter().enumerate() {
            let name = match index {
                0 => "cpu.icache".to_string(),
                1 => "cpu.dcache".to_string(),
                _ => format!("l{}subsys.cache", level.kind.level()),
            };
            let id = host.add_cache(&name, &level.params);
            tracing::debug!(
                cache = %name,
                id = %id,
                size = %level.params.size,
                assoc = level.params.assoc,
                "created cache"
            );
            built.caches.push(id);
        }

        let (icache, dcache) = (built.caches[0], built.caches[1]);
        connect(host, cpu.instruction, Port::cpu_side(icache))?;
        connect(host, cpu.data, Port::cpu_side(dcache))?;

        if self.hierarchy.level_count() == 1 {
            connect(host, Port::mem_side(icache), Port::slave(membus))?;
            connect(host, Port::mem_side(dcache), Port::slave(membus))?;
            return Ok(built);
        }

        let l2bus = host.add_crossbar(L2_BUS_NAME, CrossbarKind::L2);
        tracing::debug!(xbar = L2_BUS_NAME, id = %l2bus, "created crossbar");
        built.crossbars.push(l2bus);
        connect(host, Port::mem_side(icache), Port::slave(l2bus))?;
        connect(host, Port::mem_side(dcache), Port::slave(l2bus))?;
        connect(host, Port::master(l2bus), Port::cpu_side(built.caches[2]))?;

        for (index, resolved) in levels.iter().enumerate().skip(2) {
            let name = format!("l{}subsys.xbar", resolved.kind.level());
            let xbar = host.add_crossbar(&name, CrossbarKind::L2);
            tracing::debug!(xbar = %name, id = %xbar, "created crossbar");
            built.crossbars.push(xbar);

            connect(host, Port::mem_side(built.caches[index]), Port::slave(xbar))?;
            let below = match built.caches.get(index + 1) {
                Some(&next) => Port::cpu_side(next),
                None => Port::slave(membus),
            };
            connect(host, Port::master(xbar), below)?;
        }

        tracing::info!(
            caches = built.caches.len(),
            crossbars = built.crossbars.len(),
            "cache hierarchy constructed"
        );
        Ok(built)
    }
}

fn connect<H: Host + ?Sized>(
    host: &mut H,
    requestor: Port,
    responder: Port,
) -> Result<(), ConnectError> {
    host.connect(requestor, responder).inspect_err(|err| {
        tracing::error!(
            requestor = %requestor.role,
            responder = %responder.role,
            error = %err,
            "host refused connection"
        );
    })
}

/// Validates `spec` and, only if it passes, builds it onto `host`.
///
/// Nothing is created on the host when validation fails.
///
/// # Errors
///
/// `BuildError::Validation` for a rejected record, `BuildError::Wiring` if the
/// host refuses a connection.
pub fn build_hierarchy<H: Host + ?Sized>(
    spec: &HierarchySpec,
    options: &HierarchyOptions,
    host: &mut H,
    cpu: CpuPorts,
    membus: ComponentId,
) -> Result<BuiltHierarchy, BuildError> {
    let hierarchy = validate(spec, options)?;
    Ok(HierarchyBuilder::new(&hierarchy).build(host, cpu, membus)?)
}
