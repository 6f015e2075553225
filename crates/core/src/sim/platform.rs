//! End-to-end assembly of a configured platform.
//!
//! A `Platform` is the result of one configuration run: options checked,
//! system created, hierarchy validated and built onto it, and the final graph
//! checked for dangling ports and cycles.

use crate::common::error::{BuildError, Error};
use crate::config::Config;
use crate::hierarchy::builder::{BuiltHierarchy, HierarchyBuilder};
use crate::hierarchy::spec::HierarchySpec;
use crate::hierarchy::validate::{HierarchyOptions, validate};
use crate::soc::builder::System;

/// A fully wired system and the hierarchy built into it.
#[derive(Debug, Clone)]
pub struct Platform {
    /// The system and all of its components.
    pub system: System,
    /// Ids of the caches and crossbars the hierarchy added.
    pub hierarchy: BuiltHierarchy,
}

impl Platform {
    /// Assembles a platform from options and a hierarchy record.
    ///
    /// The hierarchy is validated before the system is created, so a rejected
    /// record never produces a partial system.
    ///
    /// # Errors
    ///
    /// `Error::Setup` for unsupported options, `Error::Build` for a rejected or
    /// unwireable hierarchy, `Error::Topology` if the result is not a connected DAG.
    pub fn assemble(config: &Config, spec: &HierarchySpec) -> Result<Self, Error> {
        config.validate()?;
        let validated = validate(spec, &HierarchyOptions::from(config))?;

        let mut system = System::new(config);
        let cpu = system.cpu_ports();
        let membus = system.membus();
        let hierarchy = HierarchyBuilder::new(&validated)
            .build(&mut system, cpu, membus)
            .map_err(BuildError::from)?;

        system.check_topology()?;
        tracing::info!(
            components = system.components().len(),
            connections = system.connections().len(),
            "platform assembled"
        );
        Ok(Self { system, hierarchy })
    }
}
