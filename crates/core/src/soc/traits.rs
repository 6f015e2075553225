//! Host system interface consumed by the hierarchy builder.
//!
//! The builder never touches `System` directly. It constructs components and
//! binds ports through this trait, which keeps construction testable against
//! mocks and recording hosts.

use crate::common::error::ConnectError;
use crate::config::CacheParams;
use crate::soc::interconnect::CrossbarKind;
use crate::soc::port::{ComponentId, Port};

/// A system that can own caches and crossbars and connect their ports.
///
/// Components are owned by the host for their whole lifetime; callers only
/// ever hold the returned ids.
pub trait Host {
    /// Constructs a cache component and returns its id.
    ///
    /// `name` is a label for reports; it is never used for lookup.
    fn add_cache(&mut self, name: &str, params: &CacheParams) -> ComponentId;

    /// Constructs a crossbar component and returns its id.
    fn add_crossbar(&mut self, name: &str, kind: CrossbarKind) -> ComponentId;

    /// Binds a requestor port to a responder port.
    ///
    /// # Errors
    ///
    /// Fails if either port does not exist, the directions are swapped, or a
    /// single-peer port is already bound.
    fn connect(&mut self, requestor: Port, responder: Port) -> Result<(), ConnectError>;
}
