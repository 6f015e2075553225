//! Error types for loading, validating, and wiring a system.
//!
//! This module groups failures by the phase that raises them:
//! 1. **Values:** Unit-suffixed quantities that fail to parse (`ValueParseError`).
//! 2. **Loading:** Unreadable, unsupported, or malformed documents (`LoadError`).
//! 3. **Validation:** Hierarchy records that break ordering or naming rules (`HierarchyError`).
//! 4. **Wiring:** Port connections the host system refuses (`ConnectError`, `BuildError`).
//! 5. **Topology:** Post-construction graph checks (`TopologyError`).
//! 6. **Setup:** Option combinations this configuration flow does not support (`SetupError`).
//!
//! Every error is terminal for a configuration run; none are retried.

use std::path::PathBuf;

use crate::config::CpuType;
use crate::soc::port::{ComponentId, PortRole};

/// A unit-suffixed quantity (`"32kB"`, `"2GHz"`, `"1.0V"`) could not be parsed.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValueParseError {
    /// The string is not a number followed by a known unit.
    #[error("invalid {quantity} `{input}`: {reason}")]
    Invalid {
        /// Kind of quantity being parsed.
        quantity: &'static str,
        /// The offending input.
        input: String,
        /// What was wrong with it.
        reason: &'static str,
    },
    /// A named enumeration value was not recognised.
    #[error("unknown {quantity} `{input}`, expected one of: {expected}")]
    UnknownVariant {
        /// Kind of value being parsed.
        quantity: &'static str,
        /// The offending input.
        input: String,
        /// Accepted spellings.
        expected: &'static str,
    },
}

/// Failure to turn a document on disk (or in memory) into a typed record.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    /// The path does not name a JSON document.
    #[error(
        "`{}` is not a JSON document; cache hierarchies are described in .json files",
        path.display()
    )]
    UnsupportedDocumentFormat {
        /// Path that was rejected.
        path: PathBuf,
    },

    /// The document could not be read.
    #[error("could not read `{}`: {source}", path.display())]
    Io {
        /// Path that failed to open or read.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The document is not valid JSON or does not match the expected schema.
    #[error("could not parse {origin}: {source}")]
    Parse {
        /// Path of the document, or `<string>` for in-memory input.
        origin: String,
        /// Underlying deserialization error.
        #[source]
        source: serde_json::Error,
    },

    /// The document declares a negative number of cache levels.
    #[error("number of cache levels must be non-negative, got {0}")]
    InvalidLevelCount(i64),
}

/// A hierarchy record broke one of the ordering, naming, or parameter rules.
///
/// Variants are listed in the order the validator checks them.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum HierarchyError {
    /// Entry 0 is missing or is not the L1 instruction cache.
    #[error(
        "first cache configuration has to be of type L1I, found {}",
        .found.as_deref().unwrap_or("no entry")
    )]
    InvalidFirstEntry {
        /// The `type` found at index 0, if any.
        found: Option<String>,
    },

    /// Entry 1 is missing or is not the L1 data cache.
    #[error(
        "second cache configuration has to be of type L1D, found {}",
        .found.as_deref().unwrap_or("no entry")
    )]
    InvalidSecondEntry {
        /// The `type` found at index 1, if any.
        found: Option<String>,
    },

    /// The number of entries does not match the declared level count.
    #[error("{found} cache configurations provided for {level_count} levels, expected {expected}")]
    CountMismatch {
        /// Declared number of levels.
        level_count: usize,
        /// Number of entries the level count implies.
        expected: usize,
        /// Number of entries actually present.
        found: usize,
    },

    /// The declared level count has no matching entry count.
    #[error("level count {level_count} is too large to describe with cache configurations")]
    LevelCountOverflow {
        /// Declared number of levels.
        level_count: usize,
    },

    /// A level name at index 2 or later is not `L<number>`.
    #[error(
        "cache type `{name}` at index {index} does not follow the naming convention \
         L<num> with no letters after the level number"
    )]
    MalformedLevelName {
        /// Position of the entry.
        index: usize,
        /// The rejected `type` string.
        name: String,
    },

    /// A level entry is out of place in the hierarchy.
    #[error("cache configuration {index} is out of place: expected L{expected}, got L{got}")]
    OutOfOrderLevel {
        /// Position of the entry.
        index: usize,
        /// Level number required at this position.
        expected: usize,
        /// Level number the entry declared.
        got: usize,
    },

    /// A level 2+ entry omits a parameter that has no default.
    #[error("cache configuration {index} ({name}) is missing required parameter `{field}`")]
    MissingParameter {
        /// Position of the entry.
        index: usize,
        /// The entry's `type` string.
        name: String,
        /// Document field name.
        field: &'static str,
    },

    /// A parameter value cannot describe a real cache.
    #[error("cache configuration {index} ({name}) has invalid `{field}`: {reason}")]
    InvalidParameter {
        /// Position of the entry.
        index: usize,
        /// The entry's `type` string.
        name: String,
        /// Document field name.
        field: &'static str,
        /// Why the value was rejected.
        reason: String,
    },
}

/// The host system refused a port connection.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConnectError {
    /// No component is registered under this id.
    #[error("no component with id {0}")]
    UnknownComponent(ComponentId),

    /// The component does not expose a port with this role.
    #[error("`{component}` has no `{role}` port")]
    NoSuchPort {
        /// Component name.
        component: String,
        /// Requested port role.
        role: PortRole,
    },

    /// A responder port was used as a requestor or vice versa.
    #[error("`{component}.{role}` cannot be used as a {expected} port")]
    WrongDirection {
        /// Component name.
        component: String,
        /// Port role.
        role: PortRole,
        /// The direction the caller needed (`requestor` or `responder`).
        expected: &'static str,
    },

    /// A single-peer port is already bound.
    #[error("`{component}.{role}` is already connected")]
    AlreadyConnected {
        /// Component name.
        component: String,
        /// Port role.
        role: PortRole,
    },
}

/// Failure of a full validate-then-construct hierarchy build.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BuildError {
    /// The record failed validation; nothing was constructed.
    #[error(transparent)]
    Validation(#[from] HierarchyError),

    /// The host rejected a connection after validation passed. This points at a
    /// sequencing defect in the builder rather than bad input.
    #[error("internal wiring defect: {0}")]
    Wiring(#[from] ConnectError),
}

/// A finished system graph is not a connected, acyclic topology.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TopologyError {
    /// A port was left without a peer.
    #[error("`{component}.{role}` is not connected")]
    DanglingPort {
        /// Component name.
        component: String,
        /// Port role.
        role: PortRole,
    },

    /// Following requestor-to-responder edges returns to a component.
    #[error("connection cycle through `{component}`")]
    Cycle {
        /// A component on the cycle.
        component: String,
    },
}

/// Options describe a system this configuration flow cannot assemble.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SetupError {
    /// Only trace replay CPUs are supported.
    #[error("this configuration is for elastic trace replay, use --cpu-type=TraceCPU (got {0})")]
    UnsupportedCpuType(CpuType),

    /// Trace replay runs on exactly one CPU.
    #[error("trace replay supports exactly one CPU (requested {0})")]
    UnsupportedCpuCount(usize),

    /// The Ruby memory system was requested.
    #[error("Ruby is not supported; the trace CPU has only been tested with the classic memory system")]
    RubyUnsupported,

    /// No cache hierarchy document was given.
    #[error("a cache specification file is required (--cache-specs-file)")]
    MissingCacheSpecs,

    /// Memory channels must be a non-zero power of two for address interleaving.
    #[error("memory channel count must be a non-zero power of two, got {0}")]
    InvalidChannelCount(usize),

    /// The cache line size cannot be used for address interleaving.
    #[error("cache line size must be a non-zero power of two, got {0}")]
    InvalidCacheLineSize(u64),
}

/// Top-level error for a complete configuration run.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Option validation failed.
    #[error(transparent)]
    Setup(#[from] SetupError),

    /// A document could not be loaded.
    #[error(transparent)]
    Load(#[from] LoadError),

    /// The hierarchy could not be validated or built.
    #[error(transparent)]
    Build(#[from] BuildError),

    /// The assembled graph is malformed.
    #[error(transparent)]
    Topology(#[from] TopologyError),

    /// A report could not be written.
    #[error("could not write `{}`: {source}", path.display())]
    Io {
        /// Destination path.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// A report could not be serialized.
    #[error("could not serialize report: {0}")]
    Serialize(#[from] serde_json::Error),
}

impl From<HierarchyError> for Error {
    fn from(err: HierarchyError) -> Self {
        Self::Build(BuildError::Validation(err))
    }
}
