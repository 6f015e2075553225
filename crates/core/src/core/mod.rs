//! Processor model as seen by the memory system.
//!
//! Only the CPU's externally visible shape matters here: its identity, the
//! trace inputs it replays, and the two uncached memory ports the cache
//! hierarchy attaches to. Pipeline timing is out of scope.

/// Trace replay CPU definition.
pub mod cpu;

pub use self::cpu::Cpu;
