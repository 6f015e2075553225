//! Main memory: address ranges and the controllers that serve them.
//!
//! This module provides:
//! 1. **Ranges:** The physical address range backed by memory, optionally split across
//!    channels by line-granularity interleaving.
//! 2. **Controller:** One controller component per channel, attached behind the memory bus.

/// Memory controller components.
pub mod controller;

use serde::Serialize;

/// Channel selection for an interleaved range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Interleave {
    /// Bytes mapped to one channel before moving to the next.
    pub granularity: u64,
    /// Number of channels sharing the range.
    pub ways: usize,
    /// Channel this range selects.
    pub index: usize,
}

/// A contiguous physical address range, optionally restricted to one channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct AddrRange {
    /// First address.
    pub start: u64,
    /// Length in bytes.
    pub size: u64,
    /// Channel restriction, if the range is shared between channels.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub interleave: Option<Interleave>,
}

impl AddrRange {
    /// Creates a range covering `size` bytes from `start`.
    pub const fn new(start: u64, size: u64) -> Self {
        Self {
            start,
            size,
            interleave: None,
        }
    }

    /// One past the last address of the range.
    pub const fn end(&self) -> u64 {
        self.start.saturating_add(self.size)
    }

    /// Splits the range across `channels` at `granularity`-byte boundaries.
    ///
    /// A single channel gets the range unchanged.
    pub fn interleaved(self, channels: usize, granularity: u64) -> Vec<Self> {
        if channels <= 1 {
            return vec![self];
        }
        (0..channels)
            .map(|index| Self {
                interleave: Some(Interleave {
                    granularity,
                    ways: channels,
                    index,
                }),
                ..self
            })
            .collect()
    }
}
