/// Component creation and wiring.
pub mod construction;

/// Generated hierarchies of every depth.
pub mod properties;
