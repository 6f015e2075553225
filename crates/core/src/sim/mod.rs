//! Configuration runs.
//!
//! Loads the hierarchy and configuration documents and assembles them into a
//! checked `Platform`.

pub mod loader;
pub mod platform;

pub use loader::{load_config, load_hierarchy, parse_hierarchy};
pub use platform::Platform;
