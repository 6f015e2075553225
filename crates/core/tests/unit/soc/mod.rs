/// Crossbar timing and memory controllers.
pub mod components;
