//! CLI command implementations.

pub mod common;
pub mod effects;
pub mod impulses;
pub mod presets;
pub mod process;
