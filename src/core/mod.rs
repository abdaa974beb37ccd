//! Core modules for template deployment.
//!
//! The bundled template set, the remap rules that place it, and the engine
//! that writes it into a target project.

pub mod assets;
pub mod error;
pub mod output;
pub mod remap;
pub mod scaffold;
pub mod telemetry;
