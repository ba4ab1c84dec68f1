//! nodeweave engine crate.
//!
//! Owns the platform + GPU runtime pieces the graph editor draws through:
//! window/event loop, input translation, device/surface, draw lists and
//! the instanced shape renderers.

pub mod device;
pub mod window;
pub mod input;
pub mod core;

pub mod logging;
pub mod coords;
pub mod render;
pub mod paint;
pub mod scene;
pub mod text;
