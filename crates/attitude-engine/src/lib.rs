//! Attitude engine crate.
//!
//! Owns the platform and GPU runtime pieces used by the indicator: the winit
//! loop, the wgpu device/surface, keyboard state, frame timing and the flat
//! mesh renderer.

pub mod device;
pub mod window;
pub mod input;
pub mod time;
pub mod core;

pub mod logging;
pub mod render;
pub mod paint;
