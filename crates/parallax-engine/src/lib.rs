//! Parallax engine crate.
//!
//! Platform and GPU runtime for the section scene: window + event loop,
//! wgpu device and surface, input translation, frame timing, logging and the
//! renderers that draw a [`parallax_scene::scene::Scene`].

pub mod core;
pub mod device;
pub mod input;
pub mod logging;
pub mod render;
pub mod time;
pub mod window;
