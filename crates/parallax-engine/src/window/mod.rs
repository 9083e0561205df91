//! Window + runtime loop.
//!
//! Owns the `winit` EventLoop and the single window, and wires them to the
//! GPU layer. The application decides the drawable size: the runtime reports
//! resizes as input events and leaves `Gpu::resize` to the app.

mod runtime;

pub use runtime::{Runtime, RuntimeConfig};
