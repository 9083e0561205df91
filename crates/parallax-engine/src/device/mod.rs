//! GPU device + surface management.
//!
//! This module is responsible for:
//! - creating the wgpu Instance/Adapter/Device/Queue
//! - configuring the Surface (swapchain) and the matching depth buffer
//! - acquiring frames and providing encoders/views for rendering

mod context;
mod depth;
mod error;
mod init;
mod surface;

pub use context::{Gpu, GpuFrame};
pub use depth::DEPTH_FORMAT;
pub use error::SurfaceErrorAction;
pub use init::GpuInit;
