//! GPU rendering subsystem.
//!
//! Each renderer owns its GPU resources (pipelines, buffers, bind groups) and
//! creates them lazily on first use.
//!
//! Convention:
//! - 3D passes use the scene's right-handed world space and a `[0, 1]` depth
//!   range; they test against the shared depth buffer.
//! - the panel overlay is in logical pixels (top-left origin, +Y down) and is
//!   converted to NDC using a viewport uniform.

mod common;
mod ctx;
mod mesh;
mod panel;
mod points;
mod scene_renderer;
mod texture;

pub use ctx::{RenderCtx, RenderTarget};
pub use mesh::ToonMeshRenderer;
pub use panel::{PanelQuad, PanelRenderer, panel_quads};
pub use points::PointsRenderer;
pub use scene_renderer::{SceneFrame, SceneRenderer};
pub use texture::{GpuTexture, TextureImage};
