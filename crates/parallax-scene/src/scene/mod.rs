//! The fixed scene graph.
//!
//! Responsibilities:
//! - own every renderable object for the lifetime of the application
//! - keep the mesh material shared (one `MaterialId` for all section meshes)
//! - expose per-object transforms for the renderer

mod builder;
mod light;
mod mesh;
mod particles;

pub use light::DirectionalLight;
pub use mesh::Mesh;
pub use particles::Particles;

use crate::camera::CameraRig;
use crate::material::{MaterialId, Materials, Textures};

/// Everything that gets rendered, plus the camera rig it is viewed from.
#[derive(Debug, Clone)]
pub struct Scene {
    pub textures: Textures,
    pub materials: Materials,
    /// One mesh per page section, top to bottom.
    pub meshes: Vec<Mesh>,
    pub particles: Particles,
    pub light: DirectionalLight,
    pub rig: CameraRig,
    mesh_material: MaterialId,
}

impl Scene {
    /// Material shared by every section mesh.
    #[inline]
    pub fn mesh_material(&self) -> MaterialId {
        self.mesh_material
    }

    /// Material of the particle cloud.
    #[inline]
    pub fn particle_material(&self) -> MaterialId {
        self.particles.material
    }
}
