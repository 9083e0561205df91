use glam::{EulerRot, Mat4, Vec3};

use crate::geometry::{Geometry, Shape};
use crate::material::MaterialId;

/// A section mesh: immutable geometry, shared material, animated rotation.
#[derive(Debug, Clone)]
pub struct Mesh {
    pub shape: Shape,
    pub geometry: Geometry,
    pub material: MaterialId,
    pub position: Vec3,
    /// Euler angles in radians, applied in X, Y, Z order.
    pub rotation: Vec3,
}

impl Mesh {
    pub fn new(shape: Shape, material: MaterialId, position: Vec3) -> Self {
        Self {
            shape,
            geometry: shape.build(),
            material,
            position,
            rotation: Vec3::ZERO,
        }
    }

    /// Advances the rotation by `rate * dt` on the x and y axes.
    #[inline]
    pub fn spin(&mut self, rate_x: f32, rate_y: f32, dt: f32) {
        self.rotation.x += dt * rate_x;
        self.rotation.y += dt * rate_y;
    }

    pub fn model_matrix(&self) -> Mat4 {
        Mat4::from_translation(self.position)
            * Mat4::from_euler(EulerRot::XYZ, self.rotation.x, self.rotation.y, self.rotation.z)
    }
}
