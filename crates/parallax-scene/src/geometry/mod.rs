//! Parametric mesh geometry.
//!
//! Generators produce indexed triangle lists with per-vertex outward normals.
//! Front faces are counter-clockwise, +Y up, right-handed.

mod cone;
mod torus;
mod torus_knot;

use glam::Vec3;

pub use cone::cone;
pub use torus::torus;
pub use torus_knot::torus_knot;

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Vertex {
    pub position: Vec3,
    pub normal: Vec3,
}

/// Immutable indexed triangle mesh.
#[derive(Debug, Clone, PartialEq)]
pub struct Geometry {
    vertices: Vec<Vertex>,
    indices: Vec<u32>,
}

impl Geometry {
    pub(crate) fn new(vertices: Vec<Vertex>, indices: Vec<u32>) -> Self {
        debug_assert!(indices.len() % 3 == 0);
        debug_assert!(indices.iter().all(|&i| (i as usize) < vertices.len()));
        Self { vertices, indices }
    }

    #[inline]
    pub fn vertices(&self) -> &[Vertex] {
        &self.vertices
    }

    #[inline]
    pub fn indices(&self) -> &[u32] {
        &self.indices
    }

    #[inline]
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }
}

/// Shape descriptor a mesh is built from.
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum Shape {
    /// Ring torus in the XY plane.
    Torus {
        radius: f32,
        tube: f32,
        radial_segments: u32,
        tubular_segments: u32,
    },
    /// Cone along +Y with its apex up and a closed base.
    Cone {
        radius: f32,
        height: f32,
        radial_segments: u32,
    },
    /// (p, q) torus knot.
    TorusKnot {
        radius: f32,
        tube: f32,
        tubular_segments: u32,
        radial_segments: u32,
        p: u32,
        q: u32,
    },
}

impl Shape {
    pub fn build(&self) -> Geometry {
        match *self {
            Shape::Torus { radius, tube, radial_segments, tubular_segments } => {
                torus(radius, tube, radial_segments, tubular_segments)
            }
            Shape::Cone { radius, height, radial_segments } => {
                cone(radius, height, radial_segments)
            }
            Shape::TorusKnot { radius, tube, tubular_segments, radial_segments, p, q } => {
                torus_knot(radius, tube, tubular_segments, radial_segments, p, q)
            }
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Shape::Torus { .. } => "torus",
            Shape::Cone { .. } => "cone",
            Shape::TorusKnot { .. } => "torus knot",
        }
    }
}

#[cfg(test)]
pub(crate) fn assert_unit_normals(g: &Geometry) {
    for v in g.vertices() {
        assert!((v.normal.length() - 1.0).abs() < 1e-4, "normal {:?} is not unit", v.normal);
    }
}
