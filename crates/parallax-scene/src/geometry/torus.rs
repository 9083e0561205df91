use std::f32::consts::TAU;

use glam::Vec3;

use super::{Geometry, Vertex};

/// Ring torus centered at the origin, lying in the XY plane.
///
/// `radius` is the distance from the center to the middle of the tube.
pub fn torus(radius: f32, tube: f32, radial_segments: u32, tubular_segments: u32) -> Geometry {
    let radial = radial_segments.max(3);
    let tubular = tubular_segments.max(3);

    let mut vertices = Vec::with_capacity(((radial + 1) * (tubular + 1)) as usize);
    for j in 0..=radial {
        let v = j as f32 / radial as f32 * TAU;
        for i in 0..=tubular {
            let u = i as f32 / tubular as f32 * TAU;

            let position = Vec3::new(
                (radius + tube * v.cos()) * u.cos(),
                (radius + tube * v.cos()) * u.sin(),
                tube * v.sin(),
            );
            let center = Vec3::new(radius * u.cos(), radius * u.sin(), 0.0);

            vertices.push(Vertex { position, normal: (position - center).normalize() });
        }
    }

    let row = tubular + 1;
    let mut indices = Vec::with_capacity((radial * tubular * 6) as usize);
    for j in 1..=radial {
        for i in 1..=tubular {
            let a = row * j + i - 1;
            let b = row * (j - 1) + i - 1;
            let c = row * (j - 1) + i;
            let d = row * j + i;
            indices.extend_from_slice(&[a, b, d, b, c, d]);
        }
    }

    Geometry::new(vertices, indices)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::assert_unit_normals;

    #[test]
    fn counts_match_segments() {
        let g = torus(0.6, 0.3, 12, 60);
        assert_eq!(g.vertices().len(), 13 * 61);
        assert_eq!(g.indices().len(), 12 * 60 * 6);
    }

    #[test]
    fn normals_are_unit() {
        assert_unit_normals(&torus(0.6, 0.3, 12, 60));
    }

    #[test]
    fn vertices_lie_on_tube_surface() {
        let g = torus(0.6, 0.3, 12, 60);
        for v in g.vertices() {
            let ring = Vec3::new(v.position.x, v.position.y, 0.0).normalize() * 0.6;
            assert!(((v.position - ring).length() - 0.3).abs() < 1e-4);
        }
    }

    #[test]
    fn outer_extent() {
        let g = torus(0.6, 0.3, 12, 60);
        let max_x = g.vertices().iter().map(|v| v.position.x).fold(f32::MIN, f32::max);
        assert!((max_x - 0.9).abs() < 1e-5);
    }
}
