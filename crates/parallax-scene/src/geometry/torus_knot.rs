use std::f32::consts::TAU;

use glam::Vec3;

use super::{Geometry, Vertex};

/// `(p, q)` torus knot: the curve winds `p` times around the axis of
/// rotational symmetry and `q` times around the interior circle.
pub fn torus_knot(
    radius: f32,
    tube: f32,
    tubular_segments: u32,
    radial_segments: u32,
    p: u32,
    q: u32,
) -> Geometry {
    let tubular = tubular_segments.max(3);
    let radial = radial_segments.max(3);
    let (p, q) = (p.max(1) as f32, q as f32);

    let mut vertices = Vec::with_capacity(((tubular + 1) * (radial + 1)) as usize);
    for i in 0..=tubular {
        let u = i as f32 / tubular as f32 * p * TAU;

        // Frenet-like frame from two nearby samples of the curve.
        let p1 = curve_point(u, p, q, radius);
        let p2 = curve_point(u + 0.01, p, q, radius);
        let t = p2 - p1;
        let n = p2 + p1;
        let b = t.cross(n).normalize();
        let n = b.cross(t).normalize();

        for j in 0..=radial {
            let v = j as f32 / radial as f32 * TAU;
            let cx = -tube * v.cos();
            let cy = tube * v.sin();

            let position = p1 + n * cx + b * cy;
            vertices.push(Vertex { position, normal: (position - p1).normalize() });
        }
    }

    let row = radial + 1;
    let mut indices = Vec::with_capacity((tubular * radial * 6) as usize);
    for j in 1..=tubular {
        for i in 1..=radial {
            let a = row * (j - 1) + (i - 1);
            let b = row * j + (i - 1);
            let c = row * j + i;
            let d = row * (j - 1) + i;
            indices.extend_from_slice(&[a, b, d, b, c, d]);
        }
    }

    Geometry::new(vertices, indices)
}

fn curve_point(u: f32, p: f32, q: f32, radius: f32) -> Vec3 {
    let qu_over_p = q / p * u;
    let cs = qu_over_p.cos();
    Vec3::new(
        radius * (2.0 + cs) * 0.5 * u.cos(),
        radius * (2.0 + cs) * 0.5 * u.sin(),
        radius * qu_over_p.sin() * 0.5,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::assert_unit_normals;

    #[test]
    fn counts_match_segments() {
        let g = torus_knot(0.4, 0.15, 100, 16, 2, 3);
        assert_eq!(g.vertices().len(), 101 * 17);
        assert_eq!(g.indices().len(), 100 * 16 * 6);
    }

    #[test]
    fn normals_are_unit() {
        assert_unit_normals(&torus_knot(0.4, 0.15, 100, 16, 2, 3));
    }

    #[test]
    fn curve_closes_after_p_turns() {
        let (p, q) = (2.0, 3.0);
        let start = curve_point(0.0, p, q, 0.4);
        let end = curve_point(p * TAU, p, q, 0.4);
        assert!((start - end).length() < 1e-4);
    }

    #[test]
    fn tube_keeps_its_radius() {
        let g = torus_knot(0.4, 0.15, 100, 16, 2, 3);
        for ring in g.vertices().chunks(17) {
            let center = curve_point_for_ring(ring);
            for v in ring {
                assert!(((v.position - center).length() - 0.15).abs() < 1e-3);
            }
        }
    }

    fn curve_point_for_ring(ring: &[Vertex]) -> Vec3 {
        // position - normal * tube recovers the curve sample the ring was swept around.
        ring[0].position - ring[0].normal * 0.15
    }
}
