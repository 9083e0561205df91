use std::f32::consts::TAU;

use glam::Vec3;

use super::{Geometry, Vertex};

/// Cone centered at the origin, apex at `+height / 2`, closed base at
/// `-height / 2`. One height segment.
pub fn cone(radius: f32, height: f32, radial_segments: u32) -> Geometry {
    let radial = radial_segments.max(3);
    let half = height * 0.5;
    let slope = radius / height;

    let mut vertices = Vec::new();
    let mut indices = Vec::new();

    // Side: row 0 is the apex ring (radius 0), row 1 the base ring.
    for row in 0..=1u32 {
        let r = row as f32 * radius;
        let y = half - row as f32 * height;
        for x in 0..=radial {
            let theta = x as f32 / radial as f32 * TAU;
            let (sin, cos) = theta.sin_cos();
            vertices.push(Vertex {
                position: Vec3::new(r * sin, y, r * cos),
                normal: Vec3::new(sin, slope, cos).normalize(),
            });
        }
    }

    let row = radial + 1;
    for x in 0..radial {
        // The apex ring collapses to a point, so only one triangle per column.
        let b = row + x;
        let c = row + x + 1;
        let d = x + 1;
        indices.extend_from_slice(&[b, c, d]);
    }

    // Base cap: one center vertex per segment so each triangle keeps its own apex.
    let down = Vec3::NEG_Y;
    let center_start = vertices.len() as u32;
    for _ in 0..radial {
        vertices.push(Vertex { position: Vec3::new(0.0, -half, 0.0), normal: down });
    }
    let ring_start = vertices.len() as u32;
    for x in 0..=radial {
        let theta = x as f32 / radial as f32 * TAU;
        let (sin, cos) = theta.sin_cos();
        let position = Vec3::new(radius * sin, -half, radius * cos);
        vertices.push(Vertex { position, normal: down });
    }
    for x in 0..radial {
        let c = center_start + x;
        let i = ring_start + x;
        indices.extend_from_slice(&[i + 1, i, c]);
    }

    Geometry::new(vertices, indices)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::assert_unit_normals;

    #[test]
    fn counts_match_segments() {
        let g = cone(0.8, 1.2, 20);
        // side: 2 rings of 21, cap: 20 centers + ring of 21
        assert_eq!(g.vertices().len(), 42 + 20 + 21);
        assert_eq!(g.triangle_count(), 20 + 20);
    }

    #[test]
    fn normals_are_unit() {
        assert_unit_normals(&cone(0.8, 1.2, 20));
    }

    #[test]
    fn apex_and_base_heights() {
        let g = cone(0.8, 1.2, 20);
        let ys: Vec<f32> = g.vertices().iter().map(|v| v.position.y).collect();
        let max = ys.iter().copied().fold(f32::MIN, f32::max);
        let min = ys.iter().copied().fold(f32::MAX, f32::min);
        assert!((max - 0.6).abs() < 1e-6);
        assert!((min + 0.6).abs() < 1e-6);
    }

    fn corners(v: &[Vertex], tri: &[u32]) -> (Vec3, Vec3, Vec3) {
        (v[tri[0] as usize].position, v[tri[1] as usize].position, v[tri[2] as usize].position)
    }

    #[test]
    fn cap_faces_point_down() {
        let g = cone(0.8, 1.2, 20);
        let v = g.vertices();
        // Last 20 triangles are the cap.
        for tri in g.indices().chunks(3).skip(20) {
            let (a, b, c) = corners(v, tri);
            let n = (b - a).cross(c - a);
            assert!(n.y < 0.0, "cap triangle faces {n:?}");
        }
    }

    #[test]
    fn side_faces_point_outward() {
        let g = cone(0.8, 1.2, 20);
        let v = g.vertices();
        for tri in g.indices().chunks(3).take(20) {
            let (a, b, c) = corners(v, tri);
            let n = (b - a).cross(c - a);
            let centroid = (a + b + c) / 3.0;
            let radial = Vec3::new(centroid.x, 0.0, centroid.z);
            assert!(n.dot(radial) > 0.0);
        }
    }
}
