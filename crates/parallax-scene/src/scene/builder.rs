use glam::Vec3;
use rand::Rng;

use crate::camera::CameraRig;
use crate::config::{SECTION_COUNT, SceneConfig};
use crate::geometry::Shape;
use crate::material::{
    Material, Materials, PointsMaterial, TextureFilter, TextureSlot, Textures, ToonMaterial,
};

use super::{DirectionalLight, Mesh, Particles, Scene};

/// Section shapes, top to bottom, with their horizontal offsets.
const SECTIONS: [(Shape, f32); SECTION_COUNT] = [
    (
        Shape::Torus { radius: 0.6, tube: 0.3, radial_segments: 12, tubular_segments: 60 },
        1.0,
    ),
    (Shape::Cone { radius: 0.8, height: 1.2, radial_segments: 20 }, -1.0),
    (
        Shape::TorusKnot {
            radius: 0.4,
            tube: 0.15,
            tubular_segments: 100,
            radial_segments: 16,
            p: 2,
            q: 3,
        },
        1.0,
    ),
];

impl Scene {
    /// Builds the page scene.
    ///
    /// Deterministic apart from particle positions, which are drawn from `rng`.
    /// The camera starts with a square aspect; the viewport manager corrects it
    /// on the first resize.
    pub fn build<R: Rng + ?Sized>(config: &SceneConfig, rng: &mut R) -> Self {
        let mut textures = Textures::new();
        let gradient_map = textures.insert(TextureSlot {
            path: config.gradient_map_path.clone(),
            filter: TextureFilter::Nearest,
        });
        let alpha_map = textures.insert(TextureSlot {
            path: config.particle_alpha_map_path.clone(),
            filter: TextureFilter::Linear,
        });

        let mut materials = Materials::new();
        let mesh_material = materials.insert(Material::Toon(ToonMaterial {
            color: config.material_color,
            gradient_map,
        }));
        let particle_material = materials.insert(Material::Points(PointsMaterial {
            color: config.material_color,
            size: config.particle_size,
            size_attenuation: true,
            transparent: true,
            alpha_map,
            depth_write: false,
            depth_test: true,
        }));

        let meshes = SECTIONS
            .iter()
            .enumerate()
            .map(|(i, &(shape, x))| {
                let y = -config.objects_distance * i as f32;
                Mesh::new(shape, mesh_material, Vec3::new(x, y, 0.0))
            })
            .collect();

        let particles = Particles::scatter(
            rng,
            config.particle_count,
            config.particle_spread,
            config.particle_y_range(),
            particle_material,
        );

        let light = DirectionalLight {
            position: config.light_position,
            target: Vec3::ZERO,
            color: config.light_color,
            intensity: config.light_intensity,
        };

        log::debug!(
            "scene built: {} meshes, {} particles, {} materials",
            SECTION_COUNT,
            particles.len(),
            materials.len()
        );

        Scene {
            textures,
            materials,
            meshes,
            particles,
            light,
            rig: CameraRig::new(&config.camera, 1.0),
            mesh_material,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use rand::SeedableRng;
    use rand::rngs::StdRng;

    use super::*;

    fn scene() -> Scene {
        Scene::build(&SceneConfig::default(), &mut StdRng::seed_from_u64(7))
    }

    // ── meshes ────────────────────────────────────────────────────────────

    #[test]
    fn three_meshes_share_one_material() {
        let s = scene();
        assert_eq!(s.meshes.len(), 3);
        assert!(s.meshes.iter().all(|m| m.material == s.mesh_material()));
        assert_ne!(s.mesh_material(), s.particle_material());
    }

    #[test]
    fn meshes_have_distinct_shapes() {
        let s = scene();
        let names: Vec<_> = s.meshes.iter().map(|m| m.shape.name()).collect();
        assert_eq!(names, ["torus", "cone", "torus knot"]);
    }

    #[test]
    fn meshes_step_down_one_section_each() {
        let s = scene();
        let positions: Vec<_> = s.meshes.iter().map(|m| m.position).collect();
        assert_eq!(
            positions,
            [Vec3::new(1.0, 0.0, 0.0), Vec3::new(-1.0, -4.0, 0.0), Vec3::new(1.0, -8.0, 0.0)]
        );
    }

    #[test]
    fn meshes_start_unrotated() {
        assert!(scene().meshes.iter().all(|m| m.rotation == Vec3::ZERO));
    }

    // ── materials ─────────────────────────────────────────────────────────

    #[test]
    fn toon_material_uses_nearest_gradient() {
        let s = scene();
        let toon = s.materials.get(s.mesh_material()).as_toon().unwrap();
        let slot = s.textures.get(toon.gradient_map);
        assert_eq!(slot.filter, TextureFilter::Nearest);
        assert_eq!(slot.path, PathBuf::from("textures/gradients/5.jpg"));
        assert_eq!(toon.color.to_hex(), "#009999");
    }

    #[test]
    fn points_material_is_unsorted_transparent() {
        let s = scene();
        let points = s.materials.get(s.particle_material()).as_points().unwrap();
        assert!(points.transparent);
        assert!(!points.depth_write);
        assert!(points.depth_test);
        assert!(points.size_attenuation);
        assert_eq!(points.size, 0.03);
        assert_eq!(
            s.textures.get(points.alpha_map).path,
            PathBuf::from("textures/gradients/disc5.png")
        );
    }

    // ── particles ─────────────────────────────────────────────────────────

    #[test]
    fn particle_buffer_has_2000_triples() {
        let s = scene();
        assert_eq!(s.particles.positions().len(), 2000 * 3);
        assert_eq!(s.particles.len(), 2000);
    }

    #[test]
    fn particles_stay_inside_the_box() {
        let s = scene();
        for p in s.particles.positions().chunks(3) {
            assert!((-5.0..5.0).contains(&p[0]), "x = {}", p[0]);
            assert!(p[1] >= -10.0 && p[1] <= 2.0, "y = {}", p[1]);
            assert!((-5.0..5.0).contains(&p[2]), "z = {}", p[2]);
        }
    }

    #[test]
    fn particle_positions_depend_on_rng() {
        let config = SceneConfig::default();
        let a = Scene::build(&config, &mut StdRng::seed_from_u64(1));
        let b = Scene::build(&config, &mut StdRng::seed_from_u64(2));
        let c = Scene::build(&config, &mut StdRng::seed_from_u64(1));
        assert_ne!(a.particles.positions(), b.particles.positions());
        assert_eq!(a.particles.positions(), c.particles.positions());
    }

    #[test]
    fn particles_start_flagged_for_upload() {
        let mut s = scene();
        assert!(s.particles.take_needs_update());
        assert!(!s.particles.needs_update());
    }

    // ── light + camera ────────────────────────────────────────────────────

    #[test]
    fn light_is_white_from_upper_right() {
        let s = scene();
        assert_eq!(s.light.color, crate::Color::WHITE);
        assert_eq!(s.light.position, Vec3::new(1.0, 1.0, 0.0));
    }

    #[test]
    fn camera_sits_six_units_back() {
        let s = scene();
        assert_eq!(s.rig.world_position(), Vec3::new(0.0, 0.0, 6.0));
        assert_eq!(s.rig.camera.fov_y_degrees, 35.0);
    }
}
