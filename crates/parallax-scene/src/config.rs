//! Scene configuration.
//!
//! All constants of the page live here so the builder, the scheduler and the
//! tests read the same numbers. Defaults reproduce the shipped page.

use std::path::PathBuf;

use glam::{Vec2, Vec3};

use crate::color::Color;

/// Number of page sections; one mesh per section.
pub const SECTION_COUNT: usize = 3;

/// Perspective camera parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct CameraConfig {
    /// Vertical field of view in degrees.
    pub fov_y_degrees: f32,
    pub near: f32,
    pub far: f32,
    /// Camera position inside its parallax group.
    pub local_position: Vec3,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            fov_y_degrees: 35.0,
            near: 0.1,
            far: 100.0,
            local_position: Vec3::new(0.0, 0.0, 6.0),
        }
    }
}

/// Everything the scene builder and frame scheduler need.
#[derive(Debug, Clone, PartialEq)]
pub struct SceneConfig {
    /// Vertical world-space distance between consecutive section meshes.
    pub objects_distance: f32,

    /// Initial color of both the mesh material and the particle material.
    pub material_color: Color,

    pub particle_count: usize,
    /// Horizontal and depth extent of the particle box.
    pub particle_spread: f32,
    /// Point size in world units (attenuated by distance).
    pub particle_size: f32,

    /// Cursor offset → camera group target multiplier.
    pub parallax_amplitude: f32,
    /// Exponential easing rate of the camera group, per second.
    pub smoothing_factor: f32,
    /// Mesh rotation speed in radians per second, `(x, y)`.
    pub rotation_rate: Vec2,

    pub camera: CameraConfig,

    pub light_position: Vec3,
    pub light_color: Color,
    pub light_intensity: f32,

    /// Upper bound applied to the device pixel ratio.
    pub max_pixel_ratio: f32,

    /// Scroll distance of one wheel "line", in logical pixels.
    pub scroll_line_height: f32,

    /// Root against which texture paths are resolved.
    pub asset_root: PathBuf,
    pub gradient_map_path: PathBuf,
    pub particle_alpha_map_path: PathBuf,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            objects_distance: 4.0,
            material_color: Color::from_srgb_u8(0x00, 0x99, 0x99),
            particle_count: 2000,
            particle_spread: 10.0,
            particle_size: 0.03,
            parallax_amplitude: 0.2,
            smoothing_factor: 5.0,
            rotation_rate: Vec2::new(0.1, 0.13),
            camera: CameraConfig::default(),
            light_position: Vec3::new(1.0, 1.0, 0.0),
            light_color: Color::WHITE,
            light_intensity: 1.0,
            max_pixel_ratio: 2.0,
            scroll_line_height: 40.0,
            asset_root: PathBuf::from("."),
            gradient_map_path: PathBuf::from("textures/gradients/5.jpg"),
            particle_alpha_map_path: PathBuf::from("textures/gradients/disc5.png"),
        }
    }
}

impl SceneConfig {
    /// Vertical span `(min, max)` the particle field is spread over.
    pub fn particle_y_range(&self) -> (f32, f32) {
        let top = self.objects_distance * 0.5;
        (top - self.objects_distance * SECTION_COUNT as f32, top)
    }
}

/// Layout and presets of the color parameter panel.
#[derive(Debug, Clone, PartialEq)]
pub struct PanelConfig {
    /// Preset swatches offered by the picker.
    pub presets: Vec<Color>,
    /// Swatch edge length in logical pixels.
    pub swatch_size: f32,
    pub gap: f32,
    pub padding: f32,
    /// Distance from the window's top-right corner.
    pub margin: f32,
    /// Hue step for keyboard adjustment, in degrees.
    pub hue_step: f32,
    pub background: Color,
    pub visible: bool,
}

impl Default for PanelConfig {
    fn default() -> Self {
        let presets = [
            (0x00, 0x99, 0x99),
            (0xff, 0xed, 0xed),
            (0xff, 0x6b, 0x6b),
            (0xf7, 0xb8, 0x01),
            (0x8a, 0xc9, 0x26),
            (0x19, 0x82, 0xc4),
            (0x6a, 0x4c, 0x93),
            (0xff, 0xff, 0xff),
        ]
        .into_iter()
        .map(|(r, g, b)| Color::from_srgb_u8(r, g, b))
        .collect();

        Self {
            presets,
            swatch_size: 22.0,
            gap: 6.0,
            padding: 8.0,
            margin: 12.0,
            hue_step: 15.0,
            background: Color::from_srgb_u8(0x1f, 0x1f, 0x1f),
            visible: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn particle_range_spans_all_sections() {
        let (min, max) = SceneConfig::default().particle_y_range();
        assert_eq!(min, -10.0);
        assert_eq!(max, 2.0);
    }

    #[test]
    fn default_rotation_rates() {
        let c = SceneConfig::default();
        assert_eq!(c.rotation_rate, Vec2::new(0.1, 0.13));
    }
}
