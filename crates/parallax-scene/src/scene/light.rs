use glam::Vec3;

use crate::color::Color;

/// Directional light shining from `position` toward `target`. Casts no shadows.
#[derive(Debug, Clone, PartialEq)]
pub struct DirectionalLight {
    pub position: Vec3,
    pub target: Vec3,
    pub color: Color,
    pub intensity: f32,
}

impl DirectionalLight {
    /// Unit vector pointing from the lit surface toward the light.
    pub fn direction_to_light(&self) -> Vec3 {
        (self.position - self.target).normalize_or(Vec3::Y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn direction_points_toward_light() {
        let light = DirectionalLight {
            position: Vec3::new(1.0, 1.0, 0.0),
            target: Vec3::ZERO,
            color: Color::WHITE,
            intensity: 1.0,
        };
        let d = light.direction_to_light();
        assert!((d - Vec3::new(1.0, 1.0, 0.0).normalize()).length() < 1e-6);
    }

    #[test]
    fn degenerate_light_falls_back_to_up() {
        let light = DirectionalLight {
            position: Vec3::ZERO,
            target: Vec3::ZERO,
            color: Color::WHITE,
            intensity: 1.0,
        };
        assert_eq!(light.direction_to_light(), Vec3::Y);
    }
}
