//! Camera rig: a perspective camera nested in a parallax group.
//!
//! The group follows the cursor with exponential easing; the camera's own
//! vertical offset follows the scroll position directly.

use glam::{Mat4, Vec2, Vec3};

use crate::config::CameraConfig;

/// Perspective camera looking down its local -Z axis.
#[derive(Debug, Clone, PartialEq)]
pub struct PerspectiveCamera {
    /// Vertical field of view in degrees.
    pub fov_y_degrees: f32,
    pub aspect: f32,
    pub near: f32,
    pub far: f32,
    /// Position relative to the parent group.
    pub position: Vec3,
    projection: Mat4,
}

impl PerspectiveCamera {
    pub fn new(config: &CameraConfig, aspect: f32) -> Self {
        let mut camera = Self {
            fov_y_degrees: config.fov_y_degrees,
            aspect,
            near: config.near,
            far: config.far,
            position: config.local_position,
            projection: Mat4::IDENTITY,
        };
        camera.update_projection();
        camera
    }

    /// Sets the aspect ratio and recomputes the projection matrix.
    pub fn set_aspect(&mut self, aspect: f32) {
        self.aspect = aspect;
        self.update_projection();
    }

    /// Recomputes the cached projection from the public parameters.
    pub fn update_projection(&mut self) {
        self.projection = Mat4::perspective_rh(
            self.fov_y_degrees.to_radians(),
            self.aspect,
            self.near,
            self.far,
        );
    }

    /// Projection matrix for a `[0, 1]` depth range.
    #[inline]
    pub fn projection(&self) -> Mat4 {
        self.projection
    }
}

/// Camera plus the group it is parented to.
#[derive(Debug, Clone, PartialEq)]
pub struct CameraRig {
    /// Group position in world space.
    pub group: Vec3,
    pub camera: PerspectiveCamera,
}

impl CameraRig {
    pub fn new(config: &CameraConfig, aspect: f32) -> Self {
        Self {
            group: Vec3::ZERO,
            camera: PerspectiveCamera::new(config, aspect),
        }
    }

    /// Camera position in world space (group and camera carry no rotation).
    #[inline]
    pub fn world_position(&self) -> Vec3 {
        self.group + self.camera.position
    }

    #[inline]
    pub fn view(&self) -> Mat4 {
        Mat4::from_translation(-self.world_position())
    }

    #[inline]
    pub fn view_projection(&self) -> Mat4 {
        self.camera.projection() * self.view()
    }

    /// Eases the group's x/y toward `target`.
    pub fn ease_group_toward(&mut self, target: Vec2, smoothing_factor: f32, dt: f32) {
        self.group.x = ease(self.group.x, target.x, smoothing_factor, dt);
        self.group.y = ease(self.group.y, target.y, smoothing_factor, dt);
    }
}

/// One exponential-smoothing step: `current + (target - current) * factor * dt`.
///
/// Scaling by `dt` keeps the motion independent of the refresh rate. The step
/// never overshoots while `factor * dt < 1`.
#[inline]
pub fn ease(current: f32, target: f32, factor: f32, dt: f32) -> f32 {
    current + (target - current) * factor * dt
}

/// Camera height for a scroll offset: one viewport height of scrolling moves
/// the camera down by `objects_distance` world units.
#[inline]
pub fn scroll_camera_y(scroll_y: f32, viewport_height: f32, objects_distance: f32) -> f32 {
    -scroll_y / viewport_height * objects_distance
}

/// Parallax target of the camera group for a normalized cursor offset.
///
/// Screen Y grows downward while world Y grows upward, hence the flip.
#[inline]
pub fn parallax_target(cursor: Vec2, amplitude: f32) -> Vec2 {
    Vec2::new(cursor.x * amplitude, -cursor.y * amplitude)
}

#[cfg(test)]
mod tests {
    use super::*;

    // ── ease ──────────────────────────────────────────────────────────────

    #[test]
    fn ease_converges_monotonically_without_overshoot() {
        for &dt in &[0.001_f32, 1.0 / 144.0, 1.0 / 60.0, 1.0 / 30.0, 0.1, 0.19] {
            let target = 0.1;
            let mut x = -0.1_f32;
            let mut dist = (target - x).abs();
            // Stop well above f32 resolution around the target.
            while dist > 1e-5 {
                x = ease(x, target, 5.0, dt);
                let next = (target - x).abs();
                assert!(x <= target, "overshoot at dt={dt}");
                assert!(next < dist, "not converging at dt={dt}");
                dist = next;
            }
        }
    }

    #[test]
    fn ease_with_zero_dt_is_identity() {
        assert_eq!(ease(0.3, 1.0, 5.0, 0.0), 0.3);
    }

    #[test]
    fn ease_at_target_stays() {
        assert_eq!(ease(0.25, 0.25, 5.0, 1.0 / 60.0), 0.25);
    }

    // ── scroll ────────────────────────────────────────────────────────────

    #[test]
    fn one_viewport_of_scroll_is_one_section() {
        assert_eq!(scroll_camera_y(600.0, 600.0, 4.0), -4.0);
        assert_eq!(scroll_camera_y(0.0, 600.0, 4.0), 0.0);
    }

    #[test]
    fn scroll_mapping_is_exact() {
        for &s in &[0.0_f32, 1.0, 137.5, 768.0, 1999.0] {
            assert_eq!(scroll_camera_y(s, 768.0, 4.0), -(s / 768.0) * 4.0);
        }
    }

    // ── parallax ──────────────────────────────────────────────────────────

    #[test]
    fn parallax_flips_vertical_axis() {
        let t = parallax_target(Vec2::new(0.5, 0.5), 0.2);
        assert_eq!(t, Vec2::new(0.1, -0.1));
    }

    // ── rig ───────────────────────────────────────────────────────────────

    #[test]
    fn world_position_composes_group_and_camera() {
        let mut rig = CameraRig::new(&CameraConfig::default(), 4.0 / 3.0);
        rig.group = Vec3::new(0.1, -0.05, 0.0);
        rig.camera.position.y = -4.0;
        assert_eq!(rig.world_position(), Vec3::new(0.1, -4.05, 6.0));
    }

    #[test]
    fn view_moves_camera_to_origin() {
        let rig = CameraRig::new(&CameraConfig::default(), 1.0);
        let p = rig.view().transform_point3(rig.world_position());
        assert!(p.length() < 1e-6);
    }

    #[test]
    fn set_aspect_updates_projection() {
        let mut cam = PerspectiveCamera::new(&CameraConfig::default(), 800.0 / 600.0);
        let before = cam.projection();
        cam.set_aspect(1024.0 / 768.0);
        assert_eq!(cam.aspect, 1024.0 / 768.0);
        // 800x600 and 1024x768 share an aspect, so the projection is unchanged.
        assert_eq!(cam.projection(), before);

        cam.set_aspect(2.0);
        assert_ne!(cam.projection(), before);
    }
}
