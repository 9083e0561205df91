//! Viewport bookkeeping: window size, pixel ratio and the derived camera
//! aspect / render surface size.

use crate::camera::PerspectiveCamera;
use crate::coords::Viewport;

/// Render surface size in physical pixels.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct SurfaceSize {
    pub width: u32,
    pub height: u32,
}

/// Outcome of an accepted resize.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Resize {
    pub viewport: Viewport,
    pub aspect: f32,
    pub pixel_ratio: f32,
    pub surface: SurfaceSize,
}

/// Tracks the logical viewport and device pixel ratio.
///
/// Invariant: the stored viewport is always valid (positive, finite). Resizes
/// to a zero or non-finite size, which happen while a window is minimized,
/// are ignored and the previous state is kept.
#[derive(Debug, Clone, PartialEq)]
pub struct ViewportManager {
    viewport: Viewport,
    device_pixel_ratio: f32,
    max_pixel_ratio: f32,
}

impl ViewportManager {
    /// Creates a manager; an invalid initial viewport is replaced by 1×1.
    pub fn new(viewport: Viewport, device_pixel_ratio: f32, max_pixel_ratio: f32) -> Self {
        Self {
            viewport: if viewport.is_valid() { viewport } else { Viewport::new(1.0, 1.0) },
            device_pixel_ratio: sanitize_ratio(device_pixel_ratio),
            max_pixel_ratio: sanitize_ratio(max_pixel_ratio),
        }
    }

    #[inline]
    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    #[inline]
    pub fn aspect(&self) -> f32 {
        self.viewport.aspect()
    }

    /// Device pixel ratio clamped to the configured maximum.
    #[inline]
    pub fn pixel_ratio(&self) -> f32 {
        self.device_pixel_ratio.min(self.max_pixel_ratio)
    }

    /// Logical size scaled by the clamped pixel ratio, at least 1×1.
    pub fn surface_size(&self) -> SurfaceSize {
        let pr = self.pixel_ratio();
        SurfaceSize {
            width: ((self.viewport.width * pr).round() as u32).max(1),
            height: ((self.viewport.height * pr).round() as u32).max(1),
        }
    }

    /// Applies a resize and updates the camera projection.
    ///
    /// Returns `None` when the new size is degenerate; nothing changes then.
    pub fn resize(
        &mut self,
        width: f32,
        height: f32,
        device_pixel_ratio: f32,
        camera: &mut PerspectiveCamera,
    ) -> Option<Resize> {
        let viewport = Viewport::new(width, height);
        if !viewport.is_valid() {
            log::debug!("ignoring degenerate resize to {width}x{height}");
            return None;
        }

        self.viewport = viewport;
        self.device_pixel_ratio = sanitize_ratio(device_pixel_ratio);
        camera.set_aspect(self.aspect());

        let resize = Resize {
            viewport,
            aspect: self.aspect(),
            pixel_ratio: self.pixel_ratio(),
            surface: self.surface_size(),
        };
        log::debug!(
            "viewport {}x{} @{} -> surface {}x{}",
            width,
            height,
            resize.pixel_ratio,
            resize.surface.width,
            resize.surface.height
        );
        Some(resize)
    }
}

fn sanitize_ratio(r: f32) -> f32 {
    if r.is_finite() && r > 0.0 { r } else { 1.0 }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CameraConfig;

    fn camera() -> PerspectiveCamera {
        PerspectiveCamera::new(&CameraConfig::default(), 800.0 / 600.0)
    }

    #[test]
    fn resize_updates_aspect_and_surface() {
        let mut cam = camera();
        let mut vm = ViewportManager::new(Viewport::new(800.0, 600.0), 1.0, 2.0);

        let r = vm.resize(1024.0, 768.0, 1.0, &mut cam).unwrap();
        assert_eq!(r.aspect, 1024.0 / 768.0);
        assert_eq!(cam.aspect, 1024.0 / 768.0);
        assert_eq!(r.viewport, Viewport::new(1024.0, 768.0));
        assert_eq!(r.surface, SurfaceSize { width: 1024, height: 768 });
        assert!(r.pixel_ratio <= 2.0);
    }

    #[test]
    fn pixel_ratio_is_clamped_to_two() {
        let mut cam = camera();
        let mut vm = ViewportManager::new(Viewport::new(800.0, 600.0), 1.0, 2.0);

        let r = vm.resize(1024.0, 768.0, 3.0, &mut cam).unwrap();
        assert_eq!(r.pixel_ratio, 2.0);
        assert_eq!(r.surface, SurfaceSize { width: 2048, height: 1536 });
    }

    #[test]
    fn fractional_pixel_ratio_rounds_surface() {
        let vm = ViewportManager::new(Viewport::new(801.0, 601.0), 1.25, 2.0);
        assert_eq!(vm.surface_size(), SurfaceSize { width: 1001, height: 751 });
    }

    #[test]
    fn zero_height_resize_is_ignored() {
        let mut cam = camera();
        let mut vm = ViewportManager::new(Viewport::new(800.0, 600.0), 1.0, 2.0);

        assert!(vm.resize(800.0, 0.0, 1.0, &mut cam).is_none());
        assert_eq!(vm.viewport(), Viewport::new(800.0, 600.0));
        assert_eq!(cam.aspect, 800.0 / 600.0);
        assert!(cam.projection().is_finite());
    }

    #[test]
    fn invalid_initial_viewport_falls_back() {
        let vm = ViewportManager::new(Viewport::new(0.0, 0.0), f32::NAN, 2.0);
        assert_eq!(vm.viewport(), Viewport::new(1.0, 1.0));
        assert_eq!(vm.pixel_ratio(), 1.0);
    }
}
