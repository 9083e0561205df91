//! Input trackers and the application state they write into.
//!
//! Trackers only record the latest value; the frame scheduler reads them once
//! per frame. Nothing is queued.

use glam::Vec2;

use crate::camera::PerspectiveCamera;
use crate::config::{SECTION_COUNT, SceneConfig};
use crate::coords::Viewport;
use crate::viewport::{Resize, ViewportManager};

/// A scroll request, in document terms.
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum ScrollCommand {
    /// Wheel lines; positive moves down the page.
    Lines(f32),
    /// Logical pixels; positive moves down the page.
    Pixels(f32),
    /// Whole viewport heights; positive moves down the page.
    Pages(f32),
    Top,
    Bottom,
}

/// Vertical scroll offset of a document made of full-height sections.
#[derive(Debug, Clone, PartialEq)]
pub struct ScrollTracker {
    offset: f32,
    sections: usize,
    line_height: f32,
}

impl ScrollTracker {
    pub fn new(sections: usize, line_height: f32) -> Self {
        Self { offset: 0.0, sections: sections.max(1), line_height }
    }

    /// Current offset in logical pixels from the top of the document.
    #[inline]
    pub fn offset(&self) -> f32 {
        self.offset
    }

    /// Largest reachable offset: document height minus one viewport.
    #[inline]
    pub fn max_offset(&self, viewport: Viewport) -> f32 {
        viewport.height * (self.sections as f32 - 1.0)
    }

    /// Section closest to the current offset.
    pub fn current_section(&self, viewport: Viewport) -> usize {
        ((self.offset / viewport.height).round() as usize).min(self.sections - 1)
    }

    pub fn apply(&mut self, cmd: ScrollCommand, viewport: Viewport) {
        let target = match cmd {
            ScrollCommand::Lines(n) => self.offset + n * self.line_height,
            ScrollCommand::Pixels(px) => self.offset + px,
            ScrollCommand::Pages(n) => self.offset + n * viewport.height,
            ScrollCommand::Top => 0.0,
            ScrollCommand::Bottom => self.max_offset(viewport),
        };
        self.scroll_to(target, viewport);
    }

    /// Sets the raw offset, clamped to the document.
    pub fn scroll_to(&mut self, offset: f32, viewport: Viewport) {
        self.offset = offset.clamp(0.0, self.max_offset(viewport));
    }

    /// Re-clamps after the viewport changed height.
    pub fn clamp_to(&mut self, viewport: Viewport) {
        self.scroll_to(self.offset, viewport);
    }
}

/// Cursor position normalized to `[-0.5, 0.5]` on both axes.
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct CursorTracker {
    normalized: Vec2,
}

impl CursorTracker {
    /// Records a pointer position given in logical pixels.
    pub fn pointer_moved(&mut self, x: f32, y: f32, viewport: Viewport) {
        self.normalized = Vec2::new(x / viewport.width - 0.5, y / viewport.height - 0.5);
    }

    #[inline]
    pub fn normalized(&self) -> Vec2 {
        self.normalized
    }
}

/// Mutable state written by event handlers and read by the frame scheduler.
#[derive(Debug, Clone, PartialEq)]
pub struct AppState {
    pub viewport: ViewportManager,
    pub scroll: ScrollTracker,
    pub cursor: CursorTracker,
}

impl AppState {
    /// Creates the state for an initial window size and sets the camera aspect.
    pub fn new(
        config: &SceneConfig,
        viewport: Viewport,
        device_pixel_ratio: f32,
        camera: &mut PerspectiveCamera,
    ) -> Self {
        let viewport = ViewportManager::new(viewport, device_pixel_ratio, config.max_pixel_ratio);
        camera.set_aspect(viewport.aspect());

        Self {
            viewport,
            scroll: ScrollTracker::new(SECTION_COUNT, config.scroll_line_height),
            cursor: CursorTracker::default(),
        }
    }

    pub fn on_resize(
        &mut self,
        width: f32,
        height: f32,
        device_pixel_ratio: f32,
        camera: &mut PerspectiveCamera,
    ) -> Option<Resize> {
        let resize = self.viewport.resize(width, height, device_pixel_ratio, camera)?;
        self.scroll.clamp_to(resize.viewport);
        Some(resize)
    }

    pub fn on_scroll(&mut self, cmd: ScrollCommand) {
        let viewport = self.viewport.viewport();
        self.scroll.apply(cmd, viewport);
    }

    pub fn on_pointer_moved(&mut self, x: f32, y: f32) {
        let viewport = self.viewport.viewport();
        self.cursor.pointer_moved(x, y, viewport);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CameraConfig;

    fn vp() -> Viewport {
        Viewport::new(800.0, 600.0)
    }

    // ── scroll ────────────────────────────────────────────────────────────

    #[test]
    fn scroll_clamps_to_document() {
        let mut s = ScrollTracker::new(3, 40.0);
        s.apply(ScrollCommand::Pixels(-50.0), vp());
        assert_eq!(s.offset(), 0.0);
        s.apply(ScrollCommand::Pixels(5000.0), vp());
        assert_eq!(s.offset(), 1200.0);
    }

    #[test]
    fn lines_and_pages() {
        let mut s = ScrollTracker::new(3, 40.0);
        s.apply(ScrollCommand::Lines(3.0), vp());
        assert_eq!(s.offset(), 120.0);
        s.apply(ScrollCommand::Pages(1.0), vp());
        assert_eq!(s.offset(), 720.0);
        s.apply(ScrollCommand::Pages(-1.0), vp());
        assert_eq!(s.offset(), 120.0);
    }

    #[test]
    fn top_and_bottom() {
        let mut s = ScrollTracker::new(3, 40.0);
        s.apply(ScrollCommand::Bottom, vp());
        assert_eq!(s.offset(), 1200.0);
        assert_eq!(s.current_section(vp()), 2);
        s.apply(ScrollCommand::Top, vp());
        assert_eq!(s.offset(), 0.0);
        assert_eq!(s.current_section(vp()), 0);
    }

    #[test]
    fn shrinking_viewport_reclamps() {
        let mut s = ScrollTracker::new(3, 40.0);
        s.apply(ScrollCommand::Bottom, vp());
        s.clamp_to(Viewport::new(800.0, 300.0));
        assert_eq!(s.offset(), 600.0);
    }

    // ── cursor ────────────────────────────────────────────────────────────

    #[test]
    fn cursor_normalizes_to_half_range() {
        let mut c = CursorTracker::default();
        c.pointer_moved(0.0, 0.0, vp());
        assert_eq!(c.normalized(), Vec2::new(-0.5, -0.5));
        c.pointer_moved(400.0, 300.0, vp());
        assert_eq!(c.normalized(), Vec2::ZERO);
        c.pointer_moved(800.0, 600.0, vp());
        assert_eq!(c.normalized(), Vec2::new(0.5, 0.5));
    }

    #[test]
    fn cursor_last_write_wins() {
        let mut c = CursorTracker::default();
        c.pointer_moved(10.0, 10.0, vp());
        c.pointer_moved(600.0, 150.0, vp());
        assert_eq!(c.normalized(), Vec2::new(0.25, -0.25));
    }

    // ── app state ─────────────────────────────────────────────────────────

    #[test]
    fn app_state_sets_camera_aspect() {
        let mut cam = PerspectiveCamera::new(&CameraConfig::default(), 1.0);
        let state = AppState::new(&SceneConfig::default(), vp(), 1.0, &mut cam);
        assert_eq!(cam.aspect, 800.0 / 600.0);
        assert_eq!(state.scroll.offset(), 0.0);
    }

    #[test]
    fn pointer_uses_current_viewport() {
        let mut cam = PerspectiveCamera::new(&CameraConfig::default(), 1.0);
        let mut state = AppState::new(&SceneConfig::default(), vp(), 1.0, &mut cam);
        state.on_resize(1600.0, 1200.0, 1.0, &mut cam);
        state.on_pointer_moved(400.0, 300.0);
        assert_eq!(state.cursor.normalized(), Vec2::new(-0.25, -0.25));
    }

    #[test]
    fn resize_reclamps_scroll() {
        let mut cam = PerspectiveCamera::new(&CameraConfig::default(), 1.0);
        let mut state = AppState::new(&SceneConfig::default(), vp(), 1.0, &mut cam);
        state.on_scroll(ScrollCommand::Bottom);
        state.on_resize(800.0, 400.0, 1.0, &mut cam);
        assert_eq!(state.scroll.offset(), 800.0);
    }
}
