//! Per-frame update and the cooperative loop that drives it.
//!
//! One [`FrameScheduler::tick`] performs, in order: scroll-driven camera
//! height, cursor parallax easing, particle refresh flag, mesh rotation and a
//! single render. The render sees every write made earlier in the same tick.
//!
//! [`FrameScheduler::run`] is the deterministic driver used without a display:
//! frames come from a [`FrameSource`] and the loop ends when the source runs
//! dry, the per-frame callback returns [`FrameControl::Stop`], the
//! [`StopHandle`] is raised, or the sink fails.

use std::cell::Cell;
use std::rc::Rc;

use glam::Vec2;

use crate::camera::{parallax_target, scroll_camera_y};
use crate::config::SceneConfig;
use crate::scene::Scene;
use crate::tracking::AppState;

/// Consumer of the finished frame state.
pub trait RenderSink {
    type Error;

    fn render(&mut self, scene: &mut Scene) -> Result<(), Self::Error>;
}

/// Supplies elapsed seconds since start, one value per frame.
pub trait FrameSource {
    /// `None` ends the loop.
    fn next_frame(&mut self) -> Option<f32>;
}

/// Fixed-step clock for tests and headless runs.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct SimulatedClock {
    elapsed: f32,
    step: f32,
}

impl SimulatedClock {
    pub fn new(step: f32) -> Self {
        Self { elapsed: 0.0, step }
    }

    /// Refresh-rate shorthand, e.g. `SimulatedClock::hz(60.0)`.
    pub fn hz(rate: f32) -> Self {
        Self::new(1.0 / rate)
    }

    #[inline]
    pub fn elapsed(&self) -> f32 {
        self.elapsed
    }
}

impl FrameSource for SimulatedClock {
    fn next_frame(&mut self) -> Option<f32> {
        self.elapsed += self.step;
        Some(self.elapsed)
    }
}

/// Shared stop flag. Clones observe the same flag.
#[derive(Debug, Clone, Default)]
pub struct StopHandle(Rc<Cell<bool>>);

impl StopHandle {
    pub fn request_stop(&self) {
        self.0.set(true);
    }

    #[inline]
    pub fn is_stop_requested(&self) -> bool {
        self.0.get()
    }
}

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum FrameControl {
    Continue,
    Stop,
}

/// Timing of a completed tick.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct FrameReport {
    /// Zero-based.
    pub frame_index: u64,
    pub elapsed: f32,
    pub delta: f32,
}

#[derive(Debug, Clone)]
pub struct FrameScheduler {
    previous_time: f32,
    frame_index: u64,
    objects_distance: f32,
    parallax_amplitude: f32,
    smoothing_factor: f32,
    rotation_rate: Vec2,
    stop: StopHandle,
}

impl FrameScheduler {
    pub fn new(config: &SceneConfig) -> Self {
        Self {
            previous_time: 0.0,
            frame_index: 0,
            objects_distance: config.objects_distance,
            parallax_amplitude: config.parallax_amplitude,
            smoothing_factor: config.smoothing_factor,
            rotation_rate: config.rotation_rate,
            stop: StopHandle::default(),
        }
    }

    /// A handle that ends [`run`](Self::run) (or the windowed runtime) at the
    /// next frame boundary.
    pub fn stop_handle(&self) -> StopHandle {
        self.stop.clone()
    }

    #[inline]
    pub fn is_stop_requested(&self) -> bool {
        self.stop.is_stop_requested()
    }

    /// Number of completed ticks.
    #[inline]
    pub fn frames(&self) -> u64 {
        self.frame_index
    }

    #[inline]
    pub fn previous_time(&self) -> f32 {
        self.previous_time
    }

    /// Runs one frame at `elapsed` seconds since start.
    pub fn tick<R: RenderSink + ?Sized>(
        &mut self,
        elapsed: f32,
        state: &AppState,
        scene: &mut Scene,
        sink: &mut R,
    ) -> Result<FrameReport, R::Error> {
        let delta = elapsed - self.previous_time;
        self.previous_time = elapsed;

        let viewport = state.viewport.viewport();
        scene.rig.camera.position.y =
            scroll_camera_y(state.scroll.offset(), viewport.height, self.objects_distance);

        let target = parallax_target(state.cursor.normalized(), self.parallax_amplitude);
        scene.rig.ease_group_toward(target, self.smoothing_factor, delta);

        scene.particles.mark_needs_update();

        for mesh in &mut scene.meshes {
            mesh.spin(self.rotation_rate.x, self.rotation_rate.y, delta);
        }

        sink.render(scene)?;

        let report = FrameReport { frame_index: self.frame_index, elapsed, delta };
        self.frame_index += 1;
        Ok(report)
    }

    /// Drives ticks from `source` until it is exhausted, `after_frame`
    /// returns [`FrameControl::Stop`], or the stop handle is raised.
    ///
    /// `after_frame` runs between frames and may mutate the state the way
    /// event handlers would. Returns the number of frames rendered by this
    /// call; a sink error ends the loop and is returned as is.
    pub fn run<S, R, F>(
        &mut self,
        source: &mut S,
        state: &mut AppState,
        scene: &mut Scene,
        sink: &mut R,
        mut after_frame: F,
    ) -> Result<u64, R::Error>
    where
        S: FrameSource + ?Sized,
        R: RenderSink + ?Sized,
        F: FnMut(&FrameReport, &mut AppState, &mut Scene) -> FrameControl,
    {
        let start = self.frame_index;
        while !self.is_stop_requested() {
            let Some(elapsed) = source.next_frame() else { break };
            let report = self.tick(elapsed, state, scene, sink)?;
            if after_frame(&report, state, scene) == FrameControl::Stop {
                break;
            }
        }
        log::debug!("scheduler stopped after {} frames", self.frame_index - start);
        Ok(self.frame_index - start)
    }
}
