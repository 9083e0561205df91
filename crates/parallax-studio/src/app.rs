use anyhow::{Context, Result};
use glam::Vec2;
use winit::dpi::PhysicalSize;

use parallax_engine::core::{App, AppControl, FrameCtx};
use parallax_engine::input::{
    InputEvent, Key, KeyState, MouseButton, MouseButtonState, MouseWheelDelta, ResizeEvent,
};
use parallax_engine::render::{PanelQuad, SceneFrame, SceneRenderer, panel_quads};
use parallax_scene::Color;
use parallax_scene::config::{PanelConfig, SceneConfig};
use parallax_scene::coords::Viewport;
use parallax_scene::panel::ParameterPanel;
use parallax_scene::scene::Scene;
use parallax_scene::schedule::{FrameScheduler, RenderSink, StopHandle};
use parallax_scene::tracking::{AppState, ScrollCommand};
use parallax_scene::viewport::SurfaceSize;

use crate::assets;

/// What an input event asks the application to do.
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum Action {
    Resize(ResizeEvent),
    Scroll(ScrollCommand),
    PointerMoved(Vec2),
    Click(Vec2),
    TogglePanel,
    NudgeHue(f32),
    Quit,
}

/// Maps a platform-neutral input event to an [`Action`].
///
/// Wheel deltas arrive with positive `y` meaning "up"; scroll commands count
/// downward, hence the sign flip.
pub fn action_for(ev: &InputEvent) -> Option<Action> {
    match ev {
        InputEvent::Resized(r) => Some(Action::Resize(*r)),

        InputEvent::PointerMoved(p) => Some(Action::PointerMoved(Vec2::new(p.x, p.y))),

        InputEvent::PointerButton(b)
            if b.button == MouseButton::Left && b.state == MouseButtonState::Pressed =>
        {
            Some(Action::Click(Vec2::new(b.x, b.y)))
        }

        InputEvent::MouseWheel { delta, .. } => {
            let cmd = match *delta {
                MouseWheelDelta::Line { y, .. } => ScrollCommand::Lines(-y),
                MouseWheelDelta::Pixel { y, .. } => ScrollCommand::Pixels(-y),
            };
            Some(Action::Scroll(cmd))
        }

        InputEvent::Key { key, state: KeyState::Pressed, modifiers, repeat } => {
            let action = match key {
                Key::PageDown => Action::Scroll(ScrollCommand::Pages(1.0)),
                Key::PageUp => Action::Scroll(ScrollCommand::Pages(-1.0)),
                Key::Space if modifiers.shift => Action::Scroll(ScrollCommand::Pages(-1.0)),
                Key::Space => Action::Scroll(ScrollCommand::Pages(1.0)),
                Key::ArrowDown => Action::Scroll(ScrollCommand::Lines(1.0)),
                Key::ArrowUp => Action::Scroll(ScrollCommand::Lines(-1.0)),
                Key::Home => Action::Scroll(ScrollCommand::Top),
                Key::End => Action::Scroll(ScrollCommand::Bottom),

                Key::H if modifiers.shift => Action::NudgeHue(-1.0),
                Key::H => Action::NudgeHue(1.0),

                // Held keys would flicker the panel or re-request exit.
                Key::Tab if !repeat => Action::TogglePanel,
                Key::Escape if !repeat => Action::Quit,

                _ => return None,
            };
            Some(action)
        }

        _ => None,
    }
}

/// The section page: scene, input-driven state, scheduler, color panel and
/// renderer.
pub struct ParallaxApp {
    scene: Scene,
    state: AppState,
    scheduler: FrameScheduler,
    stop: StopHandle,

    panel: ParameterPanel,
    panel_background: Color,

    renderer: SceneRenderer,
}

impl ParallaxApp {
    /// Builds the scene and decodes its textures. `initial` is replaced by
    /// the window's real geometry on the first resize event.
    pub fn new(config: SceneConfig, panel_config: PanelConfig, initial: Viewport) -> Self {
        let mut scene = Scene::build(&config, &mut rand::rng());
        let state = AppState::new(&config, initial, 1.0, &mut scene.rig.camera);
        let scheduler = FrameScheduler::new(&config);
        let stop = scheduler.stop_handle();

        let images = assets::load_textures(&config.asset_root, &scene.textures);

        let panel_background = panel_config.background;
        let panel = ParameterPanel::for_scene(panel_config, &scene);

        Self {
            scene,
            state,
            scheduler,
            stop,
            panel,
            panel_background,
            renderer: SceneRenderer::new(images),
        }
    }

    /// Applies one action. Returns the new drawable size when the surface
    /// must be reconfigured.
    fn handle(&mut self, action: Action) -> Option<SurfaceSize> {
        match action {
            Action::Resize(r) => {
                let resize = self.state.on_resize(
                    r.width,
                    r.height,
                    r.scale_factor,
                    &mut self.scene.rig.camera,
                )?;
                log::debug!(
                    "resize: {}x{} @{} -> surface {}x{}",
                    resize.viewport.width,
                    resize.viewport.height,
                    resize.pixel_ratio,
                    resize.surface.width,
                    resize.surface.height
                );
                return Some(resize.surface);
            }

            Action::Scroll(cmd) => self.state.on_scroll(cmd),

            Action::PointerMoved(p) => self.state.on_pointer_moved(p.x, p.y),

            Action::Click(p) => {
                let viewport = self.state.viewport.viewport();
                self.panel.click(p, viewport, &mut self.scene.materials);
            }

            Action::TogglePanel => self.panel.toggle_visible(),

            Action::NudgeHue(steps) => {
                self.panel.nudge_hue(steps, &mut self.scene.materials);
            }

            Action::Quit => {
                log::info!("escape pressed; stopping");
                self.stop.request_stop();
            }
        }
        None
    }

    fn overlay(&self) -> Vec<PanelQuad> {
        self.panel
            .layout(self.state.viewport.viewport())
            .map(|layout| {
                panel_quads(&layout, self.panel_background, self.panel.parameters().material_color)
            })
            .unwrap_or_default()
    }
}

/// Runs one scheduler tick against `sink`. A render failure is returned so
/// the runtime exits with it.
fn advance<R>(
    scheduler: &mut FrameScheduler,
    state: &AppState,
    scene: &mut Scene,
    elapsed: f32,
    sink: &mut R,
) -> Result<AppControl>
where
    R: RenderSink<Error = anyhow::Error> + ?Sized,
{
    let report = scheduler.tick(elapsed, state, scene, sink).context("render failed")?;
    log::trace!("frame {} dt={:.4}", report.frame_index, report.delta);
    Ok(AppControl::Continue)
}

impl App for ParallaxApp {
    fn on_frame(&mut self, ctx: &mut FrameCtx<'_, '_>) -> Result<AppControl> {
        // ── Input ─────────────────────────────────────────────────────────
        let input_frame = ctx.input_frame;
        for action in input_frame.events.iter().filter_map(action_for) {
            if let Some(size) = self.handle(action) {
                ctx.gpu.resize(PhysicalSize::new(size.width, size.height));
            }
        }

        if self.stop.is_stop_requested() {
            return Ok(AppControl::Exit);
        }

        // ── Update + render ───────────────────────────────────────────────
        let overlay = self.overlay();
        let elapsed = ctx.time.elapsed;
        let mut sink = SceneFrame { ctx, renderer: &mut self.renderer, overlay: &overlay };

        advance(&mut self.scheduler, &self.state, &mut self.scene, elapsed, &mut sink)
    }

    fn on_exit(&mut self) {
        log::info!(
            "exiting after {} frames ({:.1}s)",
            self.scheduler.frames(),
            self.scheduler.previous_time()
        );
    }
}
