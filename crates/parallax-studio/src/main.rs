mod app;
mod assets;

use std::path::PathBuf;

use anyhow::Result;
use parallax_engine::device::GpuInit;
use parallax_engine::logging::{LoggingConfig, init_logging};
use parallax_engine::window::{Runtime, RuntimeConfig};
use parallax_scene::Color;
use parallax_scene::config::{PanelConfig, SceneConfig};
use parallax_scene::coords::Viewport;

use crate::app::ParallaxApp;

/// Page background behind the scene.
const BACKGROUND: Color = Color::new(0x1e as f32 / 255.0, 0x1a as f32 / 255.0, 0x20 as f32 / 255.0);

fn main() -> Result<()> {
    init_logging(LoggingConfig::default());

    let scene_config = SceneConfig {
        asset_root: PathBuf::from(env!("CARGO_MANIFEST_DIR")),
        ..SceneConfig::default()
    };
    let runtime = RuntimeConfig::default();

    log::info!(
        "{} ({}x{}), {} particles, assets in {}",
        runtime.title,
        runtime.initial_size.width,
        runtime.initial_size.height,
        scene_config.particle_count,
        scene_config.asset_root.display()
    );

    let initial = Viewport::new(
        runtime.initial_size.width as f32,
        runtime.initial_size.height as f32,
    );
    let app = ParallaxApp::new(scene_config, PanelConfig::default(), initial);

    let [r, g, b] = BACKGROUND.to_linear();
    let gpu_init = GpuInit {
        clear_color: wgpu::Color { r: r as f64, g: g as f64, b: b as f64, a: 1.0 },
        ..GpuInit::default()
    };

    Runtime::run(runtime, gpu_init, app)
}
