//! Scene model for the parallax section page.
//!
//! This crate holds everything that does not need a GPU or a window:
//! the fixed scene graph, the camera rig, viewport bookkeeping, the input
//! trackers, the color parameter panel and the per-frame scheduler. The
//! engine crate renders what this crate describes.
//!
//! # Structure
//!
//! | Module | Contents |
//! |--------|----------|
//! | [`config`] | `SceneConfig`, `CameraConfig`, `PanelConfig` |
//! | [`coords`] | `Viewport`, `Rect` |
//! | [`color`] | `Color`, hex parsing |
//! | [`geometry`] | `Shape`, `Geometry`, parametric generators |
//! | [`material`] | `Materials`, `Textures` arenas and their handles |
//! | [`scene`] | `Scene`, `Mesh`, `Particles`, `DirectionalLight`, builder |
//! | [`camera`] | `PerspectiveCamera`, `CameraRig`, easing |
//! | [`viewport`] | `ViewportManager`, `SurfaceSize` |
//! | [`tracking`] | `AppState`, `ScrollTracker`, `CursorTracker` |
//! | [`panel`] | `ParameterPanel`, `Parameters`, swatch layout |
//! | [`schedule`] | `FrameScheduler`, `RenderSink`, `FrameSource`, `StopHandle` |
//!
//! # Quick start
//!
//! ```rust
//! use parallax_scene::config::SceneConfig;
//! use parallax_scene::scene::Scene;
//!
//! let config = SceneConfig::default();
//! let scene = Scene::build(&config, &mut rand::rng());
//! assert_eq!(scene.meshes.len(), 3);
//! assert_eq!(scene.particles.positions().len(), 2000 * 3);
//! ```

pub mod camera;
pub mod color;
pub mod config;
pub mod coords;
pub mod error;
pub mod geometry;
pub mod material;
pub mod panel;
pub mod scene;
pub mod schedule;
pub mod tracking;
pub mod viewport;

pub use color::Color;
pub use error::ColorParseError;
