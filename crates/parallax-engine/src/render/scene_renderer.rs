use anyhow::{Result, anyhow};
use parallax_scene::scene::Scene;
use parallax_scene::schedule::RenderSink;

use crate::core::{AppControl, FrameCtx};
use crate::render::{RenderCtx, RenderTarget};

use super::mesh::ToonMeshRenderer;
use super::panel::{PanelQuad, PanelRenderer};
use super::points::PointsRenderer;
use super::texture::{GpuTexture, TextureImage};

/// Draws a [`Scene`]: toon meshes, then particles, then the panel overlay.
///
/// Texture images are decoded up front and uploaded on the first frame,
/// one per texture slot, in slot order.
pub struct SceneRenderer {
    pending: Option<Vec<TextureImage>>,
    textures: Vec<GpuTexture>,

    meshes: ToonMeshRenderer,
    points: PointsRenderer,
    panel: PanelRenderer,
}

impl SceneRenderer {
    /// `images[i]` backs the texture slot with index `i`. Slots without an
    /// image get the placeholder.
    pub fn new(images: Vec<TextureImage>) -> Self {
        Self {
            pending: Some(images),
            textures: Vec::new(),
            meshes: ToonMeshRenderer::new(),
            points: PointsRenderer::new(),
            panel: PanelRenderer::new(),
        }
    }

    pub fn render(
        &mut self,
        ctx: &RenderCtx<'_>,
        target: &mut RenderTarget<'_>,
        scene: &mut Scene,
        overlay: &[PanelQuad],
    ) {
        self.ensure_textures(ctx, scene);

        self.meshes.render(ctx, target, scene, &self.textures);
        self.points.render(ctx, target, scene, &self.textures);
        self.panel.render(ctx, target, overlay);
    }

    fn ensure_textures(&mut self, ctx: &RenderCtx<'_>, scene: &Scene) {
        let Some(mut images) = self.pending.take() else { return };

        if images.len() != scene.textures.len() {
            log::warn!(
                "{} texture images for {} slots; padding with placeholders",
                images.len(),
                scene.textures.len()
            );
        }
        images.resize_with(scene.textures.len(), TextureImage::placeholder);

        self.textures = scene
            .textures
            .iter()
            .zip(&images)
            .map(|((_, slot), image)| {
                let label = slot.path.display().to_string();
                GpuTexture::upload(ctx.device, ctx.queue, image, slot.filter, &label)
            })
            .collect();
        log::debug!("uploaded {} textures", self.textures.len());
    }
}

/// One frame's rendering backend for the scheduler.
///
/// Each call acquires a surface frame, draws the scene and the overlay, and
/// presents. A surface failure that ends the frame loop is reported as an
/// error so the scheduler stops.
pub struct SceneFrame<'f, 'a, 'w> {
    pub ctx: &'f mut FrameCtx<'a, 'w>,
    pub renderer: &'f mut SceneRenderer,
    pub overlay: &'f [PanelQuad],
}

impl RenderSink for SceneFrame<'_, '_, '_> {
    type Error = anyhow::Error;

    fn render(&mut self, scene: &mut Scene) -> Result<()> {
        let renderer = &mut *self.renderer;
        let overlay = self.overlay;

        match self.ctx.render(|rctx, target| renderer.render(rctx, target, scene, overlay)) {
            AppControl::Continue => Ok(()),
            AppControl::Exit => Err(anyhow!("surface is unrecoverable")),
        }
    }
}
