use bytemuck::{Pod, Zeroable};
use parallax_scene::Color;
use parallax_scene::coords::Rect;
use parallax_scene::panel::PanelLayout;
use wgpu::util::DeviceExt;

use crate::render::{RenderCtx, RenderTarget};

use super::common::{
    QUAD_INDICES, QUAD_VERTICES, QuadVertex, linear_rgba, premul_alpha_blend,
    ubo_min_binding_size, uniform_layout_entry,
};

const BACKGROUND_ALPHA: f32 = 0.92;
const OUTLINE_WIDTH: f32 = 2.0;

/// One solid overlay rectangle.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct PanelQuad {
    /// Logical pixels.
    pub rect: Rect,
    /// Linear premultiplied RGBA.
    pub color: [f32; 4],
}

/// Flattens a panel layout into quads in paint order: background, the
/// current-color bar, then the swatches (the selected one over a white
/// outline).
pub fn panel_quads(layout: &PanelLayout, background: Color, current: Color) -> Vec<PanelQuad> {
    let mut quads = Vec::with_capacity(layout.swatches.len() + 3);

    quads.push(PanelQuad {
        rect: layout.background,
        color: linear_rgba(background, BACKGROUND_ALPHA),
    });
    quads.push(PanelQuad { rect: layout.current, color: linear_rgba(current, 1.0) });

    for swatch in &layout.swatches {
        if swatch.selected {
            quads.push(PanelQuad {
                rect: swatch.rect.inset(-OUTLINE_WIDTH),
                color: linear_rgba(Color::WHITE, 1.0),
            });
        }
        quads.push(PanelQuad { rect: swatch.rect, color: linear_rgba(swatch.color, 1.0) });
    }

    quads.retain(|q| !q.rect.is_empty());
    quads
}

/// Overlay renderer for [`PanelQuad`]s.
///
/// Geometry is in logical pixels and converted to NDC in the vertex shader.
/// Draws without depth, after the 3D passes.
#[derive(Default)]
pub struct PanelRenderer {
    pipeline_format: Option<wgpu::TextureFormat>,
    pipeline: Option<wgpu::RenderPipeline>,

    bind_group_layout: Option<wgpu::BindGroupLayout>,
    bind_group: Option<wgpu::BindGroup>,
    viewport_ubo: Option<wgpu::Buffer>,

    quad_vbo: Option<wgpu::Buffer>,
    quad_ibo: Option<wgpu::Buffer>,

    instance_vbo: Option<wgpu::Buffer>,
    instance_capacity: usize,
}

impl PanelRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn render(
        &mut self,
        ctx: &RenderCtx<'_>,
        target: &mut RenderTarget<'_>,
        quads: &[PanelQuad],
    ) {
        if quads.is_empty() {
            return;
        }

        self.ensure_pipeline(ctx);
        self.ensure_static_buffers(ctx);
        self.ensure_bindings(ctx);

        self.write_viewport_uniform(ctx);
        self.ensure_instance_capacity(ctx, quads.len());

        let Some(instance_vbo) = self.instance_vbo.as_ref() else { return };
        let raw: Vec<QuadInstance> = quads.iter().map(QuadInstance::from).collect();
        ctx.queue.write_buffer(instance_vbo, 0, bytemuck::cast_slice(&raw));

        let Some(pipeline) = self.pipeline.as_ref() else { return };
        let Some(bind_group) = self.bind_group.as_ref() else { return };
        let Some(quad_vbo) = self.quad_vbo.as_ref() else { return };
        let Some(quad_ibo) = self.quad_ibo.as_ref() else { return };

        let mut rpass = target.begin_load_pass("parallax panel pass", false);
        rpass.set_pipeline(pipeline);
        rpass.set_bind_group(0, bind_group, &[]);
        rpass.set_vertex_buffer(0, quad_vbo.slice(..));
        rpass.set_vertex_buffer(1, instance_vbo.slice(..));
        rpass.set_index_buffer(quad_ibo.slice(..), wgpu::IndexFormat::Uint16);
        rpass.draw_indexed(0..QUAD_INDICES.len() as u32, 0, 0..raw.len() as u32);
    }

    fn ensure_pipeline(&mut self, ctx: &RenderCtx<'_>) {
        if self.pipeline_format == Some(ctx.surface_format) && self.pipeline.is_some() {
            return;
        }

        let shader = ctx.device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("parallax panel shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("shaders/panel.wgsl").into()),
        });

        let bind_group_layout =
            ctx.device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                label: Some("parallax panel bgl"),
                entries: &[uniform_layout_entry(
                    0,
                    wgpu::ShaderStages::VERTEX,
                    ubo_min_binding_size::<ViewportUniform>(),
                )],
            });

        let pipeline_layout = ctx.device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("parallax panel pipeline layout"),
            bind_group_layouts: &[&bind_group_layout],
            immediate_size: 0,
        });

        let pipeline = ctx.device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("parallax panel pipeline"),
            layout: Some(&pipeline_layout),

            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_main"),
                compilation_options: Default::default(),
                buffers: &[QuadVertex::layout(), QuadInstance::layout()],
            },

            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs_main"),
                compilation_options: Default::default(),
                targets: &[Some(wgpu::ColorTargetState {
                    format: ctx.surface_format,
                    blend: Some(premul_alpha_blend()),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
            }),

            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                strip_index_format: None,
                front_face: wgpu::FrontFace::Ccw,
                cull_mode: None,
                polygon_mode: wgpu::PolygonMode::Fill,
                unclipped_depth: false,
                conservative: false,
            },

            depth_stencil: None,
            multisample: wgpu::MultisampleState::default(),

            multiview_mask: None,
            cache: None,
        });

        self.pipeline_format = Some(ctx.surface_format);
        self.pipeline = Some(pipeline);
        self.bind_group_layout = Some(bind_group_layout);

        self.bind_group = None;
        self.viewport_ubo = None;
    }

    fn ensure_bindings(&mut self, ctx: &RenderCtx<'_>) {
        if self.bind_group.is_some() && self.viewport_ubo.is_some() {
            return;
        }
        let Some(bgl) = self.bind_group_layout.as_ref() else { return };

        let viewport_ubo = ctx.device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("parallax panel viewport ubo"),
            size: std::mem::size_of::<ViewportUniform>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let bind_group = ctx.device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("parallax panel bind group"),
            layout: bgl,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: viewport_ubo.as_entire_binding(),
            }],
        });

        self.viewport_ubo = Some(viewport_ubo);
        self.bind_group = Some(bind_group);
    }

    fn ensure_static_buffers(&mut self, ctx: &RenderCtx<'_>) {
        if self.quad_vbo.is_some() && self.quad_ibo.is_some() {
            return;
        }

        self.quad_vbo = Some(ctx.device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("parallax panel quad vbo"),
            contents: bytemuck::cast_slice(&QUAD_VERTICES),
            usage: wgpu::BufferUsages::VERTEX,
        }));

        self.quad_ibo = Some(ctx.device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("parallax panel quad ibo"),
            contents: bytemuck::cast_slice(&QUAD_INDICES),
            usage: wgpu::BufferUsages::INDEX,
        }));
    }

    fn write_viewport_uniform(&self, ctx: &RenderCtx<'_>) {
        let Some(ubo) = self.viewport_ubo.as_ref() else { return };
        let u = ViewportUniform {
            viewport: [ctx.viewport.width.max(1.0), ctx.viewport.height.max(1.0)],
            _pad: [0.0; 2],
        };
        ctx.queue.write_buffer(ubo, 0, bytemuck::bytes_of(&u));
    }

    fn ensure_instance_capacity(&mut self, ctx: &RenderCtx<'_>, required_instances: usize) {
        if required_instances <= self.instance_capacity && self.instance_vbo.is_some() {
            return;
        }

        let new_cap = required_instances.next_power_of_two().max(16);
        let new_size = (new_cap * std::mem::size_of::<QuadInstance>()) as u64;

        self.instance_vbo = Some(ctx.device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("parallax panel instance vbo"),
            size: new_size,
            usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        }));
        self.instance_capacity = new_cap;
    }
}

#[repr(C)]
#[derive(Debug, Copy, Clone, Pod, Zeroable)]
struct ViewportUniform {
    viewport: [f32; 2],
    _pad: [f32; 2],
}

#[repr(C)]
#[derive(Debug, Copy, Clone, Pod, Zeroable)]
struct QuadInstance {
    origin: [f32; 2],
    size: [f32; 2],
    color: [f32; 4],
}

impl From<&PanelQuad> for QuadInstance {
    fn from(q: &PanelQuad) -> Self {
        Self {
            origin: q.rect.origin.to_array(),
            size: q.rect.size.to_array(),
            color: q.color,
        }
    }
}

impl QuadInstance {
    const ATTRS: [wgpu::VertexAttribute; 3] = wgpu::vertex_attr_array![
        1 => Float32x2, // origin
        2 => Float32x2, // size
        3 => Float32x4  // color
    ];

    fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<QuadInstance>() as u64,
            step_mode: wgpu::VertexStepMode::Instance,
            attributes: &Self::ATTRS,
        }
    }
}

#[cfg(test)]
mod tests {
    use parallax_scene::config::PanelConfig;
    use parallax_scene::coords::Viewport;
    use parallax_scene::panel::{ParameterPanel, Parameters};

    use super::*;

    fn layout_for(color: Color) -> (PanelConfig, PanelLayout) {
        let config = PanelConfig::default();
        let params = Parameters { material_color: color };
        let panel = ParameterPanel::new(config.clone(), params, Vec::new());
        let layout = panel.layout(Viewport::new(800.0, 600.0)).unwrap();
        (config, layout)
    }

    // ── paint order ────────────────────────────────────────────────────────

    #[test]
    fn background_first_then_current_bar() {
        let (config, layout) = layout_for(Color::from_hex("#ffeded").unwrap());
        let quads = panel_quads(&layout, config.background, Color::WHITE);

        assert_eq!(quads[0].rect, layout.background);
        assert_eq!(quads[0].color[3], BACKGROUND_ALPHA);
        assert_eq!(quads[1].rect, layout.current);
        assert!(quads[1].color.iter().all(|c| (c - 1.0).abs() < 1e-5));
    }

    #[test]
    fn selected_swatch_sits_on_an_outline() {
        let (config, layout) = layout_for(PanelConfig::default().presets[0]);
        let quads = panel_quads(&layout, config.background, config.presets[0]);

        let selected = layout.swatches.iter().filter(|s| s.selected).count();
        assert_eq!(selected, 1);
        assert_eq!(quads.len(), 2 + layout.swatches.len() + selected);

        let outline = quads[2];
        assert_eq!(outline.rect, layout.swatches[0].rect.inset(-OUTLINE_WIDTH));
        assert_eq!(quads[3].rect, layout.swatches[0].rect);
    }

    #[test]
    fn unknown_color_has_no_outline() {
        let (config, layout) = layout_for(Color::new(0.123, 0.456, 0.789));
        let quads = panel_quads(&layout, config.background, Color::BLACK);
        assert_eq!(quads.len(), 2 + layout.swatches.len());
    }

    #[test]
    fn instance_layout_matches_quad() {
        let q = PanelQuad { rect: Rect::new(1.0, 2.0, 3.0, 4.0), color: [0.5; 4] };
        let inst = QuadInstance::from(&q);
        assert_eq!(inst.origin, [1.0, 2.0]);
        assert_eq!(inst.size, [3.0, 4.0]);
        assert_eq!(std::mem::size_of::<QuadInstance>(), 32);
    }
}
