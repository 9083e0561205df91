use bytemuck::{Pod, Zeroable};
use parallax_scene::material::{PointsMaterial, TextureId};
use parallax_scene::scene::Scene;
use wgpu::util::DeviceExt;

use crate::device::DEPTH_FORMAT;
use crate::render::{RenderCtx, RenderTarget};

use super::common::{
    QUAD_INDICES, QUAD_VERTICES, QuadVertex, linear_rgba, premul_alpha_blend,
    texture_layout_entries, ubo_min_binding_size, uniform_layout_entry,
};
use super::texture::GpuTexture;

/// Point-cloud renderer.
///
/// Each particle is an instanced, camera-facing quad whose pixel size follows
/// the point-sprite convention: `size * pixel_ratio`, divided by view depth
/// and scaled by half the viewport height when attenuation is on. Coverage
/// comes from the green channel of the material's alpha map.
///
/// Positions are uploaded when the particle set reports a pending update.
#[derive(Default)]
pub struct PointsRenderer {
    pipeline_key: Option<PipelineKey>,
    pipeline: Option<wgpu::RenderPipeline>,

    bind_group_layout: Option<wgpu::BindGroupLayout>,
    bind_group: Option<wgpu::BindGroup>,
    bound_texture: Option<TextureId>,
    ubo: Option<wgpu::Buffer>,

    quad_vbo: Option<wgpu::Buffer>,
    quad_ibo: Option<wgpu::Buffer>,

    instance_vbo: Option<wgpu::Buffer>,
    instance_capacity: usize,
    instance_count: u32,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
struct PipelineKey {
    format: wgpu::TextureFormat,
    depth_write: bool,
    depth_test: bool,
    transparent: bool,
}

impl PointsRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn render(
        &mut self,
        ctx: &RenderCtx<'_>,
        target: &mut RenderTarget<'_>,
        scene: &mut Scene,
        textures: &[GpuTexture],
    ) {
        let particles = &mut scene.particles;
        let Some(material) = scene.materials.get(particles.material).as_points() else {
            log::warn!("particle material {:?} is not a points material", particles.material);
            return;
        };
        if particles.is_empty() {
            return;
        }

        self.ensure_pipeline(ctx, material);
        self.ensure_static_buffers(ctx);
        self.ensure_bindings(ctx, material.alpha_map, textures);

        let reallocated = self.ensure_instance_capacity(ctx, particles.len());
        if particles.take_needs_update() || reallocated {
            let Some(vbo) = self.instance_vbo.as_ref() else { return };
            ctx.queue.write_buffer(vbo, 0, bytemuck::cast_slice(particles.positions()));
            self.instance_count = particles.len() as u32;
        }

        self.write_uniform(ctx, scene, material);

        let Some(pipeline) = self.pipeline.as_ref() else { return };
        let Some(bind_group) = self.bind_group.as_ref() else { return };
        let Some(quad_vbo) = self.quad_vbo.as_ref() else { return };
        let Some(quad_ibo) = self.quad_ibo.as_ref() else { return };
        let Some(instance_vbo) = self.instance_vbo.as_ref() else { return };

        let mut rpass = target.begin_load_pass("parallax points pass", true);
        rpass.set_pipeline(pipeline);
        rpass.set_bind_group(0, bind_group, &[]);
        rpass.set_vertex_buffer(0, quad_vbo.slice(..));
        rpass.set_vertex_buffer(1, instance_vbo.slice(..));
        rpass.set_index_buffer(quad_ibo.slice(..), wgpu::IndexFormat::Uint16);
        rpass.draw_indexed(0..QUAD_INDICES.len() as u32, 0, 0..self.instance_count);
    }

    fn ensure_pipeline(&mut self, ctx: &RenderCtx<'_>, material: &PointsMaterial) {
        let key = PipelineKey {
            format: ctx.surface_format,
            depth_write: material.depth_write,
            depth_test: material.depth_test,
            transparent: material.transparent,
        };
        if self.pipeline_key == Some(key) && self.pipeline.is_some() {
            return;
        }

        let shader = ctx.device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("parallax points shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("shaders/points.wgsl").into()),
        });

        let [tex_entry, smp_entry] = texture_layout_entries(1);
        let bind_group_layout =
            ctx.device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                label: Some("parallax points bgl"),
                entries: &[
                    uniform_layout_entry(
                        0,
                        wgpu::ShaderStages::VERTEX_FRAGMENT,
                        ubo_min_binding_size::<PointsUniform>(),
                    ),
                    tex_entry,
                    smp_entry,
                ],
            });

        let pipeline_layout = ctx.device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("parallax points pipeline layout"),
            bind_group_layouts: &[&bind_group_layout],
            immediate_size: 0,
        });

        let pipeline = ctx.device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("parallax points pipeline"),
            layout: Some(&pipeline_layout),

            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_main"),
                compilation_options: Default::default(),
                buffers: &[QuadVertex::layout(), PointInstance::layout()],
            },

            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs_main"),
                compilation_options: Default::default(),
                targets: &[Some(wgpu::ColorTargetState {
                    format: ctx.surface_format,
                    blend: key.transparent.then(premul_alpha_blend),
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

            depth_stencil: Some(wgpu::DepthStencilState {
                format: DEPTH_FORMAT,
                depth_write_enabled: key.depth_write,
                depth_compare: if key.depth_test {
                    wgpu::CompareFunction::Less
                } else {
                    wgpu::CompareFunction::Always
                },
                stencil: wgpu::StencilState::default(),
                bias: wgpu::DepthBiasState::default(),
            }),
            multisample: wgpu::MultisampleState::default(),

            multiview_mask: None,
            cache: None,
        });

        // A new layout invalidates the bind group; the uniform buffer is
        // layout-independent and survives.
        if self.bind_group_layout.is_some() {
            self.bind_group = None;
            self.bound_texture = None;
        }

        self.pipeline_key = Some(key);
        self.pipeline = Some(pipeline);
        self.bind_group_layout = Some(bind_group_layout);
    }

    fn ensure_bindings(
        &mut self,
        ctx: &RenderCtx<'_>,
        alpha_map: TextureId,
        textures: &[GpuTexture],
    ) {
        if self.bind_group.is_some() && self.bound_texture == Some(alpha_map) {
            return;
        }
        let Some(bgl) = self.bind_group_layout.as_ref() else { return };
        let Some(texture) = textures.get(alpha_map.index()) else {
            log::warn!("alpha map {alpha_map:?} not uploaded");
            return;
        };

        let ubo = self.ubo.get_or_insert_with(|| {
            ctx.device.create_buffer(&wgpu::BufferDescriptor {
                label: Some("parallax points ubo"),
                size: std::mem::size_of::<PointsUniform>() as u64,
                usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
                mapped_at_creation: false,
            })
        });

        let bind_group = ctx.device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("parallax points bind group"),
            layout: bgl,
            entries: &[
                wgpu::BindGroupEntry { binding: 0, resource: ubo.as_entire_binding() },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::TextureView(&texture.view),
                },
                wgpu::BindGroupEntry {
                    binding: 2,
                    resource: wgpu::BindingResource::Sampler(&texture.sampler),
                },
            ],
        });

        self.bind_group = Some(bind_group);
        self.bound_texture = Some(alpha_map);
    }

    fn ensure_static_buffers(&mut self, ctx: &RenderCtx<'_>) {
        if self.quad_vbo.is_some() && self.quad_ibo.is_some() {
            return;
        }

        self.quad_vbo = Some(ctx.device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("parallax points quad vbo"),
            contents: bytemuck::cast_slice(&QUAD_VERTICES),
            usage: wgpu::BufferUsages::VERTEX,
        }));

        self.quad_ibo = Some(ctx.device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("parallax points quad ibo"),
            contents: bytemuck::cast_slice(&QUAD_INDICES),
            usage: wgpu::BufferUsages::INDEX,
        }));
    }

    fn write_uniform(&self, ctx: &RenderCtx<'_>, scene: &Scene, material: &PointsMaterial) {
        let Some(ubo) = self.ubo.as_ref() else { return };
        let u = PointsUniform::new(ctx, scene, material);
        ctx.queue.write_buffer(ubo, 0, bytemuck::bytes_of(&u));
    }

    /// Grows the instance buffer; returns `true` when it was reallocated.
    fn ensure_instance_capacity(&mut self, ctx: &RenderCtx<'_>, required_instances: usize) -> bool {
        if required_instances <= self.instance_capacity && self.instance_vbo.is_some() {
            return false;
        }

        let new_cap = required_instances.next_power_of_two().max(64);
        let new_size = (new_cap * std::mem::size_of::<PointInstance>()) as u64;

        self.instance_vbo = Some(ctx.device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("parallax points instance vbo"),
            size: new_size,
            usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        }));
        self.instance_capacity = new_cap;
        true
    }
}

#[repr(C)]
#[derive(Debug, Copy, Clone, Pod, Zeroable)]
struct PointInstance {
    position: [f32; 3],
}

impl PointInstance {
    const ATTRS: [wgpu::VertexAttribute; 1] = wgpu::vertex_attr_array![1 => Float32x3];

    fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<PointInstance>() as u64,
            step_mode: wgpu::VertexStepMode::Instance,
            attributes: &Self::ATTRS,
        }
    }
}

#[repr(C)]
#[derive(Debug, Copy, Clone, Pod, Zeroable)]
struct PointsUniform {
    view: [[f32; 4]; 4],
    proj: [[f32; 4]; 4],
    /// Linear premultiplied RGBA.
    color: [f32; 4],
    /// Physical viewport width and height.
    viewport: [f32; 2],
    /// Point size times pixel ratio.
    size: f32,
    /// Half the logical viewport height, or zero for fixed-size points.
    scale: f32,
}

impl PointsUniform {
    fn new(ctx: &RenderCtx<'_>, scene: &Scene, material: &PointsMaterial) -> Self {
        let (w, h) = ctx.surface_size;
        let logical_h = ctx.viewport.height.max(1.0);
        let pixel_ratio = h as f32 / logical_h;

        Self {
            view: scene.rig.view().to_cols_array_2d(),
            proj: scene.rig.camera.projection().to_cols_array_2d(),
            color: linear_rgba(material.color, 1.0),
            viewport: [w.max(1) as f32, h.max(1) as f32],
            size: material.size * pixel_ratio,
            scale: if material.size_attenuation { logical_h * 0.5 } else { 0.0 },
        }
    }

    /// Rendered diameter in physical pixels at view-space depth `view_z`.
    #[cfg(test)]
    fn diameter_at(&self, view_z: f32) -> f32 {
        if self.scale > 0.0 { self.size * self.scale / -view_z } else { self.size }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn uniform(size: f32, attenuate: bool, logical_h: f32, physical_h: f32) -> PointsUniform {
        PointsUniform {
            view: [[0.0; 4]; 4],
            proj: [[0.0; 4]; 4],
            color: [1.0; 4],
            viewport: [physical_h, physical_h],
            size: size * physical_h / logical_h,
            scale: if attenuate { logical_h * 0.5 } else { 0.0 },
        }
    }

    #[test]
    fn uniform_size_matches_wgsl_layout() {
        assert_eq!(std::mem::size_of::<PointsUniform>(), 160);
        assert_eq!(std::mem::size_of::<PointInstance>(), 12);
    }

    #[test]
    fn attenuated_points_shrink_with_depth() {
        // 0.03 units at depth 6 on a 600px tall viewport at 2x.
        let u = uniform(0.03, true, 600.0, 1200.0);
        assert!((u.diameter_at(-6.0) - 3.0).abs() < 1e-5);
        assert!((u.diameter_at(-12.0) - 1.5).abs() < 1e-5);
    }

    #[test]
    fn fixed_points_only_scale_by_pixel_ratio() {
        let u = uniform(4.0, false, 600.0, 1200.0);
        assert_eq!(u.diameter_at(-6.0), 8.0);
        assert_eq!(u.diameter_at(-60.0), 8.0);
    }
}
