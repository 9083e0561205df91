use std::collections::HashMap;

use bytemuck::{Pod, Zeroable};
use glam::Mat4;
use parallax_scene::geometry::Geometry;
use parallax_scene::material::{MaterialId, TextureId};
use parallax_scene::scene::Scene;
use wgpu::util::DeviceExt;

use crate::device::DEPTH_FORMAT;
use crate::render::{RenderCtx, RenderTarget};

use super::common::{
    linear_rgba, texture_layout_entries, ubo_min_binding_size, uniform_layout_entry,
};
use super::texture::GpuTexture;

/// Cel-shaded mesh renderer.
///
/// Bind groups:
/// - 0: camera (view-projection) and the directional light
/// - 1: material color and gradient map, one per toon material
/// - 2: model and normal matrices, one per mesh
///
/// Vertex and index buffers are uploaded once per mesh; geometry is static.
#[derive(Default)]
pub struct ToonMeshRenderer {
    pipeline_format: Option<wgpu::TextureFormat>,
    pipeline: Option<wgpu::RenderPipeline>,

    camera_bgl: Option<wgpu::BindGroupLayout>,
    material_bgl: Option<wgpu::BindGroupLayout>,
    model_bgl: Option<wgpu::BindGroupLayout>,

    camera_ubo: Option<wgpu::Buffer>,
    camera_bg: Option<wgpu::BindGroup>,

    materials: HashMap<MaterialId, MaterialGpu>,
    meshes: Vec<MeshGpu>,
}

struct MaterialGpu {
    texture: TextureId,
    ubo: wgpu::Buffer,
    bind_group: wgpu::BindGroup,
}

struct MeshGpu {
    vbo: wgpu::Buffer,
    ibo: wgpu::Buffer,
    index_count: u32,
    model_ubo: wgpu::Buffer,
    model_bg: wgpu::BindGroup,
}

impl ToonMeshRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Draws every mesh of `scene` with its toon material.
    ///
    /// `textures` is indexed by [`TextureId`]; meshes whose material is not a
    /// toon material, or whose gradient map is missing, are skipped.
    pub fn render(
        &mut self,
        ctx: &RenderCtx<'_>,
        target: &mut RenderTarget<'_>,
        scene: &Scene,
        textures: &[GpuTexture],
    ) {
        if scene.meshes.is_empty() {
            return;
        }

        self.ensure_pipeline(ctx);
        self.ensure_camera_binding(ctx);
        self.ensure_meshes(ctx, scene);
        self.ensure_materials(ctx, scene, textures);

        self.write_camera_uniform(ctx, scene);
        self.write_material_uniforms(ctx, scene);
        self.write_model_uniforms(ctx, scene);

        let Some(pipeline) = self.pipeline.as_ref() else { return };
        let Some(camera_bg) = self.camera_bg.as_ref() else { return };

        let mut rpass = target.begin_load_pass("parallax mesh pass", true);
        rpass.set_pipeline(pipeline);
        rpass.set_bind_group(0, camera_bg, &[]);

        for (mesh, gpu) in scene.meshes.iter().zip(&self.meshes) {
            let Some(material) = self.materials.get(&mesh.material) else { continue };

            rpass.set_bind_group(1, &material.bind_group, &[]);
            rpass.set_bind_group(2, &gpu.model_bg, &[]);
            rpass.set_vertex_buffer(0, gpu.vbo.slice(..));
            rpass.set_index_buffer(gpu.ibo.slice(..), wgpu::IndexFormat::Uint32);
            rpass.draw_indexed(0..gpu.index_count, 0, 0..1);
        }
    }

    fn ensure_pipeline(&mut self, ctx: &RenderCtx<'_>) {
        if self.pipeline_format == Some(ctx.surface_format) && self.pipeline.is_some() {
            return;
        }

        let shader = ctx.device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("parallax mesh shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("shaders/mesh.wgsl").into()),
        });

        let camera_bgl = ctx.device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("parallax mesh camera bgl"),
            entries: &[uniform_layout_entry(
                0,
                wgpu::ShaderStages::VERTEX_FRAGMENT,
                ubo_min_binding_size::<CameraUniform>(),
            )],
        });

        let [tex_entry, smp_entry] = texture_layout_entries(1);
        let material_bgl = ctx.device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("parallax mesh material bgl"),
            entries: &[
                uniform_layout_entry(
                    0,
                    wgpu::ShaderStages::FRAGMENT,
                    ubo_min_binding_size::<MaterialUniform>(),
                ),
                tex_entry,
                smp_entry,
            ],
        });

        let model_bgl = ctx.device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("parallax mesh model bgl"),
            entries: &[uniform_layout_entry(
                0,
                wgpu::ShaderStages::VERTEX,
                ubo_min_binding_size::<ModelUniform>(),
            )],
        });

        let pipeline_layout = ctx.device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("parallax mesh pipeline layout"),
            bind_group_layouts: &[&camera_bgl, &material_bgl, &model_bgl],
            immediate_size: 0,
        });

        let pipeline = ctx.device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("parallax mesh pipeline"),
            layout: Some(&pipeline_layout),

            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_main"),
                compilation_options: Default::default(),
                buffers: &[GpuVertex::layout()],
            },

            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs_main"),
                compilation_options: Default::default(),
                targets: &[Some(wgpu::ColorTargetState {
                    format: ctx.surface_format,
                    blend: None,
                    write_mask: wgpu::ColorWrites::ALL,
                })],
            }),

            // Closed meshes; depth testing hides the far side.
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
                depth_write_enabled: true,
                depth_compare: wgpu::CompareFunction::Less,
                stencil: wgpu::StencilState::default(),
                bias: wgpu::DepthBiasState::default(),
            }),
            multisample: wgpu::MultisampleState::default(),

            multiview_mask: None,
            cache: None,
        });

        self.pipeline_format = Some(ctx.surface_format);
        self.pipeline = Some(pipeline);
        self.camera_bgl = Some(camera_bgl);
        self.material_bgl = Some(material_bgl);
        self.model_bgl = Some(model_bgl);

        // Bind groups reference the old layouts.
        self.camera_bg = None;
        self.camera_ubo = None;
        self.materials.clear();
        self.meshes.clear();
    }

    fn ensure_camera_binding(&mut self, ctx: &RenderCtx<'_>) {
        if self.camera_bg.is_some() && self.camera_ubo.is_some() {
            return;
        }
        let Some(bgl) = self.camera_bgl.as_ref() else { return };

        let ubo = ctx.device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("parallax mesh camera ubo"),
            size: std::mem::size_of::<CameraUniform>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let bind_group = ctx.device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("parallax mesh camera bind group"),
            layout: bgl,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: ubo.as_entire_binding(),
            }],
        });

        self.camera_ubo = Some(ubo);
        self.camera_bg = Some(bind_group);
    }

    fn ensure_meshes(&mut self, ctx: &RenderCtx<'_>, scene: &Scene) {
        if self.meshes.len() == scene.meshes.len() {
            return;
        }
        let Some(bgl) = self.model_bgl.as_ref() else { return };

        self.meshes = scene
            .meshes
            .iter()
            .map(|mesh| upload_mesh(ctx, bgl, mesh.shape.name(), &mesh.geometry))
            .collect();
        log::debug!("uploaded {} meshes", self.meshes.len());
    }

    fn ensure_materials(&mut self, ctx: &RenderCtx<'_>, scene: &Scene, textures: &[GpuTexture]) {
        let Some(bgl) = self.material_bgl.as_ref() else { return };

        for mesh in &scene.meshes {
            let Some(toon) = scene.materials.get(mesh.material).as_toon() else { continue };
            let current = self.materials.get(&mesh.material).map(|m| m.texture);
            if current == Some(toon.gradient_map) {
                continue;
            }
            let Some(texture) = textures.get(toon.gradient_map.index()) else {
                log::warn!("gradient map {:?} not uploaded", toon.gradient_map);
                continue;
            };

            let ubo = ctx.device.create_buffer(&wgpu::BufferDescriptor {
                label: Some("parallax toon material ubo"),
                size: std::mem::size_of::<MaterialUniform>() as u64,
                usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
                mapped_at_creation: false,
            });

            let bind_group = ctx.device.create_bind_group(&wgpu::BindGroupDescriptor {
                label: Some("parallax toon material bind group"),
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

            self.materials.insert(
                mesh.material,
                MaterialGpu { texture: toon.gradient_map, ubo, bind_group },
            );
        }
    }

    fn write_camera_uniform(&self, ctx: &RenderCtx<'_>, scene: &Scene) {
        let Some(ubo) = self.camera_ubo.as_ref() else { return };
        let light = &scene.light;
        let [r, g, b] = light.color.to_linear();
        let dir = light.direction_to_light();

        let u = CameraUniform {
            view_proj: scene.rig.view_projection().to_cols_array_2d(),
            light_dir: [dir.x, dir.y, dir.z, 0.0],
            light_color: [r * light.intensity, g * light.intensity, b * light.intensity, 1.0],
        };
        ctx.queue.write_buffer(ubo, 0, bytemuck::bytes_of(&u));
    }

    fn write_material_uniforms(&self, ctx: &RenderCtx<'_>, scene: &Scene) {
        for (id, gpu) in &self.materials {
            let u = MaterialUniform {
                color: linear_rgba(scene.materials.get(*id).color(), 1.0),
            };
            ctx.queue.write_buffer(&gpu.ubo, 0, bytemuck::bytes_of(&u));
        }
    }

    fn write_model_uniforms(&self, ctx: &RenderCtx<'_>, scene: &Scene) {
        for (mesh, gpu) in scene.meshes.iter().zip(&self.meshes) {
            let u = ModelUniform::new(mesh.model_matrix());
            ctx.queue.write_buffer(&gpu.model_ubo, 0, bytemuck::bytes_of(&u));
        }
    }
}

fn upload_mesh(
    ctx: &RenderCtx<'_>,
    model_bgl: &wgpu::BindGroupLayout,
    name: &str,
    geometry: &Geometry,
) -> MeshGpu {
    let vertices: Vec<GpuVertex> = geometry
        .vertices()
        .iter()
        .map(|v| GpuVertex { position: v.position.to_array(), normal: v.normal.to_array() })
        .collect();

    let vbo = ctx.device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
        label: Some(&format!("parallax {name} vbo")),
        contents: bytemuck::cast_slice(&vertices),
        usage: wgpu::BufferUsages::VERTEX,
    });

    let ibo = ctx.device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
        label: Some(&format!("parallax {name} ibo")),
        contents: bytemuck::cast_slice(geometry.indices()),
        usage: wgpu::BufferUsages::INDEX,
    });

    let model_ubo = ctx.device.create_buffer(&wgpu::BufferDescriptor {
        label: Some(&format!("parallax {name} model ubo")),
        size: std::mem::size_of::<ModelUniform>() as u64,
        usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        mapped_at_creation: false,
    });

    let model_bg = ctx.device.create_bind_group(&wgpu::BindGroupDescriptor {
        label: Some(&format!("parallax {name} model bind group")),
        layout: model_bgl,
        entries: &[wgpu::BindGroupEntry {
            binding: 0,
            resource: model_ubo.as_entire_binding(),
        }],
    });

    MeshGpu {
        vbo,
        ibo,
        index_count: geometry.indices().len() as u32,
        model_ubo,
        model_bg,
    }
}

#[repr(C)]
#[derive(Debug, Copy, Clone, Pod, Zeroable)]
struct GpuVertex {
    position: [f32; 3],
    normal: [f32; 3],
}

impl GpuVertex {
    const ATTRS: [wgpu::VertexAttribute; 2] = wgpu::vertex_attr_array![
        0 => Float32x3, // position
        1 => Float32x3  // normal
    ];

    fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<GpuVertex>() as u64,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRS,
        }
    }
}

#[repr(C)]
#[derive(Debug, Copy, Clone, Pod, Zeroable)]
struct CameraUniform {
    view_proj: [[f32; 4]; 4],
    /// xyz: unit vector toward the light.
    light_dir: [f32; 4],
    /// rgb: linear color times intensity.
    light_color: [f32; 4],
}

#[repr(C)]
#[derive(Debug, Copy, Clone, Pod, Zeroable)]
struct MaterialUniform {
    color: [f32; 4],
}

#[repr(C)]
#[derive(Debug, Copy, Clone, Pod, Zeroable)]
struct ModelUniform {
    model: [[f32; 4]; 4],
    normal: [[f32; 4]; 4],
}

impl ModelUniform {
    fn new(model: Mat4) -> Self {
        Self {
            model: model.to_cols_array_2d(),
            normal: model.inverse().transpose().to_cols_array_2d(),
        }
    }
}

#[cfg(test)]
mod tests {
    use glam::{Vec3, Vec4};

    use super::*;

    #[test]
    fn uniform_sizes_match_wgsl_layout() {
        assert_eq!(std::mem::size_of::<CameraUniform>(), 96);
        assert_eq!(std::mem::size_of::<MaterialUniform>(), 16);
        assert_eq!(std::mem::size_of::<ModelUniform>(), 128);
        assert_eq!(std::mem::size_of::<GpuVertex>(), 24);
    }

    #[test]
    fn normal_matrix_keeps_rotated_normals_unit_length() {
        let model = Mat4::from_translation(Vec3::new(0.0, -4.0, 0.0))
            * Mat4::from_rotation_x(0.7)
            * Mat4::from_rotation_y(1.3);
        let u = ModelUniform::new(model);
        let normal = Mat4::from_cols_array_2d(&u.normal) * Vec4::new(0.0, 0.0, 1.0, 0.0);
        let expected = model * Vec4::new(0.0, 0.0, 1.0, 0.0);

        assert!((normal.truncate().length() - 1.0).abs() < 1e-5);
        assert!((normal - expected).length() < 1e-5);
    }
}
