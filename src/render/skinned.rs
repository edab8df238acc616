use super::helpers::{self, MeshGpu};
use super::targets::HDR_FORMAT;
use glam::Mat4;
use site_core::model::{ModelData, SkinnedVertex};

const SKINNED_ATTRS: [wgpu::VertexAttribute; 4] = wgpu::vertex_attr_array![
    0 => Float32x3,
    1 => Float32x3,
    2 => Uint32x4,
    3 => Float32x4
];

#[repr(C)]
#[derive(Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
struct ObjectUniform {
    model: [[f32; 4]; 4],
    base_color: [f32; 4],
    flags: [f32; 4],
}

struct MeshEntry {
    mesh: MeshGpu,
    node: usize,
    skinned: bool,
    base_color: [f32; 4],
    uniform: wgpu::Buffer,
    bg: wgpu::BindGroup,
}

/// An uploaded glTF model: one draw per primitive, sharing a joint palette.
pub(crate) struct SkinnedModelGpu {
    pipeline: wgpu::RenderPipeline,
    palette: wgpu::Buffer,
    palette_len: usize,
    meshes: Vec<MeshEntry>,
}

impl SkinnedModelGpu {
    pub(crate) fn new(
        device: &wgpu::Device,
        view_bgl: &wgpu::BindGroupLayout,
        model: &ModelData,
    ) -> Self {
        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("skinned_shader"),
            source: wgpu::ShaderSource::Wgsl(site_core::SKINNED_WGSL.into()),
        });
        let bgl = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("object_bgl"),
            entries: &[
                helpers::uniform_entry(
                    0,
                    wgpu::ShaderStages::VERTEX | wgpu::ShaderStages::FRAGMENT,
                    false,
                ),
                wgpu::BindGroupLayoutEntry {
                    binding: 1,
                    visibility: wgpu::ShaderStages::VERTEX,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Storage { read_only: true },
                        has_dynamic_offset: false,
                        min_binding_size: None,
                    },
                    count: None,
                },
            ],
        });
        let layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("pl_skinned"),
            bind_group_layouts: &[view_bgl, &bgl],
            push_constant_ranges: &[],
        });
        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("skinned"),
            layout: Some(&layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_skinned"),
                buffers: &[wgpu::VertexBufferLayout {
                    array_stride: std::mem::size_of::<SkinnedVertex>() as u64,
                    step_mode: wgpu::VertexStepMode::Vertex,
                    attributes: &SKINNED_ATTRS,
                }],
                compilation_options: wgpu::PipelineCompilationOptions::default(),
            },
            primitive: wgpu::PrimitiveState::default(),
            depth_stencil: Some(wgpu::DepthStencilState {
                format: helpers::DEPTH_FORMAT,
                depth_write_enabled: true,
                depth_compare: wgpu::CompareFunction::Less,
                stencil: wgpu::StencilState::default(),
                bias: wgpu::DepthBiasState::default(),
            }),
            multisample: wgpu::MultisampleState::default(),
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs_skinned"),
                targets: &[Some(wgpu::ColorTargetState {
                    format: HDR_FORMAT,
                    blend: Some(wgpu::BlendState::REPLACE),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: wgpu::PipelineCompilationOptions::default(),
            }),
            cache: None,
            multiview: None,
        });

        let palette_len = model.skin.as_ref().map_or(0, |s| s.joints.len()).max(1);
        let palette = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("joint_palette"),
            size: (palette_len * std::mem::size_of::<Mat4>()) as u64,
            usage: wgpu::BufferUsages::STORAGE | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        let meshes = model
            .meshes
            .iter()
            .map(|m| {
                let mesh = helpers::upload_raw(
                    device,
                    &m.name,
                    bytemuck::cast_slice(&m.vertices),
                    &m.indices,
                );
                let uniform = helpers::create_uniform_buffer(
                    device,
                    &m.name,
                    std::mem::size_of::<ObjectUniform>() as u64,
                );
                let bg = device.create_bind_group(&wgpu::BindGroupDescriptor {
                    label: Some(&m.name),
                    layout: &bgl,
                    entries: &[
                        wgpu::BindGroupEntry {
                            binding: 0,
                            resource: uniform.as_entire_binding(),
                        },
                        wgpu::BindGroupEntry {
                            binding: 1,
                            resource: palette.as_entire_binding(),
                        },
                    ],
                });
                MeshEntry {
                    mesh,
                    node: m.node,
                    skinned: m.skinned,
                    base_color: m.base_color,
                    uniform,
                    bg,
                }
            })
            .collect();
        Self {
            pipeline,
            palette,
            palette_len,
            meshes,
        }
    }

    /// Upload this frame's pose. Skinned primitives get `root` and the joint
    /// palette; rigid ones are placed by their node's global transform.
    pub(crate) fn write(&self, queue: &wgpu::Queue, root: Mat4, globals: &[Mat4], palette: &[Mat4]) {
        if !palette.is_empty() {
            let n = palette.len().min(self.palette_len);
            queue.write_buffer(&self.palette, 0, bytemuck::cast_slice(&palette[..n]));
        }
        for entry in &self.meshes {
            let (model, flag) = if entry.skinned && !palette.is_empty() {
                (root, 1.0)
            } else {
                let node = globals.get(entry.node).copied().unwrap_or(Mat4::IDENTITY);
                (root * node, 0.0)
            };
            let u = ObjectUniform {
                model: model.to_cols_array_2d(),
                base_color: entry.base_color,
                flags: [flag, 0.0, 0.0, 0.0],
            };
            queue.write_buffer(&entry.uniform, 0, bytemuck::bytes_of(&u));
        }
    }

    pub(crate) fn draw(&self, rpass: &mut wgpu::RenderPass<'_>, view_bg: &wgpu::BindGroup) {
        rpass.set_pipeline(&self.pipeline);
        rpass.set_bind_group(0, view_bg, &[]);
        for entry in &self.meshes {
            rpass.set_bind_group(1, &entry.bg, &[]);
            entry.mesh.draw(rpass);
        }
    }
}
