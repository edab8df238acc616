use super::helpers;
use super::targets::HDR_FORMAT;
use crate::label::LabelBitmap;
use glam::{Mat4, Vec3};
use site_core::STATUS_LABEL_POSITION;

#[repr(C)]
#[derive(Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
struct LabelUniform {
    model: [[f32; 4]; 4],
    color: [f32; 4],
}

/// The route name drawn in world space behind the floating shape.
pub(crate) struct StatusLabel {
    pipeline: wgpu::RenderPipeline,
    bgl: wgpu::BindGroupLayout,
    sampler: wgpu::Sampler,
    uniform: wgpu::Buffer,
    glyphs: Option<(wgpu::Texture, wgpu::BindGroup)>,
}

impl StatusLabel {
    pub(crate) fn new(device: &wgpu::Device, view_bgl: &wgpu::BindGroupLayout) -> Self {
        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("label_shader"),
            source: wgpu::ShaderSource::Wgsl(site_core::LABEL_WGSL.into()),
        });
        let bgl = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("label_bgl"),
            entries: &[
                helpers::uniform_entry(
                    0,
                    wgpu::ShaderStages::VERTEX | wgpu::ShaderStages::FRAGMENT,
                    false,
                ),
                helpers::texture_entry(1, wgpu::ShaderStages::FRAGMENT),
                helpers::sampler_entry(2, wgpu::SamplerBindingType::Filtering),
            ],
        });
        let layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("pl_label"),
            bind_group_layouts: &[view_bgl, &bgl],
            push_constant_ranges: &[],
        });
        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("status_label"),
            layout: Some(&layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_label"),
                buffers: &[],
                compilation_options: wgpu::PipelineCompilationOptions::default(),
            },
            primitive: wgpu::PrimitiveState::default(),
            depth_stencil: Some(wgpu::DepthStencilState {
                format: helpers::DEPTH_FORMAT,
                depth_write_enabled: false,
                depth_compare: wgpu::CompareFunction::Less,
                stencil: wgpu::StencilState::default(),
                bias: wgpu::DepthBiasState::default(),
            }),
            multisample: wgpu::MultisampleState::default(),
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs_label"),
                targets: &[Some(wgpu::ColorTargetState {
                    format: HDR_FORMAT,
                    blend: Some(wgpu::BlendState::ALPHA_BLENDING),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: wgpu::PipelineCompilationOptions::default(),
            }),
            cache: None,
            multiview: None,
        });
        let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("label_sampler"),
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            ..Default::default()
        });
        let uniform = helpers::create_uniform_buffer(
            device,
            "label_uniform",
            std::mem::size_of::<LabelUniform>() as u64,
        );
        Self {
            pipeline,
            bgl,
            sampler,
            uniform,
            glyphs: None,
        }
    }

    /// Upload a freshly rasterized label and size the quad to match.
    pub(crate) fn set_bitmap(&mut self, device: &wgpu::Device, queue: &wgpu::Queue, bitmap: &LabelBitmap) {
        let size = wgpu::Extent3d {
            width: bitmap.width.max(1),
            height: bitmap.height.max(1),
            depth_or_array_layers: 1,
        };
        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some("label_glyphs"),
            size,
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: wgpu::TextureFormat::Rgba8Unorm,
            usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
            view_formats: &[],
        });
        queue.write_texture(
            wgpu::TexelCopyTextureInfo {
                texture: &texture,
                mip_level: 0,
                origin: wgpu::Origin3d::ZERO,
                aspect: wgpu::TextureAspect::All,
            },
            &bitmap.rgba,
            wgpu::TexelCopyBufferLayout {
                offset: 0,
                bytes_per_row: Some(4 * size.width),
                rows_per_image: Some(size.height),
            },
            size,
        );
        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
        let bg = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("label_bg"),
            layout: &self.bgl,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: self.uniform.as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::TextureView(&view),
                },
                wgpu::BindGroupEntry {
                    binding: 2,
                    resource: wgpu::BindingResource::Sampler(&self.sampler),
                },
            ],
        });
        let model = Mat4::from_translation(STATUS_LABEL_POSITION)
            * Mat4::from_scale(Vec3::new(bitmap.world_width, bitmap.world_height, 1.0));
        let u = LabelUniform {
            model: model.to_cols_array_2d(),
            color: [0.0, 0.0, 0.0, 1.0],
        };
        queue.write_buffer(&self.uniform, 0, bytemuck::bytes_of(&u));
        self.glyphs = Some((texture, bg));
    }

    pub(crate) fn draw(&self, rpass: &mut wgpu::RenderPass<'_>, view_bg: &wgpu::BindGroup) {
        let Some((_, bg)) = &self.glyphs else { return };
        rpass.set_pipeline(&self.pipeline);
        rpass.set_bind_group(0, view_bg, &[]);
        rpass.set_bind_group(1, bg, &[]);
        rpass.draw(0..6, 0..1);
    }
}
