use super::helpers::{self, MeshGpu};
use super::targets::HDR_FORMAT;
use site_core::bubbles::BubbleInstance;
use site_core::geometry::sphere;
use site_core::DetailParams;

const INSTANCE_ATTRS: [wgpu::VertexAttribute; 5] = wgpu::vertex_attr_array![
    2 => Float32x4,
    3 => Float32x4,
    4 => Float32x4,
    5 => Float32x4,
    6 => Float32x4
];

/// Instanced unlit spheres. Drawn before anything else in the pass and
/// without depth, so everything later paints over them.
pub(crate) struct BubblesGpu {
    pipeline: wgpu::RenderPipeline,
    sphere: MeshGpu,
    instances: wgpu::Buffer,
    capacity: u32,
    count: u32,
}

impl BubblesGpu {
    pub(crate) fn new(
        device: &wgpu::Device,
        view_bgl: &wgpu::BindGroupLayout,
        detail: &DetailParams,
        capacity: u32,
    ) -> Self {
        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("bubbles_shader"),
            source: wgpu::ShaderSource::Wgsl(site_core::BUBBLES_WGSL.into()),
        });
        let layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("pl_bubbles"),
            bind_group_layouts: &[view_bgl],
            push_constant_ranges: &[],
        });
        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("bubbles"),
            layout: Some(&layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_bubble"),
                buffers: &[
                    helpers::vertex_layout(),
                    wgpu::VertexBufferLayout {
                        array_stride: std::mem::size_of::<BubbleInstance>() as u64,
                        step_mode: wgpu::VertexStepMode::Instance,
                        attributes: &INSTANCE_ATTRS,
                    },
                ],
                compilation_options: wgpu::PipelineCompilationOptions::default(),
            },
            primitive: wgpu::PrimitiveState {
                cull_mode: Some(wgpu::Face::Back),
                ..Default::default()
            },
            depth_stencil: Some(wgpu::DepthStencilState {
                format: helpers::DEPTH_FORMAT,
                depth_write_enabled: false,
                depth_compare: wgpu::CompareFunction::Always,
                stencil: wgpu::StencilState::default(),
                bias: wgpu::DepthBiasState::default(),
            }),
            multisample: wgpu::MultisampleState::default(),
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs_bubble"),
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
        let instances = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("bubble_instances"),
            size: (std::mem::size_of::<BubbleInstance>() as u64) * capacity.max(1) as u64,
            usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        Self {
            pipeline,
            sphere: Self::build_sphere(device, detail),
            instances,
            capacity: capacity.max(1),
            count: 0,
        }
    }

    fn build_sphere(device: &wgpu::Device, detail: &DetailParams) -> MeshGpu {
        let mesh = sphere(
            1.0,
            detail.bubble_width_segments,
            detail.bubble_height_segments,
        );
        helpers::upload_mesh(device, "bubble_sphere", &mesh)
    }

    /// Swap the sphere tessellation for a new tier.
    pub(crate) fn set_detail(&mut self, device: &wgpu::Device, detail: &DetailParams) {
        self.sphere = Self::build_sphere(device, detail);
    }

    pub(crate) fn write(&mut self, queue: &wgpu::Queue, instances: &[BubbleInstance]) {
        let n = instances.len().min(self.capacity as usize);
        queue.write_buffer(&self.instances, 0, bytemuck::cast_slice(&instances[..n]));
        self.count = n as u32;
    }

    pub(crate) fn draw(&self, rpass: &mut wgpu::RenderPass<'_>, view_bg: &wgpu::BindGroup) {
        if self.count == 0 {
            return;
        }
        rpass.set_pipeline(&self.pipeline);
        rpass.set_bind_group(0, view_bg, &[]);
        rpass.set_vertex_buffer(0, self.sphere.vertex.slice(..));
        rpass.set_vertex_buffer(1, self.instances.slice(..));
        rpass.set_index_buffer(self.sphere.index.slice(..), wgpu::IndexFormat::Uint32);
        rpass.draw_indexed(0..self.sphere.index_count, 0, 0..self.count);
    }
}
