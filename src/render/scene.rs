//! Scene globals and the two-pass transmissive glass material.
//!
//! Glass is drawn twice: back faces first with the backside thickness, then
//! front faces. Before each pass the HDR color is copied into the backbuffer
//! that the fragment shader refracts.

use super::helpers::{self, MeshGpu};
use super::targets::HDR_FORMAT;
use glam::{Mat4, Vec3};
use site_core::lighting::{Environment, LightformerGpu, SpotLight, MAX_LIGHTFORMERS};
use site_core::shapes::TransmissionParams;
use site_core::state::Camera;
use wgpu::util::DeviceExt;

#[repr(C)]
#[derive(Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
pub(crate) struct GlobalsUniform {
    view_proj: [[f32; 4]; 4],
    eye_time: [f32; 4],
    spot_pos: [f32; 4],
    spot_dir: [f32; 4],
    spot_params: [f32; 4],
    sky: [f32; 4],
    horizon: [f32; 4],
    ground: [f32; 4],
    background: [f32; 4],
    resolution: [f32; 4],
    lightformers: [LightformerGpu; MAX_LIGHTFORMERS],
}

fn rgb(c: [f32; 3]) -> [f32; 4] {
    [c[0], c[1], c[2], 1.0]
}

impl GlobalsUniform {
    pub(crate) fn new(
        camera: &Camera,
        elapsed: f32,
        env: &Environment,
        spot: Option<&SpotLight>,
        background: [f32; 3],
        size: (u32, u32),
    ) -> Self {
        let (spot_pos, spot_dir, spot_params) = match spot {
            Some(s) => {
                let dir = (Vec3::ZERO - s.position).normalize_or_zero();
                let inner = s.angle * (1.0 - s.penumbra.clamp(0.0, 1.0));
                (
                    [s.position.x, s.position.y, s.position.z, s.intensity],
                    [dir.x, dir.y, dir.z, s.angle.cos()],
                    [inner.cos(), 0.0, 0.0, 0.0],
                )
            }
            None => ([0.0; 4], [0.0, -1.0, 0.0, 1.0], [1.0, 0.0, 0.0, 0.0]),
        };
        let eye = camera.eye;
        Self {
            view_proj: camera.view_projection().to_cols_array_2d(),
            eye_time: [eye.x, eye.y, eye.z, elapsed],
            spot_pos,
            spot_dir,
            spot_params,
            sky: rgb(env.gradient.sky),
            horizon: rgb(env.gradient.horizon),
            ground: rgb(env.gradient.ground),
            background: rgb(background),
            resolution: [
                size.0 as f32,
                size.1 as f32,
                env.lightformers.len().min(MAX_LIGHTFORMERS) as f32,
                0.0,
            ],
            lightformers: env.gpu_lightformers(),
        }
    }
}

#[repr(C)]
#[derive(Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
struct MaterialUniform {
    model: [[f32; 4]; 4],
    normal_mat: [[f32; 4]; 4],
    base: [f32; 4],
    t0: [f32; 4],
    t1: [f32; 4],
    t2: [f32; 4],
    t3: [f32; 4],
}

impl MaterialUniform {
    fn new(model: Mat4, p: &TransmissionParams, backside_pass: bool) -> Self {
        let flag = if backside_pass { 1.0 } else { 0.0 };
        Self {
            model: model.to_cols_array_2d(),
            normal_mat: model.inverse().transpose().to_cols_array_2d(),
            base: [1.0, 1.0, 1.0, 1.0],
            t0: [p.samples as f32, p.thickness, p.ior, p.roughness],
            t1: [
                p.chromatic_aberration,
                p.anisotropy,
                p.distortion,
                p.distortion_scale,
            ],
            t2: [p.temporal_distortion, p.iridescence, p.iridescence_ior, flag],
            t3: [
                p.iridescence_thickness_range[0],
                p.iridescence_thickness_range[1],
                p.backside_thickness,
                0.0,
            ],
        }
    }
}

pub(crate) struct SceneResources {
    pub(crate) bgl0: wgpu::BindGroupLayout,
    bgl1: wgpu::BindGroupLayout,
    pub(crate) globals_buffer: wgpu::Buffer,
    /// Globals only, for shaders that just need the view-projection.
    pub(crate) view_bgl: wgpu::BindGroupLayout,
    pub(crate) view_bg: wgpu::BindGroup,
    back_pipeline: wgpu::RenderPipeline,
    front_pipeline: wgpu::RenderPipeline,
}

fn glass_pipeline(
    device: &wgpu::Device,
    layout: &wgpu::PipelineLayout,
    shader: &wgpu::ShaderModule,
    label: &str,
    cull: wgpu::Face,
) -> wgpu::RenderPipeline {
    device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
        label: Some(label),
        layout: Some(layout),
        vertex: wgpu::VertexState {
            module: shader,
            entry_point: Some("vs_mesh"),
            buffers: &[helpers::vertex_layout()],
            compilation_options: wgpu::PipelineCompilationOptions::default(),
        },
        primitive: wgpu::PrimitiveState {
            cull_mode: Some(cull),
            ..Default::default()
        },
        depth_stencil: Some(wgpu::DepthStencilState {
            format: helpers::DEPTH_FORMAT,
            depth_write_enabled: true,
            depth_compare: wgpu::CompareFunction::Less,
            stencil: wgpu::StencilState::default(),
            bias: wgpu::DepthBiasState::default(),
        }),
        multisample: wgpu::MultisampleState::default(),
        fragment: Some(wgpu::FragmentState {
            module: shader,
            entry_point: Some("fs_transmission"),
            targets: &[Some(wgpu::ColorTargetState {
                format: HDR_FORMAT,
                blend: Some(wgpu::BlendState::REPLACE),
                write_mask: wgpu::ColorWrites::ALL,
            })],
            compilation_options: wgpu::PipelineCompilationOptions::default(),
        }),
        cache: None,
        multiview: None,
    })
}

pub(crate) fn create_scene_resources(device: &wgpu::Device) -> SceneResources {
    let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
        label: Some("scene_shader"),
        source: wgpu::ShaderSource::Wgsl(site_core::SCENE_WGSL.into()),
    });
    let vis = wgpu::ShaderStages::VERTEX | wgpu::ShaderStages::FRAGMENT;
    let bgl0 = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
        label: Some("scene_bgl0"),
        entries: &[
            helpers::uniform_entry(0, vis, false),
            helpers::texture_entry(1, wgpu::ShaderStages::FRAGMENT),
            helpers::sampler_entry(2, wgpu::SamplerBindingType::Filtering),
        ],
    });
    let bgl1 = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
        label: Some("glass_bgl1"),
        entries: &[helpers::uniform_entry(0, vis, false)],
    });
    let globals_buffer = helpers::create_uniform_buffer(
        device,
        "scene_globals",
        std::mem::size_of::<GlobalsUniform>() as u64,
    );
    let view_bgl = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
        label: Some("view_bgl"),
        entries: &[helpers::uniform_entry(0, vis, false)],
    });
    let view_bg = device.create_bind_group(&wgpu::BindGroupDescriptor {
        label: Some("view_bg"),
        layout: &view_bgl,
        entries: &[wgpu::BindGroupEntry {
            binding: 0,
            resource: globals_buffer.as_entire_binding(),
        }],
    });
    let layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
        label: Some("pl_glass"),
        bind_group_layouts: &[&bgl0, &bgl1],
        push_constant_ranges: &[],
    });
    let back_pipeline = glass_pipeline(device, &layout, &shader, "glass_back", wgpu::Face::Front);
    let front_pipeline = glass_pipeline(device, &layout, &shader, "glass_front", wgpu::Face::Back);
    SceneResources {
        bgl0,
        bgl1,
        globals_buffer,
        view_bgl,
        view_bg,
        back_pipeline,
        front_pipeline,
    }
}

/// Globals plus the refraction source. Rebuilt whenever the backbuffer is.
pub(crate) fn scene_bind_group(
    device: &wgpu::Device,
    res: &SceneResources,
    backbuffer: &wgpu::TextureView,
    sampler: &wgpu::Sampler,
) -> wgpu::BindGroup {
    device.create_bind_group(&wgpu::BindGroupDescriptor {
        label: Some("scene_bg0"),
        layout: &res.bgl0,
        entries: &[
            wgpu::BindGroupEntry {
                binding: 0,
                resource: res.globals_buffer.as_entire_binding(),
            },
            wgpu::BindGroupEntry {
                binding: 1,
                resource: wgpu::BindingResource::TextureView(backbuffer),
            },
            wgpu::BindGroupEntry {
                binding: 2,
                resource: wgpu::BindingResource::Sampler(sampler),
            },
        ],
    })
}

/// A mesh drawn with the glass material.
pub(crate) struct GlassGpu {
    mesh: MeshGpu,
    back_buffer: wgpu::Buffer,
    front_buffer: wgpu::Buffer,
    back_bg: wgpu::BindGroup,
    front_bg: wgpu::BindGroup,
}

impl GlassGpu {
    pub(crate) fn new(
        device: &wgpu::Device,
        res: &SceneResources,
        label: &str,
        mesh: &site_core::MeshData,
    ) -> Self {
        let mesh = helpers::upload_mesh(device, label, mesh);
        let zero = MaterialUniform::new(Mat4::IDENTITY, &TransmissionParams::default(), false);
        let make = |side: &str| {
            let buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some(&format!("{label}_{side}")),
                contents: bytemuck::bytes_of(&zero),
                usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            });
            let bg = device.create_bind_group(&wgpu::BindGroupDescriptor {
                label: Some(&format!("{label}_{side}_bg")),
                layout: &res.bgl1,
                entries: &[wgpu::BindGroupEntry {
                    binding: 0,
                    resource: buffer.as_entire_binding(),
                }],
            });
            (buffer, bg)
        };
        let (back_buffer, back_bg) = make("back");
        let (front_buffer, front_bg) = make("front");
        Self {
            mesh,
            back_buffer,
            front_buffer,
            back_bg,
            front_bg,
        }
    }

    pub(crate) fn write(&self, queue: &wgpu::Queue, model: Mat4, params: &TransmissionParams) {
        if params.backside {
            let back = MaterialUniform::new(model, params, true);
            queue.write_buffer(&self.back_buffer, 0, bytemuck::bytes_of(&back));
        }
        let front = MaterialUniform::new(model, params, false);
        queue.write_buffer(&self.front_buffer, 0, bytemuck::bytes_of(&front));
    }

    pub(crate) fn mesh(&self) -> &MeshGpu {
        &self.mesh
    }

    pub(crate) fn draw_back(
        &self,
        rpass: &mut wgpu::RenderPass<'_>,
        res: &SceneResources,
        bg0: &wgpu::BindGroup,
    ) {
        rpass.set_pipeline(&res.back_pipeline);
        rpass.set_bind_group(0, bg0, &[]);
        rpass.set_bind_group(1, &self.back_bg, &[]);
        self.mesh.draw(rpass);
    }

    pub(crate) fn draw_front(
        &self,
        rpass: &mut wgpu::RenderPass<'_>,
        res: &SceneResources,
        bg0: &wgpu::BindGroup,
    ) {
        rpass.set_pipeline(&res.front_pipeline);
        rpass.set_bind_group(0, bg0, &[]);
        rpass.set_bind_group(1, &self.front_bg, &[]);
        self.mesh.draw(rpass);
    }
}
