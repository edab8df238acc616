//! Shadow catchers: blurred contact shadows for the shape scene and a
//! temporally accumulated soft shadow for the aquarium, both drawn onto a
//! floor plane.

use super::helpers::{self, MeshGpu, UNIFORM_SLOT};
use super::targets::HDR_FORMAT;
use crate::constants::{ACCUM_SHADOW_RES, CONTACT_SHADOW_RES, LIGHT_DEPTH_RES, SHADOW_DEPTH_BIAS};
use glam::{Mat4, Vec3};
use site_core::geometry::floor_plane;
use site_core::lighting::RandomizedLight;

const CONTACT_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Rgba8Unorm;
// Running averages over dozens of frames need more than 8 bits.
const ACCUM_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Rgba16Float;

#[repr(C)]
#[derive(Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
struct CasterUniform {
    view_proj: [[f32; 4]; 4],
    model: [[f32; 4]; 4],
}

#[repr(C)]
#[derive(Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
struct BlurUniform {
    dir_texel: [f32; 4],
}

#[repr(C)]
#[derive(Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
struct AccumUniform {
    light_view_proj: [[f32; 4]; 4],
    plane: [f32; 4],
}

#[repr(C)]
#[derive(Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
struct FloorUniform {
    model: [[f32; 4]; 4],
    color_opacity: [f32; 4],
    params: [f32; 4],
}

/// How the floor reads its shadow texture.
#[derive(Clone, Copy, Debug)]
pub(crate) enum FloorMode {
    /// Darkness in alpha, drawn black.
    Contact { opacity: f32 },
    /// Visibility in red, tinted by `color` and `blend`.
    Accumulated {
        color: [f32; 3],
        blend: f32,
        opacity: f32,
    },
}

/// Layouts, pipelines and the shared plane mesh used by every shadow floor.
pub(crate) struct ShadowResources {
    caster_bgl: wgpu::BindGroupLayout,
    blur_bgl: wgpu::BindGroupLayout,
    floor_bgl: wgpu::BindGroupLayout,
    contact_pipeline: wgpu::RenderPipeline,
    depth_pipeline: wgpu::RenderPipeline,
    contact_blur_pipeline: wgpu::RenderPipeline,
    copy_pipeline: wgpu::RenderPipeline,
    accum_bgl: wgpu::BindGroupLayout,
    accumulate_pipeline: wgpu::RenderPipeline,
    floor_pipeline: wgpu::RenderPipeline,
    plane: MeshGpu,
    linear_sampler: wgpu::Sampler,
    compare_sampler: wgpu::Sampler,
}

pub(crate) fn create_shadow_resources(
    device: &wgpu::Device,
    view_bgl: &wgpu::BindGroupLayout,
) -> ShadowResources {
    let shadow_shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
        label: Some("shadow_shader"),
        source: wgpu::ShaderSource::Wgsl(site_core::SHADOW_WGSL.into()),
    });
    let blur_shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
        label: Some("blur_shader"),
        source: wgpu::ShaderSource::Wgsl(site_core::BLUR_WGSL.into()),
    });
    let accumulate_shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
        label: Some("accumulate_shader"),
        source: wgpu::ShaderSource::Wgsl(site_core::ACCUMULATE_WGSL.into()),
    });
    let floor_shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
        label: Some("floor_shader"),
        source: wgpu::ShaderSource::Wgsl(site_core::FLOOR_WGSL.into()),
    });

    let caster_bgl = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
        label: Some("caster_bgl"),
        entries: &[helpers::uniform_entry(0, wgpu::ShaderStages::VERTEX, true)],
    });
    let blur_bgl = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
        label: Some("shadow_blur_bgl"),
        entries: &[
            helpers::texture_entry(0, wgpu::ShaderStages::FRAGMENT),
            helpers::sampler_entry(1, wgpu::SamplerBindingType::Filtering),
            helpers::uniform_entry(2, wgpu::ShaderStages::FRAGMENT, true),
        ],
    });
    let accum_bgl = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
        label: Some("accum_bgl"),
        entries: &[
            helpers::depth_texture_entry(0),
            helpers::sampler_entry(1, wgpu::SamplerBindingType::Comparison),
            helpers::uniform_entry(2, wgpu::ShaderStages::FRAGMENT, true),
        ],
    });
    let floor_bgl = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
        label: Some("floor_bgl"),
        entries: &[
            helpers::uniform_entry(0, wgpu::ShaderStages::VERTEX | wgpu::ShaderStages::FRAGMENT, false),
            helpers::texture_entry(1, wgpu::ShaderStages::FRAGMENT),
            helpers::sampler_entry(2, wgpu::SamplerBindingType::Filtering),
        ],
    });

    let pl_caster = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
        label: Some("pl_caster"),
        bind_group_layouts: &[&caster_bgl],
        push_constant_ranges: &[],
    });
    let max_blend = wgpu::BlendComponent {
        src_factor: wgpu::BlendFactor::One,
        dst_factor: wgpu::BlendFactor::One,
        operation: wgpu::BlendOperation::Max,
    };
    let contact_pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
        label: Some("contact_caster"),
        layout: Some(&pl_caster),
        vertex: wgpu::VertexState {
            module: &shadow_shader,
            entry_point: Some("vs_caster"),
            buffers: &[helpers::vertex_layout()],
            compilation_options: wgpu::PipelineCompilationOptions::default(),
        },
        primitive: wgpu::PrimitiveState::default(),
        depth_stencil: None,
        multisample: wgpu::MultisampleState::default(),
        fragment: Some(wgpu::FragmentState {
            module: &shadow_shader,
            entry_point: Some("fs_contact"),
            targets: &[Some(wgpu::ColorTargetState {
                format: CONTACT_FORMAT,
                blend: Some(wgpu::BlendState {
                    color: max_blend,
                    alpha: max_blend,
                }),
                write_mask: wgpu::ColorWrites::ALL,
            })],
            compilation_options: wgpu::PipelineCompilationOptions::default(),
        }),
        cache: None,
        multiview: None,
    });
    let depth_pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
        label: Some("light_depth"),
        layout: Some(&pl_caster),
        vertex: wgpu::VertexState {
            module: &shadow_shader,
            entry_point: Some("vs_caster"),
            buffers: &[helpers::vertex_layout()],
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
        fragment: None,
        cache: None,
        multiview: None,
    });

    let pl_blur = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
        label: Some("pl_shadow_blur"),
        bind_group_layouts: &[&blur_bgl],
        push_constant_ranges: &[],
    });
    let contact_blur_pipeline =
        helpers::make_post_pipeline(device, &pl_blur, &blur_shader, "fs_blur", CONTACT_FORMAT, None);
    let copy_pipeline = helpers::make_post_pipeline(
        device,
        &pl_blur,
        &blur_shader,
        "fs_copy",
        ACCUM_FORMAT,
        Some(helpers::CONSTANT_BLEND),
    );
    let pl_accum = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
        label: Some("pl_accumulate"),
        bind_group_layouts: &[&accum_bgl],
        push_constant_ranges: &[],
    });
    let accumulate_pipeline = helpers::make_post_pipeline(
        device,
        &pl_accum,
        &accumulate_shader,
        "fs_accumulate",
        ACCUM_FORMAT,
        Some(helpers::CONSTANT_BLEND),
    );

    let pl_floor = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
        label: Some("pl_floor"),
        bind_group_layouts: &[view_bgl, &floor_bgl],
        push_constant_ranges: &[],
    });
    let floor_pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
        label: Some("floor"),
        layout: Some(&pl_floor),
        vertex: wgpu::VertexState {
            module: &floor_shader,
            entry_point: Some("vs_floor"),
            buffers: &[helpers::vertex_layout()],
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
            module: &floor_shader,
            entry_point: Some("fs_floor"),
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

    let linear_sampler = device.create_sampler(&wgpu::SamplerDescriptor {
        label: Some("shadow_sampler"),
        mag_filter: wgpu::FilterMode::Linear,
        min_filter: wgpu::FilterMode::Linear,
        ..Default::default()
    });
    let compare_sampler = device.create_sampler(&wgpu::SamplerDescriptor {
        label: Some("shadow_compare"),
        mag_filter: wgpu::FilterMode::Linear,
        min_filter: wgpu::FilterMode::Linear,
        compare: Some(wgpu::CompareFunction::LessEqual),
        ..Default::default()
    });

    ShadowResources {
        caster_bgl,
        blur_bgl,
        floor_bgl,
        contact_pipeline,
        depth_pipeline,
        contact_blur_pipeline,
        copy_pipeline,
        accum_bgl,
        accumulate_pipeline,
        floor_pipeline,
        plane: helpers::upload_mesh(device, "floor_plane", &floor_plane(1.0)),
        linear_sampler,
        compare_sampler,
    }
}

fn caster_bind_group(
    device: &wgpu::Device,
    res: &ShadowResources,
    label: &str,
    slots: u64,
) -> (wgpu::Buffer, wgpu::BindGroup) {
    let buffer = helpers::create_uniform_buffer(device, label, UNIFORM_SLOT * slots.max(1));
    let bg = device.create_bind_group(&wgpu::BindGroupDescriptor {
        label: Some(label),
        layout: &res.caster_bgl,
        entries: &[wgpu::BindGroupEntry {
            binding: 0,
            resource: helpers::uniform_slot(&buffer, std::mem::size_of::<CasterUniform>() as u64),
        }],
    });
    (buffer, bg)
}

fn blur_bind_group(
    device: &wgpu::Device,
    res: &ShadowResources,
    label: &str,
    src: &wgpu::TextureView,
    uniforms: &wgpu::Buffer,
) -> wgpu::BindGroup {
    device.create_bind_group(&wgpu::BindGroupDescriptor {
        label: Some(label),
        layout: &res.blur_bgl,
        entries: &[
            wgpu::BindGroupEntry {
                binding: 0,
                resource: wgpu::BindingResource::TextureView(src),
            },
            wgpu::BindGroupEntry {
                binding: 1,
                resource: wgpu::BindingResource::Sampler(&res.linear_sampler),
            },
            wgpu::BindGroupEntry {
                binding: 2,
                resource: helpers::uniform_slot(uniforms, std::mem::size_of::<BlurUniform>() as u64),
            },
        ],
    })
}

#[allow(clippy::too_many_arguments)]
fn fullscreen(
    encoder: &mut wgpu::CommandEncoder,
    label: &str,
    target: &wgpu::TextureView,
    clear: Option<wgpu::Color>,
    pipeline: &wgpu::RenderPipeline,
    bg: &wgpu::BindGroup,
    offset: u64,
    blend_constant: Option<f32>,
) {
    let mut r = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
        label: Some(label),
        color_attachments: &[helpers::color_attachment(target, clear)],
        depth_stencil_attachment: None,
        timestamp_writes: None,
        occlusion_query_set: None,
    });
    r.set_pipeline(pipeline);
    r.set_bind_group(0, bg, &[offset as u32]);
    if let Some(c) = blend_constant {
        let c = c as f64;
        r.set_blend_constant(wgpu::Color { r: c, g: c, b: c, a: c });
    }
    r.draw(0..3, 0..1);
}

/// Floor plane sampling one shadow texture.
pub(crate) struct ShadowFloor {
    uniform: wgpu::Buffer,
    bg: wgpu::BindGroup,
}

impl ShadowFloor {
    fn new(
        device: &wgpu::Device,
        res: &ShadowResources,
        label: &str,
        shadow: &wgpu::TextureView,
    ) -> Self {
        let uniform = helpers::create_uniform_buffer(
            device,
            label,
            std::mem::size_of::<FloorUniform>() as u64,
        );
        let bg = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some(label),
            layout: &res.floor_bgl,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: uniform.as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::TextureView(shadow),
                },
                wgpu::BindGroupEntry {
                    binding: 2,
                    resource: wgpu::BindingResource::Sampler(&res.linear_sampler),
                },
            ],
        });
        Self { uniform, bg }
    }

    fn write(&self, queue: &wgpu::Queue, y: f32, scale: f32, mode: FloorMode) {
        let model = Mat4::from_translation(Vec3::new(0.0, y, 0.0))
            * Mat4::from_scale(Vec3::new(scale, 1.0, scale));
        let (color_opacity, params) = match mode {
            FloorMode::Contact { opacity } => ([0.0, 0.0, 0.0, opacity], [0.0, 0.0, 0.0, 0.0]),
            FloorMode::Accumulated {
                color,
                blend,
                opacity,
            } => ([color[0], color[1], color[2], opacity], [blend, 1.0, 0.0, 0.0]),
        };
        let u = FloorUniform {
            model: model.to_cols_array_2d(),
            color_opacity,
            params,
        };
        queue.write_buffer(&self.uniform, 0, bytemuck::bytes_of(&u));
    }

    pub(crate) fn draw(
        &self,
        rpass: &mut wgpu::RenderPass<'_>,
        res: &ShadowResources,
        view_bg: &wgpu::BindGroup,
    ) {
        rpass.set_pipeline(&res.floor_pipeline);
        rpass.set_bind_group(0, view_bg, &[]);
        rpass.set_bind_group(1, &self.bg, &[]);
        res.plane.draw(rpass);
    }
}

/// Contact shadow: casters seen from below by an orthographic camera on the
/// floor, darker the closer they are, then blurred.
pub(crate) struct ContactShadow {
    caster_buffer: wgpu::Buffer,
    caster_bg: wgpu::BindGroup,
    blur_buffer: wgpu::Buffer,
    _tex_a: wgpu::Texture,
    view_a: wgpu::TextureView,
    _tex_b: wgpu::Texture,
    view_b: wgpu::TextureView,
    bg_from_a: wgpu::BindGroup,
    bg_from_b: wgpu::BindGroup,
    pub(crate) floor: ShadowFloor,
    y: f32,
    scale: f32,
    far: f32,
    blur: f32,
    opacity: f32,
}

/// Orthographic camera at height `y` looking straight up over a `scale`
/// square. Screen up maps to +z so texture rows line up with the floor uv.
pub(crate) fn contact_camera(y: f32, scale: f32, far: f32) -> Mat4 {
    let half = scale * 0.5;
    let eye = Vec3::new(0.0, y, 0.0);
    Mat4::orthographic_rh(-half, half, -half, half, 0.0, far)
        * Mat4::look_at_rh(eye, eye + Vec3::Y, Vec3::Z)
}

impl ContactShadow {
    pub(crate) fn new(
        device: &wgpu::Device,
        res: &ShadowResources,
        y: f32,
        scale: f32,
        blur: f32,
        far: f32,
        opacity: f32,
    ) -> Self {
        let usage = wgpu::TextureUsages::RENDER_ATTACHMENT | wgpu::TextureUsages::TEXTURE_BINDING;
        let (tex_a, view_a) = helpers::create_color_texture(
            device,
            "contact_a",
            CONTACT_SHADOW_RES,
            CONTACT_SHADOW_RES,
            CONTACT_FORMAT,
            usage,
        );
        let (tex_b, view_b) = helpers::create_color_texture(
            device,
            "contact_b",
            CONTACT_SHADOW_RES,
            CONTACT_SHADOW_RES,
            CONTACT_FORMAT,
            usage,
        );
        let (caster_buffer, caster_bg) = caster_bind_group(device, res, "contact_caster", 1);
        let blur_buffer = helpers::create_uniform_buffer(device, "contact_blur", UNIFORM_SLOT * 2);
        let bg_from_a = blur_bind_group(device, res, "contact_from_a", &view_a, &blur_buffer);
        let bg_from_b = blur_bind_group(device, res, "contact_from_b", &view_b, &blur_buffer);
        let floor = ShadowFloor::new(device, res, "contact_floor", &view_a);
        Self {
            caster_buffer,
            caster_bg,
            blur_buffer,
            _tex_a: tex_a,
            view_a,
            _tex_b: tex_b,
            view_b,
            bg_from_a,
            bg_from_b,
            floor,
            y,
            scale,
            far,
            blur,
            opacity,
        }
    }

    /// Re-render the contact texture for one caster.
    pub(crate) fn encode(
        &self,
        queue: &wgpu::Queue,
        encoder: &mut wgpu::CommandEncoder,
        res: &ShadowResources,
        caster: &MeshGpu,
        model: Mat4,
    ) {
        let u = CasterUniform {
            view_proj: contact_camera(self.y, self.scale, self.far).to_cols_array_2d(),
            model: model.to_cols_array_2d(),
        };
        queue.write_buffer(&self.caster_buffer, 0, bytemuck::bytes_of(&u));
        let texel = 1.0 / CONTACT_SHADOW_RES as f32;
        let h = BlurUniform {
            dir_texel: [texel, 0.0, self.blur, 0.0],
        };
        let v = BlurUniform {
            dir_texel: [0.0, texel, self.blur, 0.0],
        };
        queue.write_buffer(&self.blur_buffer, 0, bytemuck::bytes_of(&h));
        queue.write_buffer(&self.blur_buffer, UNIFORM_SLOT, bytemuck::bytes_of(&v));
        self.floor.write(
            queue,
            self.y,
            self.scale,
            FloorMode::Contact {
                opacity: self.opacity,
            },
        );

        {
            let mut r = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("contact_casters"),
                color_attachments: &[helpers::color_attachment(
                    &self.view_a,
                    Some(wgpu::Color::TRANSPARENT),
                )],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
            });
            r.set_pipeline(&res.contact_pipeline);
            r.set_bind_group(0, &self.caster_bg, &[0]);
            caster.draw(&mut r);
        }
        fullscreen(
            encoder,
            "contact_blur_h",
            &self.view_b,
            Some(wgpu::Color::TRANSPARENT),
            &res.contact_blur_pipeline,
            &self.bg_from_a,
            0,
            None,
        );
        fullscreen(
            encoder,
            "contact_blur_v",
            &self.view_a,
            Some(wgpu::Color::TRANSPARENT),
            &res.contact_blur_pipeline,
            &self.bg_from_b,
            UNIFORM_SLOT,
            None,
        );
    }
}

/// Soft shadow averaged over many frames of jittered lights.
///
/// Each frame renders a depth map per sampled light, folds their visibility
/// into `frame` with an equal-weight running average, then blends `frame`
/// into `accum` with the frame's weight.
pub(crate) struct AccumulatedShadow {
    light: RandomizedLight,
    caster_buffer: wgpu::Buffer,
    caster_bg: wgpu::BindGroup,
    accum_buffer: wgpu::Buffer,
    accum_bg: wgpu::BindGroup,
    copy_buffer: wgpu::Buffer,
    copy_bg: wgpu::BindGroup,
    _light_depth: wgpu::Texture,
    light_depth_view: wgpu::TextureView,
    _frame_tex: wgpu::Texture,
    frame_view: wgpu::TextureView,
    _accum_tex: wgpu::Texture,
    accum_view: wgpu::TextureView,
    pub(crate) floor: ShadowFloor,
    y: f32,
    scale: f32,
    mode: FloorMode,
}

impl AccumulatedShadow {
    pub(crate) fn new(
        device: &wgpu::Device,
        res: &ShadowResources,
        light: RandomizedLight,
        y: f32,
        scale: f32,
        mode: FloorMode,
    ) -> Self {
        let slots = light.amount.max(1) as u64;
        let (caster_buffer, caster_bg) = caster_bind_group(device, res, "light_casters", slots);
        let (light_depth, light_depth_view) =
            helpers::create_depth_texture(device, "light_depth", LIGHT_DEPTH_RES, LIGHT_DEPTH_RES);
        let usage = wgpu::TextureUsages::RENDER_ATTACHMENT | wgpu::TextureUsages::TEXTURE_BINDING;
        let (frame_tex, frame_view) = helpers::create_color_texture(
            device,
            "shadow_frame",
            ACCUM_SHADOW_RES,
            ACCUM_SHADOW_RES,
            ACCUM_FORMAT,
            usage,
        );
        let (accum_tex, accum_view) = helpers::create_color_texture(
            device,
            "shadow_accum",
            ACCUM_SHADOW_RES,
            ACCUM_SHADOW_RES,
            ACCUM_FORMAT,
            usage,
        );
        let accum_buffer = helpers::create_uniform_buffer(device, "accum_uniforms", UNIFORM_SLOT * slots);
        let accum_bg = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("accum_bg"),
            layout: &res.accum_bgl,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: wgpu::BindingResource::TextureView(&light_depth_view),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::Sampler(&res.compare_sampler),
                },
                wgpu::BindGroupEntry {
                    binding: 2,
                    resource: helpers::uniform_slot(
                        &accum_buffer,
                        std::mem::size_of::<AccumUniform>() as u64,
                    ),
                },
            ],
        });
        // fs_copy ignores the blur parameters; the slot only satisfies the layout.
        let copy_buffer = helpers::create_uniform_buffer(device, "shadow_copy", UNIFORM_SLOT);
        let copy_bg = blur_bind_group(device, res, "shadow_copy", &frame_view, &copy_buffer);
        let floor = ShadowFloor::new(device, res, "accum_floor", &accum_view);
        Self {
            light,
            caster_buffer,
            caster_bg,
            accum_buffer,
            accum_bg,
            copy_buffer,
            copy_bg,
            _light_depth: light_depth,
            light_depth_view,
            _frame_tex: frame_tex,
            frame_view,
            _accum_tex: accum_tex,
            accum_view,
            floor,
            y,
            scale,
            mode,
        }
    }

    /// Add one frame of samples with blend `weight` into the running average.
    #[allow(clippy::too_many_arguments)]
    pub(crate) fn encode_frame<R: rand::Rng + ?Sized>(
        &self,
        queue: &wgpu::Queue,
        encoder: &mut wgpu::CommandEncoder,
        res: &ShadowResources,
        caster: &MeshGpu,
        model: Mat4,
        focus: Vec3,
        weight: f32,
        rng: &mut R,
    ) {
        let lights = self.light.sample(rng);
        let model = model.to_cols_array_2d();
        queue.write_buffer(
            &self.copy_buffer,
            0,
            bytemuck::bytes_of(&BlurUniform {
                dir_texel: [0.0; 4],
            }),
        );
        for (i, pos) in lights.iter().enumerate() {
            let view_proj = self.light.shadow_matrix(*pos, focus);
            let offset = i as u64 * UNIFORM_SLOT;
            queue.write_buffer(
                &self.caster_buffer,
                offset,
                bytemuck::bytes_of(&CasterUniform {
                    view_proj: view_proj.to_cols_array_2d(),
                    model,
                }),
            );
            queue.write_buffer(
                &self.accum_buffer,
                offset,
                bytemuck::bytes_of(&AccumUniform {
                    light_view_proj: view_proj.to_cols_array_2d(),
                    plane: [self.y, self.scale, SHADOW_DEPTH_BIAS, 0.0],
                }),
            );

            {
                let mut r = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                    label: Some("light_depth"),
                    color_attachments: &[],
                    depth_stencil_attachment: helpers::depth_attachment(&self.light_depth_view, true),
                    timestamp_writes: None,
                    occlusion_query_set: None,
                });
                r.set_pipeline(&res.depth_pipeline);
                r.set_bind_group(0, &self.caster_bg, &[offset as u32]);
                caster.draw(&mut r);
            }
            let clear = (i == 0).then_some(wgpu::Color::WHITE);
            fullscreen(
                encoder,
                "shadow_accumulate",
                &self.frame_view,
                clear,
                &res.accumulate_pipeline,
                &self.accum_bg,
                offset,
                Some(1.0 / (i + 1) as f32),
            );
        }
        self.floor.write(queue, self.y, self.scale, self.mode);
        fullscreen(
            encoder,
            "shadow_blend",
            &self.accum_view,
            None,
            &res.copy_pipeline,
            &self.copy_bg,
            0,
            Some(weight),
        );
    }
}
