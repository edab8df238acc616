use super::helpers::{self, UNIFORM_SLOT};
use super::targets::{RenderTargets, HDR_FORMAT};
use site_core::{
    bloom_level_spreads, AO_INTENSITY, AO_RADIUS, BLOOM_INTENSITY, BLOOM_LEVELS, BLOOM_THRESHOLD,
    TILT_SHIFT_BLUR,
};

#[repr(C)]
#[derive(Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
pub(crate) struct PostUniforms {
    resolution: [f32; 2],
    blur_dir: [f32; 2],
    threshold: f32,
    bloom_strength: f32,
    ao_radius: f32,
    ao_intensity: f32,
    tilt_shift: f32,
    effects: f32,
    znear: f32,
    zfar: f32,
}

const POST_UNIFORM_SIZE: u64 = std::mem::size_of::<PostUniforms>() as u64;
// bright + (h, v) per blur iteration + composite
const POST_SLOTS: u64 = 2 + 2 * BLOOM_LEVELS as u64;

/// Per-frame knobs of the post chain.
#[derive(Clone, Copy, Debug)]
pub(crate) struct PostParams {
    /// Bloom, AO and tilt-shift on. Off means tonemap only.
    pub(crate) effects: bool,
    pub(crate) znear: f32,
    pub(crate) zfar: f32,
}

pub(crate) struct PostResources {
    pub(crate) bgl0: wgpu::BindGroupLayout, // tex+sampler+uniform
    pub(crate) bgl1: wgpu::BindGroupLayout, // tex+sampler
    pub(crate) bgl2: wgpu::BindGroupLayout, // scene depth
    pub(crate) uniform_buffer: wgpu::Buffer,
    pub(crate) bright_pipeline: wgpu::RenderPipeline,
    pub(crate) blur_pipeline: wgpu::RenderPipeline,
    pub(crate) composite_pipeline: wgpu::RenderPipeline,
}

/// Bind groups that reference the resizable targets.
pub(crate) struct PostBindings {
    bg_hdr: wgpu::BindGroup,
    bg_from_bloom_a: wgpu::BindGroup,
    bg_from_bloom_b: wgpu::BindGroup,
    bg_bloom_a_only: wgpu::BindGroup,
    bg_depth: wgpu::BindGroup,
}

pub(crate) fn create_post_resources(
    device: &wgpu::Device,
    post_shader: &wgpu::ShaderModule,
    swap_format: wgpu::TextureFormat,
) -> PostResources {
    let bgl0 = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
        label: Some("post_bgl0"),
        entries: &[
            helpers::texture_entry(0, wgpu::ShaderStages::FRAGMENT),
            helpers::sampler_entry(1, wgpu::SamplerBindingType::Filtering),
            helpers::uniform_entry(2, wgpu::ShaderStages::FRAGMENT, true),
        ],
    });
    let bgl1 = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
        label: Some("post_bgl1"),
        entries: &[
            helpers::texture_entry(0, wgpu::ShaderStages::FRAGMENT),
            helpers::sampler_entry(1, wgpu::SamplerBindingType::Filtering),
        ],
    });
    let bgl2 = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
        label: Some("post_bgl2"),
        entries: &[helpers::depth_texture_entry(0)],
    });
    let uniform_buffer =
        helpers::create_uniform_buffer(device, "post_uniforms", UNIFORM_SLOT * POST_SLOTS);
    let pl_bright_blur = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
        label: Some("pl_post_0"),
        bind_group_layouts: &[&bgl0],
        push_constant_ranges: &[],
    });
    let pl_composite = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
        label: Some("pl_post_comp"),
        bind_group_layouts: &[&bgl0, &bgl1, &bgl2],
        push_constant_ranges: &[],
    });
    let bright_pipeline = helpers::make_post_pipeline(
        device,
        &pl_bright_blur,
        post_shader,
        "fs_bright",
        HDR_FORMAT,
        None,
    );
    let blur_pipeline = helpers::make_post_pipeline(
        device,
        &pl_bright_blur,
        post_shader,
        "fs_blur",
        HDR_FORMAT,
        None,
    );
    let composite_pipeline = helpers::make_post_pipeline(
        device,
        &pl_composite,
        post_shader,
        "fs_composite",
        swap_format,
        Some(wgpu::BlendState::REPLACE),
    );

    PostResources {
        bgl0,
        bgl1,
        bgl2,
        uniform_buffer,
        bright_pipeline,
        blur_pipeline,
        composite_pipeline,
    }
}

impl PostBindings {
    pub(crate) fn new(
        device: &wgpu::Device,
        post: &PostResources,
        sampler: &wgpu::Sampler,
        targets: &RenderTargets,
    ) -> Self {
        let source = |label: &str, view: &wgpu::TextureView| {
            device.create_bind_group(&wgpu::BindGroupDescriptor {
                label: Some(label),
                layout: &post.bgl0,
                entries: &[
                    wgpu::BindGroupEntry {
                        binding: 0,
                        resource: wgpu::BindingResource::TextureView(view),
                    },
                    wgpu::BindGroupEntry {
                        binding: 1,
                        resource: wgpu::BindingResource::Sampler(sampler),
                    },
                    wgpu::BindGroupEntry {
                        binding: 2,
                        resource: helpers::uniform_slot(&post.uniform_buffer, POST_UNIFORM_SIZE),
                    },
                ],
            })
        };
        let bg_bloom_a_only = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("bg_bloom_a_only"),
            layout: &post.bgl1,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: wgpu::BindingResource::TextureView(&targets.bloom_a_view),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::Sampler(sampler),
                },
            ],
        });
        let bg_depth = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("bg_depth"),
            layout: &post.bgl2,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: wgpu::BindingResource::TextureView(&targets.depth_view),
            }],
        });
        Self {
            bg_hdr: source("bg_hdr", &targets.hdr_view),
            bg_from_bloom_a: source("bg_from_bloom_a", &targets.bloom_a_view),
            bg_from_bloom_b: source("bg_from_bloom_b", &targets.bloom_b_view),
            bg_bloom_a_only,
            bg_depth,
        }
    }
}

/// Fill every uniform slot, then record bright, blur and composite passes.
///
/// All slots are written before the encoder is submitted, so each pass reads
/// its own values through a dynamic offset.
pub(crate) fn encode_post_chain(
    queue: &wgpu::Queue,
    encoder: &mut wgpu::CommandEncoder,
    post: &PostResources,
    bindings: &PostBindings,
    targets: &RenderTargets,
    surface_view: &wgpu::TextureView,
    params: PostParams,
) {
    let base = PostUniforms {
        resolution: targets.bloom_size(),
        blur_dir: [0.0, 0.0],
        threshold: BLOOM_THRESHOLD,
        bloom_strength: BLOOM_INTENSITY,
        ao_radius: AO_RADIUS,
        ao_intensity: AO_INTENSITY,
        tilt_shift: TILT_SHIFT_BLUR,
        effects: if params.effects { 1.0 } else { 0.0 },
        znear: params.znear,
        zfar: params.zfar,
    };
    let composite_slot = POST_SLOTS - 1;
    write_slot(queue, &post.uniform_buffer, composite_slot, &base);

    if params.effects {
        write_slot(queue, &post.uniform_buffer, 0, &base);
        blit(
            encoder,
            "bright_pass",
            &targets.bloom_a_view,
            &post.bright_pipeline,
            (&bindings.bg_hdr, 0),
            None,
        );
        for (i, spread) in bloom_level_spreads().enumerate() {
            let i = i as u64;
            let h_slot = 1 + 2 * i;
            let v_slot = h_slot + 1;
            write_slot(
                queue,
                &post.uniform_buffer,
                h_slot,
                &PostUniforms {
                    blur_dir: [spread, 0.0],
                    ..base
                },
            );
            write_slot(
                queue,
                &post.uniform_buffer,
                v_slot,
                &PostUniforms {
                    blur_dir: [0.0, spread],
                    ..base
                },
            );
            blit(
                encoder,
                "blur_h",
                &targets.bloom_b_view,
                &post.blur_pipeline,
                (&bindings.bg_from_bloom_a, h_slot),
                None,
            );
            blit(
                encoder,
                "blur_v",
                &targets.bloom_a_view,
                &post.blur_pipeline,
                (&bindings.bg_from_bloom_b, v_slot),
                None,
            );
        }
    }

    blit(
        encoder,
        "composite",
        surface_view,
        &post.composite_pipeline,
        (&bindings.bg_hdr, composite_slot),
        Some((&bindings.bg_bloom_a_only, &bindings.bg_depth)),
    );
}

fn write_slot(queue: &wgpu::Queue, buffer: &wgpu::Buffer, slot: u64, u: &PostUniforms) {
    queue.write_buffer(buffer, slot * UNIFORM_SLOT, bytemuck::bytes_of(u));
}

fn blit(
    encoder: &mut wgpu::CommandEncoder,
    label: &str,
    target: &wgpu::TextureView,
    pipeline: &wgpu::RenderPipeline,
    (bg0, slot): (&wgpu::BindGroup, u64),
    extra: Option<(&wgpu::BindGroup, &wgpu::BindGroup)>,
) {
    let mut r = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
        label: Some(label),
        color_attachments: &[helpers::color_attachment(target, Some(wgpu::Color::BLACK))],
        depth_stencil_attachment: None,
        timestamp_writes: None,
        occlusion_query_set: None,
    });
    r.set_pipeline(pipeline);
    r.set_bind_group(0, bg0, &[(slot * UNIFORM_SLOT) as u32]);
    if let Some((g1, g2)) = extra {
        r.set_bind_group(1, g1, &[]);
        r.set_bind_group(2, g2, &[]);
    }
    r.draw(0..3, 0..1);
}
