use crate::assets::AquariumModels;
use crate::label::LabelBitmap;
use fnv::FnvHashMap;
use glam::Mat4;
use rand::rngs::StdRng;
use site_core::aquarium::{
    self, enclosure_material, AQUARIUM_GROUP_OFFSET, SHADOW_COLOR, SHADOW_COLOR_BLEND,
    SHADOW_OPACITY, SHADOW_PLANE_Y, SHADOW_SCALE,
};
use site_core::bubbles::{BubbleInstance, BUBBLES};
use site_core::lighting::{aquarium_environment, shapes_environment, Environment, SpotLight};
use site_core::shapes::{shape_spec, ShapeSpec};
use site_core::state::Camera;
use site_core::{
    DetailParams, ShapeKind, BACKGROUND_RGB, CONTACT_SHADOW_BLUR, CONTACT_SHADOW_FAR,
    CONTACT_SHADOW_OPACITY, CONTACT_SHADOW_SCALE, CONTACT_SHADOW_Y, SPOT_LIGHT_ANGLE,
    SPOT_LIGHT_PENUMBRA, SPOT_LIGHT_POSITION,
};
use web_sys as web;

mod bubbles;
mod helpers;
mod post;
mod scene;
mod shadow;
mod skinned;
mod status;
mod targets;

use bubbles::BubblesGpu;
use post::{PostBindings, PostParams, PostResources};
use scene::{GlassGpu, GlobalsUniform, SceneResources};
use shadow::{AccumulatedShadow, ContactShadow, FloorMode, ShadowResources};
use skinned::SkinnedModelGpu;
use status::StatusLabel;
use targets::RenderTargets;

/// Everything the shape scene needs for one frame.
pub struct ShapesFrame<'f> {
    pub camera: &'f Camera,
    pub elapsed: f32,
    pub kind: ShapeKind,
    /// Float pose of the shape group.
    pub model: Mat4,
}

/// Everything the aquarium needs for one frame.
pub struct AquariumFrame<'f> {
    pub camera: &'f Camera,
    pub elapsed: f32,
    pub enclosure_model: Mat4,
    pub turtle_root: Mat4,
    pub turtle_globals: &'f [Mat4],
    pub turtle_palette: &'f [Mat4],
    pub bubbles: &'f [BubbleInstance],
    /// Blend weight of this frame's shadow sample, `None` once converged.
    pub shadow_weight: Option<f32>,
}

struct AquariumGpu {
    enclosure: GlassGpu,
    turtle: SkinnedModelGpu,
    shadow: AccumulatedShadow,
}

pub struct GpuState<'a> {
    surface: wgpu::Surface<'a>,
    device: wgpu::Device,
    queue: wgpu::Queue,
    config: wgpu::SurfaceConfiguration,
    targets: RenderTargets,
    linear_sampler: wgpu::Sampler,

    post: PostResources,
    post_bindings: PostBindings,
    scene: SceneResources,
    scene_bg: wgpu::BindGroup,
    shadows: ShadowResources,
    contact: ContactShadow,

    shapes: FnvHashMap<ShapeKind, (ShapeSpec, GlassGpu)>,
    label: StatusLabel,
    bubbles: BubblesGpu,
    aquarium: Option<AquariumGpu>,

    shapes_env: Environment,
    aquarium_env: Environment,
    spot: SpotLight,
    clear_color: wgpu::Color,
    width: u32,
    height: u32,
}

impl<'a> GpuState<'a> {
    pub async fn new(canvas: &'a web::HtmlCanvasElement, detail: DetailParams) -> anyhow::Result<Self> {
        let width = canvas.width().max(1);
        let height = canvas.height().max(1);

        let instance = wgpu::Instance::default();
        let surface = instance.create_surface(wgpu::SurfaceTarget::Canvas(canvas.clone()))?;
        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .ok_or_else(|| anyhow::anyhow!("No WebGPU adapter"))?;
        let (device, queue) = adapter
            .request_device(
                &wgpu::DeviceDescriptor {
                    required_features: wgpu::Features::empty(),
                    required_limits: wgpu::Limits::default(),
                    memory_hints: wgpu::MemoryHints::Performance,
                    label: None,
                },
                None,
            )
            .await
            .map_err(|e| anyhow::anyhow!(format!("request_device error: {:?}", e)))?;
        let caps = surface.get_capabilities(&adapter);
        let format = caps
            .formats
            .iter()
            .copied()
            .find(|f| {
                matches!(
                    f,
                    wgpu::TextureFormat::Bgra8UnormSrgb | wgpu::TextureFormat::Rgba8UnormSrgb
                )
            })
            .or_else(|| caps.formats.first().copied())
            .ok_or_else(|| anyhow::anyhow!("surface reports no formats"))?;
        let alpha_mode = caps
            .alpha_modes
            .first()
            .copied()
            .unwrap_or(wgpu::CompositeAlphaMode::Auto);
        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format,
            width,
            height,
            present_mode: wgpu::PresentMode::Fifo,
            alpha_mode,
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);
        log::info!("[gpu] surface {}x{} {:?}", width, height, format);

        let targets = RenderTargets::new(&device, width, height);
        let linear_sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("linear_sampler"),
            address_mode_u: wgpu::AddressMode::ClampToEdge,
            address_mode_v: wgpu::AddressMode::ClampToEdge,
            address_mode_w: wgpu::AddressMode::ClampToEdge,
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            mipmap_filter: wgpu::FilterMode::Linear,
            ..Default::default()
        });

        let post_shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("post_shader"),
            source: wgpu::ShaderSource::Wgsl(site_core::POST_WGSL.into()),
        });
        let post = post::create_post_resources(&device, &post_shader, format);
        let post_bindings = PostBindings::new(&device, &post, &linear_sampler, &targets);

        let scene = scene::create_scene_resources(&device);
        let scene_bg =
            scene::scene_bind_group(&device, &scene, &targets.backbuffer_view, &linear_sampler);
        let shadows = shadow::create_shadow_resources(&device, &scene.view_bgl);
        let contact = ContactShadow::new(
            &device,
            &shadows,
            CONTACT_SHADOW_Y,
            CONTACT_SHADOW_SCALE,
            CONTACT_SHADOW_BLUR,
            CONTACT_SHADOW_FAR,
            CONTACT_SHADOW_OPACITY,
        );
        let label = StatusLabel::new(&device, &scene.view_bgl);
        let bubbles = BubblesGpu::new(&device, &scene.view_bgl, &detail, BUBBLES.len() as u32);

        let [r, g, b] = BACKGROUND_RGB.map(|c| c.powf(2.2));
        let mut state = Self {
            surface,
            device,
            queue,
            config,
            targets,
            linear_sampler,
            post,
            post_bindings,
            scene,
            scene_bg,
            shadows,
            contact,
            shapes: FnvHashMap::default(),
            label,
            bubbles,
            aquarium: None,
            shapes_env: shapes_environment(),
            aquarium_env: aquarium_environment(),
            spot: SpotLight {
                position: SPOT_LIGHT_POSITION,
                angle: SPOT_LIGHT_ANGLE,
                penumbra: SPOT_LIGHT_PENUMBRA,
                intensity: 1.0,
            },
            clear_color: wgpu::Color {
                r: r as f64,
                g: g as f64,
                b: b as f64,
                a: 1.0,
            },
            width,
            height,
        };
        state.build_shapes(&detail);
        Ok(state)
    }

    fn build_shapes(&mut self, detail: &DetailParams) {
        self.shapes.clear();
        for kind in [ShapeKind::Knot, ShapeKind::Torus, ShapeKind::Dodecahedron] {
            let spec = shape_spec(kind, detail);
            let mesh = spec.geometry.build();
            let glass = GlassGpu::new(&self.device, &self.scene, &format!("{kind:?}"), &mesh);
            self.shapes.insert(kind, (spec, glass));
        }
    }

    /// Rebuild everything tessellated by the quality tier.
    pub fn set_detail(&mut self, detail: DetailParams) {
        self.build_shapes(&detail);
        self.bubbles.set_detail(&self.device, &detail);
        log::info!(
            "[gpu] detail: samples={} bubble segments={}",
            detail.transmission_samples,
            detail.bubble_width_segments
        );
    }

    pub fn set_label(&mut self, bitmap: &LabelBitmap) {
        self.label.set_bitmap(&self.device, &self.queue, bitmap);
    }

    /// Upload parsed aquarium models. Called once, from the frame loop.
    pub fn install_aquarium(&mut self, models: &AquariumModels) {
        let enclosure = GlassGpu::new(&self.device, &self.scene, "enclosure", &models.enclosure);
        let turtle = SkinnedModelGpu::new(&self.device, &self.scene.view_bgl, &models.turtle);
        let shadow = AccumulatedShadow::new(
            &self.device,
            &self.shadows,
            aquarium::shadow_light(),
            SHADOW_PLANE_Y,
            SHADOW_SCALE,
            FloorMode::Accumulated {
                color: SHADOW_COLOR,
                blend: SHADOW_COLOR_BLEND,
                opacity: SHADOW_OPACITY,
            },
        );
        self.aquarium = Some(AquariumGpu {
            enclosure,
            turtle,
            shadow,
        });
        log::info!("[gpu] aquarium installed");
    }

    pub fn aquarium_installed(&self) -> bool {
        self.aquarium.is_some()
    }

    pub fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    pub fn resize_if_needed(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            return;
        }
        if width != self.width || height != self.height {
            self.width = width;
            self.height = height;
            self.config.width = width;
            self.config.height = height;
            self.surface.configure(&self.device, &self.config);

            // Recreate offscreen render targets and dependent bind groups
            self.targets.recreate(&self.device, width, height);
            self.post_bindings =
                PostBindings::new(&self.device, &self.post, &self.linear_sampler, &self.targets);
            self.scene_bg = scene::scene_bind_group(
                &self.device,
                &self.scene,
                &self.targets.backbuffer_view,
                &self.linear_sampler,
            );
        }
    }

    fn begin_scene_pass<'e>(
        &'e self,
        encoder: &'e mut wgpu::CommandEncoder,
        label: &str,
        clear: bool,
    ) -> wgpu::RenderPass<'e> {
        encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some(label),
            color_attachments: &[helpers::color_attachment(
                &self.targets.hdr_view,
                clear.then_some(self.clear_color),
            )],
            depth_stencil_attachment: helpers::depth_attachment(&self.targets.depth_view, clear),
            timestamp_writes: None,
            occlusion_query_set: None,
        })
    }

    /// Back faces, then front faces, each refracting what is already drawn.
    fn encode_glass(&self, encoder: &mut wgpu::CommandEncoder, glass: &GlassGpu, backside: bool) {
        if backside {
            self.targets.capture_backbuffer(encoder);
            let mut rpass = self.begin_scene_pass(encoder, "glass_back", false);
            glass.draw_back(&mut rpass, &self.scene, &self.scene_bg);
        }
        self.targets.capture_backbuffer(encoder);
        let mut rpass = self.begin_scene_pass(encoder, "glass_front", false);
        glass.draw_front(&mut rpass, &self.scene, &self.scene_bg);
    }

    fn write_globals(&self, camera: &Camera, elapsed: f32, env: &Environment, spot: Option<&SpotLight>) {
        let g = GlobalsUniform::new(
            camera,
            elapsed,
            env,
            spot,
            BACKGROUND_RGB,
            (self.width, self.height),
        );
        self.queue
            .write_buffer(&self.scene.globals_buffer, 0, bytemuck::bytes_of(&g));
    }

    pub fn render_shapes(&mut self, f: &ShapesFrame<'_>) -> Result<(), wgpu::SurfaceError> {
        let frame = self.surface.get_current_texture()?;
        let view = frame
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());
        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("shapes_encoder"),
            });
        self.write_globals(f.camera, f.elapsed, &self.shapes_env, Some(&self.spot));

        if let Some((spec, glass)) = self.shapes.get(&f.kind) {
            glass.write(&self.queue, f.model, &spec.material);
            self.contact
                .encode(&self.queue, &mut encoder, &self.shadows, glass.mesh(), f.model);
        }
        {
            let mut rpass = self.begin_scene_pass(&mut encoder, "shapes_pass", true);
            self.contact
                .floor
                .draw(&mut rpass, &self.shadows, &self.scene.view_bg);
            self.label.draw(&mut rpass, &self.scene.view_bg);
        }
        if let Some((spec, glass)) = self.shapes.get(&f.kind) {
            self.encode_glass(&mut encoder, glass, spec.material.backside);
        }

        post::encode_post_chain(
            &self.queue,
            &mut encoder,
            &self.post,
            &self.post_bindings,
            &self.targets,
            &view,
            PostParams {
                effects: true,
                znear: f.camera.znear,
                zfar: f.camera.zfar,
            },
        );
        self.queue.submit(Some(encoder.finish()));
        frame.present();
        Ok(())
    }

    pub fn render_aquarium(
        &mut self,
        f: &AquariumFrame<'_>,
        rng: &mut StdRng,
    ) -> Result<(), wgpu::SurfaceError> {
        let frame = self.surface.get_current_texture()?;
        let view = frame
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());
        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("aquarium_encoder"),
            });
        self.write_globals(f.camera, f.elapsed, &self.aquarium_env, None);
        self.bubbles.write(&self.queue, f.bubbles);

        match &self.aquarium {
            Some(aq) => {
                let material = enclosure_material();
                aq.enclosure.write(&self.queue, f.enclosure_model, &material);
                aq.turtle
                    .write(&self.queue, f.turtle_root, f.turtle_globals, f.turtle_palette);
                if let Some(weight) = f.shadow_weight {
                    aq.shadow.encode_frame(
                        &self.queue,
                        &mut encoder,
                        &self.shadows,
                        aq.enclosure.mesh(),
                        f.enclosure_model,
                        AQUARIUM_GROUP_OFFSET,
                        weight,
                        rng,
                    );
                }
                {
                    let mut rpass = self.begin_scene_pass(&mut encoder, "aquarium_pass", true);
                    self.bubbles.draw(&mut rpass, &self.scene.view_bg);
                    aq.shadow
                        .floor
                        .draw(&mut rpass, &self.shadows, &self.scene.view_bg);
                    aq.turtle.draw(&mut rpass, &self.scene.view_bg);
                }
                self.encode_glass(&mut encoder, &aq.enclosure, material.backside);
            }
            None => {
                // Models still loading: background only.
                drop(self.begin_scene_pass(&mut encoder, "aquarium_pass", true));
            }
        }

        post::encode_post_chain(
            &self.queue,
            &mut encoder,
            &self.post,
            &self.post_bindings,
            &self.targets,
            &view,
            PostParams {
                effects: false,
                znear: f.camera.znear,
                zfar: f.camera.zfar,
            },
        );
        self.queue.submit(Some(encoder.finish()));
        frame.present();
        Ok(())
    }
}
