use crate::constants::{LOADING_ID, ORBIT_DRAG_MIN_HEIGHT_PX, SCENE_RNG_SEED};
use crate::events::Wiring;
use crate::render::{self, AquariumFrame, ShapesFrame};
use crate::{label, overlay};
use glam::{Vec2, Vec3};
use instant::Instant;
use rand::rngs::StdRng;
use rand::SeedableRng;
use site_core::aquarium::{self, SWIM_CLIP, TURTLE_TIME_SCALE};
use site_core::bubbles::{BubbleField, BUBBLES};
use site_core::float::{FloatMotion, FloatParams};
use site_core::lighting::ShadowAccumulator;
use site_core::orbit::OrbitControls;
use site_core::rig::{self, CameraRig};
use site_core::state::Camera;
use site_core::{
    ActiveScene, AnimationMixer, DetailParams, ModelData, Route, ShapeKind, ViewportClass,
    SHAPE_FLOAT_INTENSITY,
};
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys as web;

/// Pointer-rigged camera over one floating shape.
pub struct ShapesScene {
    pub camera: Camera,
    pub rig: CameraRig,
    pub float: FloatMotion,
}

impl ShapesScene {
    pub fn new(rng: &mut StdRng) -> Self {
        Self {
            camera: rig::shapes_camera(),
            rig: CameraRig::default(),
            float: FloatMotion::random(FloatParams::with_float(SHAPE_FLOAT_INTENSITY), rng),
        }
    }

    fn step(&mut self, pointer: Vec2, dt: f32, elapsed: f32, kind: ShapeKind) -> ShapesFrame<'_> {
        self.rig.apply(&mut self.camera, pointer, dt);
        ShapesFrame {
            camera: &self.camera,
            elapsed,
            kind,
            model: self.float.pose(elapsed).matrix(),
        }
    }
}

/// Orbiting camera, bubbles, the turtle and its accumulated shadow.
pub struct AquariumScene {
    pub camera: Camera,
    pub orbit: OrbitControls,
    pub turtle_float: FloatMotion,
    pub bubbles: BubbleField,
    pub turtle: Option<(ModelData, AnimationMixer)>,
    pub shadow: ShadowAccumulator,
}

impl AquariumScene {
    pub fn new(rng: &mut StdRng, detail: &DetailParams) -> Self {
        let camera = aquarium::aquarium_camera();
        Self {
            orbit: OrbitControls::rotation_only(camera.eye, Vec3::ZERO),
            camera,
            turtle_float: FloatMotion::random(aquarium::turtle_float(), rng),
            bubbles: BubbleField::new(&BUBBLES, rng),
            turtle: None,
            shadow: aquarium::shadow_accumulator(detail),
        }
    }

    /// Take ownership of the parsed turtle and start its swim loop.
    pub fn install_turtle(&mut self, model: ModelData) {
        let mut mixer = AnimationMixer::new(TURTLE_TIME_SCALE);
        if mixer.play(&model, SWIM_CLIP) {
            log::info!("[anim] playing {:?}", SWIM_CLIP);
        }
        self.turtle = Some((model, mixer));
    }
}

pub struct FrameContext<'a> {
    pub wiring: Wiring,
    pub gpu: Option<render::GpuState<'a>>,
    pub shapes: ShapesScene,
    pub aquarium: AquariumScene,
    pub rng: StdRng,

    pub last_instant: Instant,
    pub elapsed: f32,
    pub shown_route: Option<Route>,
    pub shown_class: ViewportClass,
}

impl<'a> FrameContext<'a> {
    pub fn new(wiring: Wiring, gpu: Option<render::GpuState<'a>>) -> Self {
        let mut rng = StdRng::seed_from_u64(SCENE_RNG_SEED);
        let shown_class = wiring.viewport.borrow().class();
        let detail = shown_class.detail();
        Self {
            wiring,
            gpu,
            shapes: ShapesScene::new(&mut rng),
            aquarium: AquariumScene::new(&mut rng, &detail),
            rng,
            last_instant: Instant::now(),
            elapsed: 0.0,
            shown_route: None,
            shown_class,
        }
    }

    pub fn frame(&mut self) {
        let now = Instant::now();
        let dt = (now - self.last_instant).as_secs_f32();
        self.last_instant = now;
        self.elapsed += dt;

        let route = self.wiring.router.borrow().current();
        let class = self.wiring.viewport.borrow().class();
        let (pointer, drag) = {
            let mut p = self.wiring.pointer.borrow_mut();
            let drag = p.take_drag();
            (p.ndc, drag)
        };

        let Some(gpu) = self.gpu.as_mut() else {
            return;
        };

        let ready = self.wiring.aquarium.borrow_mut().take_ready();
        if let Some(models) = ready {
            gpu.install_aquarium(&models);
            let models = *models;
            self.aquarium.install_turtle(models.turtle);
            if route == Route::About {
                overlay::hide(&self.wiring.document, LOADING_ID);
            }
        }

        let mut label_dirty = false;
        if class != self.shown_class {
            let detail = class.detail();
            gpu.set_detail(detail);
            self.aquarium.shadow.reset(detail.shadow_frames);
            self.shown_class = class;
            label_dirty = true;
        }
        if self.shown_route != Some(route) {
            self.shown_route = Some(route);
            label_dirty = true;
        }
        if label_dirty && route.shows_shape_overlays() {
            let detail = class.detail();
            let text = route.status_text();
            match label::rasterize(&self.wiring.document, text, detail.label_font_size) {
                Ok(bitmap) => gpu.set_label(&bitmap),
                Err(e) => log::warn!("[label] rasterize failed: {:?}", e),
            }
        }

        gpu.resize_if_needed(self.wiring.canvas.width(), self.wiring.canvas.height());
        let (w, h) = gpu.size();

        let result = match route.scene() {
            ActiveScene::Shapes(kind) => {
                self.shapes.camera.set_aspect(w, h);
                let f = self.shapes.step(pointer, dt, self.elapsed, kind);
                gpu.render_shapes(&f)
            }
            ActiveScene::Aquarium => {
                let scene = &mut self.aquarium;
                scene.camera.set_aspect(w, h);
                let css_h =
                    (self.wiring.canvas.client_height() as f32).max(ORBIT_DRAG_MIN_HEIGHT_PX);
                scene.orbit.drag(drag.x, drag.y, css_h);
                scene.camera.eye = scene.orbit.update(dt);
                scene.camera.look_at(scene.orbit.target());

                let group = aquarium::group_transform();
                let turtle_root = group
                    * scene.turtle_float.pose(self.elapsed).matrix()
                    * aquarium::turtle_transform(self.elapsed);
                let (globals, palette) = match scene.turtle.as_mut() {
                    Some((model, mixer)) => {
                        mixer.advance(dt);
                        mixer.evaluate(model)
                    }
                    None => (Vec::new(), Vec::new()),
                };
                let bubbles = scene.bubbles.instances(group, self.elapsed);
                let shadow_weight = if gpu.aquarium_installed() {
                    scene.shadow.next_weight()
                } else {
                    None
                };
                let f = AquariumFrame {
                    camera: &scene.camera,
                    elapsed: self.elapsed,
                    enclosure_model: aquarium::enclosure_transform(),
                    turtle_root,
                    turtle_globals: &globals,
                    turtle_palette: &palette,
                    bubbles: &bubbles,
                    shadow_weight,
                };
                gpu.render_aquarium(&f, &mut self.rng)
            }
        };
        if let Err(e) = result {
            log::error!("render error: {:?}", e);
        }
    }
}

pub async fn init_gpu(
    canvas: &web::HtmlCanvasElement,
    detail: DetailParams,
) -> Option<render::GpuState<'static>> {
    // leak a canvas clone to satisfy 'static lifetime for surface
    let leaked_canvas = Box::leak(Box::new(canvas.clone()));
    match render::GpuState::new(leaked_canvas, detail).await {
        Ok(g) => Some(g),
        Err(e) => {
            log::error!("WebGPU init error: {:?}", e);
            None
        }
    }
}

pub fn start_loop(frame_ctx: Rc<RefCell<FrameContext<'static>>>) {
    let tick: Rc<RefCell<Option<Closure<dyn FnMut()>>>> = Rc::new(RefCell::new(None));
    let tick_clone = tick.clone();
    let frame_ctx_tick = frame_ctx.clone();
    *tick.borrow_mut() = Some(Closure::wrap(Box::new(move || {
        frame_ctx_tick.borrow_mut().frame();
        if let (Some(w), Some(cb)) = (web::window(), tick_clone.borrow().as_ref()) {
            _ = w.request_animation_frame(cb.as_ref().unchecked_ref());
        }
    }) as Box<dyn FnMut()>));
    if let (Some(w), Some(cb)) = (web::window(), tick.borrow().as_ref()) {
        _ = w.request_animation_frame(cb.as_ref().unchecked_ref());
    }
}
