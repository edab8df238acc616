#![cfg(target_arch = "wasm32")]
use crate::constants::CANVAS_ID;
use site_core::{Route, Router, ViewportTracker};
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::spawn_local;

mod assets;
mod constants;
mod dom;
mod events;
mod frame;
mod input;
mod label;
mod overlay;
mod render;

#[wasm_bindgen(start)]
pub fn start() -> Result<(), JsValue> {
    console_error_panic_hook::set_once();
    console_log::init_with_level(log::Level::Info).ok();
    log::info!("portfolio-web starting");

    spawn_local(async move {
        if let Err(e) = init().await {
            log::error!("init error: {:?}", e);
        }
    });
    Ok(())
}

async fn init() -> anyhow::Result<()> {
    let document = dom::window_document().ok_or_else(|| anyhow::anyhow!("no document"))?;
    overlay::build(&document)?;
    let canvas = dom::canvas_by_id(&document, CANVAS_ID)?;
    dom::sync_canvas_backing_size(&canvas);

    let viewport = ViewportTracker::new(dom::viewport_width());
    let detail = viewport.class().detail();
    log::info!("[viewport] class {:?}", viewport.class());

    let wiring = events::Wiring {
        document,
        canvas: canvas.clone(),
        router: Rc::new(RefCell::new(Router::default())),
        viewport: Rc::new(RefCell::new(viewport)),
        pointer: Rc::new(RefCell::new(input::PointerState::default())),
        aquarium: Rc::new(RefCell::new(assets::AquariumLoad::Idle)),
    };

    // Resolve the landing path without touching history.
    let initial = Route::from_path(&dom::location_path());
    events::navigate_to(&wiring, initial, false);
    events::wire_navigation(&wiring);
    events::wire_pointer_handlers(&wiring);

    // Overlays and routing keep working without WebGPU; only the canvas stays blank.
    let gpu = frame::init_gpu(&canvas, detail).await;
    if gpu.is_none() {
        log::warn!("[gpu] unavailable, rendering disabled");
    }

    let frame_ctx = Rc::new(RefCell::new(frame::FrameContext::new(wiring, gpu)));
    frame::start_loop(frame_ctx);
    Ok(())
}
