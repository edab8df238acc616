use super::Wiring;
use crate::input;
use glam::Vec2;
use wasm_bindgen::JsCast;
use web_sys as web;

pub fn wire_pointer_handlers(w: &Wiring) {
    wire_pointermove(w);
    wire_pointerdown(w);
    wire_pointerup(w, "pointerup");
    wire_pointerup(w, "pointercancel");
}

fn wire_pointermove(w: &Wiring) {
    let w = w.clone();
    let closure = wasm_bindgen::closure::Closure::wrap(Box::new(move |ev: web::PointerEvent| {
        let Some(wnd) = web::window() else { return };
        let width = wnd
            .inner_width()
            .ok()
            .and_then(|v| v.as_f64())
            .unwrap_or(0.0) as f32;
        let height = wnd
            .inner_height()
            .ok()
            .and_then(|v| v.as_f64())
            .unwrap_or(0.0) as f32;
        let x = ev.client_x() as f32;
        let y = ev.client_y() as f32;
        let mut ps = w.pointer.borrow_mut();
        ps.ndc = input::pointer_ndc(x, y, width, height);
        ps.drag_to(Vec2::new(x, y));
    }) as Box<dyn FnMut(_)>);

    if let Some(wnd) = web::window() {
        _ = wnd.add_event_listener_with_callback("pointermove", closure.as_ref().unchecked_ref());
    }
    closure.forget();
}

fn wire_pointerdown(w: &Wiring) {
    let w = w.clone();
    let canvas_for_listener = w.canvas.clone();
    let closure = wasm_bindgen::closure::Closure::wrap(Box::new(move |ev: web::PointerEvent| {
        w.pointer
            .borrow_mut()
            .begin_drag(Vec2::new(ev.client_x() as f32, ev.client_y() as f32));
        _ = w.canvas.set_pointer_capture(ev.pointer_id());
        ev.prevent_default();
    }) as Box<dyn FnMut(_)>);
    _ = canvas_for_listener
        .add_event_listener_with_callback("pointerdown", closure.as_ref().unchecked_ref());
    closure.forget();
}

fn wire_pointerup(w: &Wiring, event: &str) {
    let w = w.clone();
    let closure = wasm_bindgen::closure::Closure::wrap(Box::new(move |_ev: web::PointerEvent| {
        w.pointer.borrow_mut().end_drag();
    }) as Box<dyn FnMut(_)>);
    if let Some(wnd) = web::window() {
        _ = wnd.add_event_listener_with_callback(event, closure.as_ref().unchecked_ref());
    }
    closure.forget();
}
