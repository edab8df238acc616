use super::Wiring;
use crate::assets::{self, AquariumLoad};
use crate::constants::{LOADING_ID, NAV_ID};
use crate::{dom, overlay};
use site_core::{Route, Transition};
use wasm_bindgen::{JsCast, JsValue};
use web_sys as web;

/// Switch to `route`, optionally recording it in the session history.
pub fn navigate_to(w: &Wiring, route: Route, push: bool) {
    let t = w.router.borrow_mut().navigate(route);
    if push && t.changed() {
        if let Some(history) = web::window().and_then(|wnd| wnd.history().ok()) {
            _ = history.push_state_with_url(&JsValue::NULL, "", Some(route.path()));
        }
    }
    apply_transition(w, &t);
}

/// Mount overlays for the new route and kick off the aquarium load on
/// first entry.
pub fn apply_transition(w: &Wiring, t: &Transition) {
    let detail = w.viewport.borrow().class().detail();
    overlay::apply_route(&w.document, t.to, &detail);
    if t.changed() {
        log::info!("[route] {:?} -> {:?}", t.from, t.to);
    }
    if t.start_aquarium_load {
        overlay::show_loading(&w.document);
        assets::spawn_aquarium_load(w.clone());
    } else if t.enter_aquarium {
        match &*w.aquarium.borrow() {
            AquariumLoad::Failed => overlay::show_loading_failed(&w.document),
            AquariumLoad::Installed => overlay::hide(&w.document, LOADING_ID),
            _ => overlay::show_loading(&w.document),
        }
    }
    if t.leave_aquarium {
        overlay::hide(&w.document, LOADING_ID);
    }
}

pub fn wire_navigation(w: &Wiring) {
    wire_nav_clicks(w);
    wire_popstate(w);
    wire_resize(w);
}

// Links navigate in place instead of reloading the page.
fn wire_nav_clicks(w: &Wiring) {
    let Some(nav) = w.document.get_element_by_id(NAV_ID) else {
        log::warn!("[route] nav bar missing");
        return;
    };
    let w = w.clone();
    let closure = wasm_bindgen::closure::Closure::wrap(Box::new(move |ev: web::MouseEvent| {
        if ev.ctrl_key() || ev.meta_key() || ev.shift_key() || ev.button() != 0 {
            return;
        }
        let link = ev
            .target()
            .and_then(|t| t.dyn_into::<web::Element>().ok())
            .and_then(|el| el.closest("a[data-route]").ok().flatten());
        let Some(link) = link else { return };
        let Some(path) = link.get_attribute("data-route") else {
            return;
        };
        ev.prevent_default();
        navigate_to(&w, Route::from_path(&path), true);
    }) as Box<dyn FnMut(_)>);
    _ = nav.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
    closure.forget();
}

fn wire_popstate(w: &Wiring) {
    let w = w.clone();
    let closure = wasm_bindgen::closure::Closure::wrap(Box::new(move |_ev: web::PopStateEvent| {
        navigate_to(&w, Route::from_path(&dom::location_path()), false);
    }) as Box<dyn FnMut(_)>);
    if let Some(wnd) = web::window() {
        _ = wnd.add_event_listener_with_callback("popstate", closure.as_ref().unchecked_ref());
    }
    closure.forget();
}

fn wire_resize(w: &Wiring) {
    dom::sync_canvas_backing_size(&w.canvas);
    let w = w.clone();
    let closure = wasm_bindgen::closure::Closure::wrap(Box::new(move || {
        dom::sync_canvas_backing_size(&w.canvas);
        let changed = w.viewport.borrow_mut().observe(dom::viewport_width());
        if let Some(class) = changed {
            log::info!("[viewport] class -> {:?}", class);
            let route = w.router.borrow().current();
            if route.shows_shape_overlays() {
                overlay::update_watermark(&w.document, route, &class.detail());
            }
        }
    }) as Box<dyn FnMut()>);
    if let Some(wnd) = web::window() {
        _ = wnd.add_event_listener_with_callback("resize", closure.as_ref().unchecked_ref());
    }
    closure.forget();
}
