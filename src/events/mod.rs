pub mod navigation;
pub mod pointer;

use crate::assets::AquariumLoad;
use crate::input;
use site_core::{Router, ViewportTracker};
use std::cell::RefCell;
use std::rc::Rc;
use web_sys as web;

pub use navigation::{navigate_to, wire_navigation};
pub use pointer::wire_pointer_handlers;

/// State cells shared by the event closures and the frame loop.
#[derive(Clone)]
pub struct Wiring {
    pub document: web::Document,
    pub canvas: web::HtmlCanvasElement,
    pub router: Rc<RefCell<Router>>,
    pub viewport: Rc<RefCell<ViewportTracker>>,
    pub pointer: Rc<RefCell<input::PointerState>>,
    pub aquarium: Rc<RefCell<AquariumLoad>>,
}
