// Host-side tests for pure input functions.
// The main crate is wasm-only, so we include the pure-Rust modules directly.

#![allow(dead_code)]
mod input {
    include!("../src/input.rs");
}

use glam::Vec2;
use input::*;

#[test]
fn pointer_ndc_maps_corners() {
    assert_eq!(pointer_ndc(0.0, 0.0, 800.0, 600.0), Vec2::new(-1.0, 1.0));
    assert_eq!(pointer_ndc(800.0, 600.0, 800.0, 600.0), Vec2::new(1.0, -1.0));
    assert_eq!(pointer_ndc(400.0, 300.0, 800.0, 600.0), Vec2::ZERO);
}

#[test]
fn pointer_ndc_clamps_outside_the_element() {
    assert_eq!(pointer_ndc(-50.0, 900.0, 800.0, 600.0), Vec2::new(-1.0, -1.0));
    assert_eq!(pointer_ndc(2000.0, -10.0, 800.0, 600.0), Vec2::new(1.0, 1.0));
}

#[test]
fn pointer_ndc_degenerate_rect_is_centre() {
    assert_eq!(pointer_ndc(10.0, 10.0, 0.0, 600.0), Vec2::ZERO);
    assert_eq!(pointer_ndc(10.0, 10.0, 800.0, -1.0), Vec2::ZERO);
    assert_eq!(pointer_ndc(f32::NAN, 10.0, 800.0, 600.0), Vec2::ZERO);
}

#[test]
fn drag_accumulates_until_taken() {
    let mut p = PointerState::default();
    p.drag_to(Vec2::new(50.0, 50.0));
    assert_eq!(p.drag_delta, Vec2::ZERO, "moves without a press are not drags");

    p.begin_drag(Vec2::new(10.0, 20.0));
    p.drag_to(Vec2::new(15.0, 18.0));
    p.drag_to(Vec2::new(25.0, 18.0));
    assert_eq!(p.take_drag(), Vec2::new(15.0, -2.0));
    assert_eq!(p.take_drag(), Vec2::ZERO);

    p.end_drag();
    p.drag_to(Vec2::new(100.0, 100.0));
    assert!(!p.down);
    assert_eq!(p.take_drag(), Vec2::ZERO);
}
