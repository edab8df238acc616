// Host-side tests for constants and their relationships.
// The main crate is wasm-only, so we include the pure-Rust modules directly.

#![allow(dead_code)]
mod constants {
    include!("../src/constants.rs");
}

use constants::*;

#[test]
fn dom_ids_are_distinct() {
    let ids = [CANVAS_ID, NAV_ID, CAUSE_PANEL_ID, WATERMARK_ID, LOADING_ID];
    for (i, a) in ids.iter().enumerate() {
        assert!(!a.is_empty());
        for b in &ids[i + 1..] {
            assert_ne!(a, b);
        }
    }
}

#[test]
#[allow(clippy::assertions_on_constants)]
fn texture_sizes_are_powers_of_two() {
    assert!(CONTACT_SHADOW_RES.is_power_of_two());
    assert!(LIGHT_DEPTH_RES.is_power_of_two());
    assert!(ACCUM_SHADOW_RES.is_power_of_two());
    assert!(LIGHT_DEPTH_RES >= ACCUM_SHADOW_RES);
}

#[test]
#[allow(clippy::assertions_on_constants)]
fn render_tuning_is_positive() {
    assert!(SHADOW_DEPTH_BIAS > 0.0 && SHADOW_DEPTH_BIAS < 0.05);
    assert!(LABEL_PX_PER_UNIT > 0.0);
    assert!(LABEL_PADDING_PX >= 0.0);
    assert!(ORBIT_DRAG_MIN_HEIGHT_PX >= 1.0);
}
