// Web front-end constants: DOM ids, texture sizes and render tuning.
//
// Scene numbers shared with the core crate live in `site_core::constants`;
// this module only holds what the browser layer needs.

// DOM element ids
pub const CANVAS_ID: &str = "app-canvas";
pub const NAV_ID: &str = "site-nav";
pub const CAUSE_PANEL_ID: &str = "cause-info";
pub const WATERMARK_ID: &str = "status-watermark";
pub const LOADING_ID: &str = "aquarium-loading";

// CSS classes
pub const NAV_CLASS: &str = "nav";
pub const CAUSE_PANEL_CLASS: &str = "cause-info";
pub const ACTIVE_CLASS: &str = "active";
pub const HIDDEN_CLASS: &str = "hidden";

pub const LOADING_TEXT: &str = "loading aquarium…";
pub const LOADING_FAILED_TEXT: &str = "the aquarium could not be loaded";

// Status label rasterization
pub const LABEL_FONT_FAMILY: &str = "Inter, system-ui, sans-serif";
pub const LABEL_PX_PER_UNIT: f64 = 16.0; // canvas pixels per world unit of font size
pub const LABEL_PADDING_PX: f64 = 8.0;

// Shadow texture sizes
pub const CONTACT_SHADOW_RES: u32 = 512;
pub const LIGHT_DEPTH_RES: u32 = 1024;
pub const ACCUM_SHADOW_RES: u32 = 512;
pub const SHADOW_DEPTH_BIAS: f32 = 0.002;

// Orbit drag sensitivity is relative to the canvas height in CSS pixels.
pub const ORBIT_DRAG_MIN_HEIGHT_PX: f32 = 1.0;

// Seed for float phases and shadow light jitter.
pub const SCENE_RNG_SEED: u64 = 0x5eed_7a17;
