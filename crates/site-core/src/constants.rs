use glam::Vec3;

// Shared scene tuning constants used by the web front-end.

// Viewport
pub const MOBILE_MAX_WIDTH: f64 = 768.0; // widths below this are mobile

// Shape scene camera
pub const SHAPES_CAMERA_POSITION: Vec3 = Vec3::new(0.0, 0.0, 20.0);
pub const SHAPES_CAMERA_FOV_DEG: f32 = 50.0;
pub const SHAPES_CAMERA_NEAR: f32 = 0.1;
pub const SHAPES_CAMERA_FAR: f32 = 1000.0;

// Camera rig
pub const RIG_SMOOTH_TIME_SEC: f32 = 0.2; // damping time; 0.2..=0.4 are sensible
pub const RIG_SWING_X: f32 = 5.0; // lateral swing at full pointer deflection
pub const RIG_SWING_Y: f32 = 3.5;
pub const RIG_BASE_Z: f32 = 15.0;
pub const RIG_SWING_Z: f32 = 10.0;

// Shape scene layout
pub const BACKGROUND_RGB: [f32; 3] = [0.878, 0.878, 0.878]; // #e0e0e0
pub const STATUS_LABEL_POSITION: Vec3 = Vec3::new(0.0, 0.0, -10.0);
pub const STATUS_LETTER_SPACING_EM: f32 = -0.025;
pub const SHAPE_FLOAT_INTENSITY: f32 = 2.0;
pub const SPOT_LIGHT_POSITION: Vec3 = Vec3::new(20.0, 20.0, 10.0);
pub const SPOT_LIGHT_ANGLE: f32 = 0.2;
pub const SPOT_LIGHT_PENUMBRA: f32 = 1.0;

// Contact shadows under the floating shape
pub const CONTACT_SHADOW_Y: f32 = -7.5;
pub const CONTACT_SHADOW_SCALE: f32 = 100.0;
pub const CONTACT_SHADOW_BLUR: f32 = 1.0;
pub const CONTACT_SHADOW_FAR: f32 = 100.0;
pub const CONTACT_SHADOW_OPACITY: f32 = 0.85;

// Post-processing
pub const AO_RADIUS: f32 = 1.0;
pub const AO_INTENSITY: f32 = 2.0;
pub const BLOOM_THRESHOLD: f32 = 0.8;
pub const BLOOM_INTENSITY: f32 = 2.0;
pub const BLOOM_LEVELS: u32 = 8;
pub const TILT_SHIFT_BLUR: f32 = 0.2;

/// Blur radius in texels for each bloom level. Every level is one horizontal
/// and one vertical pass over the half-resolution bright buffer, with the
/// kernel widening as the levels go down.
pub fn bloom_level_spreads() -> impl Iterator<Item = f32> {
    (1..=BLOOM_LEVELS).map(|level| level as f32)
}

// Easing
pub const DAMP_EPSILON: f32 = 1e-3; // snap distance for damped values
pub const DAMP_MIN_SMOOTH_TIME: f32 = 1e-4;
