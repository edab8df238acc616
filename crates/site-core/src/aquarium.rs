//! Aquarium scene configuration: enclosure, turtle, shadows and camera.

use crate::detail::DetailParams;
use crate::float::FloatParams;
use crate::lighting::{RandomizedLight, ShadowAccumulator};
use crate::shapes::TransmissionParams;
use crate::state::Camera;
use glam::{EulerRot, Mat4, Quat, Vec3};
use std::f32::consts::PI;

pub const ENCLOSURE_MODEL_URL: &str = "/shapes-transformed.glb";
pub const TURTLE_MODEL_URL: &str = "/turtle.glb";

/// Mesh node carrying the glass enclosure geometry.
pub const ENCLOSURE_NODE: &str = "Cube";
pub const SWIM_CLIP: &str = "Swim Cycle";
pub const TURTLE_TIME_SCALE: f32 = 0.5;

pub const AQUARIUM_CAMERA_POSITION: Vec3 = Vec3::new(30.0, 0.0, -3.0);
pub const AQUARIUM_CAMERA_FOV_DEG: f32 = 35.0;
pub const AQUARIUM_CAMERA_NEAR: f32 = 1.0;
pub const AQUARIUM_CAMERA_FAR: f32 = 50.0;

pub const AQUARIUM_GROUP_OFFSET: Vec3 = Vec3::new(0.0, 0.25, 0.0);
pub const ENCLOSURE_SCALE: Vec3 = Vec3::new(0.61 * 6.0, 0.8 * 6.0, 6.0);

pub const TURTLE_POSITION: Vec3 = Vec3::new(0.0, -0.5, -1.0);
pub const TURTLE_SCALE: f32 = 17.0;

pub const SHADOW_PLANE_Y: f32 = -5.0;
pub const SHADOW_SCALE: f32 = 60.0;
pub const SHADOW_OPACITY: f32 = 0.7;
pub const SHADOW_COLOR: [f32; 3] = [0.678, 0.847, 0.902]; // lightblue
pub const SHADOW_COLOR_BLEND: f32 = 2.0;

pub fn aquarium_camera() -> Camera {
    Camera::new(
        AQUARIUM_CAMERA_POSITION,
        AQUARIUM_CAMERA_FOV_DEG,
        AQUARIUM_CAMERA_NEAR,
        AQUARIUM_CAMERA_FAR,
    )
}

/// Iridescent glass applied to the enclosure's single mesh.
pub fn enclosure_material() -> TransmissionParams {
    TransmissionParams {
        samples: 4,
        thickness: 3.0,
        backside: true,
        chromatic_aberration: 0.025,
        anisotropy: 0.1,
        distortion: 0.1,
        distortion_scale: 0.1,
        temporal_distortion: 0.2,
        iridescence: 1.0,
        iridescence_ior: 1.0,
        iridescence_thickness_range: [0.0, 1400.0],
        ..TransmissionParams::default()
    }
}

pub fn turtle_float() -> FloatParams {
    FloatParams {
        speed: 2.0,
        rotation_intensity: 0.3,
        float_intensity: 2.0,
        ..FloatParams::default()
    }
}

/// Idle sway applied to the turtle's root about z, in radians.
pub fn turtle_sway(elapsed: f32) -> f32 {
    (elapsed / 4.0).sin() / 4.0
}

/// Placement of the turtle inside its float group, including the sway.
pub fn turtle_transform(elapsed: f32) -> Mat4 {
    Mat4::from_translation(TURTLE_POSITION)
        * Mat4::from_quat(Quat::from_euler(EulerRot::XYZ, 0.0, PI, 0.0))
        * Mat4::from_scale(Vec3::splat(TURTLE_SCALE))
        * Mat4::from_rotation_z(turtle_sway(elapsed))
}

pub fn enclosure_transform() -> Mat4 {
    Mat4::from_translation(AQUARIUM_GROUP_OFFSET) * Mat4::from_scale(ENCLOSURE_SCALE)
}

pub fn group_transform() -> Mat4 {
    Mat4::from_translation(AQUARIUM_GROUP_OFFSET)
}

pub fn shadow_light() -> RandomizedLight {
    RandomizedLight {
        amount: 8,
        radius: 15.0,
        ambient: 0.5,
        intensity: 1.0,
        position: Vec3::new(-5.0, 10.0, -5.0),
        size: 20.0,
    }
}

pub fn shadow_accumulator(detail: &DetailParams) -> ShadowAccumulator {
    ShadowAccumulator::new(detail.shadow_frames)
}
