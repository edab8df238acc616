//! Pointer-following camera rig for the shape scene.
//!
//! Each frame the rig derives a target position from the live pointer and
//! eases the camera toward it, then points the camera at the origin. There is
//! no terminal state; the correction runs for as long as frames are drawn.

use crate::constants::{
    RIG_BASE_Z, RIG_SMOOTH_TIME_SEC, RIG_SWING_X, RIG_SWING_Y, RIG_SWING_Z, SHAPES_CAMERA_FAR,
    SHAPES_CAMERA_FOV_DEG, SHAPES_CAMERA_NEAR, SHAPES_CAMERA_POSITION,
};
use crate::easing::Damped3;
use crate::state::Camera;
use glam::{Vec2, Vec3};

/// Target camera position for a pointer in normalized `[-1, 1]` coordinates
/// (y up).
pub fn rig_target(pointer: Vec2) -> Vec3 {
    let p = pointer.clamp(Vec2::splat(-1.0), Vec2::splat(1.0));
    Vec3::new(
        (-p.x).sin() * RIG_SWING_X,
        p.y * RIG_SWING_Y,
        RIG_BASE_Z + p.x.cos() * RIG_SWING_Z,
    )
}

#[derive(Clone, Debug)]
pub struct CameraRig {
    position: Damped3,
    smooth_time: f32,
}

impl Default for CameraRig {
    fn default() -> Self {
        Self::new(SHAPES_CAMERA_POSITION, RIG_SMOOTH_TIME_SEC)
    }
}

impl CameraRig {
    pub fn new(start: Vec3, smooth_time: f32) -> Self {
        Self {
            position: Damped3::new(start),
            smooth_time,
        }
    }

    pub fn position(&self) -> Vec3 {
        self.position.value()
    }

    /// Advance one frame and return the new camera position.
    pub fn step(&mut self, pointer: Vec2, dt: f32) -> Vec3 {
        self.position.damp(rig_target(pointer), self.smooth_time, dt);
        self.position.value()
    }

    /// Advance one frame and write the result into `camera`, looking at the
    /// world origin.
    pub fn apply(&mut self, camera: &mut Camera, pointer: Vec2, dt: f32) {
        camera.eye = self.step(pointer, dt);
        camera.look_at(Vec3::ZERO);
    }
}

pub fn shapes_camera() -> Camera {
    Camera::new(
        SHAPES_CAMERA_POSITION,
        SHAPES_CAMERA_FOV_DEG,
        SHAPES_CAMERA_NEAR,
        SHAPES_CAMERA_FAR,
    )
}
