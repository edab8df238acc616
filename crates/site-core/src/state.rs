//! Camera description shared with the renderer.
//!
//! Platform-free: the web front-end turns this into view/projection
//! uniforms each frame.

use glam::{Mat4, Vec3};

/// Right-handed perspective camera.
#[derive(Clone, Debug, PartialEq)]
pub struct Camera {
    pub eye: Vec3,
    pub target: Vec3,
    pub up: Vec3,
    pub aspect: f32,
    pub fovy_radians: f32,
    pub znear: f32,
    pub zfar: f32,
}

impl Camera {
    pub fn new(eye: Vec3, fov_degrees: f32, znear: f32, zfar: f32) -> Self {
        Self {
            eye,
            target: Vec3::ZERO,
            up: Vec3::Y,
            aspect: 1.0,
            fovy_radians: fov_degrees.to_radians(),
            znear,
            zfar,
        }
    }

    /// Compute the clip-space projection matrix.
    pub fn projection_matrix(&self) -> Mat4 {
        Mat4::perspective_rh(self.fovy_radians, self.aspect, self.znear, self.zfar)
    }
    /// Compute the view matrix that transforms world to view space.
    pub fn view_matrix(&self) -> Mat4 {
        // Straight up/down views need another up vector.
        let dir = (self.target - self.eye).normalize_or_zero();
        let up = if dir.cross(self.up).length_squared() < 1e-8 {
            Vec3::Z
        } else {
            self.up
        };
        Mat4::look_at_rh(self.eye, self.target, up)
    }

    pub fn view_projection(&self) -> Mat4 {
        self.projection_matrix() * self.view_matrix()
    }

    pub fn look_at(&mut self, target: Vec3) {
        self.target = target;
    }

    pub fn set_aspect(&mut self, width: u32, height: u32) {
        self.aspect = width.max(1) as f32 / height.max(1) as f32;
    }
}
