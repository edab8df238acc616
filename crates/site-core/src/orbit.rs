//! Rotation-only orbit controls for the aquarium camera.
//!
//! The camera sits on a sphere around a fixed target. Dragging changes the
//! azimuth and polar angle; the polar angle is clamped to the upper
//! hemisphere. There is no pan or zoom, so distance and target never change.

use crate::easing::Damped;
use glam::Vec3;
use std::f32::consts::{FRAC_PI_2, TAU};

pub const ORBIT_SMOOTH_TIME_SEC: f32 = 0.25;

/// Spherical coordinates with polar angle measured from +Y.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Spherical {
    pub radius: f32,
    pub polar: f32,
    pub azimuth: f32,
}

impl Spherical {
    pub fn from_offset(offset: Vec3) -> Self {
        let radius = offset.length();
        if radius <= f32::EPSILON {
            return Self {
                radius: 0.0,
                polar: 0.0,
                azimuth: 0.0,
            };
        }
        Self {
            radius,
            polar: (offset.y / radius).clamp(-1.0, 1.0).acos(),
            azimuth: offset.x.atan2(offset.z),
        }
    }

    pub fn to_offset(self) -> Vec3 {
        let s = self.polar.sin() * self.radius;
        Vec3::new(
            s * self.azimuth.sin(),
            self.polar.cos() * self.radius,
            s * self.azimuth.cos(),
        )
    }
}

#[derive(Clone, Debug)]
pub struct OrbitControls {
    target: Vec3,
    radius: f32,
    goal_azimuth: f32,
    goal_polar: f32,
    azimuth: Damped,
    polar: Damped,
    pub min_polar: f32,
    pub max_polar: f32,
    pub smooth_time: f32,
}

impl OrbitControls {
    /// Rotation-only controls with the polar angle limited to `[0, π/2]`.
    pub fn rotation_only(eye: Vec3, target: Vec3) -> Self {
        let sph = Spherical::from_offset(eye - target);
        let min_polar = 0.0;
        let max_polar = FRAC_PI_2;
        let polar = sph.polar.clamp(min_polar, max_polar);
        Self {
            target,
            radius: sph.radius,
            goal_azimuth: sph.azimuth,
            goal_polar: polar,
            azimuth: Damped::new(sph.azimuth),
            polar: Damped::new(polar),
            min_polar,
            max_polar,
            smooth_time: ORBIT_SMOOTH_TIME_SEC,
        }
    }

    pub fn target(&self) -> Vec3 {
        self.target
    }

    pub fn radius(&self) -> f32 {
        self.radius
    }

    pub fn polar(&self) -> f32 {
        self.polar.value
    }

    pub fn azimuth(&self) -> f32 {
        self.azimuth.value
    }

    /// Add to the goal angles (radians).
    pub fn rotate(&mut self, d_azimuth: f32, d_polar: f32) {
        self.goal_azimuth += d_azimuth;
        self.goal_polar = (self.goal_polar + d_polar).clamp(self.min_polar, self.max_polar);
    }

    /// Pointer drag in CSS pixels; a drag across the element height is one
    /// full turn.
    pub fn drag(&mut self, dx_px: f32, dy_px: f32, element_height_px: f32) {
        let h = element_height_px.max(1.0);
        self.rotate(-TAU * dx_px / h, -TAU * dy_px / h);
    }

    pub fn eye(&self) -> Vec3 {
        self.target
            + Spherical {
                radius: self.radius,
                polar: self.polar.value,
                azimuth: self.azimuth.value,
            }
            .to_offset()
    }

    /// Ease toward the goal angles and return the camera position.
    pub fn update(&mut self, dt: f32) -> Vec3 {
        self.azimuth.damp(self.goal_azimuth, self.smooth_time, dt);
        self.polar.damp(self.goal_polar, self.smooth_time, dt);
        self.eye()
    }
}
