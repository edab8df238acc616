//! Idle floating motion: a slow bob plus a gentle wobble.

use glam::{EulerRot, Mat4, Quat, Vec3};
use rand::Rng;

/// Offsets are drawn from `[0, FLOAT_OFFSET_RANGE)` so groups sharing a
/// config do not move in lockstep.
pub const FLOAT_OFFSET_RANGE: f32 = 10_000.0;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FloatParams {
    pub speed: f32,
    pub rotation_intensity: f32,
    pub float_intensity: f32,
    /// Vertical range the bob maps onto before scaling by intensity.
    pub floating_range: [f32; 2],
}

impl Default for FloatParams {
    fn default() -> Self {
        Self {
            speed: 1.0,
            rotation_intensity: 1.0,
            float_intensity: 1.0,
            floating_range: [-0.1, 0.1],
        }
    }
}

impl FloatParams {
    pub fn with_float(float_intensity: f32) -> Self {
        Self {
            float_intensity,
            ..Self::default()
        }
    }

    /// Largest |y| offset the motion can produce.
    pub fn max_height(&self) -> f32 {
        self.floating_range[0].abs().max(self.floating_range[1].abs()) * self.float_intensity.abs()
    }

    /// Largest |angle| the motion can produce on any axis.
    pub fn max_angle(&self) -> f32 {
        self.rotation_intensity.abs() / 8.0
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FloatPose {
    pub offset: Vec3,
    pub rotation: Quat,
}

impl FloatPose {
    pub fn matrix(&self) -> Mat4 {
        Mat4::from_rotation_translation(self.rotation, self.offset)
    }
}

/// One floating group with its own phase offset.
#[derive(Clone, Copy, Debug)]
pub struct FloatMotion {
    pub params: FloatParams,
    phase: f32,
}

impl FloatMotion {
    pub fn new(params: FloatParams, phase: f32) -> Self {
        Self { params, phase }
    }

    pub fn random<R: Rng + ?Sized>(params: FloatParams, rng: &mut R) -> Self {
        Self::new(params, rng.gen::<f32>() * FLOAT_OFFSET_RANGE)
    }

    pub fn phase(&self) -> f32 {
        self.phase
    }

    /// Pose at elapsed time `elapsed` seconds.
    pub fn pose(&self, elapsed: f32) -> FloatPose {
        let p = &self.params;
        let t = (self.phase + elapsed) / 4.0 * p.speed;
        let ri = p.rotation_intensity;
        let rotation = Quat::from_euler(
            EulerRot::XYZ,
            t.cos() / 8.0 * ri,
            t.sin() / 8.0 * ri,
            t.sin() / 20.0 * ri,
        );
        // Map sin/10 from [-0.1, 0.1] onto the floating range.
        let bob = t.sin() / 10.0;
        let [lo, hi] = p.floating_range;
        let y = lo + (bob + 0.1) / 0.2 * (hi - lo);
        FloatPose {
            offset: Vec3::new(0.0, y * p.float_intensity, 0.0),
            rotation,
        }
    }
}
