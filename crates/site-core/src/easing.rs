//! Critically damped easing toward a moving target.
//!
//! `damp` keeps a velocity alongside the value, so repeated calls with the
//! frame delta converge smoothly without overshoot regardless of frame rate.

use crate::constants::{DAMP_EPSILON, DAMP_MIN_SMOOTH_TIME};
use glam::Vec3;

/// Rational approximation of `exp(-x)` used by the spring integrator.
#[inline]
fn exp_decay(x: f32) -> f32 {
    1.0 / (1.0 + x + 0.48 * x * x + 0.235 * x * x * x)
}

/// A scalar with its easing velocity.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Damped {
    pub value: f32,
    pub velocity: f32,
}

impl Damped {
    pub fn new(value: f32) -> Self {
        Self {
            value,
            velocity: 0.0,
        }
    }

    /// Move toward `target` over roughly `smooth_time` seconds.
    /// Returns `false` once the value has settled on the target.
    pub fn damp(&mut self, target: f32, smooth_time: f32, dt: f32) -> bool {
        if (self.value - target).abs() <= DAMP_EPSILON {
            self.value = target;
            self.velocity = 0.0;
            return false;
        }
        if dt <= 0.0 {
            return true;
        }
        let smooth_time = smooth_time.max(DAMP_MIN_SMOOTH_TIME);
        let omega = 2.0 / smooth_time;
        let decay = exp_decay(omega * dt);
        let change = self.value - target;
        let temp = (self.velocity + omega * change) * dt;
        self.velocity = (self.velocity - omega * temp) * decay;
        let mut output = target + (change + temp) * decay;
        // Never step past the target.
        if (target - self.value > 0.0) == (output > target) {
            output = target;
            self.velocity = 0.0;
        }
        self.value = output;
        true
    }
}

/// Per-axis [`Damped`] easing of a vector.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Damped3 {
    pub x: Damped,
    pub y: Damped,
    pub z: Damped,
}

impl Damped3 {
    pub fn new(value: Vec3) -> Self {
        Self {
            x: Damped::new(value.x),
            y: Damped::new(value.y),
            z: Damped::new(value.z),
        }
    }

    pub fn value(&self) -> Vec3 {
        Vec3::new(self.x.value, self.y.value, self.z.value)
    }

    pub fn damp(&mut self, target: Vec3, smooth_time: f32, dt: f32) -> bool {
        let mx = self.x.damp(target.x, smooth_time, dt);
        let my = self.y.damp(target.y, smooth_time, dt);
        let mz = self.z.damp(target.z, smooth_time, dt);
        mx || my || mz
    }
}
