//! Environment lightformers, jittered shadow lights and the accumulation
//! schedule for soft shadows.

use glam::{EulerRot, Mat4, Quat, Vec3};
use rand::Rng;
use smallvec::SmallVec;
use std::f32::consts::PI;

/// Upper bound on lightformers per environment (matches the shader array).
pub const MAX_LIGHTFORMERS: usize = 16;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LightformerForm {
    Rect,
    Circle,
}

/// Emissive card that only contributes to environment reflections.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Lightformer {
    pub form: LightformerForm,
    pub intensity: f32,
    pub position: Vec3,
    pub rotation: Quat,
    /// Width and height of the card; z is ignored.
    pub scale: Vec3,
}

impl Lightformer {
    pub fn rect(intensity: f32, position: Vec3, scale: Vec3) -> Self {
        Self {
            form: LightformerForm::Rect,
            intensity,
            position,
            rotation: Quat::IDENTITY,
            scale,
        }
    }

    pub fn circle(intensity: f32, position: Vec3, scale: Vec3) -> Self {
        Self {
            form: LightformerForm::Circle,
            ..Self::rect(intensity, position, scale)
        }
    }

    pub fn with_euler(mut self, x: f32, y: f32, z: f32) -> Self {
        self.rotation = Quat::from_euler(EulerRot::XYZ, x, y, z);
        self
    }

    /// Turn the card so its front (+Z) faces `target`.
    pub fn looking_at(mut self, target: Vec3) -> Self {
        let dir = (target - self.position).normalize_or_zero();
        if dir != Vec3::ZERO {
            self.rotation = Quat::from_rotation_arc(Vec3::Z, dir);
        }
        self
    }

    /// Apply a parent transform (the environment group).
    pub fn transformed(mut self, parent: Quat) -> Self {
        self.position = parent * self.position;
        self.rotation = parent * self.rotation;
        self
    }

    pub fn normal(&self) -> Vec3 {
        self.rotation * Vec3::Z
    }

    pub fn to_gpu(&self) -> LightformerGpu {
        let u = self.rotation * Vec3::X;
        let v = self.rotation * Vec3::Y;
        let n = self.normal();
        let form = match self.form {
            LightformerForm::Rect => 0.0,
            LightformerForm::Circle => 1.0,
        };
        LightformerGpu {
            center_intensity: [self.position.x, self.position.y, self.position.z, self.intensity],
            normal_form: [n.x, n.y, n.z, form],
            axis_u: [u.x, u.y, u.z, self.scale.x * 0.5],
            axis_v: [v.x, v.y, v.z, self.scale.y * 0.5],
        }
    }
}

#[repr(C)]
#[derive(Copy, Clone, Debug, Default, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct LightformerGpu {
    pub center_intensity: [f32; 4],
    pub normal_form: [f32; 4],
    pub axis_u: [f32; 4],
    pub axis_v: [f32; 4],
}

/// Background gradient the lightformers are composited over.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EnvironmentGradient {
    pub sky: [f32; 3],
    pub horizon: [f32; 3],
    pub ground: [f32; 3],
}

/// Soft urban daylight used by the shape scene.
pub const CITY_GRADIENT: EnvironmentGradient = EnvironmentGradient {
    sky: [0.62, 0.68, 0.78],
    horizon: [0.85, 0.80, 0.72],
    ground: [0.22, 0.21, 0.20],
};

/// Neutral black studio; only the lightformers light the aquarium.
pub const STUDIO_GRADIENT: EnvironmentGradient = EnvironmentGradient {
    sky: [0.0, 0.0, 0.0],
    horizon: [0.02, 0.02, 0.02],
    ground: [0.0, 0.0, 0.0],
};

#[derive(Clone, Debug)]
pub struct Environment {
    pub gradient: EnvironmentGradient,
    pub lightformers: SmallVec<[Lightformer; MAX_LIGHTFORMERS]>,
}

impl Environment {
    pub fn gpu_lightformers(&self) -> [LightformerGpu; MAX_LIGHTFORMERS] {
        let mut out = [LightformerGpu::default(); MAX_LIGHTFORMERS];
        for (slot, lf) in out.iter_mut().zip(self.lightformers.iter()) {
            *slot = lf.to_gpu();
        }
        out
    }
}

/// City preset plus one tall strip light aimed at the origin.
pub fn shapes_environment() -> Environment {
    let mut lightformers = SmallVec::new();
    lightformers.push(
        Lightformer::rect(8.0, Vec3::new(10.0, 5.0, 0.0), Vec3::new(10.0, 50.0, 1.0))
            .looking_at(Vec3::ZERO),
    );
    Environment {
        gradient: CITY_GRADIENT,
        lightformers,
    }
}

/// Ceiling panel, a row of round lamps and two side strips, all tilted by
/// the group rotation.
pub fn aquarium_environment() -> Environment {
    let group = Quat::from_rotation_x(-PI / 3.0);
    let mut lightformers: SmallVec<[Lightformer; MAX_LIGHTFORMERS]> = SmallVec::new();
    lightformers.push(
        Lightformer::rect(4.0, Vec3::new(0.0, 5.0, -9.0), Vec3::new(10.0, 10.0, 1.0))
            .with_euler(PI / 2.0, 0.0, 0.0),
    );
    for (i, x) in [2.0_f32, 0.0, 2.0, 0.0, 2.0, 0.0, 2.0, 0.0].into_iter().enumerate() {
        lightformers.push(
            Lightformer::circle(4.0, Vec3::new(x, 4.0, i as f32 * 4.0), Vec3::new(4.0, 1.0, 1.0))
                .with_euler(PI / 2.0, 0.0, 0.0),
        );
    }
    lightformers.push(
        Lightformer::rect(2.0, Vec3::new(-5.0, 1.0, -1.0), Vec3::new(50.0, 2.0, 1.0))
            .with_euler(0.0, PI / 2.0, 0.0),
    );
    lightformers.push(
        Lightformer::rect(2.0, Vec3::new(10.0, 1.0, 0.0), Vec3::new(50.0, 2.0, 1.0))
            .with_euler(0.0, -PI / 2.0, 0.0),
    );
    let lightformers = lightformers
        .into_iter()
        .map(|lf| lf.transformed(group))
        .collect();
    Environment {
        gradient: STUDIO_GRADIENT,
        lightformers,
    }
}

/// Spot light of the shape scene.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SpotLight {
    pub position: Vec3,
    pub angle: f32,
    pub penumbra: f32,
    pub intensity: f32,
}

/// A cluster of shadow-casting lights jittered around a base position.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RandomizedLight {
    pub amount: u32,
    pub radius: f32,
    /// Fraction of samples taken from the whole upper hemisphere instead of
    /// around the base position.
    pub ambient: f32,
    pub intensity: f32,
    pub position: Vec3,
    /// Extent of each light's orthographic shadow frustum.
    pub size: f32,
}

impl RandomizedLight {
    /// Positions for one accumulation frame.
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> Vec<Vec3> {
        let length = self.position.length();
        (0..self.amount)
            .map(|_| {
                if rng.gen::<f32>() >= self.ambient {
                    let half = self.radius * 0.5;
                    self.position
                        + Vec3::new(
                            rng.gen_range(-half..=half),
                            rng.gen_range(-half..=half),
                            rng.gen_range(-half..=half),
                        )
                } else {
                    let lambda = (2.0 * rng.gen::<f32>() - 1.0).acos() - PI / 2.0;
                    let phi = 2.0 * PI * rng.gen::<f32>();
                    Vec3::new(
                        lambda.cos() * phi.cos() * length,
                        (lambda.cos() * phi.sin() * length).abs(),
                        lambda.sin() * length,
                    )
                }
            })
            .collect()
    }

    /// Light-space view-projection for one sampled light aimed at `focus`.
    pub fn shadow_matrix(&self, light_pos: Vec3, focus: Vec3) -> Mat4 {
        let half = self.size * 0.5;
        let dir = (focus - light_pos).normalize_or_zero();
        let up = if dir.cross(Vec3::Y).length_squared() < 1e-6 {
            Vec3::Z
        } else {
            Vec3::Y
        };
        let view = Mat4::look_at_rh(light_pos, focus, up);
        let far = (light_pos - focus).length() * 2.0 + self.size;
        let proj = Mat4::orthographic_rh(-half, half, -half, half, 0.1, far);
        proj * view
    }
}

/// Progress of a temporally accumulated shadow.
///
/// Each frame contributes one sample with weight `1 / (n + 1)`, giving a
/// running average. Once `frames` samples are in, the result is frozen.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ShadowAccumulator {
    frames: u32,
    accumulated: u32,
}

impl ShadowAccumulator {
    pub fn new(frames: u32) -> Self {
        Self {
            frames: frames.max(1),
            accumulated: 0,
        }
    }

    pub fn frames(&self) -> u32 {
        self.frames
    }

    pub fn accumulated(&self) -> u32 {
        self.accumulated
    }

    pub fn is_done(&self) -> bool {
        self.accumulated >= self.frames
    }

    /// Blend weight for the next sample, or `None` once done. Advances the
    /// counter.
    pub fn next_weight(&mut self) -> Option<f32> {
        if self.is_done() {
            return None;
        }
        let w = 1.0 / (self.accumulated + 1) as f32;
        self.accumulated += 1;
        Some(w)
    }

    /// Restart with a new budget (viewport tier changed).
    pub fn reset(&mut self, frames: u32) {
        *self = Self::new(frames);
    }
}
