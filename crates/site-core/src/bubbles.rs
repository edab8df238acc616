//! Floating bubbles inside the aquarium.

use crate::float::{FloatMotion, FloatParams};
use glam::{Mat4, Vec3};
use rand::Rng;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Bubble {
    pub scale: f32,
    pub color: [f32; 3],
    /// Animation speed; the float motion runs at half of it.
    pub speed: f32,
    pub position: Vec3,
}

const ORANGE: [f32; 3] = [1.0, 0.647, 0.0];
const HOTPINK: [f32; 3] = [1.0, 0.412, 0.706];
const AQUAMARINE: [f32; 3] = [0.498, 1.0, 0.831];
const LIGHTBLUE: [f32; 3] = [0.678, 0.847, 0.902];
const PINK: [f32; 3] = [1.0, 0.753, 0.796];
const SKYBLUE: [f32; 3] = [0.529, 0.808, 0.922];

const fn bubble(scale: f32, color: [f32; 3], speed: f32, position: [f32; 3]) -> Bubble {
    Bubble {
        scale,
        color,
        speed,
        position: Vec3::new(position[0], position[1], position[2]),
    }
}

pub const BUBBLES: [Bubble; 12] = [
    bubble(1.0, ORANGE, 0.05, [-4.0, -1.0, -1.0]),
    bubble(0.75, HOTPINK, 0.1, [-4.0, 2.0, -2.0]),
    bubble(1.25, AQUAMARINE, 0.2, [4.0, -3.0, 2.0]),
    bubble(1.5, LIGHTBLUE, 0.3, [-4.0, -2.0, -3.0]),
    bubble(2.0, PINK, 0.3, [-4.0, 2.0, -4.0]),
    bubble(2.0, SKYBLUE, 0.3, [-4.0, 2.0, -4.0]),
    bubble(1.5, ORANGE, 0.05, [-4.0, -1.0, -1.0]),
    bubble(2.0, HOTPINK, 0.1, [-4.0, 2.0, -2.0]),
    bubble(1.5, AQUAMARINE, 0.2, [4.0, -3.0, 2.0]),
    bubble(1.25, LIGHTBLUE, 0.3, [-4.0, -2.0, -3.0]),
    bubble(1.0, PINK, 0.3, [-4.0, 2.0, -4.0]),
    bubble(1.0, SKYBLUE, 0.3, [-4.0, 2.0, -4.0]),
];

pub const BUBBLE_ROTATION_INTENSITY: f32 = 40.0;
pub const BUBBLE_FLOAT_INTENSITY: f32 = 20.0;

pub fn bubble_float_params(b: &Bubble) -> FloatParams {
    FloatParams {
        speed: b.speed / 2.0,
        rotation_intensity: BUBBLE_ROTATION_INTENSITY,
        float_intensity: BUBBLE_FLOAT_INTENSITY,
        ..FloatParams::default()
    }
}

/// Per-instance data uploaded for the instanced sphere draw.
#[repr(C)]
#[derive(Copy, Clone, Debug, Default, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct BubbleInstance {
    pub model: [[f32; 4]; 4],
    pub color: [f32; 4],
}

/// The bubble field: static table entries each with an independent float.
#[derive(Clone, Debug)]
pub struct BubbleField {
    entries: Vec<(Bubble, FloatMotion)>,
}

impl BubbleField {
    pub fn new<R: Rng + ?Sized>(table: &[Bubble], rng: &mut R) -> Self {
        let entries = table
            .iter()
            .map(|b| (*b, FloatMotion::random(bubble_float_params(b), rng)))
            .collect();
        Self { entries }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Instance transforms at `elapsed` seconds, relative to `parent`.
    /// The float wraps the instance, so the wobble rotates it about the
    /// group origin.
    pub fn instances(&self, parent: Mat4, elapsed: f32) -> Vec<BubbleInstance> {
        self.entries
            .iter()
            .map(|(b, motion)| {
                let local = Mat4::from_translation(b.position) * Mat4::from_scale(Vec3::splat(b.scale));
                let model = parent * motion.pose(elapsed).matrix() * local;
                BubbleInstance {
                    model: model.to_cols_array_2d(),
                    color: [b.color[0], b.color[1], b.color[2], 1.0],
                }
            })
            .collect()
    }
}
