//! Keyframe tracks, clips and a single-action mixer for skinned models.

use crate::model::ModelData;
use fnv::FnvHashMap;
use glam::{Mat4, Quat, Vec3};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Interpolation {
    Step,
    Linear,
    /// Sampled linearly between key values; tangents are dropped on import.
    CubicSpline,
}

pub trait Keyframe: Copy {
    fn blend(a: Self, b: Self, s: f32) -> Self;
}

impl Keyframe for Vec3 {
    fn blend(a: Self, b: Self, s: f32) -> Self {
        a.lerp(b, s)
    }
}

impl Keyframe for Quat {
    fn blend(a: Self, b: Self, s: f32) -> Self {
        a.slerp(b, s).normalize()
    }
}

#[derive(Clone, Debug)]
pub struct Track<T> {
    times: Vec<f32>,
    values: Vec<T>,
    interpolation: Interpolation,
}

impl<T: Keyframe> Track<T> {
    pub fn new(times: Vec<f32>, values: Vec<T>, interpolation: Interpolation) -> Self {
        let n = times.len().min(values.len());
        let mut times = times;
        let mut values = values;
        times.truncate(n);
        values.truncate(n);
        Self {
            times,
            values,
            interpolation,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.times.is_empty()
    }

    pub fn end_time(&self) -> f32 {
        self.times.last().copied().unwrap_or(0.0)
    }

    /// Value at `t`, clamped to the first and last keys.
    pub fn sample(&self, t: f32) -> Option<T> {
        let first = *self.times.first()?;
        if t.is_nan() || t <= first {
            return self.values.first().copied();
        }
        let last = self.times.len() - 1;
        if t >= self.times[last] {
            return self.values.get(last).copied();
        }
        // times[i] <= t < times[i + 1]
        let i = self.times.partition_point(|&k| k <= t).saturating_sub(1);
        let (t0, t1) = (self.times[i], self.times[i + 1]);
        let (a, b) = (self.values[i], self.values[i + 1]);
        match self.interpolation {
            Interpolation::Step => Some(a),
            Interpolation::Linear | Interpolation::CubicSpline => {
                let span = t1 - t0;
                let s = if span > 0.0 { (t - t0) / span } else { 0.0 };
                Some(T::blend(a, b, s))
            }
        }
    }
}

/// Named set of node tracks.
#[derive(Clone, Debug)]
pub struct AnimClip {
    pub name: String,
    pub duration: f32,
    pub translations: FnvHashMap<usize, Track<Vec3>>,
    pub rotations: FnvHashMap<usize, Track<Quat>>,
    pub scales: FnvHashMap<usize, Track<Vec3>>,
}

impl AnimClip {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_owned(),
            duration: 0.0,
            translations: FnvHashMap::default(),
            rotations: FnvHashMap::default(),
            scales: FnvHashMap::default(),
        }
    }

    pub fn recompute_duration(&mut self) {
        let t = self.translations.values().map(Track::end_time);
        let r = self.rotations.values().map(Track::end_time);
        let s = self.scales.values().map(Track::end_time);
        self.duration = t.chain(r).chain(s).fold(0.0, f32::max);
    }

    /// Overwrite the animated channels of `pose` with their values at `t`.
    pub fn apply(&self, t: f32, pose: &mut [(Vec3, Quat, Vec3)]) {
        for (&node, track) in &self.translations {
            if let (Some(slot), Some(v)) = (pose.get_mut(node), track.sample(t)) {
                slot.0 = v;
            }
        }
        for (&node, track) in &self.rotations {
            if let (Some(slot), Some(v)) = (pose.get_mut(node), track.sample(t)) {
                slot.1 = v;
            }
        }
        for (&node, track) in &self.scales {
            if let (Some(slot), Some(v)) = (pose.get_mut(node), track.sample(t)) {
                slot.2 = v;
            }
        }
    }
}

/// Model-space matrices for every node given local transforms.
pub fn global_transforms(model: &ModelData, local: &[(Vec3, Quat, Vec3)]) -> Vec<Mat4> {
    let n = model.nodes.len();
    let mut out: Vec<Option<Mat4>> = vec![None; n];
    for i in 0..n {
        resolve_global(model, local, i, &mut out, 0);
    }
    out.into_iter().map(|m| m.unwrap_or(Mat4::IDENTITY)).collect()
}

fn resolve_global(
    model: &ModelData,
    local: &[(Vec3, Quat, Vec3)],
    i: usize,
    out: &mut [Option<Mat4>],
    depth: usize,
) -> Mat4 {
    if let Some(m) = out[i] {
        return m;
    }
    let (t, r, s) = local[i];
    let own = Mat4::from_scale_rotation_translation(s, r, t);
    // Malformed files could loop; stop climbing past the node count.
    let m = match model.nodes[i].parent {
        Some(p) if p < out.len() && depth < out.len() => {
            resolve_global(model, local, p, out, depth + 1) * own
        }
        _ => own,
    };
    out[i] = Some(m);
    m
}

/// Joint palette for the model's skin: `global[joint] * inverse_bind[j]`.
pub fn skin_palette(model: &ModelData, globals: &[Mat4]) -> Vec<Mat4> {
    let Some(skin) = &model.skin else {
        return Vec::new();
    };
    skin.joints
        .iter()
        .enumerate()
        .map(|(j, &node)| {
            let g = globals.get(node).copied().unwrap_or(Mat4::IDENTITY);
            let ib = skin.inverse_bind.get(j).copied().unwrap_or(Mat4::IDENTITY);
            g * ib
        })
        .collect()
}

#[derive(Clone, Debug, PartialEq)]
struct Action {
    clip: String,
    time: f32,
    duration: f32,
}

/// Plays at most one looping clip at a fixed time scale.
#[derive(Clone, Debug, PartialEq)]
pub struct AnimationMixer {
    time_scale: f32,
    action: Option<Action>,
}

impl AnimationMixer {
    pub fn new(time_scale: f32) -> Self {
        Self {
            time_scale,
            action: None,
        }
    }

    pub fn time_scale(&self) -> f32 {
        self.time_scale
    }

    pub fn playing(&self) -> Option<&str> {
        self.action.as_ref().map(|a| a.clip.as_str())
    }

    pub fn time(&self) -> f32 {
        self.action.as_ref().map_or(0.0, |a| a.time)
    }

    /// Start looping `name`. A model without that clip leaves the mixer idle
    /// and returns false.
    pub fn play(&mut self, model: &ModelData, name: &str) -> bool {
        match model.clip(name) {
            Some(clip) => {
                self.action = Some(Action {
                    clip: clip.name.clone(),
                    time: 0.0,
                    duration: clip.duration,
                });
                true
            }
            None => {
                log::debug!("[anim] clip {name:?} not found, staying in rest pose");
                false
            }
        }
    }

    pub fn advance(&mut self, dt: f32) {
        let scale = self.time_scale;
        if let Some(a) = &mut self.action {
            a.time += dt.max(0.0) * scale;
            if a.duration > 0.0 {
                a.time = a.time.rem_euclid(a.duration);
            }
        }
    }

    /// Local node transforms for the current time.
    pub fn pose(&self, model: &ModelData) -> Vec<(Vec3, Quat, Vec3)> {
        let mut pose = model.rest_pose();
        if let Some(a) = &self.action {
            if let Some(clip) = model.clip(&a.clip) {
                clip.apply(a.time, &mut pose);
            }
        }
        pose
    }

    /// Model-space node matrices and the skin palette for the current time.
    pub fn evaluate(&self, model: &ModelData) -> (Vec<Mat4>, Vec<Mat4>) {
        let globals = global_transforms(model, &self.pose(model));
        let palette = skin_palette(model, &globals);
        (globals, palette)
    }
}
