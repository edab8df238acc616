pub mod anim;
pub mod aquarium;
pub mod bubbles;
pub mod cause;
pub mod constants;
pub mod detail;
pub mod easing;
pub mod float;
pub mod geometry;
pub mod lighting;
pub mod model;
pub mod orbit;
pub mod rig;
pub mod route;
pub mod shapes;
pub mod state;

pub use anim::{AnimClip, AnimationMixer};
pub use cause::{cause_for, cause_for_path, CauseRecord};
pub use constants::*;
pub use detail::{DetailParams, ViewportClass, ViewportTracker};
pub use geometry::{MeshData, Vertex};
pub use model::{ModelData, ModelError};
pub use route::{ActiveScene, Route, Router, Transition};
pub use shapes::{ShapeKind, ShapeSpec};
pub use state::*;

// Shaders bundled as string constants
pub static SCENE_WGSL: &str = include_str!("../shaders/scene.wgsl");
pub static FLOOR_WGSL: &str = include_str!("../shaders/floor.wgsl");
pub static SKINNED_WGSL: &str = include_str!("../shaders/skinned.wgsl");
pub static BUBBLES_WGSL: &str = include_str!("../shaders/bubbles.wgsl");
pub static SHADOW_WGSL: &str = include_str!("../shaders/shadow.wgsl");
pub static BLUR_WGSL: &str = include_str!("../shaders/blur.wgsl");
pub static ACCUMULATE_WGSL: &str = include_str!("../shaders/accumulate.wgsl");
pub static LABEL_WGSL: &str = include_str!("../shaders/label.wgsl");
pub static POST_WGSL: &str = include_str!("../shaders/post.wgsl");
