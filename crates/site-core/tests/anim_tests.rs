// Keyframe sampling, the clip mixer and GLB import.
//
// The GLB fixture is assembled in memory: one triangle on a node named
// "Cube" with a child "Flipper" whose translation is animated by "Wave".

use glam::{Quat, Vec3};
use site_core::anim::{Interpolation, Track};
use site_core::aquarium::SWIM_CLIP;
use site_core::{AnimationMixer, ModelData, ModelError};

const FIXTURE_JSON: &str = r#"{
  "asset": { "version": "2.0" },
  "scene": 0,
  "scenes": [{ "nodes": [0] }],
  "nodes": [
    { "name": "Cube", "mesh": 0, "children": [1] },
    { "name": "Flipper", "translation": [1.0, 0.0, 0.0] }
  ],
  "meshes": [{ "name": "Cube", "primitives": [{ "attributes": { "POSITION": 0 }, "indices": 1 }] }],
  "buffers": [{ "byteLength": 76 }],
  "bufferViews": [
    { "buffer": 0, "byteOffset": 0, "byteLength": 36 },
    { "buffer": 0, "byteOffset": 36, "byteLength": 6 },
    { "buffer": 0, "byteOffset": 44, "byteLength": 8 },
    { "buffer": 0, "byteOffset": 52, "byteLength": 24 }
  ],
  "accessors": [
    { "bufferView": 0, "componentType": 5126, "count": 3, "type": "VEC3",
      "min": [0.0, 0.0, 0.0], "max": [1.0, 1.0, 0.0] },
    { "bufferView": 1, "componentType": 5123, "count": 3, "type": "SCALAR" },
    { "bufferView": 2, "componentType": 5126, "count": 2, "type": "SCALAR",
      "min": [0.0], "max": [1.0] },
    { "bufferView": 3, "componentType": 5126, "count": 2, "type": "VEC3" }
  ],
  "animations": [{
    "name": "Wave",
    "channels": [{ "sampler": 0, "target": { "node": 1, "path": "translation" } }],
    "samplers": [{ "input": 2, "output": 3, "interpolation": "LINEAR" }]
  }]
}"#;

fn push_f32s(out: &mut Vec<u8>, values: &[f32]) {
    for v in values {
        out.extend_from_slice(&v.to_le_bytes());
    }
}

fn fixture_bin() -> Vec<u8> {
    let mut bin = Vec::with_capacity(76);
    push_f32s(&mut bin, &[0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0, 0.0]);
    for i in [0u16, 1, 2] {
        bin.extend_from_slice(&i.to_le_bytes());
    }
    bin.extend_from_slice(&[0, 0]);
    push_f32s(&mut bin, &[0.0, 1.0]);
    push_f32s(&mut bin, &[0.0, 0.0, 0.0, 0.0, 2.0, 0.0]);
    bin
}

fn glb(json: &str, bin: &[u8]) -> Vec<u8> {
    let mut json = json.as_bytes().to_vec();
    while json.len() % 4 != 0 {
        json.push(b' ');
    }
    let total = 12 + 8 + json.len() + 8 + bin.len();
    let mut out = Vec::with_capacity(total);
    out.extend_from_slice(b"glTF");
    out.extend_from_slice(&2u32.to_le_bytes());
    out.extend_from_slice(&(total as u32).to_le_bytes());
    out.extend_from_slice(&(json.len() as u32).to_le_bytes());
    out.extend_from_slice(b"JSON");
    out.extend_from_slice(&json);
    out.extend_from_slice(&(bin.len() as u32).to_le_bytes());
    out.extend_from_slice(b"BIN\0");
    out.extend_from_slice(bin);
    out
}

fn fixture() -> ModelData {
    match ModelData::from_slice(&glb(FIXTURE_JSON, &fixture_bin())) {
        Ok(m) => m,
        Err(e) => panic!("fixture failed to load: {e}"),
    }
}

#[test]
fn linear_track_interpolates_and_clamps() {
    let track = Track::new(
        vec![0.0, 1.0, 2.0],
        vec![Vec3::ZERO, Vec3::X, Vec3::Y],
        Interpolation::Linear,
    );
    assert_eq!(track.end_time(), 2.0);
    assert_eq!(track.sample(-1.0), Some(Vec3::ZERO));
    assert_eq!(track.sample(5.0), Some(Vec3::Y));
    let mid = track.sample(0.5).unwrap_or_default();
    assert!((mid - Vec3::new(0.5, 0.0, 0.0)).length() < 1e-6);
    let later = track.sample(1.5).unwrap_or_default();
    assert!((later - Vec3::new(0.5, 0.5, 0.0)).length() < 1e-6);
}

#[test]
fn step_track_holds_previous_key() {
    let track = Track::new(vec![0.0, 1.0], vec![Vec3::ZERO, Vec3::ONE], Interpolation::Step);
    assert_eq!(track.sample(0.99), Some(Vec3::ZERO));
    assert_eq!(track.sample(1.0), Some(Vec3::ONE));
}

#[test]
fn rotation_track_stays_normalized() {
    let track = Track::new(
        vec![0.0, 1.0],
        vec![Quat::IDENTITY, Quat::from_rotation_y(std::f32::consts::PI)],
        Interpolation::Linear,
    );
    let q = track.sample(0.5).unwrap_or(Quat::IDENTITY);
    assert!((q.length() - 1.0).abs() < 1e-5);
    assert!((q.to_axis_angle().1 - std::f32::consts::FRAC_PI_2).abs() < 1e-4);
}

#[test]
fn mismatched_and_empty_tracks_are_safe() {
    let uneven = Track::new(vec![0.0, 1.0, 2.0], vec![Vec3::X], Interpolation::Linear);
    assert_eq!(uneven.sample(1.5), Some(Vec3::X));
    let empty: Track<Vec3> = Track::new(Vec::new(), Vec::new(), Interpolation::Linear);
    assert!(empty.is_empty());
    assert_eq!(empty.sample(0.0), None);
}

#[test]
fn nan_time_falls_back_to_first_key() {
    let single = Track::new(vec![0.0], vec![Vec3::X], Interpolation::Linear);
    assert_eq!(single.sample(f32::NAN), Some(Vec3::X));
    let pair = Track::new(vec![0.0, 1.0], vec![Vec3::X, Vec3::Y], Interpolation::Linear);
    assert_eq!(pair.sample(f32::NAN), Some(Vec3::X));
}

#[test]
fn glb_fixture_imports_nodes_mesh_and_clip() {
    let model = fixture();
    assert_eq!(model.nodes.len(), 2);
    assert_eq!(model.nodes[1].parent, Some(0));
    assert_eq!(model.node_index("Flipper"), Some(1));
    assert!(model.skin.is_none());

    let mesh = model.mesh_for_node("Cube").unwrap_or_else(|e| panic!("{e}"));
    assert_eq!(mesh.vertices.len(), 3);
    assert_eq!(mesh.indices, vec![0, 1, 2]);
    assert!(!mesh.skinned);
    // Normals are derived when the file has none.
    assert_eq!(mesh.vertices[0].normal, [0.0, 0.0, 1.0]);
    assert_eq!(mesh.base_color, [1.0, 1.0, 1.0, 1.0]);
    assert_eq!(mesh.to_mesh_data().triangle_count(), 1);

    let clip = model.clip("Wave").map(|c| c.duration);
    assert_eq!(clip, Some(1.0));
}

#[test]
fn missing_node_and_garbage_input_are_errors() {
    let model = fixture();
    assert!(matches!(
        model.mesh_for_node("Turtle"),
        Err(ModelError::MissingNode(name)) if name == "Turtle"
    ));
    assert!(matches!(
        model.mesh_for_node("Flipper"),
        Err(ModelError::MissingPrimitive(_))
    ));
    assert!(matches!(
        ModelData::from_slice(b"definitely not a model"),
        Err(ModelError::Gltf(_))
    ));
}

#[test]
fn missing_clip_leaves_mixer_in_rest_pose() {
    let model = fixture();
    let mut mixer = AnimationMixer::new(0.5);
    assert!(!mixer.play(&model, SWIM_CLIP));
    assert_eq!(mixer.playing(), None);
    mixer.advance(10.0);
    assert_eq!(mixer.time(), 0.0);
    let (globals, palette) = mixer.evaluate(&model);
    assert!(palette.is_empty());
    assert_eq!(globals[1].w_axis.truncate(), Vec3::new(1.0, 0.0, 0.0));
}

#[test]
fn mixer_loops_clip_at_its_time_scale() {
    let model = fixture();
    let mut mixer = AnimationMixer::new(0.5);
    assert!(mixer.play(&model, "Wave"));
    assert_eq!(mixer.playing(), Some("Wave"));

    mixer.advance(1.0);
    assert!((mixer.time() - 0.5).abs() < 1e-6);
    let (globals, _) = mixer.evaluate(&model);
    let y = globals[1].w_axis.y;
    assert!((y - 1.0).abs() < 1e-5, "y = {y}");
    // The animated channel replaces the rest translation.
    assert!(globals[1].w_axis.x.abs() < 1e-6);

    mixer.advance(1.5);
    assert!((mixer.time() - 0.25).abs() < 1e-5);
    mixer.advance(-3.0);
    assert!((mixer.time() - 0.25).abs() < 1e-5);
}
