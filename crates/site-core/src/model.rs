//! glTF/GLB import into CPU-side meshes, a node hierarchy, an optional skin
//! and named animation clips.

use crate::anim::{AnimClip, Interpolation, Track};
use crate::geometry::{MeshData, Vertex};
use fnv::FnvHashMap;
use glam::{Mat4, Quat, Vec3};
use gltf::animation::util::ReadOutputs;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ModelError {
    #[error("gltf import failed: {0}")]
    Gltf(#[from] gltf::Error),
    #[error("model has no node named {0:?}")]
    MissingNode(String),
    #[error("node {0:?} has no mesh primitive")]
    MissingPrimitive(String),
    #[error("primitive of mesh {mesh:?} lacks {attribute}")]
    MissingAttribute { mesh: String, attribute: &'static str },
}

#[repr(C)]
#[derive(Copy, Clone, Debug, Default, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct SkinnedVertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
    pub joints: [u32; 4],
    pub weights: [f32; 4],
}

#[derive(Clone, Debug)]
pub struct ModelNode {
    pub name: Option<String>,
    pub parent: Option<usize>,
    pub translation: Vec3,
    pub rotation: Quat,
    pub scale: Vec3,
}

impl ModelNode {
    pub fn local_matrix(&self) -> Mat4 {
        Mat4::from_scale_rotation_translation(self.scale, self.rotation, self.translation)
    }
}

/// One primitive of a mesh, flattened.
#[derive(Clone, Debug)]
pub struct ModelMesh {
    pub name: String,
    /// Node that instantiates the mesh.
    pub node: usize,
    pub vertices: Vec<SkinnedVertex>,
    pub indices: Vec<u32>,
    pub skinned: bool,
    /// Linear RGBA base color factor of the primitive's material.
    pub base_color: [f32; 4],
}

impl ModelMesh {
    /// Drop skinning attributes, keeping positions and normals.
    pub fn to_mesh_data(&self) -> MeshData {
        MeshData {
            vertices: self
                .vertices
                .iter()
                .map(|v| Vertex {
                    position: v.position,
                    normal: v.normal,
                })
                .collect(),
            indices: self.indices.clone(),
        }
    }
}

#[derive(Clone, Debug)]
pub struct Skin {
    /// Node index of each joint.
    pub joints: Vec<usize>,
    pub inverse_bind: Vec<Mat4>,
}

#[derive(Clone, Debug, Default)]
pub struct ModelData {
    pub nodes: Vec<ModelNode>,
    pub meshes: Vec<ModelMesh>,
    pub skin: Option<Skin>,
    pub animations: FnvHashMap<String, AnimClip>,
}

impl ModelData {
    /// Parse a `.glb` (or self-contained `.gltf`) byte slice.
    pub fn from_slice(bytes: &[u8]) -> Result<Self, ModelError> {
        let (doc, buffers, _images) = gltf::import_slice(bytes)?;
        let get = |b: gltf::Buffer<'_>| buffers.get(b.index()).map(|d| d.0.as_slice());

        let mut nodes: Vec<ModelNode> = doc
            .nodes()
            .map(|n| {
                let (t, r, s) = n.transform().decomposed();
                ModelNode {
                    name: n.name().map(str::to_owned),
                    parent: None,
                    translation: Vec3::from(t),
                    rotation: Quat::from_array(r),
                    scale: Vec3::from(s),
                }
            })
            .collect();
        for n in doc.nodes() {
            for child in n.children() {
                nodes[child.index()].parent = Some(n.index());
            }
        }

        let mut meshes = Vec::new();
        for node in doc.nodes() {
            let Some(mesh) = node.mesh() else { continue };
            let mesh_name = mesh
                .name()
                .or(node.name())
                .unwrap_or("mesh")
                .to_owned();
            for prim in mesh.primitives() {
                let reader = prim.reader(get);
                let positions: Vec<[f32; 3]> = reader
                    .read_positions()
                    .ok_or_else(|| ModelError::MissingAttribute {
                        mesh: mesh_name.clone(),
                        attribute: "POSITION",
                    })?
                    .collect();
                let indices: Vec<u32> = match reader.read_indices() {
                    Some(ix) => ix.into_u32().collect(),
                    None => (0..positions.len() as u32).collect(),
                };
                let normals: Vec<[f32; 3]> = match reader.read_normals() {
                    Some(n) => n.collect(),
                    None => vertex_normals(&positions, &indices),
                };
                let joints: Option<Vec<[u16; 4]>> =
                    reader.read_joints(0).map(|j| j.into_u16().collect());
                let weights: Option<Vec<[f32; 4]>> =
                    reader.read_weights(0).map(|w| w.into_f32().collect());
                let skinned = node.skin().is_some() && joints.is_some() && weights.is_some();
                let vertices = positions
                    .iter()
                    .enumerate()
                    .map(|(i, p)| {
                        let (joints, weights) = if skinned {
                            let j = joints.as_ref().and_then(|v| v.get(i)).copied().unwrap_or([0; 4]);
                            let w = weights
                                .as_ref()
                                .and_then(|v| v.get(i))
                                .copied()
                                .unwrap_or([0.0; 4]);
                            (j.map(u32::from), w)
                        } else {
                            ([0; 4], [0.0; 4])
                        };
                        SkinnedVertex {
                            position: *p,
                            normal: normals.get(i).copied().unwrap_or([0.0, 1.0, 0.0]),
                            joints,
                            weights,
                        }
                    })
                    .collect();
                let base_color = prim
                    .material()
                    .pbr_metallic_roughness()
                    .base_color_factor();
                meshes.push(ModelMesh {
                    name: mesh_name.clone(),
                    node: node.index(),
                    vertices,
                    indices,
                    skinned,
                    base_color,
                });
            }
        }

        let skin = doc.skins().next().map(|s| {
            let joints: Vec<usize> = s.joints().map(|j| j.index()).collect();
            let reader = s.reader(get);
            let inverse_bind = match reader.read_inverse_bind_matrices() {
                Some(m) => m.map(|c| Mat4::from_cols_array_2d(&c)).collect(),
                None => vec![Mat4::IDENTITY; joints.len()],
            };
            Skin {
                joints,
                inverse_bind,
            }
        });

        let mut animations = FnvHashMap::default();
        for (ai, anim) in doc.animations().enumerate() {
            let name = anim
                .name()
                .map(str::to_owned)
                .unwrap_or_else(|| format!("animation_{ai}"));
            let mut clip = AnimClip::new(&name);
            for channel in anim.channels() {
                let node = channel.target().node().index();
                let interpolation = match channel.sampler().interpolation() {
                    gltf::animation::Interpolation::Step => Interpolation::Step,
                    gltf::animation::Interpolation::Linear => Interpolation::Linear,
                    gltf::animation::Interpolation::CubicSpline => Interpolation::CubicSpline,
                };
                let reader = channel.reader(get);
                let Some(inputs) = reader.read_inputs() else { continue };
                let times: Vec<f32> = inputs.collect();
                match reader.read_outputs() {
                    Some(ReadOutputs::Translations(v)) => {
                        let values = keyframe_values(v.map(Vec3::from).collect(), interpolation);
                        clip.translations
                            .insert(node, Track::new(times, values, interpolation));
                    }
                    Some(ReadOutputs::Rotations(v)) => {
                        let values =
                            keyframe_values(v.into_f32().map(Quat::from_array).collect(), interpolation);
                        clip.rotations
                            .insert(node, Track::new(times, values, interpolation));
                    }
                    Some(ReadOutputs::Scales(v)) => {
                        let values = keyframe_values(v.map(Vec3::from).collect(), interpolation);
                        clip.scales.insert(node, Track::new(times, values, interpolation));
                    }
                    // Morph targets are not animated here.
                    Some(ReadOutputs::MorphTargetWeights(_)) | None => {}
                }
            }
            clip.recompute_duration();
            animations.insert(name, clip);
        }

        log::info!(
            "[assets] model nodes={} meshes={} skinned={} clips={}",
            nodes.len(),
            meshes.len(),
            skin.is_some(),
            animations.len()
        );

        Ok(Self {
            nodes,
            meshes,
            skin,
            animations,
        })
    }

    pub fn node_index(&self, name: &str) -> Option<usize> {
        self.nodes
            .iter()
            .position(|n| n.name.as_deref() == Some(name))
    }

    /// First primitive instantiated by the node called `name`.
    pub fn mesh_for_node(&self, name: &str) -> Result<&ModelMesh, ModelError> {
        let node = self
            .node_index(name)
            .ok_or_else(|| ModelError::MissingNode(name.to_owned()))?;
        self.meshes
            .iter()
            .find(|m| m.node == node)
            .ok_or_else(|| ModelError::MissingPrimitive(name.to_owned()))
    }

    pub fn clip(&self, name: &str) -> Option<&AnimClip> {
        self.animations.get(name)
    }

    /// Rest-pose local transforms, one per node.
    pub fn rest_pose(&self) -> Vec<(Vec3, Quat, Vec3)> {
        self.nodes
            .iter()
            .map(|n| (n.translation, n.rotation, n.scale))
            .collect()
    }
}

// Cubic-spline outputs store (in-tangent, value, out-tangent) per key; keep
// the values only.
fn keyframe_values<T: Copy>(raw: Vec<T>, interpolation: Interpolation) -> Vec<T> {
    match interpolation {
        Interpolation::CubicSpline => raw.chunks_exact(3).map(|c| c[1]).collect(),
        _ => raw,
    }
}

/// Area-weighted vertex normals for primitives that ship without them.
fn vertex_normals(positions: &[[f32; 3]], indices: &[u32]) -> Vec<[f32; 3]> {
    let mut acc = vec![Vec3::ZERO; positions.len()];
    for tri in indices.chunks_exact(3) {
        let [a, b, c] = [tri[0] as usize, tri[1] as usize, tri[2] as usize];
        if a >= positions.len() || b >= positions.len() || c >= positions.len() {
            continue;
        }
        let (pa, pb, pc) = (
            Vec3::from(positions[a]),
            Vec3::from(positions[b]),
            Vec3::from(positions[c]),
        );
        let n = (pb - pa).cross(pc - pa);
        acc[a] += n;
        acc[b] += n;
        acc[c] += n;
    }
    acc.into_iter()
        .map(|n| n.try_normalize().unwrap_or(Vec3::Y).to_array())
        .collect()
}
