//! Procedural meshes for the floating solids, bubbles and helper planes.
//!
//! All generators emit counter-clockwise front faces and unit normals.

use glam::Vec3;
use std::f32::consts::{PI, TAU};

#[repr(C)]
#[derive(Copy, Clone, Debug, Default, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct Vertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
}

impl Vertex {
    pub fn new(position: Vec3, normal: Vec3) -> Self {
        Self {
            position: position.to_array(),
            normal: normal.to_array(),
        }
    }
}

#[derive(Clone, Debug, Default)]
pub struct MeshData {
    pub vertices: Vec<Vertex>,
    pub indices: Vec<u32>,
}

impl MeshData {
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Axis-aligned bounds as (min, max).
    pub fn bounds(&self) -> (Vec3, Vec3) {
        let mut min_b = Vec3::splat(f32::INFINITY);
        let mut max_b = Vec3::splat(f32::NEG_INFINITY);
        for v in &self.vertices {
            let p = Vec3::from(v.position);
            min_b = min_b.min(p);
            max_b = max_b.max(p);
        }
        (min_b, max_b)
    }
}

// Two quads per grid cell, shared by the swept-tube generators.
fn grid_indices(rows: u32, cols: u32, out: &mut Vec<u32>) {
    let stride = cols + 1;
    for j in 1..=rows {
        for i in 1..=cols {
            let a = stride * j + i - 1;
            let b = stride * (j - 1) + i - 1;
            let c = stride * (j - 1) + i;
            let d = stride * j + i;
            out.extend_from_slice(&[a, b, d, b, c, d]);
        }
    }
}

fn knot_curve(u: f32, p: f32, q: f32, radius: f32) -> Vec3 {
    let cu = u.cos();
    let su = u.sin();
    let qu_over_p = q / p * u;
    let cs = qu_over_p.cos();
    Vec3::new(
        radius * (2.0 + cs) * 0.5 * cu,
        radius * (2.0 + cs) * su * 0.5,
        radius * qu_over_p.sin() * 0.5,
    )
}

/// (p, q) torus knot swept with a circular tube.
pub fn torus_knot(
    radius: f32,
    tube: f32,
    tubular_segments: u32,
    radial_segments: u32,
    p: u32,
    q: u32,
) -> MeshData {
    let tubular = tubular_segments.max(3);
    let radial = radial_segments.max(3);
    let (pf, qf) = (p.max(1) as f32, q as f32);
    let mut vertices = Vec::with_capacity(((tubular + 1) * (radial + 1)) as usize);
    for i in 0..=tubular {
        let u = i as f32 / tubular as f32 * pf * TAU;
        let p1 = knot_curve(u, pf, qf, radius);
        let p2 = knot_curve(u + 0.01, pf, qf, radius);
        // Frenet-like frame from two nearby curve samples.
        let t = p2 - p1;
        let n0 = p2 + p1;
        let b = t.cross(n0);
        let n = b.cross(t).normalize();
        let b = b.normalize();
        for j in 0..=radial {
            let v = j as f32 / radial as f32 * TAU;
            let cx = -tube * v.cos();
            let cy = tube * v.sin();
            let pos = p1 + n * cx + b * cy;
            vertices.push(Vertex::new(pos, (pos - p1).normalize()));
        }
    }
    // Rows run along the curve, so the quad corners are taken in the
    // opposite order to the torus grid.
    let mut indices = Vec::with_capacity((tubular * radial * 6) as usize);
    let stride = radial + 1;
    for j in 1..=tubular {
        for i in 1..=radial {
            let a = stride * (j - 1) + (i - 1);
            let b = stride * j + (i - 1);
            let c = stride * j + i;
            let d = stride * (j - 1) + i;
            indices.extend_from_slice(&[a, b, d, b, c, d]);
        }
    }
    MeshData { vertices, indices }
}

/// Ring torus lying in the XY plane.
pub fn torus(radius: f32, tube: f32, radial_segments: u32, tubular_segments: u32) -> MeshData {
    let radial = radial_segments.max(3);
    let tubular = tubular_segments.max(3);
    let mut vertices = Vec::with_capacity(((radial + 1) * (tubular + 1)) as usize);
    for j in 0..=radial {
        let v = j as f32 / radial as f32 * TAU;
        for i in 0..=tubular {
            let u = i as f32 / tubular as f32 * TAU;
            let ring = radius + tube * v.cos();
            let pos = Vec3::new(ring * u.cos(), ring * u.sin(), tube * v.sin());
            let center = Vec3::new(radius * u.cos(), radius * u.sin(), 0.0);
            vertices.push(Vertex::new(pos, (pos - center).normalize()));
        }
    }
    let mut indices = Vec::with_capacity((radial * tubular * 6) as usize);
    grid_indices(radial, tubular, &mut indices);
    MeshData { vertices, indices }
}

#[rustfmt::skip]
const DODECAHEDRON_FACES: [[u32; 3]; 36] = [
    [3, 11, 7], [3, 7, 15], [3, 15, 13],
    [7, 19, 17], [7, 17, 6], [7, 6, 15],
    [17, 4, 8], [17, 8, 10], [17, 10, 6],
    [8, 0, 16], [8, 16, 2], [8, 2, 10],
    [0, 12, 1], [0, 1, 18], [0, 18, 16],
    [6, 10, 2], [6, 2, 13], [6, 13, 15],
    [2, 16, 18], [2, 18, 3], [2, 3, 13],
    [18, 1, 9], [18, 9, 11], [18, 11, 3],
    [4, 14, 12], [4, 12, 0], [4, 0, 8],
    [11, 9, 5], [11, 5, 19], [11, 19, 7],
    [19, 5, 14], [19, 14, 4], [19, 4, 17],
    [1, 12, 14], [1, 14, 5], [1, 5, 9],
];

fn dodecahedron_corners() -> [Vec3; 20] {
    let t = (1.0 + 5.0_f32.sqrt()) / 2.0;
    let r = 1.0 / t;
    [
        Vec3::new(-1.0, -1.0, -1.0),
        Vec3::new(-1.0, -1.0, 1.0),
        Vec3::new(-1.0, 1.0, -1.0),
        Vec3::new(-1.0, 1.0, 1.0),
        Vec3::new(1.0, -1.0, -1.0),
        Vec3::new(1.0, -1.0, 1.0),
        Vec3::new(1.0, 1.0, -1.0),
        Vec3::new(1.0, 1.0, 1.0),
        Vec3::new(0.0, -r, -t),
        Vec3::new(0.0, -r, t),
        Vec3::new(0.0, r, -t),
        Vec3::new(0.0, r, t),
        Vec3::new(-r, -t, 0.0),
        Vec3::new(-r, t, 0.0),
        Vec3::new(r, -t, 0.0),
        Vec3::new(r, t, 0.0),
        Vec3::new(-t, 0.0, -r),
        Vec3::new(t, 0.0, -r),
        Vec3::new(-t, 0.0, r),
        Vec3::new(t, 0.0, r),
    ]
}

/// Flat-shaded regular dodecahedron inscribed in a sphere of `radius`.
pub fn dodecahedron(radius: f32) -> MeshData {
    let corners = dodecahedron_corners().map(|c| c.normalize() * radius);
    let mut vertices = Vec::with_capacity(DODECAHEDRON_FACES.len() * 3);
    let mut indices = Vec::with_capacity(DODECAHEDRON_FACES.len() * 3);
    for [ia, ib, ic] in DODECAHEDRON_FACES {
        let (a, mut b, mut c) = (
            corners[ia as usize],
            corners[ib as usize],
            corners[ic as usize],
        );
        let mut n = (b - a).cross(c - a).normalize();
        if n.dot(a + b + c) < 0.0 {
            std::mem::swap(&mut b, &mut c);
            n = -n;
        }
        let base = vertices.len() as u32;
        vertices.extend([Vertex::new(a, n), Vertex::new(b, n), Vertex::new(c, n)]);
        indices.extend_from_slice(&[base, base + 1, base + 2]);
    }
    MeshData { vertices, indices }
}

/// UV sphere. Pole rows emit a single triangle per cell.
pub fn sphere(radius: f32, width_segments: u32, height_segments: u32) -> MeshData {
    let w = width_segments.max(3);
    let h = height_segments.max(2);
    let mut vertices = Vec::with_capacity(((w + 1) * (h + 1)) as usize);
    for iy in 0..=h {
        let v = iy as f32 / h as f32;
        for ix in 0..=w {
            let u = ix as f32 / w as f32;
            let dir = Vec3::new(
                -(u * TAU).cos() * (v * PI).sin(),
                (v * PI).cos(),
                (u * TAU).sin() * (v * PI).sin(),
            );
            vertices.push(Vertex::new(dir * radius, dir.normalize_or_zero()));
        }
    }
    let stride = w + 1;
    let mut indices = Vec::with_capacity((w * h * 6) as usize);
    for iy in 0..h {
        for ix in 0..w {
            let a = iy * stride + ix + 1;
            let b = iy * stride + ix;
            let c = (iy + 1) * stride + ix;
            let d = (iy + 1) * stride + ix + 1;
            if iy != 0 {
                indices.extend_from_slice(&[a, b, d]);
            }
            if iy != h - 1 {
                indices.extend_from_slice(&[b, c, d]);
            }
        }
    }
    MeshData { vertices, indices }
}

/// Square floor plane in XZ centred on the origin, facing +Y.
pub fn floor_plane(size: f32) -> MeshData {
    let s = size * 0.5;
    let n = Vec3::Y;
    MeshData {
        vertices: vec![
            Vertex::new(Vec3::new(-s, 0.0, -s), n),
            Vertex::new(Vec3::new(-s, 0.0, s), n),
            Vertex::new(Vec3::new(s, 0.0, s), n),
            Vertex::new(Vec3::new(s, 0.0, -s), n),
        ],
        indices: vec![0, 1, 2, 0, 2, 3],
    }
}
