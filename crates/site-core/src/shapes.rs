//! Shape library: the three floating solids and their refractive material.

use crate::detail::DetailParams;
use crate::geometry::{self, MeshData};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ShapeKind {
    Knot,
    Torus,
    Dodecahedron,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum GeometryParams {
    TorusKnot {
        radius: f32,
        tube: f32,
        tubular_segments: u32,
        radial_segments: u32,
        p: u32,
        q: u32,
    },
    Torus {
        radius: f32,
        tube: f32,
        radial_segments: u32,
        tubular_segments: u32,
    },
    Dodecahedron {
        radius: f32,
        detail: u32,
    },
}

impl GeometryParams {
    /// Segment product used to compare detail tiers. Fixed-topology solids
    /// report their face count.
    pub fn segment_cost(&self) -> u32 {
        match *self {
            GeometryParams::TorusKnot {
                tubular_segments,
                radial_segments,
                ..
            } => tubular_segments * radial_segments,
            GeometryParams::Torus {
                radial_segments,
                tubular_segments,
                ..
            } => radial_segments * tubular_segments,
            GeometryParams::Dodecahedron { detail, .. } => 12 * (detail + 1) * (detail + 1),
        }
    }

    pub fn build(&self) -> MeshData {
        match *self {
            GeometryParams::TorusKnot {
                radius,
                tube,
                tubular_segments,
                radial_segments,
                p,
                q,
            } => geometry::torus_knot(radius, tube, tubular_segments, radial_segments, p, q),
            GeometryParams::Torus {
                radius,
                tube,
                radial_segments,
                tubular_segments,
            } => geometry::torus(radius, tube, radial_segments, tubular_segments),
            GeometryParams::Dodecahedron { radius, .. } => geometry::dodecahedron(radius),
        }
    }
}

/// Parameters of the translucent refractive material.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TransmissionParams {
    pub samples: u32,
    pub thickness: f32,
    pub backside: bool,
    pub backside_thickness: f32,
    pub ior: f32,
    pub roughness: f32,
    pub chromatic_aberration: f32,
    pub anisotropy: f32,
    pub distortion: f32,
    pub distortion_scale: f32,
    pub temporal_distortion: f32,
    pub iridescence: f32,
    pub iridescence_ior: f32,
    /// Thin-film thickness range in nanometres.
    pub iridescence_thickness_range: [f32; 2],
}

impl Default for TransmissionParams {
    fn default() -> Self {
        Self {
            samples: 6,
            thickness: 0.0,
            backside: false,
            backside_thickness: 0.0,
            ior: 1.5,
            roughness: 0.0,
            chromatic_aberration: 0.03,
            anisotropy: 0.1,
            distortion: 0.0,
            distortion_scale: 0.5,
            temporal_distortion: 0.0,
            iridescence: 0.0,
            iridescence_ior: 1.3,
            iridescence_thickness_range: [100.0, 400.0],
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ShapeSpec {
    pub kind: ShapeKind,
    pub geometry: GeometryParams,
    pub material: TransmissionParams,
}

impl ShapeSpec {
    /// Combined cost of a shape at its tier: geometry segments times material
    /// ray samples.
    pub fn cost(&self) -> u64 {
        self.geometry.segment_cost() as u64 * self.material.samples as u64
    }
}

pub fn shape_material(detail: &DetailParams) -> TransmissionParams {
    TransmissionParams {
        samples: detail.transmission_samples,
        thickness: 2.0,
        backside: true,
        backside_thickness: 5.0,
        ..TransmissionParams::default()
    }
}

pub fn shape_spec(kind: ShapeKind, detail: &DetailParams) -> ShapeSpec {
    let geometry = match kind {
        ShapeKind::Knot => GeometryParams::TorusKnot {
            radius: 3.0,
            tube: 1.0,
            tubular_segments: detail.knot_tubular_segments,
            radial_segments: detail.knot_radial_segments,
            p: 2,
            q: 3,
        },
        ShapeKind::Torus => GeometryParams::Torus {
            radius: 4.0,
            tube: 1.2,
            radial_segments: detail.torus_radial_segments,
            tubular_segments: detail.torus_tubular_segments,
        },
        ShapeKind::Dodecahedron => GeometryParams::Dodecahedron {
            radius: 4.0,
            detail: 0,
        },
    };
    ShapeSpec {
        kind,
        geometry,
        material: shape_material(detail),
    }
}
