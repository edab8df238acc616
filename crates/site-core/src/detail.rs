//! Viewport class and the quality parameters derived from it.
//!
//! Every detail-dependent number lives in one [`DetailParams`] record so that
//! a viewport flip switches all of them together.

use crate::constants::MOBILE_MAX_WIDTH;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub enum ViewportClass {
    Mobile,
    #[default]
    Desktop,
}

impl ViewportClass {
    /// Classify an observed CSS width. Widths below the breakpoint are mobile.
    pub fn from_width(css_width: f64) -> Self {
        if css_width < MOBILE_MAX_WIDTH {
            ViewportClass::Mobile
        } else {
            ViewportClass::Desktop
        }
    }

    pub fn is_mobile(self) -> bool {
        self == ViewportClass::Mobile
    }

    pub fn detail(self) -> DetailParams {
        match self {
            ViewportClass::Desktop => DetailParams::HIGH,
            ViewportClass::Mobile => DetailParams::LOW,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DetailParams {
    pub knot_tubular_segments: u32,
    pub knot_radial_segments: u32,
    pub torus_radial_segments: u32,
    pub torus_tubular_segments: u32,
    /// Ray samples taken by the transmission material.
    pub transmission_samples: u32,
    /// Frames averaged by the aquarium's accumulated shadow.
    pub shadow_frames: u32,
    pub bubble_width_segments: u32,
    pub bubble_height_segments: u32,
    /// Status label size in world units.
    pub label_font_size: f32,
    /// Watermark size in CSS `em`.
    pub watermark_font_em: f32,
}

impl DetailParams {
    pub const HIGH: DetailParams = DetailParams {
        knot_tubular_segments: 256,
        knot_radial_segments: 32,
        torus_radial_segments: 128,
        torus_tubular_segments: 64,
        transmission_samples: 4,
        shadow_frames: 60,
        bubble_width_segments: 64,
        bubble_height_segments: 64,
        label_font_size: 14.0,
        watermark_font_em: 33.5,
    };

    pub const LOW: DetailParams = DetailParams {
        knot_tubular_segments: 128,
        knot_radial_segments: 16,
        torus_radial_segments: 64,
        torus_tubular_segments: 32,
        transmission_samples: 2,
        shadow_frames: 30,
        bubble_width_segments: 32,
        bubble_height_segments: 32,
        label_font_size: 8.0,
        watermark_font_em: 16.0,
    };

    /// CSS value for the watermark's `font-size`.
    pub fn watermark_font_css(&self) -> String {
        format!("{}em", self.watermark_font_em)
    }
}

/// Tracks the viewport class across resize events and reports flips.
#[derive(Clone, Copy, Debug, Default)]
pub struct ViewportTracker {
    class: ViewportClass,
}

impl ViewportTracker {
    pub fn new(css_width: f64) -> Self {
        Self {
            class: ViewportClass::from_width(css_width),
        }
    }

    pub fn class(&self) -> ViewportClass {
        self.class
    }

    /// Returns the new class when the observed width crosses the breakpoint.
    pub fn observe(&mut self, css_width: f64) -> Option<ViewportClass> {
        let next = ViewportClass::from_width(css_width);
        if next == self.class {
            return None;
        }
        self.class = next;
        Some(next)
    }
}
