use glam::Vec2;

/// Pointer state shared between the event closures and the frame loop.
#[derive(Default, Clone, Copy, Debug, PartialEq)]
pub struct PointerState {
    /// Normalized device coordinates, x right and y up, in [-1, 1].
    pub ndc: Vec2,
    pub down: bool,
    /// Last client position while a drag is active.
    pub last_px: Vec2,
    /// Drag motion since the frame loop last consumed it, in CSS pixels.
    pub drag_delta: Vec2,
}

impl PointerState {
    pub fn begin_drag(&mut self, px: Vec2) {
        self.down = true;
        self.last_px = px;
    }

    pub fn drag_to(&mut self, px: Vec2) {
        if self.down {
            self.drag_delta += px - self.last_px;
            self.last_px = px;
        }
    }

    pub fn end_drag(&mut self) {
        self.down = false;
    }

    /// Take the pending drag motion, leaving zero behind.
    pub fn take_drag(&mut self) -> Vec2 {
        std::mem::take(&mut self.drag_delta)
    }
}

/// Map a client position inside a `width`×`height` rectangle to NDC.
/// Degenerate rectangles map to the centre.
#[inline]
pub fn pointer_ndc(x_css: f32, y_css: f32, width: f32, height: f32) -> Vec2 {
    if width <= 0.0 || height <= 0.0 || !x_css.is_finite() || !y_css.is_finite() {
        return Vec2::ZERO;
    }
    let u = (x_css / width).clamp(0.0, 1.0);
    let v = (y_css / height).clamp(0.0, 1.0);
    Vec2::new(u * 2.0 - 1.0, 1.0 - v * 2.0)
}
