//! Viewport fitting for the editing surface.
//!
//! Object coordinates always live in editing design-pixel space; the
//! viewport only decides how large that space appears on screen. On every
//! container resize the fit scale is recomputed as
//! `clamp(0.1, 1.0, min(cw × 0.95 / design_w, ch × 0.95 / design_h))` and the
//! rendering surface is re-zoomed to it.

use signkit_core::constants::{MAX_VIEW_SCALE, MIN_VIEW_SCALE, VIEWPORT_FILL};

/// Computes the fit scale for a design surface inside a container.
pub fn fit_scale(container_w: f64, container_h: f64, design_w: f64, design_h: f64) -> f64 {
    if design_w <= 0.0 || design_h <= 0.0 {
        return MAX_VIEW_SCALE;
    }
    let scale = (container_w * VIEWPORT_FILL / design_w).min(container_h * VIEWPORT_FILL / design_h);
    scale.clamp(MIN_VIEW_SCALE, MAX_VIEW_SCALE)
}

/// Tracks the current container size and derived zoom of the editing
/// surface.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewportFit {
    container_w: f64,
    container_h: f64,
    scale: f64,
}

impl ViewportFit {
    pub fn new() -> Self {
        Self {
            container_w: 0.0,
            container_h: 0.0,
            scale: MAX_VIEW_SCALE,
        }
    }

    /// Recomputes the scale for a resized container. Returns the new scale.
    pub fn resize(&mut self, container_w: f64, container_h: f64, design_w: f64, design_h: f64) -> f64 {
        self.container_w = container_w;
        self.container_h = container_h;
        self.scale = fit_scale(container_w, container_h, design_w, design_h);
        self.scale
    }

    pub fn scale(&self) -> f64 {
        self.scale
    }

    /// Converts a design-pixel coordinate to the on-screen coordinate at the
    /// current zoom.
    pub fn design_to_screen(&self, x: f64, y: f64) -> (f64, f64) {
        (x * self.scale, y * self.scale)
    }

    /// Converts an on-screen coordinate back into design-pixel space.
    pub fn screen_to_design(&self, x: f64, y: f64) -> (f64, f64) {
        (x / self.scale, y / self.scale)
    }
}

impl Default for ViewportFit {
    fn default() -> Self {
        Self::new()
    }
}
