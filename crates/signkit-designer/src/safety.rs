//! Safety-zone validation.
//!
//! The safety zone is an inset rectangle inside the canvas bounds within
//! which content is guaranteed not to be trimmed during physical production.
//! Validation is advisory: the flag drives a UI warning and never blocks a
//! command, export, or checkout.

use crate::scene::Scene;
use signkit_core::constants::SAFETY_MARGIN_RATIO;

/// The inset production-safe region of a canvas.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SafetyZone {
    pub margin: f64,
}

impl SafetyZone {
    /// Zone for a canvas of the given editing-pixel size.
    pub fn for_canvas(width: f64, height: f64) -> Self {
        Self {
            margin: SAFETY_MARGIN_RATIO * width.min(height),
        }
    }

    /// The inset rectangle as (x1, y1, x2, y2).
    pub fn inset_rect(&self, width: f64, height: f64) -> (f64, f64, f64, f64) {
        (
            self.margin,
            self.margin,
            width - self.margin,
            height - self.margin,
        )
    }

    /// Whether any non-background, non-guide object extends outside the
    /// inset rectangle. `true` means a violation.
    pub fn validate(&self, scene: &Scene) -> bool {
        let (zx1, zy1, zx2, zy2) = self.inset_rect(scene.width, scene.height);
        scene
            .objects()
            .iter()
            .filter(|o| !o.is_background && !o.is_guide)
            .any(|o| {
                let (x1, y1, x2, y2) = o.bounding_box();
                x1 < zx1 || y1 < zy1 || x2 > zx2 || y2 > zy2
            })
    }
}
