//! Typography auto-fit.
//!
//! Keeps a text object's box width matched to its rendered content. The
//! natural width of the widest line is measured with real font metrics when
//! the face is available, and with an average-character-width heuristic when
//! it is not. The resulting width is clamped so the box never exceeds the
//! margin-constrained maximum:
//!
//! `width = min(natural + padding, canvas_w - 2 * margin)` where
//! `margin = 0.05 * min(canvas_w, canvas_h)`.
//!
//! Outline fonts load asynchronously in the host environment, so one style
//! change schedules several refit passes: immediately, after a short delay,
//! after a longer delay, and (for family changes) once the face reports
//! ready. The scheduler below is a deterministic queue; the host drains each
//! pass at the corresponding time.

use crate::fonts::FontCatalog;
use crate::model::TextObject;
use rusttype::{point as rt_point, Scale};
use signkit_core::constants::{AUTOFIT_PADDING, AVG_CHAR_WIDTH_RATIO, SAFETY_MARGIN_RATIO};

/// When a queued refit should run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FitPass {
    Immediate,
    ShortDelay,
    LongDelay,
    /// Only after the catalog reports the face available; scheduled for
    /// font-family changes so box and glyphs never visibly disagree.
    FontReady,
}

/// Measures the natural rendered width of the widest line.
///
/// Falls back to `chars × font_size × 0.6` per line when no face is
/// available for the text's family/weight/style.
pub fn measure_natural_width(catalog: &FontCatalog, text: &TextObject) -> f64 {
    let style = &text.style;
    let face = catalog.face(&style.font_family, style.bold, style.italic);

    let mut widest: f64 = 0.0;
    for line in text.content.lines() {
        let width = match &face {
            Some(face) => {
                let scale = Scale::uniform(style.font_size as f32);
                let glyphs: Vec<_> = face
                    .font
                    .layout(line, scale, rt_point(0.0, 0.0))
                    .collect();
                match glyphs.last() {
                    Some(last) => {
                        let end = last.position().x + last.unpositioned().h_metrics().advance_width;
                        end as f64
                    }
                    None => 0.0,
                }
            }
            None => line.chars().count() as f64 * style.font_size * AVG_CHAR_WIDTH_RATIO,
        };
        widest = widest.max(width);
    }
    if face.is_none() {
        tracing::debug!(
            family = %style.font_family,
            "no font metrics available, using average-width estimate"
        );
    }
    widest
}

/// The widest box width allowed on a canvas of the given size.
pub fn max_fit_width(canvas_width: f64, canvas_height: f64) -> f64 {
    let margin = SAFETY_MARGIN_RATIO * canvas_width.min(canvas_height);
    canvas_width - 2.0 * margin
}

/// Recomputes the box width for the text's current content and typography.
/// Returns the new width.
pub fn fit_width(
    catalog: &FontCatalog,
    text: &TextObject,
    canvas_width: f64,
    canvas_height: f64,
) -> f64 {
    let natural = measure_natural_width(catalog, text);
    (natural + AUTOFIT_PADDING).min(max_fit_width(canvas_width, canvas_height))
}

/// Deterministic refit queue.
///
/// Style changes enqueue (object, pass) pairs; the host drains each pass at
/// its scheduled time via [`FitScheduler::take_due`].
#[derive(Debug, Default)]
pub struct FitScheduler {
    pending: Vec<(u64, FitPass)>,
}

impl FitScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Schedules refits for a font-family change: all passes including the
    /// authoritative one after the face is ready.
    pub fn schedule_family_change(&mut self, object_id: u64) {
        for pass in [
            FitPass::Immediate,
            FitPass::ShortDelay,
            FitPass::LongDelay,
            FitPass::FontReady,
        ] {
            self.enqueue(object_id, pass);
        }
    }

    /// Schedules refits for a size/weight/style change.
    pub fn schedule_style_change(&mut self, object_id: u64) {
        for pass in [FitPass::Immediate, FitPass::ShortDelay, FitPass::LongDelay] {
            self.enqueue(object_id, pass);
        }
    }

    fn enqueue(&mut self, object_id: u64, pass: FitPass) {
        if !self.pending.contains(&(object_id, pass)) {
            self.pending.push((object_id, pass));
        }
    }

    /// Removes and returns the object ids queued for the given pass.
    pub fn take_due(&mut self, pass: FitPass) -> Vec<u64> {
        let mut due = Vec::new();
        self.pending.retain(|(id, p)| {
            if *p == pass {
                due.push(*id);
                false
            } else {
                true
            }
        });
        due
    }

    /// Drops everything queued; used when the scene is replaced wholesale.
    pub fn clear(&mut self) {
        self.pending.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::TextStyle;

    fn text(content: &str, font_size: f64) -> TextObject {
        TextObject::new(
            content,
            100.0,
            TextStyle {
                font_size,
                ..TextStyle::default()
            },
        )
    }

    #[test]
    fn test_heuristic_measures_widest_line() {
        let catalog = FontCatalog::empty();
        let t = text("ab\nabcd\nabc", 10.0);
        // Widest line has 4 chars: 4 * 10 * 0.6 = 24.
        assert!((measure_natural_width(&catalog, &t) - 24.0).abs() < 1e-9);
    }

    #[test]
    fn test_fit_width_clamps_to_margin() {
        let catalog = FontCatalog::empty();
        // 100 chars at size 40 => natural 2400, far past the clamp.
        let t = text(&"x".repeat(100), 40.0);
        let fitted = fit_width(&catalog, &t, 800.0, 600.0);
        assert_eq!(fitted, max_fit_width(800.0, 600.0));
        assert_eq!(fitted, 800.0 - 2.0 * 0.05 * 600.0);
    }

    #[test]
    fn test_fit_width_uses_natural_when_small() {
        let catalog = FontCatalog::empty();
        let t = text("hi", 10.0);
        // natural = 2 * 10 * 0.6 = 12, plus padding.
        let fitted = fit_width(&catalog, &t, 800.0, 600.0);
        assert!((fitted - (12.0 + AUTOFIT_PADDING)).abs() < 1e-9);
    }

    #[test]
    fn test_scheduler_passes() {
        let mut scheduler = FitScheduler::new();
        scheduler.schedule_style_change(7);
        scheduler.schedule_family_change(7);

        assert_eq!(scheduler.take_due(FitPass::Immediate), vec![7]);
        assert_eq!(scheduler.take_due(FitPass::FontReady), vec![7]);
        assert_eq!(scheduler.take_due(FitPass::ShortDelay), vec![7]);
        assert_eq!(scheduler.take_due(FitPass::LongDelay), vec![7]);
        assert!(scheduler.is_empty());
    }
}
