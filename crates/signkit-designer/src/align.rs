//! Alignment, snapping, and distribution.
//!
//! Drag-time snapping matches a moving object's edges and center against
//! candidate guide positions (canvas edges/center plus every other
//! top-level object's edges/centers) within a pixel tolerance, returning the
//! transient guide lines to render. Discrete align commands reposition a
//! selection relative to the canvas (single object) or the selection's own
//! bounding box (multiple objects); distribute equalizes interior gaps.

use crate::scene::Scene;
use signkit_core::constants::SNAP_TOLERANCE;

/// Discrete alignment commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlignCommand {
    Left,
    CenterHorizontal,
    Right,
    Top,
    Middle,
    Bottom,
}

/// Distribution axes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    Horizontal,
    Vertical,
}

/// Orientation of a rendered guide line.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GuideOrientation {
    Vertical,
    Horizontal,
}

/// A transient guide line shown while a snap is active.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Guide {
    pub orientation: GuideOrientation,
    /// Canvas coordinate of the line (x for vertical, y for horizontal).
    pub position: f64,
}

/// Result of a snap query: the adjusted position plus the guides to render.
/// Guides are cleared by the host on pointer release.
#[derive(Debug, Clone, PartialEq)]
pub struct SnapResult {
    pub left: f64,
    pub top: f64,
    pub guides: Vec<Guide>,
}

/// Candidate guide positions on each axis.
fn snap_candidates(scene: &Scene, moving_id: u64) -> (Vec<f64>, Vec<f64>) {
    let mut xs = vec![0.0, scene.width / 2.0, scene.width];
    let mut ys = vec![0.0, scene.height / 2.0, scene.height];
    for obj in scene.objects() {
        if obj.id == moving_id || obj.is_guide || obj.is_background {
            continue;
        }
        let (x1, y1, x2, y2) = obj.bounding_box();
        xs.extend([x1, (x1 + x2) / 2.0, x2]);
        ys.extend([y1, (y1 + y2) / 2.0, y2]);
    }
    (xs, ys)
}

/// Snaps a proposed placement of the moving object during an interactive
/// drag or scale. `left`/`top`/`width`/`height` describe the proposed
/// bounding box in design pixels.
pub fn snap(
    scene: &Scene,
    moving_id: u64,
    left: f64,
    top: f64,
    width: f64,
    height: f64,
) -> SnapResult {
    let (xs, ys) = snap_candidates(scene, moving_id);

    let mut result = SnapResult {
        left,
        top,
        guides: Vec::new(),
    };

    // Test left edge, horizontal center, and right edge against x
    // candidates; the first edge within tolerance wins.
    let x_probes = [left, left + width / 2.0, left + width];
    let mut best_x: Option<(f64, f64, f64)> = None; // (distance, candidate, offset)
    for (i, probe) in x_probes.iter().enumerate() {
        for candidate in &xs {
            let dist = (candidate - probe).abs();
            if dist <= SNAP_TOLERANCE && best_x.is_none_or(|(d, _, _)| dist < d) {
                let offset = match i {
                    0 => 0.0,
                    1 => width / 2.0,
                    _ => width,
                };
                best_x = Some((dist, *candidate, offset));
            }
        }
    }
    if let Some((_, candidate, offset)) = best_x {
        result.left = candidate - offset;
        result.guides.push(Guide {
            orientation: GuideOrientation::Vertical,
            position: candidate,
        });
    }

    let y_probes = [top, top + height / 2.0, top + height];
    let mut best_y: Option<(f64, f64, f64)> = None;
    for (i, probe) in y_probes.iter().enumerate() {
        for candidate in &ys {
            let dist = (candidate - probe).abs();
            if dist <= SNAP_TOLERANCE && best_y.is_none_or(|(d, _, _)| dist < d) {
                let offset = match i {
                    0 => 0.0,
                    1 => height / 2.0,
                    _ => height,
                };
                best_y = Some((dist, *candidate, offset));
            }
        }
    }
    if let Some((_, candidate, offset)) = best_y {
        result.top = candidate - offset;
        result.guides.push(Guide {
            orientation: GuideOrientation::Horizontal,
            position: candidate,
        });
    }

    result
}

/// Calculates the deltas (dx, dy) required to align the selection.
///
/// A single selected object aligns relative to the full canvas bounds; a
/// multiple selection aligns members within the selection's own bounding
/// box. Locked objects do not participate. Returns `(id, dx, dy)` per
/// object that needs to move.
pub fn alignment_deltas(scene: &Scene, ids: &[u64], command: AlignCommand) -> Vec<(u64, f64, f64)> {
    let selected: Vec<_> = ids
        .iter()
        .filter_map(|id| scene.get(*id))
        .filter(|o| !o.locked)
        .collect();
    if selected.is_empty() {
        return Vec::new();
    }

    // Reference frame: canvas for a single object, the selection's own
    // bounding box otherwise.
    let (frame_x1, frame_y1, frame_x2, frame_y2) = if selected.len() == 1 {
        (0.0, 0.0, scene.width, scene.height)
    } else {
        let mut min_x = f64::INFINITY;
        let mut min_y = f64::INFINITY;
        let mut max_x = f64::NEG_INFINITY;
        let mut max_y = f64::NEG_INFINITY;
        for obj in &selected {
            let (x1, y1, x2, y2) = obj.bounding_box();
            min_x = min_x.min(x1);
            min_y = min_y.min(y1);
            max_x = max_x.max(x2);
            max_y = max_y.max(y2);
        }
        (min_x, min_y, max_x, max_y)
    };

    let mut deltas = Vec::new();
    for obj in selected {
        let (x1, y1, x2, y2) = obj.bounding_box();
        let (dx, dy) = match command {
            AlignCommand::Left => (frame_x1 - x1, 0.0),
            AlignCommand::Right => (frame_x2 - x2, 0.0),
            AlignCommand::CenterHorizontal => {
                ((frame_x1 + frame_x2) / 2.0 - (x1 + x2) / 2.0, 0.0)
            }
            AlignCommand::Top => (0.0, frame_y1 - y1),
            AlignCommand::Bottom => (0.0, frame_y2 - y2),
            AlignCommand::Middle => (0.0, (frame_y1 + frame_y2) / 2.0 - (y1 + y2) / 2.0),
        };
        if dx.abs() > f64::EPSILON || dy.abs() > f64::EPSILON {
            deltas.push((obj.id, dx, dy));
        }
    }
    deltas
}

/// Calculates the deltas required to distribute three or more objects evenly
/// along an axis. The first and last objects (by position) stay fixed; the
/// interior objects are repositioned so every gap is equal. Locked objects
/// do not participate.
pub fn distribute_deltas(scene: &Scene, ids: &[u64], axis: Axis) -> Vec<(u64, f64, f64)> {
    let mut members: Vec<(u64, f64, f64)> = ids // (id, min_edge, size)
        .iter()
        .filter_map(|id| scene.get(*id))
        .filter(|o| !o.locked)
        .map(|o| {
            let (x1, y1, x2, y2) = o.bounding_box();
            match axis {
                Axis::Horizontal => (o.id, x1, x2 - x1),
                Axis::Vertical => (o.id, y1, y2 - y1),
            }
        })
        .collect();
    if members.len() < 3 {
        return Vec::new();
    }

    members.sort_by(|a, b| a.1.total_cmp(&b.1));

    let (_, first_min, first_size) = members[0];
    let (_, last_min, last_size) = *members.last().expect("len >= 3");
    let span = (last_min + last_size) - first_min;
    let total_size: f64 = members.iter().map(|(_, _, size)| size).sum();
    let gap = (span - total_size) / (members.len() - 1) as f64;

    let interior = members.len() - 2;
    let mut deltas = Vec::new();
    let mut cursor = first_min + first_size + gap;
    for &(id, min_edge, size) in members.iter().skip(1).take(interior) {
        let delta = cursor - min_edge;
        if delta.abs() > f64::EPSILON {
            deltas.push(match axis {
                Axis::Horizontal => (id, delta, 0.0),
                Axis::Vertical => (id, 0.0, delta),
            });
        }
        cursor += size + gap;
    }
    deltas
}
