//! Snapshot-based undo/redo history.
//!
//! A linear stack of serialized scene snapshots with a cursor into the
//! current state. Saving while the cursor is not at the tip truncates the
//! redo branch. A suppression flag blocks capture during template swaps and
//! full-scene restores so a bulk load never becomes a user-undoable step;
//! callers seed exactly one snapshot once the load completes.
//!
//! Debounced property edits are modeled as an explicit coalescing queue:
//! each edit calls [`History::mark_dirty`] and the host commits one snapshot
//! per quiet window via [`History::flush`], keeping the undo timeline
//! deterministic.

use crate::scene::Scene;
use crate::serialization::SceneSnapshot;
use signkit_core::constants::HISTORY_LIMIT;

#[derive(Debug, Clone)]
pub struct History {
    stack: Vec<SceneSnapshot>,
    cursor: usize,
    suppressed: bool,
    dirty: bool,
    limit: usize,
}

impl History {
    pub fn new() -> Self {
        Self {
            stack: Vec::new(),
            cursor: 0,
            suppressed: false,
            dirty: false,
            limit: HISTORY_LIMIT,
        }
    }

    /// Blocks snapshot capture until [`History::resume`] is called.
    pub fn suppress(&mut self) {
        self.suppressed = true;
    }

    pub fn resume(&mut self) {
        self.suppressed = false;
    }

    pub fn is_suppressed(&self) -> bool {
        self.suppressed
    }

    /// Clears the stack and records the given scene as the single reachable
    /// baseline. The first undo after a programmatic load lands here, never
    /// on an empty canvas.
    pub fn seed(&mut self, scene: &Scene) {
        self.stack.clear();
        self.stack.push(SceneSnapshot::capture(scene, "history"));
        self.cursor = 0;
        self.dirty = false;
    }

    /// Captures a snapshot of the scene, truncating any redo branch.
    pub fn save(&mut self, scene: &Scene) {
        if self.suppressed {
            return;
        }
        if !self.stack.is_empty() {
            self.stack.truncate(self.cursor + 1);
        }
        self.stack.push(SceneSnapshot::capture(scene, "history"));
        if self.stack.len() > self.limit {
            self.stack.remove(0);
        }
        self.cursor = self.stack.len() - 1;
    }

    /// Records that a coalesced property edit is pending.
    pub fn mark_dirty(&mut self) {
        if !self.suppressed {
            self.dirty = true;
        }
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Commits at most one snapshot for all edits since the last flush.
    /// Returns whether a snapshot was captured.
    pub fn flush(&mut self, scene: &Scene) -> bool {
        if !self.dirty {
            return false;
        }
        self.dirty = false;
        self.save(scene);
        true
    }

    pub fn can_undo(&self) -> bool {
        self.cursor > 0
    }

    pub fn can_redo(&self) -> bool {
        self.cursor + 1 < self.stack.len()
    }

    /// Steps the cursor back and returns the snapshot to restore.
    pub fn undo(&mut self) -> Option<&SceneSnapshot> {
        if !self.can_undo() {
            return None;
        }
        self.cursor -= 1;
        self.stack.get(self.cursor)
    }

    /// Steps the cursor forward and returns the snapshot to restore.
    pub fn redo(&mut self) -> Option<&SceneSnapshot> {
        if !self.can_redo() {
            return None;
        }
        self.cursor += 1;
        self.stack.get(self.cursor)
    }

    pub fn len(&self) -> usize {
        self.stack.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stack.is_empty()
    }
}

impl Default for History {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{ObjectKind, SceneObject, ShapeKind, ShapeObject};

    fn scene_with(count: usize) -> Scene {
        let mut scene = Scene::new(400.0, 300.0);
        for i in 0..count {
            let mut obj = SceneObject::new(
                0,
                ObjectKind::Shape(ShapeObject::new(ShapeKind::Rectangle, 10.0, 10.0, "#000000")),
            );
            obj.geometry.left = i as f64 * 20.0;
            scene.add(obj);
        }
        scene
    }

    #[test]
    fn test_redo_branch_truncated_on_save() {
        let mut history = History::new();
        history.seed(&scene_with(0));
        history.save(&scene_with(1));
        history.save(&scene_with(2));
        assert!(history.undo().is_some());
        assert!(history.can_redo());

        history.save(&scene_with(3));
        assert!(!history.can_redo());
        assert_eq!(history.len(), 3);
    }

    #[test]
    fn test_suppression_blocks_capture() {
        let mut history = History::new();
        history.seed(&scene_with(0));
        history.suppress();
        history.save(&scene_with(1));
        history.mark_dirty();
        history.resume();
        assert_eq!(history.len(), 1);
        assert!(!history.is_dirty());
    }

    #[test]
    fn test_flush_commits_one_snapshot() {
        let mut history = History::new();
        history.seed(&scene_with(0));
        history.mark_dirty();
        history.mark_dirty();
        history.mark_dirty();
        assert!(history.flush(&scene_with(1)));
        assert!(!history.flush(&scene_with(1)));
        assert_eq!(history.len(), 2);
    }

    #[test]
    fn test_stack_is_bounded() {
        let mut history = History::new();
        history.seed(&scene_with(0));
        for i in 0..(HISTORY_LIMIT * 2) {
            history.save(&scene_with(i));
        }
        assert_eq!(history.len(), HISTORY_LIMIT);
        assert!(history.can_undo());
        assert!(!history.can_redo());
    }

    #[test]
    fn test_undo_floor_is_seed() {
        let mut history = History::new();
        let seeded = scene_with(2);
        history.seed(&seeded);
        history.save(&scene_with(3));

        let snapshot = history.undo().expect("one step back");
        assert_eq!(snapshot.objects.len(), 2);
        assert!(history.undo().is_none());
    }
}
