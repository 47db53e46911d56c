//! Scene graph and structural mutations.
//!
//! The [`Scene`] owns the ordered object list (bottom-to-top draw order) and
//! every structural operation on it: insertion, duplication, deletion,
//! locking, layering, background designation, and grouping. History capture
//! and reactive re-validation are the responsibility of the editing session;
//! the scene itself only enforces structural invariants:
//!
//! - at most one object carries `is_background`, always at index 0;
//! - no layering command may place another object below the background;
//! - locked objects ignore geometry-mutating operations (silent no-ops).

use crate::model::{GroupObject, ObjectKind, Point, SceneObject, rotate_point};
use signkit_core::constants::DUPLICATE_OFFSET;

/// The ordered list of visual objects composing the current design.
#[derive(Debug, Clone, PartialEq)]
pub struct Scene {
    /// Canvas width in editing design pixels.
    pub width: f64,
    /// Canvas height in editing design pixels.
    pub height: f64,
    objects: Vec<SceneObject>,
    next_id: u64,
}

impl Scene {
    /// Creates an empty scene with the given editing-pixel dimensions.
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            width,
            height,
            objects: Vec::new(),
            next_id: 1,
        }
    }

    /// Generates a new unique object id.
    pub fn generate_id(&mut self) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    pub fn objects(&self) -> &[SceneObject] {
        &self.objects
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    pub fn get(&self, id: u64) -> Option<&SceneObject> {
        self.objects.iter().find(|o| o.id == id)
    }

    pub fn get_mut(&mut self, id: u64) -> Option<&mut SceneObject> {
        self.objects.iter_mut().find(|o| o.id == id)
    }

    pub fn objects_mut(&mut self) -> impl Iterator<Item = &mut SceneObject> {
        self.objects.iter_mut()
    }

    pub fn index_of(&self, id: u64) -> Option<usize> {
        self.objects.iter().position(|o| o.id == id)
    }

    /// Lowest index a non-background object may occupy.
    pub fn floor_index(&self) -> usize {
        usize::from(self.objects.first().is_some_and(|o| o.is_background))
    }

    pub fn background(&self) -> Option<&SceneObject> {
        self.objects.first().filter(|o| o.is_background)
    }

    /// Removes every object and resets nothing else; ids keep counting up so
    /// restored snapshots never collide with live ids.
    pub fn clear(&mut self) {
        self.objects.clear();
    }

    /// Inserts a prepared object at the top of the z-order, assigning fresh
    /// ids to it and (for groups) its children. Returns the id.
    pub fn add(&mut self, mut object: SceneObject) -> u64 {
        self.reassign_ids(&mut object);
        let id = object.id;
        self.objects.push(object);
        id
    }

    /// Inserts a prepared object centered on the canvas.
    pub fn add_centered(&mut self, mut object: SceneObject) -> u64 {
        let (w, h) = object.size();
        object.geometry.left = (self.width - w) / 2.0;
        object.geometry.top = (self.height - h) / 2.0;
        self.add(object)
    }

    /// Clones the object with a constant offset and a fresh id. The clone
    /// shares no mutable state with the source; group children are re-id'd
    /// recursively. Returns the clone's id.
    pub fn duplicate(&mut self, id: u64) -> Option<u64> {
        let mut clone = self.get(id)?.clone();
        clone.is_background = false;
        clone.translate(DUPLICATE_OFFSET, DUPLICATE_OFFSET);
        self.reassign_ids(&mut clone);
        let clone_id = clone.id;
        self.objects.push(clone);
        Some(clone_id)
    }

    fn reassign_ids(&mut self, object: &mut SceneObject) {
        object.id = self.generate_id();
        // Split the borrow: ids come from self, children from the clone.
        let mut children = match &mut object.kind {
            ObjectKind::Group(group) => std::mem::take(&mut group.children),
            _ => return,
        };
        for child in &mut children {
            self.reassign_ids(child);
        }
        if let ObjectKind::Group(group) = &mut object.kind {
            group.children = children;
        }
    }

    /// Removes all listed objects atomically. Returns the removed objects in
    /// their former draw order.
    pub fn delete(&mut self, ids: &[u64]) -> Vec<SceneObject> {
        let mut removed = Vec::new();
        self.objects.retain(|o| {
            if ids.contains(&o.id) {
                removed.push(o.clone());
                false
            } else {
                true
            }
        });
        removed
    }

    pub fn set_locked(&mut self, id: u64, locked: bool) {
        if let Some(obj) = self.get_mut(id) {
            obj.locked = locked;
        }
    }

    /// Moves the object by (dx, dy). No-op when locked.
    pub fn translate(&mut self, id: u64, dx: f64, dy: f64) {
        if let Some(obj) = self.get_mut(id) {
            if obj.locked {
                return;
            }
            obj.translate(dx, dy);
        }
    }

    /// Scales the object about its own center. No-op when locked.
    pub fn scale(&mut self, id: u64, sx: f64, sy: f64) {
        if let Some(obj) = self.get_mut(id) {
            if obj.locked {
                return;
            }
            let center = obj.center();
            obj.geometry.scale_x *= sx;
            obj.geometry.scale_y *= sy;
            // Keep the center fixed while the box grows.
            let (w, h) = obj.size();
            obj.geometry.left = center.x - w / 2.0;
            obj.geometry.top = center.y - h / 2.0;
        }
    }

    /// Rotates the object about its own center. No-op when locked.
    pub fn rotate(&mut self, id: u64, angle_delta: f64) {
        if let Some(obj) = self.get_mut(id) {
            if obj.locked {
                return;
            }
            obj.geometry.angle += angle_delta;
        }
    }

    /// Moves the object to the top of the z-order.
    pub fn to_front(&mut self, id: u64) {
        if let Some(idx) = self.index_of(id) {
            if self.objects[idx].is_background {
                return;
            }
            let obj = self.objects.remove(idx);
            self.objects.push(obj);
        }
    }

    /// Moves the object to the index immediately above the background, never
    /// below it.
    pub fn to_back(&mut self, id: u64) {
        let floor = self.floor_index();
        if let Some(idx) = self.index_of(id) {
            if idx <= floor || self.objects[idx].is_background {
                return;
            }
            let obj = self.objects.remove(idx);
            self.objects.insert(floor, obj);
        }
    }

    /// Shifts the object one index up.
    pub fn forward(&mut self, id: u64) {
        if let Some(idx) = self.index_of(id) {
            if self.objects[idx].is_background || idx + 1 >= self.objects.len() {
                return;
            }
            self.objects.swap(idx, idx + 1);
        }
    }

    /// Shifts the object one index down; no-op once adjacent to the
    /// background.
    pub fn backward(&mut self, id: u64) {
        let floor = self.floor_index();
        if let Some(idx) = self.index_of(id) {
            if idx <= floor || self.objects[idx].is_background {
                return;
            }
            self.objects.swap(idx, idx - 1);
        }
    }

    /// Designates the object as the scene background: clears the previous
    /// background flag and re-homes the new background to index 0.
    pub fn mark_as_background(&mut self, id: u64) {
        if self.index_of(id).is_none() {
            return;
        }
        for obj in &mut self.objects {
            obj.is_background = false;
        }
        if let Some(idx) = self.index_of(id) {
            let mut obj = self.objects.remove(idx);
            obj.is_background = true;
            self.objects.insert(0, obj);
        }
    }

    /// Combines two or more objects into a composite group. Children keep
    /// transforms relative to the group's bounding-box origin; the group
    /// takes the members' topmost z-position. Locked members are excluded.
    /// Returns the group id, or `None` when fewer than two members qualify.
    pub fn group(&mut self, ids: &[u64]) -> Option<u64> {
        let members: Vec<u64> = ids
            .iter()
            .copied()
            .filter(|id| {
                self.get(*id)
                    .is_some_and(|o| !o.locked && !o.is_background && !o.is_guide)
            })
            .collect();
        if members.len() < 2 {
            return None;
        }

        let mut min_x = f64::INFINITY;
        let mut min_y = f64::INFINITY;
        let mut max_x = f64::NEG_INFINITY;
        let mut max_y = f64::NEG_INFINITY;
        for id in &members {
            let (x1, y1, x2, y2) = self.get(*id).expect("member exists").bounding_box();
            min_x = min_x.min(x1);
            min_y = min_y.min(y1);
            max_x = max_x.max(x2);
            max_y = max_y.max(y2);
        }

        let top_index = members
            .iter()
            .filter_map(|id| self.index_of(*id))
            .max()
            .expect("member exists");
        let removed_below = self
            .objects
            .iter()
            .take(top_index)
            .filter(|o| members.contains(&o.id))
            .count();

        let mut children = self.delete(&members);
        for child in &mut children {
            child.geometry.left -= min_x;
            child.geometry.top -= min_y;
        }

        let group = GroupObject {
            children,
            width: max_x - min_x,
            height: max_y - min_y,
        };
        let id = self.generate_id();
        let mut obj = SceneObject::new(id, ObjectKind::Group(group));
        obj.geometry.left = min_x;
        obj.geometry.top = min_y;
        self.objects.insert(top_index - removed_below, obj);
        Some(id)
    }

    /// Dissolves a group, restoring children as independent objects with
    /// transforms resolved back to canvas space. Returns the children's ids.
    pub fn ungroup(&mut self, id: u64) -> Vec<u64> {
        let Some(idx) = self.index_of(id) else {
            return Vec::new();
        };
        let ObjectKind::Group(_) = self.objects[idx].kind else {
            return Vec::new();
        };

        let group_obj = self.objects.remove(idx);
        let g = group_obj.geometry;
        let group_center = Point::new(
            g.left + group_obj.natural_size().0 * g.scale_x / 2.0,
            g.top + group_obj.natural_size().1 * g.scale_y / 2.0,
        );
        let ObjectKind::Group(group) = group_obj.kind else {
            unreachable!("kind checked above");
        };

        let mut ids = Vec::with_capacity(group.children.len());
        for (offset, mut child) in group.children.into_iter().enumerate() {
            // Apply the group's scale, then its rotation about the group
            // center, to land the child in absolute canvas coordinates.
            child.geometry.left = g.left + child.geometry.left * g.scale_x;
            child.geometry.top = g.top + child.geometry.top * g.scale_y;
            child.geometry.scale_x *= g.scale_x;
            child.geometry.scale_y *= g.scale_y;
            if g.angle.abs() > 1e-6 {
                let child_center = child.center();
                let rotated = rotate_point(child_center, group_center, g.angle);
                child.translate(rotated.x - child_center.x, rotated.y - child_center.y);
                child.geometry.angle += g.angle;
            }
            ids.push(child.id);
            self.objects.insert(idx + offset, child);
        }
        ids
    }
}
