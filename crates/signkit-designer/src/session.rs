//! The editing session.
//!
//! `DesignSession` wires the scene graph, history engine, template engine,
//! font catalog, auto-fit scheduler, and safety validator together behind
//! discrete commands. Everything the session needs is injected explicitly;
//! toolbar and export code reach the live canvas through this object, never
//! through shared global state.
//!
//! Structural commands save one history snapshot synchronously; property
//! edits coalesce through the history's dirty marker and commit on
//! [`DesignSession::flush_pending_edits`]. The safety flag is re-validated
//! after every mutation.

use std::sync::Arc;

use crate::align::{self, AlignCommand, Axis, SnapResult};
use crate::autofit::{self, FitPass, FitScheduler};
use crate::config::DesignConfig;
use crate::export::{export_file_name, Exporter, PagedDocument, SvgDocument};
use crate::fonts::FontCatalog;
use crate::history::History;
use crate::model::{
    IconObject, ImageObject, ObjectKind, SceneObject, ShapeKind, ShapeObject, TextObject,
    TextStyle, TextVariant,
};
use crate::safety::SafetyZone;
use crate::scene::Scene;
use crate::serialization::{self, SceneSnapshot};
use crate::templates::{AssetFetcher, SignageData, Template, TemplateEngine};
use crate::viewport;
use signkit_core::{Error, ExportError, Result};

/// Built-in icon set: name to SVG path data in a 24x24 view box.
const ICONS: &[(&str, &str)] = &[
    (
        "star",
        "M 12 2 L 14.9 8.6 L 22 9.2 L 16.5 13.9 L 18.2 21 L 12 17.3 L 5.8 21 L 7.5 13.9 L 2 9.2 L 9.1 8.6 Z",
    ),
    (
        "phone",
        "M 4 3 L 8 3 L 10 8 L 7.5 9.5 C 8.8 12.2 11.8 15.2 14.5 16.5 L 16 14 L 21 16 L 21 20 C 21 21 20 22 19 22 C 10.7 21.4 2.6 13.3 2 5 C 2 4 3 3 4 3 Z",
    ),
    (
        "location",
        "M 12 2 C 8.1 2 5 5.1 5 9 C 5 14.2 12 22 12 22 C 12 22 19 14.2 19 9 C 19 5.1 15.9 2 12 2 Z M 12 11.5 C 10.6 11.5 9.5 10.4 9.5 9 C 9.5 7.6 10.6 6.5 12 6.5 C 13.4 6.5 14.5 7.6 14.5 9 C 14.5 10.4 13.4 11.5 12 11.5 Z",
    ),
    (
        "clock",
        "M 12 2 C 6.5 2 2 6.5 2 12 C 2 17.5 6.5 22 12 22 C 17.5 22 22 17.5 22 12 C 22 6.5 17.5 2 12 2 Z M 16.2 16.2 L 11 13 L 11 6 L 12.5 6 L 12.5 12.2 L 17 14.9 Z",
    ),
];

/// Display size a freshly inserted icon is scaled to, in design pixels.
const ICON_DEFAULT_SIZE: f64 = 96.0;

/// Default fill for freshly inserted shapes.
const SHAPE_DEFAULT_FILL: &str = "#4a4a4a";

pub struct DesignSession {
    pub config: DesignConfig,
    scene: Scene,
    history: History,
    engine: TemplateEngine,
    catalog: Arc<FontCatalog>,
    fits: FitScheduler,
    safety: SafetyZone,
    safety_violation: bool,
    clipboard: Vec<SceneObject>,
    safety_frame: Option<u64>,
    modified: bool,
}

impl DesignSession {
    /// Creates a session for the given configuration. The canvas is sized to
    /// the editing-resolution pixel size of the configured physical
    /// dimensions and the baseline snapshot is seeded immediately.
    pub fn new(config: DesignConfig, catalog: Arc<FontCatalog>) -> Self {
        let (w, h) = config.edit_size();
        let scene = Scene::new(w as f64, h as f64);
        let safety = SafetyZone::for_canvas(scene.width, scene.height);
        let mut history = History::new();
        history.seed(&scene);
        Self {
            config,
            scene,
            history,
            engine: TemplateEngine::new(),
            catalog,
            fits: FitScheduler::new(),
            safety,
            safety_violation: false,
            clipboard: Vec::new(),
            safety_frame: None,
            modified: false,
        }
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn safety_violation(&self) -> bool {
        self.safety_violation
    }

    pub fn is_modified(&self) -> bool {
        self.modified
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    /// Names of the built-in icons.
    pub fn icon_names() -> Vec<&'static str> {
        ICONS.iter().map(|(name, _)| *name).collect()
    }

    fn commit(&mut self) {
        self.history.save(&self.scene);
        self.revalidate();
        self.modified = true;
    }

    fn revalidate(&mut self) {
        self.safety_violation = self.safety.validate(&self.scene);
    }

    /// Adds a text object with variant-specific default sizing, centered on
    /// the canvas, auto-fitted immediately.
    pub fn add_text(&mut self, variant: TextVariant, content: impl Into<String>) -> u64 {
        let font_size = match variant {
            TextVariant::Heading => self.config.company_name_size,
            TextVariant::Subheading => self.config.font_size * 1.25,
            TextVariant::Body => self.config.font_size,
        };
        let style = TextStyle {
            font_family: self.config.font_family.clone(),
            font_size,
            fill: self.config.text_color.clone(),
            bold: variant == TextVariant::Heading,
            ..TextStyle::default()
        };
        let mut text = TextObject::new(content, 0.0, style);
        text.width = autofit::fit_width(&self.catalog, &text, self.scene.width, self.scene.height);

        let id = self
            .scene
            .add_centered(SceneObject::new(0, ObjectKind::Text(text)));
        self.fits.schedule_style_change(id);
        self.commit();
        id
    }

    /// Adds an icon from the built-in set, centered. Returns `None` for an
    /// unknown icon name.
    pub fn add_icon(&mut self, name: &str) -> Option<u64> {
        let (_, outline) = ICONS.iter().find(|(n, _)| *n == name)?;
        let icon = IconObject {
            name: name.to_string(),
            outline: (*outline).to_string(),
            view_width: 24.0,
            view_height: 24.0,
            fill: self.config.text_color.clone(),
        };
        let mut obj = SceneObject::new(0, ObjectKind::Icon(icon));
        let scale = ICON_DEFAULT_SIZE / 24.0;
        obj.geometry.scale_x = scale;
        obj.geometry.scale_y = scale;
        let id = self.scene.add_centered(obj);
        self.commit();
        Some(id)
    }

    /// Adds a primitive shape with kind-specific default sizing, centered.
    pub fn add_shape(&mut self, kind: ShapeKind) -> u64 {
        let (w, h) = match kind {
            ShapeKind::Rectangle => (240.0, 160.0),
            ShapeKind::Circle => (180.0, 180.0),
            ShapeKind::Triangle => (200.0, 180.0),
            ShapeKind::Line => (240.0, 4.0),
        };
        let mut shape = ShapeObject::new(kind, w, h, SHAPE_DEFAULT_FILL);
        if kind == ShapeKind::Line {
            shape.stroke = Some(SHAPE_DEFAULT_FILL.to_string());
            shape.stroke_width = 4.0;
        }
        let id = self
            .scene
            .add_centered(SceneObject::new(0, ObjectKind::Shape(shape)));
        self.commit();
        id
    }

    /// Adds an image placeholder sized to the configured logo size,
    /// centered.
    pub fn add_image(&mut self, url: impl Into<String>) -> u64 {
        let image = ImageObject {
            source: url.into(),
            width: self.config.logo_size,
            height: self.config.logo_size,
        };
        let id = self
            .scene
            .add_centered(SceneObject::new(0, ObjectKind::Image(image)));
        self.commit();
        id
    }

    /// Duplicates each object with the constant clone offset. Returns the
    /// new ids.
    pub fn duplicate(&mut self, ids: &[u64]) -> Vec<u64> {
        let clones: Vec<u64> = ids
            .iter()
            .filter_map(|id| self.scene.duplicate(*id))
            .collect();
        if !clones.is_empty() {
            self.commit();
        }
        clones
    }

    /// Removes all listed objects atomically.
    pub fn delete(&mut self, ids: &[u64]) {
        if !self.scene.delete(ids).is_empty() {
            self.commit();
        }
    }

    pub fn set_locked(&mut self, ids: &[u64], locked: bool) {
        for id in ids {
            self.scene.set_locked(*id, locked);
        }
        self.commit();
    }

    /// Moves objects by a delta. Locked objects stay put.
    pub fn move_objects(&mut self, ids: &[u64], dx: f64, dy: f64) {
        for id in ids {
            self.scene.translate(*id, dx, dy);
        }
        self.commit();
    }

    /// Scales an object about its center. Locked objects stay put.
    pub fn scale_object(&mut self, id: u64, sx: f64, sy: f64) {
        self.scene.scale(id, sx, sy);
        self.commit();
    }

    /// Rotates an object about its center. Locked objects stay put.
    pub fn rotate_object(&mut self, id: u64, angle_delta: f64) {
        self.scene.rotate(id, angle_delta);
        self.commit();
    }

    pub fn bring_to_front(&mut self, id: u64) {
        self.scene.to_front(id);
        self.commit();
    }

    pub fn send_to_back(&mut self, id: u64) {
        self.scene.to_back(id);
        self.commit();
    }

    pub fn bring_forward(&mut self, id: u64) {
        self.scene.forward(id);
        self.commit();
    }

    pub fn send_backward(&mut self, id: u64) {
        self.scene.backward(id);
        self.commit();
    }

    pub fn mark_as_background(&mut self, id: u64) {
        self.scene.mark_as_background(id);
        self.commit();
    }

    pub fn group(&mut self, ids: &[u64]) -> Option<u64> {
        let group_id = self.scene.group(ids)?;
        self.commit();
        Some(group_id)
    }

    pub fn ungroup(&mut self, id: u64) -> Vec<u64> {
        let children = self.scene.ungroup(id);
        if !children.is_empty() {
            self.commit();
        }
        children
    }

    /// Runs a discrete align command over the selection.
    pub fn align(&mut self, ids: &[u64], command: AlignCommand) {
        let deltas = align::alignment_deltas(&self.scene, ids, command);
        if deltas.is_empty() {
            return;
        }
        for (id, dx, dy) in deltas {
            self.scene.translate(id, dx, dy);
        }
        self.commit();
    }

    /// Distributes three or more selected objects evenly along an axis.
    pub fn distribute(&mut self, ids: &[u64], axis: Axis) {
        let deltas = align::distribute_deltas(&self.scene, ids, axis);
        if deltas.is_empty() {
            return;
        }
        for (id, dx, dy) in deltas {
            self.scene.translate(id, dx, dy);
        }
        self.commit();
    }

    /// Snaps a proposed drag position against canvas and object guides.
    pub fn snap_drag(&self, id: u64, left: f64, top: f64) -> SnapResult {
        let (w, h) = self
            .scene
            .get(id)
            .map(|o| o.size())
            .unwrap_or((0.0, 0.0));
        align::snap(&self.scene, id, left, top, w, h)
    }

    // ---- Coalesced property edits -------------------------------------

    /// Replaces a text object's content. Allowed on locked objects (the
    /// lock covers geometry only).
    pub fn set_text_content(&mut self, id: u64, content: impl Into<String>) {
        if let Some(obj) = self.scene.get_mut(id) {
            if let ObjectKind::Text(text) = &mut obj.kind {
                text.content = content.into();
                self.apply_fit(id);
                self.fits.schedule_style_change(id);
                self.history.mark_dirty();
                self.revalidate();
                self.modified = true;
            }
        }
    }

    /// Changes a text object's font family; the authoritative refit waits
    /// for the face to be ready.
    pub fn set_font_family(&mut self, id: u64, family: impl Into<String>) {
        if let Some(obj) = self.scene.get_mut(id) {
            if let ObjectKind::Text(text) = &mut obj.kind {
                text.style.font_family = family.into();
                self.apply_fit(id);
                self.fits.schedule_family_change(id);
                self.history.mark_dirty();
                self.revalidate();
                self.modified = true;
            }
        }
    }

    pub fn set_font_size(&mut self, id: u64, size: f64) {
        if let Some(obj) = self.scene.get_mut(id) {
            if let ObjectKind::Text(text) = &mut obj.kind {
                text.style.font_size = size;
                self.apply_fit(id);
                self.fits.schedule_style_change(id);
                self.history.mark_dirty();
                self.revalidate();
                self.modified = true;
            }
        }
    }

    pub fn set_font_style(&mut self, id: u64, bold: bool, italic: bool) {
        if let Some(obj) = self.scene.get_mut(id) {
            if let ObjectKind::Text(text) = &mut obj.kind {
                text.style.bold = bold;
                text.style.italic = italic;
                self.apply_fit(id);
                self.fits.schedule_style_change(id);
                self.history.mark_dirty();
                self.revalidate();
                self.modified = true;
            }
        }
    }

    /// Changes an object's fill color. Allowed on locked objects.
    pub fn set_fill(&mut self, id: u64, color: impl Into<String>) {
        let color = color.into();
        if let Some(obj) = self.scene.get_mut(id) {
            match &mut obj.kind {
                ObjectKind::Text(text) => text.style.fill = color,
                ObjectKind::Icon(icon) => icon.fill = color,
                ObjectKind::Shape(shape) => shape.fill = color,
                ObjectKind::Image(_) | ObjectKind::Group(_) => return,
            }
            self.history.mark_dirty();
            self.modified = true;
        }
    }

    /// Assigns a binding key in authoring mode; the raw label is normalized
    /// with the `template_` prefix.
    pub fn set_binding(&mut self, id: u64, raw_key: Option<&str>) {
        if let Some(obj) = self.scene.get_mut(id) {
            obj.binding = raw_key.map(crate::templates::normalize_binding_key);
            self.history.mark_dirty();
            self.modified = true;
        }
    }

    /// Commits at most one history snapshot for all property edits since
    /// the last flush. The host calls this once per quiet window.
    pub fn flush_pending_edits(&mut self) -> bool {
        self.history.flush(&self.scene)
    }

    // ---- Auto-fit ------------------------------------------------------

    /// Runs every refit queued for the given pass.
    pub fn run_fit_pass(&mut self, pass: FitPass) {
        for id in self.fits.take_due(pass) {
            self.apply_fit(id);
        }
        self.revalidate();
    }

    fn apply_fit(&mut self, id: u64) {
        let (canvas_w, canvas_h) = (self.scene.width, self.scene.height);
        if let Some(obj) = self.scene.get_mut(id) {
            if let ObjectKind::Text(text) = &mut obj.kind {
                text.width = autofit::fit_width(&self.catalog, text, canvas_w, canvas_h);
            }
        }
    }

    // ---- History -------------------------------------------------------

    pub fn undo(&mut self) -> bool {
        let Some(snapshot) = self.history.undo().cloned() else {
            return false;
        };
        serialization::restore_scene(&snapshot, &mut self.scene);
        self.fits.clear();
        self.revalidate();
        self.modified = true;
        true
    }

    pub fn redo(&mut self) -> bool {
        let Some(snapshot) = self.history.redo().cloned() else {
            return false;
        };
        serialization::restore_scene(&snapshot, &mut self.scene);
        self.fits.clear();
        self.revalidate();
        self.modified = true;
        true
    }

    // ---- Templates and persistence ------------------------------------

    /// Swaps the scene to a new template and syncs signage data into bound
    /// objects. Snapshot capture is suppressed for the whole load and one
    /// baseline snapshot is seeded afterwards, so the load never appears as
    /// a user-undoable step.
    pub async fn load_template(
        &mut self,
        template: &Template,
        fetcher: &dyn AssetFetcher,
        data: &SignageData,
    ) -> Result<()> {
        let ticket = self.engine.begin_load();
        self.history.suppress();
        self.fits.clear();

        let applied = match self
            .engine
            .instantiate(ticket, &mut self.scene, &self.config, template, fetcher, data)
            .await
        {
            Ok(applied) => applied,
            Err(err) => {
                // The scene is untouched on a failed fetch; the blank state
                // remains fully usable.
                self.history.resume();
                tracing::warn!(template = %template.id, "template load failed: {}", err);
                return Err(Error::Asset(err));
            }
        };

        self.history.resume();
        if applied {
            self.config.template_id = template.id.clone();
            self.history.seed(&self.scene);
            self.revalidate();
            self.modified = true;
        }
        Ok(())
    }

    /// Restores a full scene from a persisted snapshot without recording
    /// intermediate history, then seeds the baseline.
    pub fn restore_snapshot(&mut self, snapshot: &SceneSnapshot) {
        self.history.suppress();
        serialization::restore_scene(snapshot, &mut self.scene);
        self.history.resume();
        self.history.seed(&self.scene);
        self.fits.clear();
        self.revalidate();
    }

    /// Captures the current scene as a persistable snapshot.
    pub fn snapshot(&self, name: impl Into<String>) -> SceneSnapshot {
        SceneSnapshot::capture(&self.scene, name)
    }

    /// Re-projects signage data into bound objects.
    pub fn sync_content(&mut self, data: &SignageData) {
        self.engine.content_sync(&mut self.scene, data);
        self.commit();
    }

    // ---- Clipboard -----------------------------------------------------

    pub fn copy(&mut self, ids: &[u64]) {
        self.clipboard = ids
            .iter()
            .filter_map(|id| self.scene.get(*id).cloned())
            .collect();
    }

    /// Pastes the clipboard centered at the given canvas point. Returns the
    /// pasted ids.
    pub fn paste_at(&mut self, x: f64, y: f64) -> Vec<u64> {
        if self.clipboard.is_empty() {
            return Vec::new();
        }

        let mut min_x = f64::INFINITY;
        let mut min_y = f64::INFINITY;
        let mut max_x = f64::NEG_INFINITY;
        let mut max_y = f64::NEG_INFINITY;
        for obj in &self.clipboard {
            let (x1, y1, x2, y2) = obj.bounding_box();
            min_x = min_x.min(x1);
            min_y = min_y.min(y1);
            max_x = max_x.max(x2);
            max_y = max_y.max(y2);
        }
        let dx = x - (min_x + max_x) / 2.0;
        let dy = y - (min_y + max_y) / 2.0;

        let mut ids = Vec::with_capacity(self.clipboard.len());
        let clones: Vec<SceneObject> = self.clipboard.clone();
        for mut obj in clones {
            obj.is_background = false;
            obj.translate(dx, dy);
            ids.push(self.scene.add(obj));
        }
        self.commit();
        ids
    }

    // ---- Safety frame --------------------------------------------------

    /// Shows the safety-zone frame as an editing-only guide object. Guides
    /// never reach history, export, or thumbnails.
    pub fn show_safety_frame(&mut self) {
        if self.safety_frame.is_some() {
            return;
        }
        let (x1, y1, x2, y2) = self.safety.inset_rect(self.scene.width, self.scene.height);
        let mut frame = SceneObject::new(
            0,
            ObjectKind::Shape(ShapeObject {
                kind: ShapeKind::Rectangle,
                width: x2 - x1,
                height: y2 - y1,
                fill: "none".to_string(),
                stroke: Some("#e74c3c".to_string()),
                stroke_width: 2.0,
                corner_radius: 0.0,
            }),
        );
        frame.geometry.left = x1;
        frame.geometry.top = y1;
        frame.is_guide = true;
        self.safety_frame = Some(self.scene.add(frame));
    }

    pub fn hide_safety_frame(&mut self) {
        if let Some(id) = self.safety_frame.take() {
            self.scene.delete(&[id]);
        }
    }

    // ---- Viewport and export -------------------------------------------

    /// Fit scale for the editing surface inside a resized container.
    pub fn fit_scale(&self, container_w: f64, container_h: f64) -> f64 {
        viewport::fit_scale(container_w, container_h, self.scene.width, self.scene.height)
    }

    /// Exports the scene as a physically-dimensioned vector document.
    pub fn export_svg(&self) -> SvgDocument {
        Exporter::new(&self.catalog).to_svg(&self.scene, &self.config)
    }

    /// Exports the scene as a paginated document with the given physical
    /// page size.
    pub fn export_paged(&self, page_width: f64, page_height: f64) -> PagedDocument {
        Exporter::new(&self.catalog).to_paged(&self.scene, &self.config, page_width, page_height)
    }

    /// Renders a raster preview; guide objects are excluded.
    pub fn export_thumbnail(
        &self,
        target_width: u32,
    ) -> std::result::Result<image::RgbaImage, ExportError> {
        Exporter::new(&self.catalog).thumbnail(&self.scene, &self.config, target_width)
    }

    /// Suggested filename for an export produced now.
    pub fn export_name(&self, extension: &str) -> String {
        export_file_name(&self.config, extension, chrono::Utc::now())
    }
}
