//! Serialization and deserialization for scene snapshots.
//!
//! Implements the canonical persisted design format: a versioned JSON
//! document carrying an ordered object list with kind, geometry, style,
//! binding name, and lock/background/guide flags. Snapshots back local
//! drafts, history entries, and durable template storage.

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::Path;
use uuid::Uuid;

use crate::model::{
    Geometry, GroupObject, IconObject, ImageObject, ObjectKind, SceneObject, ShapeKind,
    ShapeObject, TextAlign, TextObject, TextStyle,
};
use crate::scene::Scene;
use signkit_core::SnapshotError;

/// Snapshot format version
const SNAPSHOT_VERSION: &str = "1.0";

/// Complete serialized scene state
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SceneSnapshot {
    pub version: String,
    pub metadata: SnapshotMetadata,
    pub width: f64,
    pub height: f64,
    pub objects: Vec<ObjectData>,
}

/// Snapshot metadata
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SnapshotMetadata {
    /// Document identity, stable across edits of the same draft.
    #[serde(default = "Uuid::new_v4")]
    pub id: Uuid,
    pub name: String,
    pub created: DateTime<Utc>,
    pub modified: DateTime<Utc>,
}

/// Serialized object data
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObjectData {
    pub kind: String,
    pub left: f64,
    pub top: f64,
    #[serde(default = "default_scale")]
    pub scale_x: f64,
    #[serde(default = "default_scale")]
    pub scale_y: f64,
    #[serde(default)]
    pub angle: f64,
    #[serde(default)]
    pub width: f64,
    #[serde(default)]
    pub height: f64,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub font_family: String,
    #[serde(default)]
    pub font_size: f64,
    #[serde(default)]
    pub bold: bool,
    #[serde(default)]
    pub italic: bool,
    #[serde(default)]
    pub line_height: f64,
    #[serde(default)]
    pub text_align: String,
    #[serde(default)]
    pub fill: String,
    #[serde(default)]
    pub stroke: Option<String>,
    #[serde(default)]
    pub stroke_width: f64,
    #[serde(default)]
    pub corner_radius: f64,
    #[serde(default)]
    pub shape: String,
    #[serde(default)]
    pub source: String,
    #[serde(default)]
    pub icon: String,
    #[serde(default)]
    pub outline: String,
    #[serde(default)]
    pub view_width: f64,
    #[serde(default)]
    pub view_height: f64,
    #[serde(default)]
    pub binding: Option<String>,
    #[serde(default)]
    pub locked: bool,
    #[serde(default)]
    pub is_background: bool,
    #[serde(default)]
    pub is_guide: bool,
    #[serde(default)]
    pub children: Vec<ObjectData>,
}

fn default_scale() -> f64 {
    1.0
}

impl SceneSnapshot {
    /// Captures the full scene state under the given design name.
    pub fn capture(scene: &Scene, name: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            version: SNAPSHOT_VERSION.to_string(),
            metadata: SnapshotMetadata {
                id: Uuid::new_v4(),
                name: name.into(),
                created: now,
                modified: now,
            },
            width: scene.width,
            height: scene.height,
            objects: scene.objects().iter().map(from_object).collect(),
        }
    }

    /// Save snapshot to file
    pub fn save_to_file(&self, path: impl AsRef<Path>) -> Result<()> {
        let json = serde_json::to_string_pretty(self).context("Failed to serialize snapshot")?;
        std::fs::write(path.as_ref(), json).context("Failed to write snapshot file")?;
        Ok(())
    }

    /// Load snapshot from file
    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Self> {
        let content =
            std::fs::read_to_string(path.as_ref()).context("Failed to read snapshot file")?;
        let mut snapshot: SceneSnapshot =
            serde_json::from_str(&content).context("Failed to parse snapshot file")?;
        snapshot.metadata.modified = Utc::now();
        Ok(snapshot)
    }
}

/// Converts a scene object into its serialized form.
pub fn from_object(obj: &SceneObject) -> ObjectData {
    let mut data = ObjectData {
        kind: String::new(),
        left: obj.geometry.left,
        top: obj.geometry.top,
        scale_x: obj.geometry.scale_x,
        scale_y: obj.geometry.scale_y,
        angle: obj.geometry.angle,
        width: 0.0,
        height: 0.0,
        content: String::new(),
        font_family: String::new(),
        font_size: 0.0,
        bold: false,
        italic: false,
        line_height: 0.0,
        text_align: String::new(),
        fill: String::new(),
        stroke: None,
        stroke_width: 0.0,
        corner_radius: 0.0,
        shape: String::new(),
        source: String::new(),
        icon: String::new(),
        outline: String::new(),
        view_width: 0.0,
        view_height: 0.0,
        binding: obj.binding.clone(),
        locked: obj.locked,
        is_background: obj.is_background,
        is_guide: obj.is_guide,
        children: Vec::new(),
    };

    match &obj.kind {
        ObjectKind::Text(t) => {
            data.kind = "text".to_string();
            data.content = t.content.clone();
            data.width = t.width;
            data.font_family = t.style.font_family.clone();
            data.font_size = t.style.font_size;
            data.bold = t.style.bold;
            data.italic = t.style.italic;
            data.line_height = t.style.line_height;
            data.fill = t.style.fill.clone();
            data.text_align = match t.style.align {
                TextAlign::Left => "left",
                TextAlign::Center => "center",
                TextAlign::Right => "right",
            }
            .to_string();
        }
        ObjectKind::Icon(i) => {
            data.kind = "icon".to_string();
            data.icon = i.name.clone();
            data.outline = i.outline.clone();
            data.view_width = i.view_width;
            data.view_height = i.view_height;
            data.fill = i.fill.clone();
        }
        ObjectKind::Shape(s) => {
            data.kind = "shape".to_string();
            data.shape = match s.kind {
                ShapeKind::Rectangle => "rectangle",
                ShapeKind::Circle => "circle",
                ShapeKind::Triangle => "triangle",
                ShapeKind::Line => "line",
            }
            .to_string();
            data.width = s.width;
            data.height = s.height;
            data.fill = s.fill.clone();
            data.stroke = s.stroke.clone();
            data.stroke_width = s.stroke_width;
            data.corner_radius = s.corner_radius;
        }
        ObjectKind::Image(i) => {
            data.kind = "image".to_string();
            data.source = i.source.clone();
            data.width = i.width;
            data.height = i.height;
        }
        ObjectKind::Group(g) => {
            data.kind = "group".to_string();
            data.width = g.width;
            data.height = g.height;
            data.children = g.children.iter().map(from_object).collect();
        }
    }

    data
}

/// Converts serialized object data back into a scene object.
///
/// Static `label` nodes are upgraded to wrapping, editable text objects,
/// preserving all other properties.
pub fn to_object(data: &ObjectData, id: u64) -> std::result::Result<SceneObject, SnapshotError> {
    let kind = match data.kind.as_str() {
        // Legacy static labels become live text.
        "text" | "label" => ObjectKind::Text(TextObject {
            content: data.content.clone(),
            width: data.width,
            style: TextStyle {
                font_family: if data.font_family.is_empty() {
                    TextStyle::default().font_family
                } else {
                    data.font_family.clone()
                },
                font_size: if data.font_size > 0.0 {
                    data.font_size
                } else {
                    TextStyle::default().font_size
                },
                bold: data.bold,
                italic: data.italic,
                fill: if data.fill.is_empty() {
                    TextStyle::default().fill
                } else {
                    data.fill.clone()
                },
                line_height: if data.line_height > 0.0 {
                    data.line_height
                } else {
                    TextStyle::default().line_height
                },
                align: match data.text_align.as_str() {
                    "center" => TextAlign::Center,
                    "right" => TextAlign::Right,
                    _ => TextAlign::Left,
                },
            },
        }),
        "icon" => ObjectKind::Icon(IconObject {
            name: data.icon.clone(),
            outline: data.outline.clone(),
            view_width: data.view_width,
            view_height: data.view_height,
            fill: data.fill.clone(),
        }),
        "shape" => {
            let shape_kind = match data.shape.as_str() {
                "rectangle" => ShapeKind::Rectangle,
                "circle" => ShapeKind::Circle,
                "triangle" => ShapeKind::Triangle,
                "line" => ShapeKind::Line,
                other => {
                    return Err(SnapshotError::UnknownKind {
                        kind: format!("shape/{}", other),
                    });
                }
            };
            ObjectKind::Shape(ShapeObject {
                kind: shape_kind,
                width: data.width,
                height: data.height,
                fill: data.fill.clone(),
                stroke: data.stroke.clone(),
                stroke_width: data.stroke_width,
                corner_radius: data.corner_radius,
            })
        }
        "image" => ObjectKind::Image(ImageObject {
            source: data.source.clone(),
            width: data.width,
            height: data.height,
        }),
        "group" => {
            let mut children = Vec::with_capacity(data.children.len());
            for child in &data.children {
                // Child ids are reassigned when the object enters a scene.
                children.push(to_object(child, 0)?);
            }
            ObjectKind::Group(GroupObject {
                children,
                width: data.width,
                height: data.height,
            })
        }
        other => {
            return Err(SnapshotError::UnknownKind {
                kind: other.to_string(),
            });
        }
    };

    Ok(SceneObject {
        id,
        kind,
        geometry: Geometry {
            left: data.left,
            top: data.top,
            scale_x: data.scale_x,
            scale_y: data.scale_y,
            angle: data.angle,
        },
        binding: data.binding.clone(),
        locked: data.locked,
        is_background: data.is_background,
        is_guide: data.is_guide,
    })
}

/// Replaces the scene contents with the snapshot's object list.
///
/// Objects whose kind is not recognized are skipped with a warning rather
/// than failing the whole restore; canvas dimensions follow the snapshot.
pub fn restore_scene(snapshot: &SceneSnapshot, scene: &mut Scene) {
    scene.clear();
    scene.width = snapshot.width;
    scene.height = snapshot.height;
    append_objects(&snapshot.objects, scene);
}

/// Appends the snapshot's objects on top of the existing scene contents.
pub fn append_objects(objects: &[ObjectData], scene: &mut Scene) {
    for data in objects {
        let id = scene.generate_id();
        match to_object(data, id) {
            Ok(obj) => {
                if obj.is_background {
                    let id = scene.add(obj);
                    scene.mark_as_background(id);
                } else {
                    scene.add(obj);
                }
            }
            Err(err) => {
                tracing::warn!("skipping unrestorable object: {}", err);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{ShapeKind, ShapeObject};

    #[test]
    fn test_label_upgrades_to_text() {
        let data = ObjectData {
            kind: "label".to_string(),
            left: 5.0,
            top: 6.0,
            scale_x: 1.0,
            scale_y: 1.0,
            angle: 0.0,
            width: 120.0,
            content: "Acme Signs".to_string(),
            ..blank_data()
        };
        let obj = to_object(&data, 1).unwrap();
        let ObjectKind::Text(text) = obj.kind else {
            panic!("expected text");
        };
        assert_eq!(text.content, "Acme Signs");
        assert_eq!(text.width, 120.0);
    }

    #[test]
    fn test_unknown_kind_is_error() {
        let data = ObjectData {
            kind: "hologram".to_string(),
            ..blank_data()
        };
        assert!(to_object(&data, 1).is_err());
    }

    #[test]
    fn test_capture_restore_round_trip() {
        let mut scene = Scene::new(640.0, 480.0);
        let mut obj = SceneObject::new(
            0,
            ObjectKind::Shape(ShapeObject::new(ShapeKind::Circle, 80.0, 80.0, "#ff0000")),
        );
        obj.geometry.left = 10.0;
        obj.geometry.angle = 30.0;
        obj.binding = Some("template_logo".to_string());
        scene.add(obj);

        let snapshot = SceneSnapshot::capture(&scene, "test");
        let mut restored = Scene::new(1.0, 1.0);
        restore_scene(&snapshot, &mut restored);

        assert_eq!(restored.width, 640.0);
        assert_eq!(restored.len(), 1);
        let r = &restored.objects()[0];
        assert_eq!(r.geometry.angle, 30.0);
        assert_eq!(r.binding.as_deref(), Some("template_logo"));
    }

    fn blank_data() -> ObjectData {
        ObjectData {
            kind: String::new(),
            left: 0.0,
            top: 0.0,
            scale_x: 1.0,
            scale_y: 1.0,
            angle: 0.0,
            width: 0.0,
            height: 0.0,
            content: String::new(),
            font_family: String::new(),
            font_size: 0.0,
            bold: false,
            italic: false,
            line_height: 0.0,
            text_align: String::new(),
            fill: String::new(),
            stroke: None,
            stroke_width: 0.0,
            corner_radius: 0.0,
            shape: String::new(),
            source: String::new(),
            icon: String::new(),
            outline: String::new(),
            view_width: 0.0,
            view_height: 0.0,
            binding: None,
            locked: false,
            is_background: false,
            is_guide: false,
            children: Vec::new(),
        }
    }
}
