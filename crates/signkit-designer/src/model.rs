//! Scene object model for the design canvas.
//!
//! Every visible element on the canvas is a [`SceneObject`]: a closed tagged
//! union of object kinds over a shared geometry record. Kind-specific
//! behavior (sizing, outlines, hit testing) is handled with exhaustive
//! matching rather than runtime type probing.

use lyon::math::point;
use lyon::path::Path;
use serde::{Deserialize, Serialize};

/// Represents a 2D point in design-pixel space.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    /// Creates a new point with the given X and Y coordinates.
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Calculates the distance to another point.
    pub fn distance_to(&self, other: &Point) -> f64 {
        ((self.x - other.x).powi(2) + (self.y - other.y).powi(2)).sqrt()
    }
}

/// Rotates `p` around `center` by `angle_deg` degrees.
pub fn rotate_point(p: Point, center: Point, angle_deg: f64) -> Point {
    if angle_deg.abs() < 1e-6 {
        return p;
    }
    let angle_rad = angle_deg.to_radians();
    let cos_a = angle_rad.cos();
    let sin_a = angle_rad.sin();
    let dx = p.x - center.x;
    let dy = p.y - center.y;
    Point {
        x: center.x + dx * cos_a - dy * sin_a,
        y: center.y + dx * sin_a + dy * cos_a,
    }
}

/// Shared placement record for every scene object.
///
/// Coordinates are in editing design pixels; `angle` is in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Geometry {
    pub left: f64,
    pub top: f64,
    pub scale_x: f64,
    pub scale_y: f64,
    pub angle: f64,
}

impl Default for Geometry {
    fn default() -> Self {
        Self {
            left: 0.0,
            top: 0.0,
            scale_x: 1.0,
            scale_y: 1.0,
            angle: 0.0,
        }
    }
}

impl Geometry {
    pub fn at(left: f64, top: f64) -> Self {
        Self {
            left,
            top,
            ..Self::default()
        }
    }
}

/// Preset text roles with distinct default sizing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextVariant {
    Heading,
    Subheading,
    Body,
}

/// Horizontal alignment inside a text box.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextAlign {
    Left,
    Center,
    Right,
}

impl Default for TextAlign {
    fn default() -> Self {
        Self::Left
    }
}

/// Typography attributes of a text object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextStyle {
    pub font_family: String,
    pub font_size: f64,
    pub bold: bool,
    pub italic: bool,
    pub fill: String,
    pub line_height: f64,
    pub align: TextAlign,
}

impl Default for TextStyle {
    fn default() -> Self {
        Self {
            font_family: "Arial".to_string(),
            font_size: 24.0,
            bold: false,
            italic: false,
            fill: "#1a1a2e".to_string(),
            line_height: 1.16,
            align: TextAlign::Left,
        }
    }
}

/// An editable, wrapping text box.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextObject {
    pub content: String,
    /// Wrap width of the box in design pixels; maintained by auto-fit.
    pub width: f64,
    pub style: TextStyle,
}

impl TextObject {
    pub fn new(content: impl Into<String>, width: f64, style: TextStyle) -> Self {
        Self {
            content: content.into(),
            width,
            style,
        }
    }

    pub fn line_count(&self) -> usize {
        self.content.lines().count().max(1)
    }

    /// Box height derived from line count and line height.
    pub fn height(&self) -> f64 {
        self.line_count() as f64 * self.style.font_size * self.style.line_height
    }
}

/// A vector icon from the built-in set, drawn in its own view box.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IconObject {
    pub name: String,
    /// SVG path data in view-box coordinates.
    pub outline: String,
    pub view_width: f64,
    pub view_height: f64,
    pub fill: String,
}

/// Primitive shape kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ShapeKind {
    Rectangle,
    Circle,
    Triangle,
    Line,
}

/// A filled/stroked primitive shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShapeObject {
    pub kind: ShapeKind,
    pub width: f64,
    pub height: f64,
    pub fill: String,
    pub stroke: Option<String>,
    pub stroke_width: f64,
    pub corner_radius: f64,
}

impl ShapeObject {
    pub fn new(kind: ShapeKind, width: f64, height: f64, fill: impl Into<String>) -> Self {
        Self {
            kind,
            width,
            height,
            fill: fill.into(),
            stroke: None,
            stroke_width: 0.0,
            corner_radius: 0.0,
        }
    }

    /// Builds the shape outline as a lyon path in local coordinates
    /// (origin at the shape's top-left corner).
    pub fn outline(&self) -> Path {
        let mut builder = Path::builder();
        let w = self.width as f32;
        let h = self.height as f32;
        match self.kind {
            ShapeKind::Rectangle => {
                if self.corner_radius > 0.0 {
                    let r = (self.corner_radius.min(self.width.min(self.height) / 2.0)) as f32;
                    builder.begin(point(r, 0.0));
                    builder.line_to(point(w - r, 0.0));
                    builder.quadratic_bezier_to(point(w, 0.0), point(w, r));
                    builder.line_to(point(w, h - r));
                    builder.quadratic_bezier_to(point(w, h), point(w - r, h));
                    builder.line_to(point(r, h));
                    builder.quadratic_bezier_to(point(0.0, h), point(0.0, h - r));
                    builder.line_to(point(0.0, r));
                    builder.quadratic_bezier_to(point(0.0, 0.0), point(r, 0.0));
                    builder.close();
                } else {
                    builder.begin(point(0.0, 0.0));
                    builder.line_to(point(w, 0.0));
                    builder.line_to(point(w, h));
                    builder.line_to(point(0.0, h));
                    builder.close();
                }
            }
            ShapeKind::Circle => {
                builder.add_ellipse(
                    point(w / 2.0, h / 2.0),
                    lyon::math::vector(w / 2.0, h / 2.0),
                    lyon::math::Angle::radians(0.0),
                    lyon::path::Winding::Positive,
                );
            }
            ShapeKind::Triangle => {
                builder.begin(point(w / 2.0, 0.0));
                builder.line_to(point(w, h));
                builder.line_to(point(0.0, h));
                builder.close();
            }
            ShapeKind::Line => {
                builder.begin(point(0.0, h / 2.0));
                builder.line_to(point(w, h / 2.0));
                builder.end(false);
            }
        }
        builder.build()
    }
}

/// Serializes a lyon path into SVG path data.
pub fn path_to_svg_data(path: &Path) -> String {
    let mut data = String::new();
    for event in path.iter() {
        match event {
            lyon::path::Event::Begin { at } => {
                data.push_str(&format!("M {} {} ", at.x, at.y));
            }
            lyon::path::Event::Line { to, .. } => {
                data.push_str(&format!("L {} {} ", to.x, to.y));
            }
            lyon::path::Event::Quadratic { ctrl, to, .. } => {
                data.push_str(&format!("Q {} {} {} {} ", ctrl.x, ctrl.y, to.x, to.y));
            }
            lyon::path::Event::Cubic {
                ctrl1, ctrl2, to, ..
            } => {
                data.push_str(&format!(
                    "C {} {} {} {} {} {} ",
                    ctrl1.x, ctrl1.y, ctrl2.x, ctrl2.y, to.x, to.y
                ));
            }
            lyon::path::Event::End { close, .. } => {
                if close {
                    data.push_str("Z ");
                }
            }
        }
    }
    data.trim_end().to_string()
}

/// A raster or vector image referenced by source URL.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageObject {
    pub source: String,
    pub width: f64,
    pub height: f64,
}

/// A composite object whose children keep transforms relative to the group
/// origin.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupObject {
    pub children: Vec<SceneObject>,
    pub width: f64,
    pub height: f64,
}

/// Closed union of every drawable kind.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ObjectKind {
    Text(TextObject),
    Icon(IconObject),
    Shape(ShapeObject),
    Image(ImageObject),
    Group(GroupObject),
}

/// A single element of the scene graph.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SceneObject {
    pub id: u64,
    pub kind: ObjectKind,
    pub geometry: Geometry,
    /// Binding name linking this object to a signage-data field
    /// (`template_<key>`). `None` for free-form user content.
    pub binding: Option<String>,
    pub locked: bool,
    pub is_background: bool,
    /// Editing-only artwork (safety-zone frame, snap guides). Excluded from
    /// validation, export, and thumbnails.
    pub is_guide: bool,
}

impl SceneObject {
    pub fn new(id: u64, kind: ObjectKind) -> Self {
        Self {
            id,
            kind,
            geometry: Geometry::default(),
            binding: None,
            locked: false,
            is_background: false,
            is_guide: false,
        }
    }

    /// Unscaled size of the object in design pixels.
    pub fn natural_size(&self) -> (f64, f64) {
        match &self.kind {
            ObjectKind::Text(t) => (t.width, t.height()),
            ObjectKind::Icon(i) => (i.view_width, i.view_height),
            ObjectKind::Shape(s) => (s.width, s.height),
            ObjectKind::Image(i) => (i.width, i.height),
            ObjectKind::Group(g) => (g.width, g.height),
        }
    }

    /// Scaled size of the object in design pixels.
    pub fn size(&self) -> (f64, f64) {
        let (w, h) = self.natural_size();
        (w * self.geometry.scale_x, h * self.geometry.scale_y)
    }

    /// Center of the object's unrotated box.
    pub fn center(&self) -> Point {
        let (w, h) = self.size();
        Point::new(self.geometry.left + w / 2.0, self.geometry.top + h / 2.0)
    }

    /// Axis-aligned bounding box, accounting for rotation.
    pub fn bounding_box(&self) -> (f64, f64, f64, f64) {
        let (w, h) = self.size();
        let left = self.geometry.left;
        let top = self.geometry.top;
        if self.geometry.angle.abs() < 1e-6 {
            return (left, top, left + w, top + h);
        }
        let center = Point::new(left + w / 2.0, top + h / 2.0);
        let corners = [
            Point::new(left, top),
            Point::new(left + w, top),
            Point::new(left + w, top + h),
            Point::new(left, top + h),
        ];
        let mut min_x = f64::INFINITY;
        let mut min_y = f64::INFINITY;
        let mut max_x = f64::NEG_INFINITY;
        let mut max_y = f64::NEG_INFINITY;
        for c in corners {
            let p = rotate_point(c, center, self.geometry.angle);
            min_x = min_x.min(p.x);
            min_y = min_y.min(p.y);
            max_x = max_x.max(p.x);
            max_y = max_y.max(p.y);
        }
        (min_x, min_y, max_x, max_y)
    }

    /// Hit test against the unrotated box, with the probe point rotated into
    /// local space.
    pub fn contains_point(&self, p: &Point, tolerance: f64) -> bool {
        let (w, h) = self.size();
        let center = self.center();
        let local = rotate_point(*p, center, -self.geometry.angle);
        local.x >= self.geometry.left - tolerance
            && local.x <= self.geometry.left + w + tolerance
            && local.y >= self.geometry.top - tolerance
            && local.y <= self.geometry.top + h + tolerance
    }

    /// Moves the object by the given delta.
    pub fn translate(&mut self, dx: f64, dy: f64) {
        self.geometry.left += dx;
        self.geometry.top += dy;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rect_object(id: u64, left: f64, top: f64, w: f64, h: f64) -> SceneObject {
        let mut obj = SceneObject::new(
            id,
            ObjectKind::Shape(ShapeObject::new(ShapeKind::Rectangle, w, h, "#ffffff")),
        );
        obj.geometry.left = left;
        obj.geometry.top = top;
        obj
    }

    #[test]
    fn test_bounding_box_unrotated() {
        let obj = rect_object(1, 10.0, 20.0, 100.0, 50.0);
        assert_eq!(obj.bounding_box(), (10.0, 20.0, 110.0, 70.0));
    }

    #[test]
    fn test_bounding_box_scaled() {
        let mut obj = rect_object(1, 0.0, 0.0, 100.0, 50.0);
        obj.geometry.scale_x = 2.0;
        assert_eq!(obj.bounding_box(), (0.0, 0.0, 200.0, 50.0));
    }

    #[test]
    fn test_bounding_box_rotated_square() {
        // A 100x100 square rotated 45 degrees has a bbox of ~141.42 per side.
        let mut obj = rect_object(1, 0.0, 0.0, 100.0, 100.0);
        obj.geometry.angle = 45.0;
        let (x1, y1, x2, y2) = obj.bounding_box();
        let diag = 100.0 * std::f64::consts::SQRT_2;
        assert!((x2 - x1 - diag).abs() < 1e-6);
        assert!((y2 - y1 - diag).abs() < 1e-6);
        // Center is preserved.
        assert!(((x1 + x2) / 2.0 - 50.0).abs() < 1e-6);
        assert!(((y1 + y2) / 2.0 - 50.0).abs() < 1e-6);
    }

    #[test]
    fn test_contains_point_rotated() {
        let mut obj = rect_object(1, 0.0, 0.0, 100.0, 10.0);
        obj.geometry.angle = 90.0;
        // After rotating around (50, 5), the box occupies roughly x 45..55,
        // y -45..55 in canvas space.
        assert!(obj.contains_point(&Point::new(50.0, -40.0), 0.0));
        assert!(!obj.contains_point(&Point::new(90.0, 5.0), 0.0));
    }

    #[test]
    fn test_text_height_follows_lines() {
        let style = TextStyle {
            font_size: 20.0,
            line_height: 1.2,
            ..TextStyle::default()
        };
        let text = TextObject::new("one\ntwo\nthree", 200.0, style);
        assert_eq!(text.line_count(), 3);
        assert!((text.height() - 72.0).abs() < 1e-9);
    }

    #[test]
    fn test_shape_outline_svg_data() {
        let shape = ShapeObject::new(ShapeKind::Rectangle, 10.0, 10.0, "#000000");
        let data = path_to_svg_data(&shape.outline());
        assert!(data.starts_with("M "));
        assert!(data.ends_with('Z'));
    }
}
