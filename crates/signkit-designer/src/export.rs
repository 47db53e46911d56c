//! Export pipeline.
//!
//! Serializes the live scene graph into a print-ready SVG document sized to
//! the exact physical dimensions (via the export DPI), derives an optional
//! paginated document by tiling the same vector form onto fixed pages, and
//! renders raster thumbnails for template previews. Fonts actually used by
//! the design are embedded as base64 `@font-face` rules so the output
//! renders without the fonts being installed on the viewing system.
//!
//! Editing-only guide objects never reach any export output.

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use chrono::{DateTime, Utc};
use std::collections::BTreeSet;

use crate::config::{Background, DesignConfig};
use crate::fonts::FontCatalog;
use crate::model::{path_to_svg_data, ObjectKind, SceneObject, ShapeKind, TextAlign};
use crate::scene::Scene;
use signkit_core::constants::EXPORT_DPI;
use signkit_core::ExportError;

/// A finished vector document.
#[derive(Debug, Clone)]
pub struct SvgDocument {
    pub svg: String,
    pub width_px: u32,
    pub height_px: u32,
    pub physical_width: f64,
    pub physical_height: f64,
    pub unit: signkit_core::Unit,
}

/// A paginated document derived from the vector form: one SVG per page,
/// tiled left-to-right, top-to-bottom.
#[derive(Debug, Clone)]
pub struct PagedDocument {
    pub pages: Vec<String>,
    pub columns: u32,
    pub rows: u32,
    pub page_width_px: u32,
    pub page_height_px: u32,
}

/// A distinct (family, weight, style) combination in use by the design.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct FontFace {
    pub family: String,
    pub bold: bool,
    pub italic: bool,
}

/// Serializes scenes into export documents.
pub struct Exporter<'a> {
    catalog: &'a FontCatalog,
}

impl<'a> Exporter<'a> {
    pub fn new(catalog: &'a FontCatalog) -> Self {
        Self { catalog }
    }

    /// Scans all text objects for the distinct font faces actually in use.
    pub fn collect_faces(scene: &Scene) -> BTreeSet<FontFace> {
        let mut faces = BTreeSet::new();
        fn visit(objects: &[SceneObject], faces: &mut BTreeSet<FontFace>) {
            for obj in objects {
                match &obj.kind {
                    ObjectKind::Text(text) => {
                        faces.insert(FontFace {
                            family: text.style.font_family.clone(),
                            bold: text.style.bold,
                            italic: text.style.italic,
                        });
                    }
                    ObjectKind::Group(group) => visit(&group.children, faces),
                    _ => {}
                }
            }
        }
        visit(scene.objects(), &mut faces);
        faces
    }

    /// Serializes the scene into a vector document at the exact physical
    /// size declared by the config.
    pub fn to_svg(&self, scene: &Scene, config: &DesignConfig) -> SvgDocument {
        let (export_w, export_h) = config.export_size();
        let fx = export_w as f64 / scene.width;
        let fy = export_h as f64 / scene.height;

        let mut svg = String::new();
        svg.push_str(&format!(
            "<svg xmlns=\"http://www.w3.org/2000/svg\" xmlns:xlink=\"http://www.w3.org/1999/xlink\" \
             width=\"{}{}\" height=\"{}{}\" viewBox=\"0 0 {} {}\">\n",
            config.width,
            config.unit.label(),
            config.height,
            config.unit.label(),
            export_w,
            export_h
        ));
        svg.push_str(&self.render_defs(scene, config));
        svg.push_str(&self.render_background(config, export_w, export_h));
        svg.push_str(&format!("<g transform=\"scale({} {})\">\n", fx, fy));
        for obj in scene.objects() {
            if obj.is_guide {
                continue;
            }
            svg.push_str(&render_object(obj));
        }
        svg.push_str("</g>\n</svg>\n");

        SvgDocument {
            svg,
            width_px: export_w,
            height_px: export_h,
            physical_width: config.width,
            physical_height: config.height,
            unit: config.unit,
        }
    }

    fn render_defs(&self, scene: &Scene, config: &DesignConfig) -> String {
        let mut defs = String::from("<defs>\n");

        if let Background::Gradient { start, end, angle } = &config.background {
            defs.push_str(&format!(
                "<linearGradient id=\"bg\" gradientTransform=\"rotate({})\">\
                 <stop offset=\"0\" stop-color=\"{}\"/>\
                 <stop offset=\"1\" stop-color=\"{}\"/></linearGradient>\n",
                angle, start, end
            ));
        }

        let mut style = String::new();
        for face in Self::collect_faces(scene) {
            match self.catalog.face(&face.family, face.bold, face.italic) {
                Some(loaded) => {
                    style.push_str(&format!(
                        "@font-face {{ font-family: \"{}\"; font-weight: {}; font-style: {}; \
                         src: url(data:font/ttf;base64,{}); }}\n",
                        face.family,
                        if face.bold { "bold" } else { "normal" },
                        if face.italic { "italic" } else { "normal" },
                        BASE64.encode(&loaded.data)
                    ));
                }
                None => {
                    tracing::warn!(
                        family = %face.family,
                        "font data unavailable, exporting without embedding"
                    );
                }
            }
        }
        if !style.is_empty() {
            defs.push_str("<style>\n");
            defs.push_str(&style);
            defs.push_str("</style>\n");
        }

        defs.push_str("</defs>\n");
        defs
    }

    fn render_background(&self, config: &DesignConfig, w: u32, h: u32) -> String {
        let fill = match &config.background {
            Background::Solid { color } => color.clone(),
            Background::Gradient { .. } => "url(#bg)".to_string(),
        };
        format!(
            "<rect x=\"0\" y=\"0\" width=\"{}\" height=\"{}\" fill=\"{}\"/>\n",
            w, h, fill
        )
    }

    /// Derives a paginated fixed-page document from the same vector form.
    /// Page dimensions are physical, in the config's unit.
    pub fn to_paged(
        &self,
        scene: &Scene,
        config: &DesignConfig,
        page_width: f64,
        page_height: f64,
    ) -> PagedDocument {
        let (export_w, export_h) = config.export_size();
        let page_w_px =
            (signkit_core::units::to_pixels(page_width, config.unit, EXPORT_DPI)).round() as u32;
        let page_h_px =
            (signkit_core::units::to_pixels(page_height, config.unit, EXPORT_DPI)).round() as u32;

        let columns = export_w.div_ceil(page_w_px.max(1));
        let rows = export_h.div_ceil(page_h_px.max(1));

        // Render the full content once, then window it per page.
        let fx = export_w as f64 / scene.width;
        let fy = export_h as f64 / scene.height;
        let mut content = String::new();
        content.push_str(&self.render_defs(scene, config));
        content.push_str(&self.render_background(config, export_w, export_h));
        content.push_str(&format!("<g transform=\"scale({} {})\">\n", fx, fy));
        for obj in scene.objects() {
            if obj.is_guide {
                continue;
            }
            content.push_str(&render_object(obj));
        }
        content.push_str("</g>\n");

        let mut pages = Vec::with_capacity((columns * rows) as usize);
        for row in 0..rows {
            for col in 0..columns {
                let x = col * page_w_px;
                let y = row * page_h_px;
                let mut page = String::new();
                page.push_str(&format!(
                    "<svg xmlns=\"http://www.w3.org/2000/svg\" xmlns:xlink=\"http://www.w3.org/1999/xlink\" \
                     width=\"{}{}\" height=\"{}{}\" viewBox=\"{} {} {} {}\">\n",
                    page_width,
                    config.unit.label(),
                    page_height,
                    config.unit.label(),
                    x,
                    y,
                    page_w_px,
                    page_h_px
                ));
                page.push_str(&content);
                page.push_str("</svg>\n");
                pages.push(page);
            }
        }

        PagedDocument {
            pages,
            columns,
            rows,
            page_width_px: page_w_px,
            page_height_px: page_h_px,
        }
    }

    /// Renders a raster preview of the scene. Guide objects are excluded so
    /// editing-only artwork never leaks into a persisted preview.
    pub fn thumbnail(
        &self,
        scene: &Scene,
        config: &DesignConfig,
        target_width: u32,
    ) -> Result<image::RgbaImage, ExportError> {
        let scale = target_width as f64 / scene.width;
        let height = (scene.height * scale).round().max(1.0) as u32;
        let mut pixmap =
            tiny_skia::Pixmap::new(target_width.max(1), height).ok_or(ExportError::Raster {
                reason: "failed to allocate pixmap".to_string(),
            })?;

        let bg = match &config.background {
            Background::Solid { color } => parse_color(color),
            Background::Gradient { start, .. } => parse_color(start),
        };
        pixmap.fill(bg);

        for obj in scene.objects() {
            if obj.is_guide {
                continue;
            }
            draw_preview_box(&mut pixmap, obj, scale);
        }

        image::RgbaImage::from_raw(
            pixmap.width(),
            pixmap.height(),
            pixmap.data().to_vec(),
        )
        .ok_or(ExportError::Encode {
            reason: "pixmap buffer size mismatch".to_string(),
        })
    }
}

/// Builds the export filename: rounded physical size, unit, timestamp.
pub fn export_file_name(config: &DesignConfig, extension: &str, now: DateTime<Utc>) -> String {
    format!(
        "sign_{:.0}x{:.0}{}_{}.{}",
        config.width,
        config.height,
        config.unit.label(),
        now.format("%Y%m%d%H%M%S"),
        extension
    )
}

fn render_object(obj: &SceneObject) -> String {
    let g = obj.geometry;
    let (nw, nh) = obj.natural_size();
    let transform = format!(
        "translate({} {}) rotate({} {} {}) scale({} {})",
        g.left,
        g.top,
        g.angle,
        nw * g.scale_x / 2.0,
        nh * g.scale_y / 2.0,
        g.scale_x,
        g.scale_y
    );

    match &obj.kind {
        ObjectKind::Text(text) => {
            let anchor = match text.style.align {
                TextAlign::Left => ("start", 0.0),
                TextAlign::Center => ("middle", text.width / 2.0),
                TextAlign::Right => ("end", text.width),
            };
            let mut out = format!(
                "<text transform=\"{}\" font-family=\"{}\" font-size=\"{}\"{}{} fill=\"{}\" text-anchor=\"{}\">",
                transform,
                escape_xml(&text.style.font_family),
                text.style.font_size,
                if text.style.bold {
                    " font-weight=\"bold\""
                } else {
                    ""
                },
                if text.style.italic {
                    " font-style=\"italic\""
                } else {
                    ""
                },
                text.style.fill,
                anchor.0
            );
            let line_height = text.style.font_size * text.style.line_height;
            for (i, line) in text.content.lines().enumerate() {
                // Baseline sits at ~80% of the line box.
                let y = i as f64 * line_height + text.style.font_size * 0.8;
                out.push_str(&format!(
                    "<tspan x=\"{}\" y=\"{}\">{}</tspan>",
                    anchor.1,
                    y,
                    escape_xml(line)
                ));
            }
            out.push_str("</text>\n");
            out
        }
        ObjectKind::Icon(icon) => format!(
            "<path transform=\"{}\" d=\"{}\" fill=\"{}\"/>\n",
            transform, icon.outline, icon.fill
        ),
        ObjectKind::Shape(shape) => {
            let stroke = match &shape.stroke {
                Some(color) => format!(
                    " stroke=\"{}\" stroke-width=\"{}\"",
                    color, shape.stroke_width
                ),
                None => String::new(),
            };
            let fill = if shape.kind == ShapeKind::Line {
                "none".to_string()
            } else {
                shape.fill.clone()
            };
            format!(
                "<path transform=\"{}\" d=\"{}\" fill=\"{}\"{}/>\n",
                transform,
                path_to_svg_data(&shape.outline()),
                fill,
                stroke
            )
        }
        ObjectKind::Image(image) => {
            let href = if image.source.trim_start().starts_with('<') {
                // Inline vector artwork is embedded as a data URI.
                format!(
                    "data:image/svg+xml;base64,{}",
                    BASE64.encode(image.source.as_bytes())
                )
            } else {
                image.source.clone()
            };
            format!(
                "<image transform=\"{}\" width=\"{}\" height=\"{}\" xlink:href=\"{}\"/>\n",
                transform, image.width, image.height, escape_xml(&href)
            )
        }
        ObjectKind::Group(group) => {
            let mut out = format!("<g transform=\"{}\">\n", transform);
            for child in &group.children {
                out.push_str(&render_object(child));
            }
            out.push_str("</g>\n");
            out
        }
    }
}

fn draw_preview_box(pixmap: &mut tiny_skia::Pixmap, obj: &SceneObject, scale: f64) {
    let (x1, y1, x2, y2) = obj.bounding_box();
    let rect = tiny_skia::Rect::from_ltrb(
        (x1 * scale) as f32,
        (y1 * scale) as f32,
        (x2 * scale) as f32,
        (y2 * scale) as f32,
    );
    let Some(rect) = rect else {
        return;
    };

    let fill = match &obj.kind {
        ObjectKind::Text(text) => parse_color(&text.style.fill),
        ObjectKind::Icon(icon) => parse_color(&icon.fill),
        ObjectKind::Shape(shape) => parse_color(&shape.fill),
        ObjectKind::Image(_) => tiny_skia::Color::from_rgba8(200, 200, 200, 255),
        ObjectKind::Group(_) => tiny_skia::Color::from_rgba8(160, 160, 160, 255),
    };
    let mut paint = tiny_skia::Paint::default();
    paint.set_color(fill);
    pixmap.fill_rect(rect, &paint, tiny_skia::Transform::identity(), None);
}

fn parse_color(hex: &str) -> tiny_skia::Color {
    let raw = hex.trim().trim_start_matches('#');
    if raw.len() == 6 {
        if let (Ok(r), Ok(g), Ok(b)) = (
            u8::from_str_radix(&raw[0..2], 16),
            u8::from_str_radix(&raw[2..4], 16),
            u8::from_str_radix(&raw[4..6], 16),
        ) {
            return tiny_skia::Color::from_rgba8(r, g, b, 255);
        }
    }
    tiny_skia::Color::from_rgba8(0, 0, 0, 255)
}

fn escape_xml(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}
