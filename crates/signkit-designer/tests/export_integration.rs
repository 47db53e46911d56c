//! Integration tests for the export pipeline.

use std::sync::Arc;

use signkit_designer::{
    DesignConfig, DesignSession, Exporter, FontCatalog, ObjectKind, Scene, SceneObject, ShapeKind,
    ShapeObject, TextObject, TextStyle, TextVariant,
};

fn catalog() -> FontCatalog {
    FontCatalog::empty()
}

#[test]
fn test_svg_document_has_physical_dimensions() {
    let catalog = catalog();
    let exporter = Exporter::new(&catalog);
    let config = DesignConfig::default();
    let (w, h) = config.edit_size();
    let scene = Scene::new(w as f64, h as f64);

    let doc = exporter.to_svg(&scene, &config);
    // Exact physical size with an export-DPI view box.
    assert!(doc.svg.contains("width=\"24in\""));
    assert!(doc.svg.contains("height=\"16in\""));
    assert!(doc.svg.contains("viewBox=\"0 0 7200 4800\""));
    assert_eq!(doc.width_px, 7200);
    assert_eq!(doc.height_px, 4800);
    // The editing space is a different resolution entirely.
    assert_eq!((w, h), (2304, 1536));
}

#[test]
fn test_svg_contains_scene_content() {
    let catalog = catalog();
    let exporter = Exporter::new(&catalog);
    let config = DesignConfig::default();
    let (w, h) = config.edit_size();
    let mut scene = Scene::new(w as f64, h as f64);

    scene.add(SceneObject::new(
        0,
        ObjectKind::Text(TextObject::new(
            "Fresh & Local <Produce>",
            400.0,
            TextStyle::default(),
        )),
    ));
    scene.add(SceneObject::new(
        0,
        ObjectKind::Shape(ShapeObject::new(ShapeKind::Circle, 80.0, 80.0, "#123abc")),
    ));

    let doc = exporter.to_svg(&scene, &config);
    // Text is XML-escaped.
    assert!(doc.svg.contains("Fresh &amp; Local &lt;Produce&gt;"));
    assert!(doc.svg.contains("#123abc"));
}

#[test]
fn test_paged_document_tiles_the_design() {
    let catalog = catalog();
    let exporter = Exporter::new(&catalog);
    let config = DesignConfig::default();
    let (w, h) = config.edit_size();
    let scene = Scene::new(w as f64, h as f64);

    // 24x16in design on 10x10in pages: 3 columns x 2 rows.
    let paged = exporter.to_paged(&scene, &config, 10.0, 10.0);
    assert_eq!(paged.columns, 3);
    assert_eq!(paged.rows, 2);
    assert_eq!(paged.pages.len(), 6);
    assert_eq!(paged.page_width_px, 3000);

    // Second page windows the next horizontal strip of the same vector
    // form.
    assert!(paged.pages[1].contains("viewBox=\"3000 0 3000 3000\""));
}

#[test]
fn test_thumbnail_excludes_guides() {
    let catalog = catalog();
    let exporter = Exporter::new(&catalog);
    let mut config = DesignConfig::default();
    config.background = signkit_designer::Background::Solid {
        color: "#ffffff".to_string(),
    };
    let (w, h) = config.edit_size();
    let mut scene = Scene::new(w as f64, h as f64);

    // A guide covering the whole canvas must not appear in the preview.
    let mut guide = SceneObject::new(
        0,
        ObjectKind::Shape(ShapeObject::new(
            ShapeKind::Rectangle,
            scene.width,
            scene.height,
            "#ff0000",
        )),
    );
    guide.is_guide = true;
    scene.add(guide);

    let thumb = exporter.thumbnail(&scene, &config, 96).unwrap();
    let center = thumb.get_pixel(48, thumb.height() / 2);
    assert_eq!(center[0], 255);
    assert_eq!(center[1], 255);
    assert_eq!(center[2], 255);

    // A real object does appear.
    let mut shape = SceneObject::new(
        0,
        ObjectKind::Shape(ShapeObject::new(
            ShapeKind::Rectangle,
            scene.width,
            scene.height,
            "#0000ff",
        )),
    );
    shape.geometry.left = 0.0;
    scene.add(shape);
    let thumb = exporter.thumbnail(&scene, &config, 96).unwrap();
    let center = thumb.get_pixel(48, thumb.height() / 2);
    assert_eq!(center[2], 255);
    assert_eq!(center[0], 0);
}

#[test]
fn test_font_faces_only_for_text_in_use() {
    let catalog = catalog();
    let config = DesignConfig::default();
    let (w, h) = config.edit_size();
    let mut scene = Scene::new(w as f64, h as f64);
    scene.add(SceneObject::new(
        0,
        ObjectKind::Shape(ShapeObject::new(ShapeKind::Circle, 10.0, 10.0, "#000000")),
    ));
    assert!(Exporter::collect_faces(&scene).is_empty());

    scene.add(SceneObject::new(
        0,
        ObjectKind::Text(TextObject::new("a", 100.0, TextStyle::default())),
    ));
    let mut italic = TextStyle::default();
    italic.italic = true;
    scene.add(SceneObject::new(
        0,
        ObjectKind::Text(TextObject::new("b", 100.0, italic)),
    ));

    let faces = Exporter::collect_faces(&scene);
    assert_eq!(faces.len(), 2);
    let _ = catalog;
}

#[test]
fn test_export_name_through_session() {
    let session = DesignSession::new(DesignConfig::default(), Arc::new(FontCatalog::empty()));
    let name = session.export_name("svg");
    assert!(name.starts_with("sign_24x16in_"));
    assert!(name.ends_with(".svg"));
}

#[test]
fn test_session_export_includes_added_text() {
    let mut session = DesignSession::new(DesignConfig::default(), Arc::new(FontCatalog::empty()));
    session.add_text(TextVariant::Heading, "Acme Signs");
    let doc = session.export_svg();
    assert!(doc.svg.contains("Acme Signs"));
    assert!(doc.svg.contains("font-weight=\"bold\""));
}
