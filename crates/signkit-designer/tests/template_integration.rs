//! Integration tests for template instantiation and content-sync.

use std::sync::Arc;

use async_trait::async_trait;
use signkit_core::{AssetError, TemplateError};
use signkit_designer::{
    builtin_templates, AssetFetcher, ComponentBinding, DesignConfig, DesignSession, FontCatalog,
    LogoSlot, ObjectKind, Scene, SceneObject, SceneSnapshot, ShapeKind, ShapeObject, SignageData,
    Template, TemplateEngine, TemplateLibrary, TemplateProvider, TemplateSource, TextRegion,
};

struct StaticFetcher;

#[async_trait]
impl AssetFetcher for StaticFetcher {
    async fn fetch_vector_asset(&self, _reference: &str) -> Result<String, AssetError> {
        Ok("<svg><rect width=\"10\" height=\"10\"/></svg>".to_string())
    }
}

struct FailingFetcher;

#[async_trait]
impl AssetFetcher for FailingFetcher {
    async fn fetch_vector_asset(&self, reference: &str) -> Result<String, AssetError> {
        Err(AssetError::Fetch {
            reference: reference.to_string(),
            reason: "offline".to_string(),
        })
    }
}

struct FailingProvider;

#[async_trait]
impl TemplateProvider for FailingProvider {
    async fn fetch_templates(&self) -> Result<Vec<Template>, TemplateError> {
        Err(TemplateError::Fetch {
            reason: "gateway timeout".to_string(),
        })
    }
}

fn signage_data() -> SignageData {
    SignageData {
        company_name: "Acme Signs".to_string(),
        address: "12 Market Road".to_string(),
        gstin: "22AAAAA0000A1Z5".to_string(),
        mobile: "9876543210".to_string(),
        logo_url: "https://cdn.example/logo.png".to_string(),
        ..SignageData::default()
    }
}

fn vector_template() -> Template {
    let mut template = Template::new(
        "storefront",
        "Storefront",
        TemplateSource::Vector {
            reference: "assets/storefront.svg".to_string(),
            view_box: (480.0, 320.0),
            components: vec![
                ComponentBinding::Text {
                    key: "company_name".to_string(),
                    region: TextRegion {
                        x: 120.0,
                        y: 40.0,
                        width: 240.0,
                        font_size: 32.0,
                        font_family: None,
                        bold: true,
                        align: Some("center".to_string()),
                    },
                },
                ComponentBinding::Logo {
                    key: "logo".to_string(),
                    slot: LogoSlot {
                        x: 20.0,
                        y: 20.0,
                        width: 80.0,
                        height: 80.0,
                    },
                },
            ],
        },
    );
    template.width = 24.0;
    template.height = 16.0;
    template
}

#[tokio::test]
async fn test_vector_template_instantiation_and_sync() {
    let mut engine = TemplateEngine::new();
    let mut scene = Scene::new(960.0, 640.0);
    let config = DesignConfig::default();
    let ticket = engine.begin_load();
    let applied = engine
        .instantiate(
            ticket,
            &mut scene,
            &config,
            &vector_template(),
            &StaticFetcher,
            &signage_data(),
        )
        .await
        .unwrap();
    assert!(applied);

    // Background artwork at index 0, plus text region and logo slot.
    assert_eq!(scene.len(), 3);
    let background = &scene.objects()[0];
    assert!(background.is_background);
    assert!(matches!(background.kind, ObjectKind::Image(_)));

    // Scaled from the 480x320 view box into 960x640 canvas pixels.
    let text = scene
        .objects()
        .iter()
        .find(|o| o.binding.as_deref() == Some("template_company_name"))
        .expect("bound text region");
    assert_eq!(text.geometry.left, 240.0);
    assert_eq!(text.geometry.top, 80.0);
    let ObjectKind::Text(t) = &text.kind else {
        panic!("expected text");
    };
    assert_eq!(t.width, 480.0);
    assert_eq!(t.style.font_size, 64.0);
    // Content-sync filled the region from signage data.
    assert_eq!(t.content, "Acme Signs");

    let logo = scene
        .objects()
        .iter()
        .find(|o| o.binding.as_deref() == Some("template_logo"))
        .expect("logo slot");
    let ObjectKind::Image(img) = &logo.kind else {
        panic!("expected image");
    };
    assert_eq!(img.source, "https://cdn.example/logo.png");
}

#[tokio::test]
async fn test_template_swap_removes_owned_keeps_freeform() {
    let mut engine = TemplateEngine::new();
    let mut scene = Scene::new(960.0, 640.0);
    let config = DesignConfig::default();

    // A free-form user shape with no binding survives template swaps.
    let freeform = scene.add(SceneObject::new(
        0,
        ObjectKind::Shape(ShapeObject::new(ShapeKind::Circle, 50.0, 50.0, "#ff00ff")),
    ));

    let ticket = engine.begin_load();
    engine
        .instantiate(
            ticket,
            &mut scene,
            &config,
            &vector_template(),
            &StaticFetcher,
            &signage_data(),
        )
        .await
        .unwrap();
    assert_eq!(scene.len(), 4);

    // Swapping to blank removes every template-owned object.
    let ticket = engine.begin_load();
    engine
        .instantiate(
            ticket,
            &mut scene,
            &config,
            &Template::new("blank", "Blank", TemplateSource::Blank),
            &StaticFetcher,
            &signage_data(),
        )
        .await
        .unwrap();
    assert_eq!(scene.len(), 1);
    assert!(scene.get(freeform).is_some());
}

#[tokio::test]
async fn test_stale_load_is_discarded() {
    let mut engine = TemplateEngine::new();
    let mut scene = Scene::new(960.0, 640.0);
    let config = DesignConfig::default();

    let stale = engine.begin_load();
    let current = engine.begin_load();
    assert!(!engine.is_current(stale));
    assert!(engine.is_current(current));

    let applied = engine
        .instantiate(
            stale,
            &mut scene,
            &config,
            &vector_template(),
            &StaticFetcher,
            &signage_data(),
        )
        .await
        .unwrap();
    assert!(!applied);
    assert!(scene.is_empty());
}

#[tokio::test]
async fn test_catalog_fetch_falls_back_to_builtins() {
    let engine = TemplateEngine::new();
    let templates = engine.load_catalog(&FailingProvider).await;
    assert!(templates.iter().any(|t| t.id == "blank"));
    assert!(templates.len() >= 2);
}

#[tokio::test]
async fn test_failed_asset_fetch_leaves_session_scene_intact() {
    let mut session = DesignSession::new(DesignConfig::default(), Arc::new(FontCatalog::empty()));
    session.add_shape(ShapeKind::Rectangle);

    let result = session
        .load_template(&vector_template(), &FailingFetcher, &signage_data())
        .await;
    assert!(result.is_err());
    // The in-memory scene is never corrupted by a failed remote call.
    assert_eq!(session.scene().len(), 1);
    // And history capture has been resumed.
    session.add_shape(ShapeKind::Circle);
    assert!(session.undo());
}

#[tokio::test]
async fn test_snapshot_template_through_session() {
    let mut session = DesignSession::new(DesignConfig::default(), Arc::new(FontCatalog::empty()));
    let banner = builtin_templates()
        .into_iter()
        .find(|t| t.id == "classic-banner")
        .expect("builtin banner");

    session
        .load_template(&banner, &StaticFetcher, &signage_data())
        .await
        .unwrap();

    let heading = session
        .scene()
        .objects()
        .iter()
        .find(|o| o.binding.as_deref() == Some("template_company_name"))
        .expect("bound heading");
    let ObjectKind::Text(text) = &heading.kind else {
        panic!("expected text");
    };
    assert_eq!(text.content, "Acme Signs");
    assert_eq!(session.config.template_id, "classic-banner");

    // The load is not undoable; the seeded state is the floor.
    assert!(!session.undo());
}

#[test]
fn test_library_persistence_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("templates.json");

    let mut library = TemplateLibrary::new();
    library.add(vector_template()).unwrap();
    library
        .add(Template::new("blank", "Blank", TemplateSource::Blank))
        .unwrap();
    library.save_to_file(&path).unwrap();

    let loaded = TemplateLibrary::load_from_file(&path).unwrap();
    assert_eq!(loaded.count(), 2);
    assert_eq!(loaded.get("storefront").unwrap().name, "Storefront");

    // A missing file degrades to an empty library, not an error.
    let empty = TemplateLibrary::load_from_file(dir.path().join("missing.json")).unwrap();
    assert_eq!(empty.count(), 0);
}

#[test]
fn test_snapshot_source_survives_serialization() {
    let mut scene = Scene::new(100.0, 100.0);
    scene.add(SceneObject::new(
        0,
        ObjectKind::Shape(ShapeObject::new(ShapeKind::Rectangle, 10.0, 10.0, "#000000")),
    ));
    let template = Template::new(
        "snap",
        "Snapshot Template",
        TemplateSource::Snapshot {
            snapshot: SceneSnapshot::capture(&scene, "snap"),
        },
    );

    let json = serde_json::to_string(&template).unwrap();
    let restored: Template = serde_json::from_str(&json).unwrap();
    assert_eq!(restored, template);
}
