//! # Design Template Management Module
//!
//! Templates let a non-designer start from a finished layout instead of a
//! blank canvas. A template carries canonical physical dimensions and
//! exactly one source form:
//!
//! - a **snapshot**: a complete serialized scene restored object-by-object;
//! - a **vector asset**: referenced artwork rendered as the static
//!   background plus a component-binding list declaring the live text
//!   regions and logo slot, rescaled from the template's view box into
//!   canvas pixel space;
//! - **blank**: nothing to instantiate.
//!
//! After instantiation, content-sync projects externally supplied signage
//! data into every object whose binding name matches a known or custom
//! `template_<key>`.
//!
//! Template and asset fetches are asynchronous; every load is stamped with a
//! generation so a stale response arriving after the template id has changed
//! again is discarded instead of clobbering the newer scene.

use anyhow::{anyhow, Context};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;

use crate::config::DesignConfig;
use crate::model::{
    ImageObject, ObjectKind, SceneObject, TextAlign, TextObject, TextStyle,
};
use crate::scene::Scene;
use crate::serialization::{self, SceneSnapshot};
use signkit_core::units::Unit;
use signkit_core::{AssetError, TemplateError};

/// Prefix marking an object as bound to a signage-data field.
pub const BINDING_PREFIX: &str = "template_";

/// Normalizes a raw user-assigned label into a binding key by prefixing
/// `template_` when absent.
pub fn normalize_binding_key(raw: &str) -> String {
    let trimmed = raw.trim();
    if trimmed.starts_with(BINDING_PREFIX) {
        trimmed.to_string()
    } else {
        format!("{}{}", BINDING_PREFIX, trimmed)
    }
}

/// Externally supplied business fields projected into bound objects.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SignageData {
    pub company_name: String,
    pub address: String,
    pub gstin: String,
    pub cin: String,
    pub mobile: String,
    pub logo_url: String,
    #[serde(default)]
    pub additional_text: Vec<String>,
}

/// Content a binding resolves to.
#[derive(Debug, Clone, PartialEq)]
pub enum BoundContent {
    Text(String),
    Image(String),
}

impl SignageData {
    /// Resolves a binding key to its field value. Unknown keys yield `None`
    /// and leave the object untouched (free-form user content).
    pub fn field_for_key(&self, key: &str) -> Option<BoundContent> {
        let field = key.strip_prefix(BINDING_PREFIX)?;
        match field {
            "company_name" => Some(BoundContent::Text(self.company_name.clone())),
            "address" => Some(BoundContent::Text(self.address.clone())),
            "gstin" => Some(BoundContent::Text(self.gstin.clone())),
            "cin" => Some(BoundContent::Text(self.cin.clone())),
            "mobile" => Some(BoundContent::Text(self.mobile.clone())),
            "logo" => Some(BoundContent::Image(self.logo_url.clone())),
            other => {
                let index: usize = other.strip_prefix("additional_")?.parse().ok()?;
                self.additional_text
                    .get(index.checked_sub(1)?)
                    .map(|text| BoundContent::Text(text.clone()))
            }
        }
    }
}

/// A live text region declared by a vector-asset template, in view-box
/// coordinates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextRegion {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub font_size: f64,
    #[serde(default)]
    pub font_family: Option<String>,
    #[serde(default)]
    pub bold: bool,
    #[serde(default)]
    pub align: Option<String>,
}

/// The logo placeholder declared by a vector-asset template.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogoSlot {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

/// One declared component of a vector-asset template.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "component", rename_all = "lowercase")]
pub enum ComponentBinding {
    Text { key: String, region: TextRegion },
    Logo { key: String, slot: LogoSlot },
}

/// The source form of a template.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "form", rename_all = "lowercase")]
pub enum TemplateSource {
    Snapshot { snapshot: SceneSnapshot },
    Vector {
        /// Reference to the artwork asset resolved by the fetcher.
        reference: String,
        /// Width/height of the coordinate space the components are declared
        /// in.
        view_box: (f64, f64),
        components: Vec<ComponentBinding>,
    },
    Blank,
}

/// Design template with metadata
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Template {
    /// Unique template identifier
    pub id: String,
    /// Display name
    pub name: String,
    /// Available for every product when `true`
    pub universal: bool,
    /// Product scope when not universal
    #[serde(default)]
    pub product_id: Option<String>,
    /// Canonical physical dimensions
    pub width: f64,
    pub height: f64,
    pub unit: Unit,
    /// Source form
    pub source: TemplateSource,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
}

impl Template {
    pub fn new(id: impl Into<String>, name: impl Into<String>, source: TemplateSource) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            universal: true,
            product_id: None,
            width: 24.0,
            height: 16.0,
            unit: Unit::Inches,
            source,
            created_at: Utc::now(),
        }
    }

    /// Whether this template is offered for the given product.
    pub fn applies_to(&self, product_id: &str) -> bool {
        self.universal || self.product_id.as_deref() == Some(product_id)
    }
}

/// Template library for managing design templates
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TemplateLibrary {
    templates: HashMap<String, Template>,
}

impl TemplateLibrary {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add template to library
    pub fn add(&mut self, template: Template) -> anyhow::Result<()> {
        if self.templates.contains_key(&template.id) {
            return Err(anyhow!("Template with ID '{}' already exists", template.id));
        }
        self.templates.insert(template.id.clone(), template);
        Ok(())
    }

    /// Insert or replace a template.
    pub fn upsert(&mut self, template: Template) {
        self.templates.insert(template.id.clone(), template);
    }

    pub fn get(&self, id: &str) -> Option<&Template> {
        self.templates.get(id)
    }

    pub fn remove(&mut self, id: &str) -> Option<Template> {
        self.templates.remove(id)
    }

    pub fn exists(&self, id: &str) -> bool {
        self.templates.contains_key(id)
    }

    pub fn count(&self) -> usize {
        self.templates.len()
    }

    /// All templates, sorted by name for stable listings.
    pub fn list_all(&self) -> Vec<&Template> {
        let mut all: Vec<_> = self.templates.values().collect();
        all.sort_by(|a, b| a.name.cmp(&b.name));
        all
    }

    /// Templates offered for a product: universal plus product-scoped.
    pub fn list_for_product(&self, product_id: &str) -> Vec<&Template> {
        let mut matches: Vec<_> = self
            .templates
            .values()
            .filter(|t| t.applies_to(product_id))
            .collect();
        matches.sort_by(|a, b| a.name.cmp(&b.name));
        matches
    }

    /// Case-insensitive name search.
    pub fn search(&self, query: &str) -> Vec<&Template> {
        let q = query.to_lowercase();
        let mut matches: Vec<_> = self
            .templates
            .values()
            .filter(|t| t.name.to_lowercase().contains(&q))
            .collect();
        matches.sort_by(|a, b| a.name.cmp(&b.name));
        matches
    }

    /// Save library to JSON file
    pub fn save_to_file(&self, path: impl AsRef<Path>) -> anyhow::Result<()> {
        let json = serde_json::to_string_pretty(self).context("Failed to serialize library")?;
        std::fs::write(path.as_ref(), json).context("Failed to write template library")?;
        Ok(())
    }

    /// Load library from JSON file; a missing file yields an empty library.
    pub fn load_from_file(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        if !path.as_ref().exists() {
            return Ok(Self::new());
        }
        let content =
            std::fs::read_to_string(path.as_ref()).context("Failed to read template library")?;
        let library = serde_json::from_str(&content).context("Failed to parse template library")?;
        Ok(library)
    }
}

/// The built-in template list used when the remote catalog is unavailable.
/// The blank template is always present and needs no external data.
pub fn builtin_templates() -> Vec<Template> {
    let mut banner_scene = Scene::new(2304.0, 1536.0);
    let mut heading = SceneObject::new(
        0,
        ObjectKind::Text(TextObject::new(
            "",
            1200.0,
            TextStyle {
                font_size: 96.0,
                bold: true,
                align: TextAlign::Center,
                ..TextStyle::default()
            },
        )),
    );
    heading.geometry.left = 552.0;
    heading.geometry.top = 300.0;
    heading.binding = Some(normalize_binding_key("company_name"));
    banner_scene.add(heading);

    let mut address = SceneObject::new(
        0,
        ObjectKind::Text(TextObject::new(
            "",
            1000.0,
            TextStyle {
                font_size: 40.0,
                align: TextAlign::Center,
                ..TextStyle::default()
            },
        )),
    );
    address.geometry.left = 652.0;
    address.geometry.top = 500.0;
    address.binding = Some(normalize_binding_key("address"));
    banner_scene.add(address);

    let banner = Template::new(
        "classic-banner",
        "Classic Banner",
        TemplateSource::Snapshot {
            snapshot: SceneSnapshot::capture(&banner_scene, "Classic Banner"),
        },
    );

    vec![Template::new("blank", "Blank", TemplateSource::Blank), banner]
}

/// Remote template catalog seam.
#[async_trait]
pub trait TemplateProvider: Send + Sync {
    async fn fetch_templates(&self) -> Result<Vec<Template>, TemplateError>;
}

/// External asset store seam (vector artwork, uploaded images).
#[async_trait]
pub trait AssetFetcher: Send + Sync {
    /// Fetches the text of a vector asset by reference.
    async fn fetch_vector_asset(&self, reference: &str) -> Result<String, AssetError>;
}

/// Token identifying one template-load request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadTicket(u64);

/// Instantiates templates into a scene with stale-response protection.
#[derive(Debug, Default)]
pub struct TemplateEngine {
    generation: u64,
}

impl TemplateEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts a new load, invalidating every ticket issued before.
    pub fn begin_load(&mut self) -> LoadTicket {
        self.generation += 1;
        LoadTicket(self.generation)
    }

    pub fn is_current(&self, ticket: LoadTicket) -> bool {
        ticket.0 == self.generation
    }

    /// Fetches the remote template catalog, falling back to the built-in
    /// list when the fetch fails. Degraded, never fatal.
    pub async fn load_catalog(&self, provider: &dyn TemplateProvider) -> Vec<Template> {
        match provider.fetch_templates().await {
            Ok(templates) => templates,
            Err(err) => {
                tracing::warn!("template fetch failed, using built-in list: {}", err);
                builtin_templates()
            }
        }
    }

    /// Removes every object owned by the previous template (any object
    /// carrying a binding name).
    pub fn clear_template_objects(&self, scene: &mut Scene) {
        let owned: Vec<u64> = scene
            .objects()
            .iter()
            .filter(|o| o.binding.is_some())
            .map(|o| o.id)
            .collect();
        scene.delete(&owned);
    }

    /// Instantiates a template into the scene, then runs content-sync.
    /// Returns `false` without touching the scene when the ticket is stale.
    pub async fn instantiate(
        &self,
        ticket: LoadTicket,
        scene: &mut Scene,
        config: &DesignConfig,
        template: &Template,
        fetcher: &dyn AssetFetcher,
        data: &SignageData,
    ) -> Result<bool, AssetError> {
        // For the vector form the fetch happens before the staleness check:
        // the ticket may have been invalidated while the request was in
        // flight.
        let artwork = match &template.source {
            TemplateSource::Vector { reference, .. } => {
                Some(fetcher.fetch_vector_asset(reference).await?)
            }
            _ => None,
        };

        if !self.is_current(ticket) {
            tracing::debug!(
                template = %template.id,
                "discarding stale template load result"
            );
            return Ok(false);
        }

        self.clear_template_objects(scene);
        match &template.source {
            TemplateSource::Snapshot { snapshot } => {
                serialization::append_objects(&snapshot.objects, scene);
            }
            TemplateSource::Vector {
                reference,
                view_box,
                components,
            } => {
                self.instantiate_vector(
                    scene,
                    config,
                    reference,
                    artwork.unwrap_or_default(),
                    *view_box,
                    components,
                );
            }
            TemplateSource::Blank => {}
        }

        self.content_sync(scene, data);
        Ok(true)
    }

    fn instantiate_vector(
        &self,
        scene: &mut Scene,
        config: &DesignConfig,
        reference: &str,
        artwork: String,
        view_box: (f64, f64),
        components: &[ComponentBinding],
    ) {
        // The fetched artwork becomes the static background.
        let mut background = SceneObject::new(
            0,
            ObjectKind::Image(ImageObject {
                source: if artwork.is_empty() {
                    reference.to_string()
                } else {
                    artwork
                },
                width: scene.width,
                height: scene.height,
            }),
        );
        background.binding = Some(normalize_binding_key("artwork"));
        let id = scene.add(background);
        scene.mark_as_background(id);

        let (vw, vh) = view_box;
        let sx = if vw > 0.0 { scene.width / vw } else { 1.0 };
        let sy = if vh > 0.0 { scene.height / vh } else { 1.0 };

        for component in components {
            match component {
                ComponentBinding::Text { key, region } => {
                    let style = TextStyle {
                        font_family: region
                            .font_family
                            .clone()
                            .unwrap_or_else(|| config.font_family.clone()),
                        font_size: region.font_size * sy,
                        bold: region.bold,
                        fill: config.text_color.clone(),
                        align: match region.align.as_deref() {
                            Some("center") => TextAlign::Center,
                            Some("right") => TextAlign::Right,
                            _ => TextAlign::Left,
                        },
                        ..TextStyle::default()
                    };
                    let mut obj = SceneObject::new(
                        0,
                        ObjectKind::Text(TextObject::new("", region.width * sx, style)),
                    );
                    obj.geometry.left = region.x * sx;
                    obj.geometry.top = region.y * sy;
                    obj.binding = Some(normalize_binding_key(key));
                    scene.add(obj);
                }
                ComponentBinding::Logo { key, slot } => {
                    let mut obj = SceneObject::new(
                        0,
                        ObjectKind::Image(ImageObject {
                            source: String::new(),
                            width: slot.width * sx,
                            height: slot.height * sy,
                        }),
                    );
                    obj.geometry.left = slot.x * sx;
                    obj.geometry.top = slot.y * sy;
                    obj.binding = Some(normalize_binding_key(key));
                    scene.add(obj);
                }
            }
        }
    }

    /// Projects signage data into every bound object. Objects without a
    /// recognized key are left untouched.
    pub fn content_sync(&self, scene: &mut Scene, data: &SignageData) {
        for obj in scene.objects_mut() {
            let Some(binding) = obj.binding.clone() else {
                continue;
            };
            match (data.field_for_key(&binding), &mut obj.kind) {
                (Some(BoundContent::Text(value)), ObjectKind::Text(text)) => {
                    text.content = value;
                }
                (Some(BoundContent::Image(url)), ObjectKind::Image(image)) => {
                    if !url.is_empty() {
                        image.source = url;
                    }
                }
                _ => {}
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_binding_key_normalization() {
        assert_eq!(normalize_binding_key("gstin"), "template_gstin");
        assert_eq!(normalize_binding_key("template_gstin"), "template_gstin");
        assert_eq!(normalize_binding_key("  mobile "), "template_mobile");
    }

    #[test]
    fn test_field_resolution() {
        let data = SignageData {
            company_name: "Acme Signs".to_string(),
            logo_url: "https://cdn/logo.png".to_string(),
            additional_text: vec!["Open 24x7".to_string()],
            ..SignageData::default()
        };
        assert_eq!(
            data.field_for_key("template_company_name"),
            Some(BoundContent::Text("Acme Signs".to_string()))
        );
        assert_eq!(
            data.field_for_key("template_logo"),
            Some(BoundContent::Image("https://cdn/logo.png".to_string()))
        );
        assert_eq!(
            data.field_for_key("template_additional_1"),
            Some(BoundContent::Text("Open 24x7".to_string()))
        );
        assert_eq!(data.field_for_key("template_additional_2"), None);
        assert_eq!(data.field_for_key("template_custom_thing"), None);
        assert_eq!(data.field_for_key("unprefixed"), None);
    }

    #[test]
    fn test_library_scoping() {
        let mut library = TemplateLibrary::new();
        let mut scoped = Template::new("t1", "Shop Front", TemplateSource::Blank);
        scoped.universal = false;
        scoped.product_id = Some("acrylic-board".to_string());
        library.add(scoped).unwrap();
        library
            .add(Template::new("t2", "Banner", TemplateSource::Blank))
            .unwrap();

        assert_eq!(library.list_for_product("acrylic-board").len(), 2);
        assert_eq!(library.list_for_product("flex-banner").len(), 1);
        assert_eq!(library.search("ban").len(), 1);
    }

    #[test]
    fn test_duplicate_id_rejected() {
        let mut library = TemplateLibrary::new();
        library
            .add(Template::new("t1", "One", TemplateSource::Blank))
            .unwrap();
        assert!(library
            .add(Template::new("t1", "Two", TemplateSource::Blank))
            .is_err());
    }

    #[test]
    fn test_builtin_list_always_has_blank() {
        let templates = builtin_templates();
        assert!(templates.iter().any(|t| t.id == "blank"));
    }
}
