//! # SignKit Designer
//!
//! This crate provides the canvas design engine for assembling printable
//! signage layouts: text, logos, shapes, icons, and imagery inside a bounded
//! canvas, exported to a print-ready vector document.
//!
//! ## Core Components
//!
//! ### Design Elements
//! - **Scene graph**: ordered list of visual objects with z-order, locking,
//!   background designation, and grouping
//! - **Templates**: snapshot-form and vector-asset-form layouts with live
//!   data bindings
//! - **Auto-fit**: text boxes sized to their rendered content
//! - **Alignment**: drag-time snapping plus discrete align/distribute
//!
//! ### Infrastructure
//! - **History**: snapshot-based undo/redo with coalesced property edits
//! - **Safety validation**: advisory bleed-margin checking
//! - **Unit conversion**: physical dimensions mapped independently into the
//!   editing and export pixel spaces
//! - **Export**: physically-dimensioned SVG with embedded fonts, paginated
//!   derivation, and raster thumbnails
//!
//! ## Architecture
//!
//! ```text
//! DesignSession (commands, dependency wiring)
//!   ├── Scene (object list, structural mutations)
//!   ├── History (snapshot stack, coalescing queue)
//!   ├── TemplateEngine (instantiation, content-sync, stale guards)
//!   ├── FitScheduler (refit passes)
//!   ├── SafetyZone (advisory flag)
//!   └── Exporter (SVG / paged / thumbnail)
//! ```
//!
//! ## Usage
//!
//! ```rust
//! use std::sync::Arc;
//! use signkit_designer::{DesignConfig, DesignSession, FontCatalog, TextVariant};
//!
//! let catalog = Arc::new(FontCatalog::empty());
//! let mut session = DesignSession::new(DesignConfig::default(), catalog);
//! let id = session.add_text(TextVariant::Heading, "Acme Signs");
//! session.undo();
//! assert!(session.scene().is_empty());
//! let _ = id;
//! ```

pub mod align;
pub mod autofit;
pub mod config;
pub mod export;
pub mod fonts;
pub mod history;
pub mod model;
pub mod safety;
pub mod scene;
pub mod serialization;
pub mod session;
pub mod templates;
pub mod viewport;

pub use align::{AlignCommand, Axis, Guide, GuideOrientation, SnapResult};
pub use autofit::{FitPass, FitScheduler};
pub use config::{Background, DesignConfig};
pub use export::{export_file_name, Exporter, FontFace, PagedDocument, SvgDocument};
pub use fonts::FontCatalog;
pub use history::History;
pub use model::{
    Geometry, GroupObject, IconObject, ImageObject, ObjectKind, Point, SceneObject, ShapeKind,
    ShapeObject, TextAlign, TextObject, TextStyle, TextVariant,
};
pub use safety::SafetyZone;
pub use scene::Scene;
pub use serialization::{ObjectData, SceneSnapshot};
pub use session::DesignSession;
pub use templates::{
    normalize_binding_key, builtin_templates, AssetFetcher, BoundContent, ComponentBinding,
    LoadTicket, LogoSlot, SignageData, Template, TemplateEngine, TemplateLibrary, TemplateProvider,
    TemplateSource, TextRegion,
};
pub use viewport::{fit_scale, ViewportFit};
