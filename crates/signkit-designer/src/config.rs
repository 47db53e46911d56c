//! Design session configuration.
//!
//! Owned by the editing session, mutated by property panels, read by every
//! core component. A config can be rebuilt from URL-style `key=value`
//! parameters so a shared link restores the same design setup.

use serde::{Deserialize, Serialize};
use signkit_core::constants::{EDIT_DPI, EXPORT_DPI};
use signkit_core::units::{self, Unit};

/// Canvas background: a solid fill or a two-stop linear gradient.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "lowercase")]
pub enum Background {
    Solid { color: String },
    Gradient { start: String, end: String, angle: f64 },
}

impl Default for Background {
    fn default() -> Self {
        Self::Solid {
            color: "#ffffff".to_string(),
        }
    }
}

/// Session-wide design configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DesignConfig {
    pub template_id: String,
    /// Physical width in `unit`.
    pub width: f64,
    /// Physical height in `unit`.
    pub height: f64,
    pub unit: Unit,
    pub background: Background,
    pub text_color: String,
    pub font_family: String,
    /// Base font size for body text, in design pixels.
    pub font_size: f64,
    /// Font size for the company-name heading, in design pixels.
    pub company_name_size: f64,
    /// Default logo width, in design pixels.
    pub logo_size: f64,
}

impl Default for DesignConfig {
    fn default() -> Self {
        Self {
            template_id: "blank".to_string(),
            width: 24.0,
            height: 16.0,
            unit: Unit::Inches,
            background: Background::default(),
            text_color: "#1a1a2e".to_string(),
            font_family: "Arial".to_string(),
            font_size: 24.0,
            company_name_size: 48.0,
            logo_size: 150.0,
        }
    }
}

impl DesignConfig {
    /// Editing-resolution pixel size of the canvas.
    pub fn edit_size(&self) -> (u32, u32) {
        units::to_pixel_size(self.width, self.height, self.unit, EDIT_DPI)
    }

    /// Export-resolution pixel size of the canvas. Independent of the
    /// editing resolution.
    pub fn export_size(&self) -> (u32, u32) {
        units::to_pixel_size(self.width, self.height, self.unit, EXPORT_DPI)
    }

    /// Applies a single restore parameter. Unknown keys and unparsable
    /// values are ignored; returns whether the config changed.
    pub fn apply_param(&mut self, key: &str, value: &str) -> bool {
        match key {
            "template" => {
                self.template_id = value.to_string();
                true
            }
            "width" => value.parse().map(|w| self.width = w).is_ok(),
            "height" => value.parse().map(|h| self.height = h).is_ok(),
            "unit" => value.parse().map(|u| self.unit = u).is_ok(),
            "bg" => {
                self.background = Background::Solid {
                    color: value.to_string(),
                };
                true
            }
            "text_color" => {
                self.text_color = value.to_string();
                true
            }
            "font" => {
                self.font_family = value.to_string();
                true
            }
            "font_size" => value.parse().map(|s| self.font_size = s).is_ok(),
            "name_size" => value.parse().map(|s| self.company_name_size = s).is_ok(),
            "logo_size" => value.parse().map(|s| self.logo_size = s).is_ok(),
            _ => false,
        }
    }

    /// Builds a config from URL-restored parameters, starting from defaults.
    pub fn from_params<'a>(params: impl IntoIterator<Item = (&'a str, &'a str)>) -> Self {
        let mut config = Self::default();
        for (key, value) in params {
            config.apply_param(key, value);
        }
        config
    }
}
