//! Measurement units for physical design dimensions.
//!
//! A design's width and height are authored in inches, centimeters, or
//! millimeters; pixel sizes are derived from the unit and a DPI constant.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Physical unit a design is authored in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Unit {
    /// Inches
    #[serde(rename = "in")]
    Inches,
    /// Centimeters
    #[serde(rename = "cm")]
    Centimeters,
    /// Millimeters
    #[serde(rename = "mm")]
    Millimeters,
}

impl Default for Unit {
    fn default() -> Self {
        Self::Inches
    }
}

impl Unit {
    /// Conversion factor from this unit to inches.
    pub fn to_inches(self) -> f64 {
        match self {
            Self::Inches => 1.0,
            Self::Centimeters => 1.0 / 2.54,
            Self::Millimeters => 1.0 / 25.4,
        }
    }

    /// Short label ("in", "cm", "mm") as used in filenames and SVG sizes.
    pub fn label(self) -> &'static str {
        match self {
            Self::Inches => "in",
            Self::Centimeters => "cm",
            Self::Millimeters => "mm",
        }
    }
}

impl fmt::Display for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Unit {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "in" | "inch" | "inches" => Ok(Self::Inches),
            "cm" | "centimeter" | "centimeters" => Ok(Self::Centimeters),
            "mm" | "millimeter" | "millimeters" => Ok(Self::Millimeters),
            _ => Err(format!("Unknown unit: {}", s)),
        }
    }
}

/// Converts a length in the given unit to pixels at the given resolution.
pub fn to_pixels(value: f64, unit: Unit, dpi: f64) -> f64 {
    value * unit.to_inches() * dpi
}

/// Converts a width/height pair to a rounded pixel size at the given
/// resolution.
pub fn to_pixel_size(width: f64, height: f64, unit: Unit, dpi: f64) -> (u32, u32) {
    (
        to_pixels(width, unit, dpi).round() as u32,
        to_pixels(height, unit, dpi).round() as u32,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::{EDIT_DPI, EXPORT_DPI};

    #[test]
    fn test_unit_parsing() {
        assert_eq!(Unit::from_str("in").unwrap(), Unit::Inches);
        assert_eq!(Unit::from_str("  CM ").unwrap(), Unit::Centimeters);
        assert_eq!(Unit::from_str("millimeters").unwrap(), Unit::Millimeters);
        assert!(Unit::from_str("furlong").is_err());
    }

    #[test]
    fn test_unit_labels() {
        assert_eq!(Unit::Inches.label(), "in");
        assert_eq!(Unit::Centimeters.label(), "cm");
        assert_eq!(Unit::Millimeters.label(), "mm");
    }

    #[test]
    fn test_pixel_conversion() {
        assert_eq!(to_pixels(1.0, Unit::Inches, 96.0), 96.0);
        assert_eq!(to_pixels(25.4, Unit::Millimeters, 300.0), 300.0);
        assert_eq!(to_pixels(2.54, Unit::Centimeters, 100.0), 100.0);
    }

    #[test]
    fn test_edit_and_export_spaces_are_independent() {
        // 24in x 16in authored size
        let edit = to_pixel_size(24.0, 16.0, Unit::Inches, EDIT_DPI);
        let export = to_pixel_size(24.0, 16.0, Unit::Inches, EXPORT_DPI);
        assert_eq!(edit, (2304, 1536));
        assert_eq!(export, (7200, 4800));
        assert_ne!(edit, export);
    }

    #[test]
    fn test_rounding() {
        // 10cm at 96dpi = 377.95... px
        let (w, _) = to_pixel_size(10.0, 10.0, Unit::Centimeters, 96.0);
        assert_eq!(w, 378);
    }
}
