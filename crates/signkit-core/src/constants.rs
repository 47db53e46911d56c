//! Engine-wide constants.
//!
//! The editing and export resolutions are independent: all in-memory object
//! coordinates live in the editing pixel space, while export rescales into
//! its own pixel space at serialization time. Neither calculation may use the
//! other's constant.

/// Resolution of the editing pixel space, in pixels per inch.
pub const EDIT_DPI: f64 = 96.0;

/// Resolution of the export pixel space, in pixels per inch.
pub const EXPORT_DPI: f64 = 300.0;

/// Fraction of the container the fitted design surface may fill.
pub const VIEWPORT_FILL: f64 = 0.95;

/// Lower bound for the viewport fit scale.
pub const MIN_VIEW_SCALE: f64 = 0.1;

/// Upper bound for the viewport fit scale.
pub const MAX_VIEW_SCALE: f64 = 1.0;

/// Safety-zone inset, as a fraction of the smaller canvas dimension.
pub const SAFETY_MARGIN_RATIO: f64 = 0.05;

/// Offset applied to duplicated objects, in design pixels (both axes).
pub const DUPLICATE_OFFSET: f64 = 20.0;

/// Snap distance for drag-time alignment guides, in design pixels.
pub const SNAP_TOLERANCE: f64 = 6.0;

/// Maximum number of history snapshots retained.
pub const HISTORY_LIMIT: usize = 50;

/// Quiet window for coalescing property edits into one snapshot.
pub const COALESCE_WINDOW_MS: u64 = 500;

/// Horizontal padding added to a text box beyond its measured width.
pub const AUTOFIT_PADDING: f64 = 20.0;

/// Width of one character relative to the font size, used when no font
/// metrics are available.
pub const AVG_CHAR_WIDTH_RATIO: f64 = 0.6;
