//! Error handling for SignKit
//!
//! Provides error types for all layers of the design engine:
//! - Template errors (records, fetch, instantiation)
//! - Asset errors (vector artwork, images, fonts)
//! - Snapshot errors (scene persistence)
//! - Export errors (document generation)
//!
//! All error types use `thiserror` for ergonomic error handling.

use thiserror::Error;

/// Template error type
///
/// Represents errors raised while loading, parsing, or instantiating
/// design templates.
#[derive(Error, Debug, Clone)]
pub enum TemplateError {
    /// Template id not present in the library
    #[error("Template not found: {id}")]
    NotFound {
        /// The template id that was not found.
        id: String,
    },

    /// Template record is structurally invalid
    #[error("Invalid template '{id}': {reason}")]
    InvalidRecord {
        /// The offending template id.
        id: String,
        /// Why the record was rejected.
        reason: String,
    },

    /// Remote template fetch failed
    #[error("Template fetch failed: {reason}")]
    Fetch {
        /// The reason the fetch failed.
        reason: String,
    },

    /// Generic template error
    #[error("Template error: {message}")]
    Other {
        /// The error message.
        message: String,
    },
}

/// Asset error type
///
/// Represents errors raised while fetching or decoding external assets
/// (vector artwork, uploaded images, font data).
#[derive(Error, Debug, Clone)]
pub enum AssetError {
    /// Asset could not be fetched
    #[error("Failed to fetch asset '{reference}': {reason}")]
    Fetch {
        /// The asset reference that failed.
        reference: String,
        /// The reason the fetch failed.
        reason: String,
    },

    /// Asset bytes could not be decoded
    #[error("Failed to decode asset '{reference}': {reason}")]
    Decode {
        /// The asset reference that failed.
        reference: String,
        /// The reason decoding failed.
        reason: String,
    },

    /// No usable font face for the requested family
    #[error("Font unavailable: {family}")]
    FontUnavailable {
        /// The requested font family.
        family: String,
    },
}

/// Snapshot error type
///
/// Represents errors raised while serializing or restoring scene snapshots.
#[derive(Error, Debug, Clone)]
pub enum SnapshotError {
    /// Object kind not recognized by this version
    #[error("Unknown object kind: {kind}")]
    UnknownKind {
        /// The unrecognized kind tag.
        kind: String,
    },

    /// Snapshot payload could not be parsed
    #[error("Failed to parse snapshot: {reason}")]
    Parse {
        /// The reason parsing failed.
        reason: String,
    },

    /// Snapshot format version not supported
    #[error("Unsupported snapshot version: {version}")]
    UnsupportedVersion {
        /// The version string found in the snapshot.
        version: String,
    },
}

/// Export error type
///
/// Represents errors raised by the export pipeline.
#[derive(Error, Debug, Clone)]
pub enum ExportError {
    /// Rasterization surface could not be created
    #[error("Raster error: {reason}")]
    Raster {
        /// The reason rasterization failed.
        reason: String,
    },

    /// Output encoding failed
    #[error("Encode error: {reason}")]
    Encode {
        /// The reason encoding failed.
        reason: String,
    },
}

/// Main error type for SignKit
///
/// A unified error type that can represent any error from all layers.
/// This is the primary error type used in public APIs.
#[derive(Error, Debug)]
pub enum Error {
    /// Template error
    #[error(transparent)]
    Template(#[from] TemplateError),

    /// Asset error
    #[error(transparent)]
    Asset(#[from] AssetError),

    /// Snapshot error
    #[error(transparent)]
    Snapshot(#[from] SnapshotError),

    /// Export error
    #[error(transparent)]
    Export(#[from] ExportError),

    /// Standard I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic error
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Create an error from a string message
    pub fn other(msg: impl Into<String>) -> Self {
        Error::Other(msg.into())
    }

    /// Check if this is a template error
    pub fn is_template_error(&self) -> bool {
        matches!(self, Error::Template(_))
    }

    /// Check if this is an asset error
    pub fn is_asset_error(&self) -> bool {
        matches!(self, Error::Asset(_))
    }
}

/// Result type using Error
pub type Result<T> = std::result::Result<T, Error>;
