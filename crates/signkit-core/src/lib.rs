//! # SignKit Core
//!
//! Core types and utilities for SignKit.
//! Provides measurement units, engine-wide constants, and the shared
//! error types used across the design engine.

pub mod constants;
pub mod error;
pub mod units;

pub use error::{AssetError, Error, ExportError, Result, SnapshotError, TemplateError};
pub use units::Unit;
