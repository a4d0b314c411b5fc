//! Export: locations, formats, target resolution and file writing
//!
//! - [`paths`]: export location templates and `^tag^` substitution
//! - [`formats`]: export format presets and their encoders
//! - [`resolver`]: which images get exported where
//! - [`runner`]: writes the resolved targets to disk

pub mod formats;
pub mod paths;
pub mod resolver;
pub mod runner;

pub use formats::{ColorDepth, ColorMode, ExportFormat, FileFormat, Jpeg2kCodec, TiffCodec};
pub use paths::{PathTag, TagContext, append_path_tag, resolve_path};
pub use resolver::{ExportMode, ExportTarget, Resolution, resolve_export_targets};
pub use runner::{ExportContext, ExportReport, export_targets};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::LocationId;

/// Export-specific errors
#[derive(Debug, Error)]
pub enum ExportError {
    /// The location has no path template
    #[error("This export location has no path defined, please define it!")]
    EmptyLocationPath,

    /// No encoder is available for the file format
    #[error("No encoder available for {0} images")]
    UnsupportedFormat(String),

    /// Decoding or encoding failed
    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),

    /// Directory creation or file write failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// A named, taggable export destination
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct ExportLocation {
    pub id: LocationId,
    pub name: String,
    /// Path template, may contain `^tag^` placeholders
    pub path: String,
}

impl ExportLocation {
    #[must_use]
    pub fn new(name: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            id: LocationId::new(),
            name: name.into(),
            path: path.into(),
        }
    }
}
