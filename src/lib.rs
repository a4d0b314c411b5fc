//! PakPal - bundle, pack and batch-export texture sets
//!
//! This library groups the images of a project into bundles by their
//! suffix tokens ("BaseColor", "Normal", ...), assigns export locations and
//! formats to images or bundles, exports them, and packs channels from
//! several images of a bundle into one image.

use std::fmt;
use std::path::PathBuf;
use serde::{Serialize, Deserialize};
use thiserror::Error;
use uuid::Uuid;

pub mod bundle;
pub mod cli;
pub mod commands;
pub mod config;
pub mod db;
pub mod export;
pub mod library;
pub mod lists;
pub mod output;
pub mod pack;
pub mod selection;
pub mod session;

#[cfg(test)]
pub mod testing;

/// Name prefix marking an image as hidden
pub const HIDDEN_PREFIX: char = '.';

/// Error enum, contains all failure states of the program
#[derive(Debug, Error)]
pub enum PakError {
    /// Project store error
    #[error("Database error: {0}")]
    DbError(#[from] db::DbError),
    /// Export error
    #[error("Export error: {0}")]
    ExportError(#[from] export::ExportError),
    /// Image library error
    #[error("Library error: {0}")]
    LibraryError(#[from] library::LibraryError),
    /// Channel packing error
    #[error("Pack error: {0}")]
    PackError(#[from] pack::PackError),
    /// Represents a configuration error
    #[error("Configuration error: {0}")]
    ConfigError(#[from] ::config::ConfigError),
    /// Represents an I/O error
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),
    /// The project data could not be found
    #[error("PakPal data for project '{0}' cannot be found. Recreate it with `pakpal init {0} --source <dir>`")]
    MissingData(String),
    /// Invalid input error
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

/// Stable identifier of an export location
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct LocationId(pub Uuid);

/// Stable identifier of an export format
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct FormatId(pub Uuid);

impl LocationId {
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for LocationId {
    fn default() -> Self {
        Self::new()
    }
}

impl FormatId {
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for FormatId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for LocationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Display for FormatId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Export settings PakPal keeps for a single image
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq, Eq)]
pub struct ImageAnnotation {
    pub enable_export: bool,
    pub export_location: Option<LocationId>,
    pub export_format: Option<FormatId>,
}

/// An image of the project library together with its annotation
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct ImageRecord {
    /// File name including the extension, e.g. `Rock_Normal.png`
    pub name: String,
    pub path: PathBuf,
    pub annotation: ImageAnnotation,
}

impl ImageRecord {
    /// Create a record with an empty annotation
    #[must_use]
    pub fn new(name: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
            annotation: ImageAnnotation::default(),
        }
    }

    /// Hidden images are skipped unless hidden images are enabled
    #[must_use]
    pub fn is_hidden(&self) -> bool {
        self.name.starts_with(HIDDEN_PREFIX)
    }

    /// Name without the final extension
    #[must_use]
    pub fn stem(&self) -> &str {
        split_extension(&self.name).0
    }
}

/// Split a file name into stem and extension (the extension keeps its dot)
///
/// A leading dot does not start an extension, so `.hidden` has no extension.
#[must_use]
pub fn split_extension(name: &str) -> (&str, &str) {
    match name.rfind('.') {
        Some(0) | None => (name, ""),
        Some(idx) => name.split_at(idx),
    }
}
