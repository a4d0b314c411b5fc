//! Bundles: groups of images sharing a base name
//!
//! A bundle collects the images of one texture set, e.g. `Rock_BaseColor.png`
//! and `Rock_Normal.png` become the bundle `Rock`. Bundles are rebuilt from
//! scratch on every refresh and never patched incrementally.

mod builder;
pub mod matching;

pub use builder::{BundleOptions, build_bundles};
pub use matching::{SuffixMatch, find_suffix_match};

use serde::{Deserialize, Serialize};

use crate::{FormatId, LocationId};

/// An ordered group of images exported and packed together
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct Bundle {
    pub name: String,
    /// Member image names in library order
    pub members: Vec<String>,
    pub enable_export: bool,
    pub export_location: Option<LocationId>,
    pub export_format: Option<FormatId>,
    /// Checkbox state used while multi-select is enabled
    pub is_selected: bool,
}

impl Bundle {
    /// Create an empty bundle with export disabled
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            members: Vec::new(),
            enable_export: false,
            export_location: None,
            export_format: None,
            is_selected: false,
        }
    }

    /// Check whether an image belongs to this bundle
    #[must_use]
    pub fn contains(&self, image: &str) -> bool {
        self.members.iter().any(|m| m == image)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.members.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }
}
