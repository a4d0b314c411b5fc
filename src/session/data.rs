use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::bundle::Bundle;
use crate::export::{ExportFormat, ExportLocation};
use crate::lists::PresetList;
use crate::pack::PackSettings;
use crate::selection::SelectionState;

/// Per-project state persisted in the store's `meta` tree
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct FileData {
    pub project_name: String,
    /// Directory scanned for images
    pub source_dir: PathBuf,
    pub enable_bundles: bool,
    /// Include images whose name starts with `.`
    pub enable_hidden: bool,
    pub case_sensitive_matching: bool,
    /// Cursor, multi-select and proxy values
    pub selection: SelectionState,
    pub bundles: Vec<Bundle>,
    pub locations: PresetList<ExportLocation>,
    pub formats: PresetList<ExportFormat>,
    pub pack: PackSettings,
}

impl FileData {
    #[must_use]
    pub fn new(project_name: impl Into<String>, source_dir: impl Into<PathBuf>) -> Self {
        Self {
            project_name: project_name.into(),
            source_dir: source_dir.into(),
            enable_bundles: true,
            enable_hidden: false,
            case_sensitive_matching: true,
            selection: SelectionState::default(),
            bundles: Vec::new(),
            locations: PresetList::new(),
            formats: PresetList::new(),
            pack: PackSettings::default(),
        }
    }
}
