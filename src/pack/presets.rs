//! Pack presets stored as TOML files
//!
//! A preset keeps the channel routing and the packed suffix. Output
//! location and overwrite behaviour stay with the project.

use std::fs;
use std::path::{Path, PathBuf};

use config::{Config, File, FileFormat};
use log::debug;
use serde::{Deserialize, Serialize};

use super::PackError;
use super::settings::{ChannelSource, PackSettings};

type Result<T> = std::result::Result<T, PackError>;

/// Saved channel routing
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct PackPreset {
    pub r: ChannelSource,
    pub g: ChannelSource,
    pub b: ChannelSource,
    pub a: ChannelSource,
    pub packed_suffix: String,
}

impl From<&PackSettings> for PackPreset {
    fn from(settings: &PackSettings) -> Self {
        Self {
            r: settings.r.clone(),
            g: settings.g.clone(),
            b: settings.b.clone(),
            a: settings.a.clone(),
            packed_suffix: settings.packed_suffix.clone(),
        }
    }
}

impl PackPreset {
    /// Copy the preset's routing into project settings
    pub fn apply_to(self, settings: &mut PackSettings) {
        settings.r = self.r;
        settings.g = self.g;
        settings.b = self.b;
        settings.a = self.a;
        settings.packed_suffix = self.packed_suffix;
    }
}

fn preset_path(dir: &Path, name: &str) -> Result<PathBuf> {
    let name = name.trim();
    if name.is_empty() || name.contains(['/', '\\']) || name.starts_with('.') {
        return Err(PackError::InvalidPresetName(name.to_string()));
    }
    Ok(dir.join(format!("{name}.toml")))
}

/// Write `settings` as preset `name`, replacing an existing one
///
/// # Errors
///
/// Returns `PackError::InvalidPresetName` for names that are not plain file
/// names, and `PackError::Io`/`PackError::PresetWrite` when writing fails.
pub fn save_preset(dir: &Path, name: &str, settings: &PackSettings) -> Result<PathBuf> {
    let path = preset_path(dir, name)?;
    fs::create_dir_all(dir)?;
    let text = toml::to_string_pretty(&PackPreset::from(settings))?;
    fs::write(&path, text)?;
    debug!("Saved pack preset to {}", path.display());
    Ok(path)
}

/// Read preset `name`
///
/// # Errors
///
/// Returns `PackError::PresetNotFound` when there is no such preset and
/// `PackError::PresetFormat` when the file cannot be parsed.
pub fn load_preset(dir: &Path, name: &str) -> Result<PackPreset> {
    let path = preset_path(dir, name)?;
    if !path.exists() {
        return Err(PackError::PresetNotFound(name.to_string()));
    }
    let preset = Config::builder()
        .add_source(File::from(path).format(FileFormat::Toml))
        .build()?
        .try_deserialize()?;
    Ok(preset)
}

/// Names of all stored presets, sorted
///
/// # Errors
///
/// Returns `PackError::Io` when the directory cannot be read.
pub fn list_presets(dir: &Path) -> Result<Vec<String>> {
    if !dir.exists() {
        return Ok(Vec::new());
    }
    let mut names: Vec<String> = fs::read_dir(dir)?
        .filter_map(std::result::Result::ok)
        .map(|entry| entry.path())
        .filter(|path| path.extension().is_some_and(|ext| ext == "toml"))
        .filter_map(|path| path.file_stem().map(|s| s.to_string_lossy().into_owned()))
        .collect();
    names.sort();
    Ok(names)
}

/// Delete preset `name`; returns false if it did not exist
///
/// # Errors
///
/// Returns `PackError::Io` when the file cannot be removed.
pub fn remove_preset(dir: &Path, name: &str) -> Result<bool> {
    let path = preset_path(dir, name)?;
    if !path.exists() {
        return Ok(false);
    }
    fs::remove_file(path)?;
    Ok(true)
}
