//! Configuration module for pakpal
//!
//! Global preferences shared by all projects: where each project's store
//! lives, the suffix tokens used for bundling, path sanitizing and the
//! patterns used to find images. Stored as TOML in the user's config
//! directory; `PAKPAL_*` environment variables override file values.

mod setup;

pub use setup::first_time_setup;

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use config::{Config, ConfigError, Environment, File, FileFormat};
use serde::{Deserialize, Serialize};

use crate::lists::PresetList;

/// Suffix tokens seeded on first run
pub const DEFAULT_SUFFIX_TOKENS: [&str; 5] = ["BaseColor", "Height", "Metallic", "Normal", "Roughness"];

/// File patterns scanned in a project's source directory by default
pub const DEFAULT_IMAGE_PATTERNS: [&str; 9] = [
    "*.png", "*.jpg", "*.jpeg", "*.tga", "*.tif", "*.tiff", "*.bmp", "*.hdr", "*.webp",
];

/// Application configuration structure
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct PakConfig {
    /// Map of project names to their store directories
    #[serde(default)]
    pub projects: HashMap<String, PathBuf>,

    /// The project used when none is specified
    #[serde(default)]
    pub default_project: Option<String>,

    /// Suppress informational output by default
    #[serde(default)]
    pub quiet: bool,

    /// Ordered suffix tokens ("material slots") used to bundle images
    #[serde(default = "default_suffix_tokens")]
    pub suffix_tokens: PresetList<String>,

    /// Replace characters that are invalid in paths when exporting
    #[serde(default = "default_true")]
    pub replace_invalid_chars: bool,

    /// Glob patterns of image files, relative to the source directory
    #[serde(default = "default_image_patterns")]
    pub image_patterns: Vec<String>,
}

fn default_true() -> bool {
    true
}

fn default_suffix_tokens() -> PresetList<String> {
    PresetList::from_items(DEFAULT_SUFFIX_TOKENS.iter().map(ToString::to_string).collect())
}

fn default_image_patterns() -> Vec<String> {
    DEFAULT_IMAGE_PATTERNS.iter().map(ToString::to_string).collect()
}

impl Default for PakConfig {
    fn default() -> Self {
        Self {
            projects: HashMap::new(),
            default_project: None,
            quiet: false,
            suffix_tokens: default_suffix_tokens(),
            replace_invalid_chars: true,
            image_patterns: default_image_patterns(),
        }
    }
}

/// Keys accepted by `pakpal config get/set`
pub const SETTABLE_KEYS: [&str; 4] = ["quiet", "replace_invalid_chars", "image_patterns", "default_project"];

impl PakConfig {
    /// Directory holding the config file and pack presets
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the system config directory cannot be determined.
    pub fn config_dir() -> Result<PathBuf, ConfigError> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| ConfigError::Message("Could not determine config directory".to_string()))?;
        Ok(config_dir.join("pakpal"))
    }

    /// Get the path to the config file
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the system config directory cannot be determined.
    pub fn config_path() -> Result<PathBuf, ConfigError> {
        Ok(Self::config_dir()?.join("config.toml"))
    }

    /// Directory where pack presets are stored
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the system config directory cannot be determined.
    pub fn presets_dir() -> Result<PathBuf, ConfigError> {
        Ok(Self::config_dir()?.join("pack_presets"))
    }

    /// Load configuration from file, creating default if it doesn't exist
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the config file cannot be read, parsed, or created.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(&Self::config_path()?)
    }

    /// Load configuration from a specific file, creating it if missing
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the file cannot be read, parsed, or created.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            let default_config = Self::default();
            default_config.save_to(path)?;
            return Ok(default_config);
        }

        let settings = Config::builder()
            .add_source(File::from(path).format(FileFormat::Toml))
            .add_source(Environment::with_prefix("PAKPAL").try_parsing(true))
            .build()?;

        settings.try_deserialize()
    }

    /// Save configuration to file
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the config directory cannot be created, the configuration
    /// cannot be serialized to TOML, or the file cannot be written.
    pub fn save(&self) -> Result<(), ConfigError> {
        self.save_to(&Self::config_path()?)
    }

    /// Save configuration to a specific file
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the directory cannot be created, the configuration
    /// cannot be serialized to TOML, or the file cannot be written.
    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .map_err(|e| ConfigError::Message(format!("Failed to create config directory: {e}")))?;
        }

        let toml_string = toml::to_string_pretty(self)
            .map_err(|e| ConfigError::Message(format!("Failed to serialize config: {e}")))?;

        fs::write(path, toml_string)
            .map_err(|e| ConfigError::Message(format!("Failed to write config file: {e}")))?;

        Ok(())
    }

    /// Load configuration, running first-time setup if config doesn't exist
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if loading or creating the configuration fails.
    pub fn load_or_setup() -> Result<Self, ConfigError> {
        let config_path = Self::config_path()?;

        if config_path.exists() {
            Self::load()
        } else {
            first_time_setup()
        }
    }

    /// Register a project store
    pub fn add_project(&mut self, name: String, store: PathBuf) {
        if self.default_project.is_none() {
            self.default_project = Some(name.clone());
        }
        self.projects.insert(name, store);
    }

    /// Forget a project; clears the default if it pointed at it
    pub fn remove_project(&mut self, name: &str) -> Option<PathBuf> {
        let removed = self.projects.remove(name);
        if self.default_project.as_deref() == Some(name) {
            self.default_project = None;
        }
        removed
    }

    #[must_use]
    pub fn get_project(&self, name: &str) -> Option<&PathBuf> {
        self.projects.get(name)
    }

    /// Project names in alphabetical order
    #[must_use]
    pub fn list_projects(&self) -> Vec<&String> {
        let mut names: Vec<&String> = self.projects.keys().collect();
        names.sort();
        names
    }

    /// Set the default project
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the project name doesn't exist in the configuration.
    pub fn set_default_project(&mut self, name: String) -> Result<(), ConfigError> {
        if !self.projects.contains_key(&name) {
            return Err(ConfigError::Message(format!(
                "Project '{name}' does not exist in configuration"
            )));
        }
        self.default_project = Some(name);
        Ok(())
    }

    /// Put the suffix tokens back to the defaults
    pub fn reset_suffix_tokens(&mut self) {
        self.suffix_tokens = default_suffix_tokens();
    }

    /// Read a setting as text
    #[must_use]
    pub fn get_value(&self, key: &str) -> Option<String> {
        match key {
            "quiet" => Some(self.quiet.to_string()),
            "replace_invalid_chars" => Some(self.replace_invalid_chars.to_string()),
            "image_patterns" => Some(self.image_patterns.join(", ")),
            "default_project" => Some(self.default_project.clone().unwrap_or_default()),
            _ => None,
        }
    }

    /// Change a setting from text
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` for unknown keys or values that do not parse.
    pub fn set_value(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        let parse_bool = |v: &str| {
            v.trim()
                .parse::<bool>()
                .map_err(|_| ConfigError::Message(format!("'{v}' is not a boolean for {key}")))
        };
        match key {
            "quiet" => self.quiet = parse_bool(value)?,
            "replace_invalid_chars" => self.replace_invalid_chars = parse_bool(value)?,
            "image_patterns" => {
                let patterns: Vec<String> = value
                    .split(',')
                    .map(str::trim)
                    .filter(|p| !p.is_empty())
                    .map(ToString::to_string)
                    .collect();
                for pattern in &patterns {
                    glob::Pattern::new(pattern)
                        .map_err(|e| ConfigError::Message(format!("Invalid pattern '{pattern}': {e}")))?;
                }
                self.image_patterns = patterns;
            }
            "default_project" => self.set_default_project(value.trim().to_string())?,
            _ => {
                return Err(ConfigError::Message(format!(
                    "Unknown setting '{key}'. Available settings: {}",
                    SETTABLE_KEYS.join(", ")
                )));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_config() {
        let config = PakConfig::default();
        assert!(config.projects.is_empty());
        assert!(config.default_project.is_none());
        assert!(config.replace_invalid_chars);
        assert_eq!(config.suffix_tokens.items(), DEFAULT_SUFFIX_TOKENS);
        assert!(config.image_patterns.iter().any(|p| p == "*.png"));
    }

    #[test]
    fn test_first_project_becomes_default() {
        let mut config = PakConfig::default();
        config.add_project("castle".into(), PathBuf::from("/tmp/castle"));
        config.add_project("forest".into(), PathBuf::from("/tmp/forest"));

        assert_eq!(config.default_project.as_deref(), Some("castle"));
        assert_eq!(config.list_projects(), ["castle", "forest"]);
        assert_eq!(config.get_project("forest"), Some(&PathBuf::from("/tmp/forest")));
    }

    #[test]
    fn test_remove_default_project() {
        let mut config = PakConfig::default();
        config.add_project("castle".into(), PathBuf::from("/tmp/castle"));

        assert!(config.remove_project("castle").is_some());
        assert!(config.default_project.is_none());
        assert!(config.remove_project("castle").is_none());
    }

    #[test]
    fn test_set_default_requires_known_project() {
        let mut config = PakConfig::default();
        assert!(config.set_default_project("nope".into()).is_err());
        config.add_project("a".into(), PathBuf::from("/tmp/a"));
        config.add_project("b".into(), PathBuf::from("/tmp/b"));
        config.set_default_project("b".into()).unwrap();
        assert_eq!(config.default_project.as_deref(), Some("b"));
    }

    #[test]
    fn test_save_and_load_round_trip() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("pakpal").join("config.toml");

        let mut config = PakConfig::default();
        config.add_project("castle".into(), tmp.path().join("store"));
        config.suffix_tokens.push("AO".to_string());
        config.suffix_tokens.select(5);
        config.save_to(&path).unwrap();

        let loaded = PakConfig::load_from(&path).unwrap();
        assert_eq!(loaded, config);
        assert_eq!(loaded.suffix_tokens.selected().map(String::as_str), Some("AO"));
    }

    #[test]
    fn test_load_missing_file_writes_defaults() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("config.toml");

        let loaded = PakConfig::load_from(&path).unwrap();
        assert!(path.exists());
        assert_eq!(loaded, PakConfig::default());
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("config.toml");
        fs::write(&path, "quiet = true\n").unwrap();

        let loaded = PakConfig::load_from(&path).unwrap();
        assert!(loaded.quiet);
        assert!(loaded.replace_invalid_chars);
        assert_eq!(loaded.suffix_tokens.len(), DEFAULT_SUFFIX_TOKENS.len());
    }

    #[test]
    fn test_get_and_set_values() {
        let mut config = PakConfig::default();
        config.set_value("quiet", "true").unwrap();
        config.set_value("image_patterns", "*.png, *.exr").unwrap();

        assert_eq!(config.get_value("quiet").as_deref(), Some("true"));
        assert_eq!(config.image_patterns, ["*.png", "*.exr"]);
        assert!(config.set_value("quiet", "maybe").is_err());
        assert!(config.set_value("colour", "red").is_err());
        assert!(config.set_value("image_patterns", "[").is_err());
        assert!(config.get_value("colour").is_none());
    }

    #[test]
    fn test_reset_suffix_tokens() {
        let mut config = PakConfig::default();
        config.suffix_tokens.clear();
        config.reset_suffix_tokens();
        assert_eq!(config.suffix_tokens.items(), DEFAULT_SUFFIX_TOKENS);
    }
}
