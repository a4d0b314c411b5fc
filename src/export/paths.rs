//! Export location path templates
//!
//! A location path may contain tags such as `^bundle_name^` or
//! `^export_date_ymd^` that are filled in at export time. Unknown tags are
//! left untouched. Resolving a path also sanitizes characters that are not
//! valid on the current platform and creates the directory.

use std::fmt;
use std::fs;
use std::path::{MAIN_SEPARATOR, Path, PathBuf};
use std::str::FromStr;
use std::sync::LazyLock;

use chrono::{DateTime, Local};
use log::debug;
use regex::{Captures, Regex};

use super::ExportError;

static TAG_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\^([A-Za-z0-9_]+)\^").expect("tag pattern is a valid regex")
});

/// Characters replaced in bare names (bundle names, file names)
#[cfg(windows)]
const INVALID_NAME_CHARS: &[char] = &['\\', '/', '*', '?', '"', '<', '>', '|', ':'];
#[cfg(not(windows))]
const INVALID_NAME_CHARS: &[char] = &[':', '/'];

/// Characters replaced in full paths
#[cfg(windows)]
const INVALID_PATH_CHARS: &[char] = &['*', '?', '"', '<', '>', '|', ':'];
#[cfg(not(windows))]
const INVALID_PATH_CHARS: &[char] = &[':'];

/// A placeholder that can be inserted into a location path
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PathTag {
    BundleName,
    BlendFileName,
    ExportDateYmd,
    ExportDateDmy,
    ExportDateMdy,
    ExportTimeHm,
    ExportTimeHms,
}

impl PathTag {
    pub const ALL: [Self; 7] = [
        Self::BundleName,
        Self::BlendFileName,
        Self::ExportDateYmd,
        Self::ExportDateDmy,
        Self::ExportDateMdy,
        Self::ExportTimeHm,
        Self::ExportTimeHms,
    ];

    /// The name written between the `^` markers
    #[must_use]
    pub const fn token(self) -> &'static str {
        match self {
            Self::BundleName => "bundle_name",
            Self::BlendFileName => "blend_file_name",
            Self::ExportDateYmd => "export_date_ymd",
            Self::ExportDateDmy => "export_date_dmy",
            Self::ExportDateMdy => "export_date_mdy",
            Self::ExportTimeHm => "export_time_hm",
            Self::ExportTimeHms => "export_time_hms",
        }
    }

    #[must_use]
    pub const fn description(self) -> &'static str {
        match self {
            Self::BundleName => "A folder named after the bundle being exported",
            Self::BlendFileName => "A folder named after the project",
            Self::ExportDateYmd => "Export date (Year-Month-Day)",
            Self::ExportDateDmy => "Export date (Day-Month-Year)",
            Self::ExportDateMdy => "Export date (Month-Day-Year)",
            Self::ExportTimeHm => "Export time (Hour.Minute)",
            Self::ExportTimeHms => "Export time (Hour.Minute.Second)",
        }
    }

    /// The text substituted for this tag
    #[must_use]
    pub fn value(self, context: &TagContext<'_>, replace_invalid_chars: bool) -> String {
        let name = |raw: &str| {
            if replace_invalid_chars {
                sanitize_name(raw)
            } else {
                raw.to_string()
            }
        };
        match self {
            Self::BundleName => name(context.bundle_name),
            Self::BlendFileName => name(context.project_name),
            Self::ExportDateYmd => context.now.format("%Y-%m-%d").to_string(),
            Self::ExportDateDmy => context.now.format("%d-%m-%Y").to_string(),
            Self::ExportDateMdy => context.now.format("%m-%d-%Y").to_string(),
            Self::ExportTimeHm => context.now.format("%H.%M").to_string(),
            Self::ExportTimeHms => context.now.format("%H.%M.%S").to_string(),
        }
    }
}

impl fmt::Display for PathTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.token())
    }
}

impl FromStr for PathTag {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim().trim_matches('^');
        Self::ALL
            .into_iter()
            .find(|tag| tag.token() == s)
            .ok_or_else(|| {
                let known: Vec<&str> = Self::ALL.iter().map(|t| t.token()).collect();
                format!("Unknown path tag '{s}'. Available tags: {}", known.join(", "))
            })
    }
}

/// Values available to tag substitution
#[derive(Debug, Clone, Copy)]
pub struct TagContext<'a> {
    pub bundle_name: &'a str,
    pub project_name: &'a str,
    /// Directory `//`-relative templates are resolved against
    pub base_dir: &'a Path,
    pub now: DateTime<Local>,
}

/// Replace characters that are invalid in a file or folder name
#[must_use]
pub fn sanitize_name(name: &str) -> String {
    name.replace(INVALID_NAME_CHARS, "_")
}

/// Replace characters that are invalid anywhere in a path
#[must_use]
pub fn sanitize_path(path: &str) -> String {
    path.replace(INVALID_PATH_CHARS, "_")
}

/// Substitute every known `^tag^` in `template`
#[must_use]
pub fn fill_tags(template: &str, context: &TagContext<'_>, replace_invalid_chars: bool) -> String {
    TAG_PATTERN
        .replace_all(template, |caps: &Captures<'_>| {
            caps[1].parse::<PathTag>().map_or_else(
                |_| caps[0].to_string(),
                |tag| tag.value(context, replace_invalid_chars),
            )
        })
        .into_owned()
}

/// Resolve a location template into a directory that exists on disk
///
/// # Errors
///
/// Returns `ExportError::EmptyLocationPath` when the template is empty and
/// `ExportError::Io` when the directory cannot be created.
pub fn resolve_path(
    template: &str,
    context: &TagContext<'_>,
    replace_invalid_chars: bool,
) -> Result<PathBuf, ExportError> {
    if template.trim().is_empty() {
        return Err(ExportError::EmptyLocationPath);
    }

    let template = match template.strip_prefix("//") {
        Some(relative) => context.base_dir.join(relative).to_string_lossy().into_owned(),
        None => template.to_string(),
    };

    let filled = fill_tags(&template, context, replace_invalid_chars);
    let (drive, mut rest) = split_drive(&filled);

    if !rest.ends_with(['/', MAIN_SEPARATOR]) {
        rest.push(MAIN_SEPARATOR);
    }
    if replace_invalid_chars {
        rest = sanitize_path(&rest);
    }

    let resolved = PathBuf::from(format!("{drive}{rest}"));
    if !resolved.exists() {
        debug!("Creating export directory {}", resolved.display());
    }
    fs::create_dir_all(&resolved)?;
    Ok(resolved)
}

/// Split a Windows drive prefix (`C:\`) off so its colon survives sanitizing
fn split_drive(path: &str) -> (&str, String) {
    if cfg!(windows)
        && let Some(idx) = path.find(['\\', '/'])
        && path[..idx].ends_with(':')
    {
        return (&path[..=idx], path[idx + 1..].to_string());
    }
    ("", path.to_string())
}

/// Append a `^tag^` folder to a location template
#[must_use]
pub fn append_path_tag(template: &str, tag: PathTag) -> String {
    let mut path = template.to_string();
    if !path.is_empty() && !path.ends_with(['/', '\\']) {
        path.push(MAIN_SEPARATOR);
    }
    path.push('^');
    path.push_str(tag.token());
    path.push('^');
    path.push(MAIN_SEPARATOR);
    path
}
