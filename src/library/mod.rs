//! Image library of a project
//!
//! The library is the flat set of image files in a project's source
//! directory. Scanning turns them into [`ImageRecord`]s; renames and deletes
//! planned by the session are applied to the files here.

use std::fs;
use std::path::{Path, PathBuf};

use glob::{MatchOptions, Pattern};
use log::{debug, info, warn};
use thiserror::Error;

use crate::ImageRecord;
use crate::session::Rename;

/// Library errors
#[derive(Debug, Error)]
pub enum LibraryError {
    #[error("Source directory {0} does not exist")]
    SourceMissing(PathBuf),

    #[error("Invalid image pattern '{pattern}': {reason}")]
    InvalidPattern { pattern: String, reason: String },

    #[error("Cannot rename to {0}: the file already exists")]
    TargetExists(PathBuf),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

type Result<T> = std::result::Result<T, LibraryError>;

const MATCH_OPTIONS: MatchOptions = MatchOptions {
    case_sensitive: false,
    require_literal_separator: true,
    require_literal_leading_dot: false,
};

fn compile_patterns(patterns: &[String]) -> Result<Vec<Pattern>> {
    patterns
        .iter()
        .map(|p| {
            Pattern::new(p).map_err(|e| LibraryError::InvalidPattern {
                pattern: p.clone(),
                reason: e.to_string(),
            })
        })
        .collect()
}

/// Find the images in `source_dir`
///
/// Only regular files directly inside the directory are considered; a file
/// is an image when its name matches one of `patterns` (case insensitive).
/// Records come back sorted by name with default annotations.
///
/// # Errors
///
/// Returns `LibraryError::SourceMissing` when the directory does not exist,
/// `LibraryError::InvalidPattern` for a bad glob and `LibraryError::Io` when
/// the directory cannot be read.
pub fn scan(source_dir: &Path, patterns: &[String]) -> Result<Vec<ImageRecord>> {
    if !source_dir.is_dir() {
        return Err(LibraryError::SourceMissing(source_dir.to_path_buf()));
    }
    let patterns = compile_patterns(patterns)?;

    let mut images = Vec::new();
    for entry in fs::read_dir(source_dir)? {
        let entry = entry?;
        if !entry.file_type()?.is_file() {
            continue;
        }
        let Ok(name) = entry.file_name().into_string() else {
            warn!("Skipping file with a non UTF-8 name in {}", source_dir.display());
            continue;
        };
        if patterns.iter().any(|p| p.matches_with(&name, MATCH_OPTIONS)) {
            images.push(ImageRecord::new(name, entry.path()));
        }
    }
    images.sort_by(|a, b| a.name.cmp(&b.name));

    debug!("Found {} image(s) in {}", images.len(), source_dir.display());
    Ok(images)
}

/// Apply planned renames inside `source_dir`
///
/// Every target is checked before the first file moves, so a conflict leaves
/// the library untouched. A target may be the source of another rename in
/// the same plan; those are moved through a temporary name.
/// When a rename fails, the files moved so far are put back under their
/// old names.
///
/// # Errors
///
/// Returns `LibraryError::TargetExists` when a target file exists and is not
/// renamed away by the plan, and `LibraryError::Io` when a rename fails.
pub fn rename_images(source_dir: &Path, plan: &[Rename]) -> Result<()> {
    for rename in plan {
        let target = source_dir.join(&rename.to);
        if target.exists() && !plan.iter().any(|r| r.from == rename.to) {
            return Err(LibraryError::TargetExists(target));
        }
    }

    // (staging, from, to) for every file moved out of the way so far
    let mut staged: Vec<(PathBuf, PathBuf, PathBuf)> = Vec::with_capacity(plan.len());
    for (i, rename) in plan.iter().enumerate() {
        let from = source_dir.join(&rename.from);
        let staging = source_dir.join(format!(".pakpal-rename-{i}-{}", rename.from));
        if let Err(e) = fs::rename(&from, &staging) {
            restore_staged(&staged);
            return Err(e.into());
        }
        staged.push((staging, from, source_dir.join(&rename.to)));
    }

    for (done, (staging, _, target)) in staged.iter().enumerate() {
        if let Err(e) = fs::rename(staging, target) {
            for (staging, _, target) in &staged[..done] {
                if let Err(e) = fs::rename(target, staging) {
                    warn!("Could not move {} back: {e}", target.display());
                }
            }
            restore_staged(&staged);
            return Err(e.into());
        }
        info!("Renamed to {}", target.display());
    }
    Ok(())
}

/// Move staged files back to their original names
fn restore_staged(staged: &[(PathBuf, PathBuf, PathBuf)]) {
    for (staging, from, _) in staged.iter().rev() {
        if let Err(e) = fs::rename(staging, from) {
            warn!("Could not restore {}: {e}", from.display());
        }
    }
}

/// Delete image files; files already gone are skipped
///
/// Returns the number of files removed.
///
/// # Errors
///
/// Returns `LibraryError::Io` when a file cannot be removed.
pub fn delete_images(images: &[ImageRecord]) -> Result<usize> {
    let mut removed = 0;
    for image in images {
        if !image.path.exists() {
            debug!("{} is already gone", image.path.display());
            continue;
        }
        fs::remove_file(&image.path)?;
        removed += 1;
    }
    Ok(removed)
}
