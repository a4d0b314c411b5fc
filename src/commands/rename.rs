//! Rename a bundle

use crate::commands::Project;
use crate::{PakError, library, output};

type Result<T> = std::result::Result<T, PakError>;

/// Rename the image files of a bundle and move their settings along
///
/// # Errors
///
/// Returns `PakError::InvalidInput` when the rename is not possible, and
/// library or store errors when moving files or settings fails.
pub fn execute(project: &mut Project, index: usize, new_name: &str, quiet: bool) -> Result<()> {
    let plan = project.session.rename_bundle(index, new_name)?;
    if plan.is_empty() {
        output::info("Nothing to rename", quiet);
        return Ok(());
    }

    let source_dir = project.source_dir().to_path_buf();
    library::rename_images(&source_dir, &plan)?;
    for rename in &plan {
        project.db.remove_annotation(&rename.from)?;
    }
    project.session.apply_renames(&plan);

    if !quiet {
        for rename in &plan {
            println!("  {} -> {}", rename.from, rename.to);
        }
    }
    output::info(&format!("Renamed {} image(s)", plan.len()), quiet);
    Ok(())
}
