//! Delete bundles and reset project data

use crate::commands::{Project, confirm};
use crate::config::PakConfig;
use crate::{PakError, library, output};

type Result<T> = std::result::Result<T, PakError>;

/// Delete the selected bundles and their image files
///
/// # Errors
///
/// Returns library or store errors when removing files or settings fails.
pub fn execute(project: &mut Project, yes: bool, quiet: bool) -> Result<()> {
    let count = project.session.selection_count();
    if count == 0 {
        output::warning("Nothing is selected, nothing was deleted.");
        return Ok(());
    }
    if !confirm(&format!("Delete {count} image file(s)?"), yes, quiet)? {
        output::info("Cancelled", quiet);
        return Ok(());
    }

    let removed = project.session.delete_selection();
    let deleted = library::delete_images(&removed)?;
    for image in &removed {
        project.db.remove_annotation(&image.name)?;
    }
    output::info(&format!("Deleted {deleted} image file(s)"), quiet);
    Ok(())
}

/// Clear all export settings, locations and formats; suffix tokens go back
/// to the defaults
///
/// # Errors
///
/// Returns store or config errors when writing fails.
pub fn reset(project: &mut Project, config: &mut PakConfig, yes: bool, quiet: bool) -> Result<()> {
    if !confirm("Reset every export setting of this project?", yes, quiet)? {
        output::info("Cancelled", quiet);
        return Ok(());
    }

    project.session.reset_properties();
    project.db.clear_annotations()?;
    config.reset_suffix_tokens();
    config.save()?;
    output::info("Project settings reset. Run `pakpal refresh` to rebuild the bundles.", quiet);
    Ok(())
}
