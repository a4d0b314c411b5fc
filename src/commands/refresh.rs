//! Rebuild the bundle list

use crate::commands::Project;
use crate::{PakError, output};

type Result<T> = std::result::Result<T, PakError>;

/// Rebuild the bundles from the rescanned library and drop annotations of
/// images that are gone
///
/// # Errors
///
/// Returns `PakError::DbError` if pruning the store fails.
pub fn execute(project: &mut Project, quiet: bool) -> Result<()> {
    project.session.refresh();
    let pruned = project.db.prune_annotations(&project.session.images)?;

    output::info(
        &format!(
            "Found {} image(s) in {} bundle(s)",
            project.session.images.len(),
            project.session.data.bundles.len()
        ),
        quiet,
    );
    if pruned > 0 {
        output::info(&format!("Dropped settings of {pruned} missing image(s)"), quiet);
    }
    Ok(())
}
