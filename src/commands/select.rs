//! Cursor and multi-select checkboxes

use crate::commands::Project;
use crate::{PakError, output};

type Result<T> = std::result::Result<T, PakError>;

/// Move the cursor to a bundle
///
/// # Errors
///
/// Returns `PakError::InvalidInput` for an index outside the bundle list.
pub fn execute(project: &mut Project, index: usize, quiet: bool) -> Result<()> {
    let session = &mut project.session;
    session.set_cursor(index)?;
    if session.data.selection.multi_select_enabled {
        output::warning("Multi-select is on; the cursor does not change the selection.");
    }
    let name = &session.data.bundles[index].name;
    output::info(&format!("Selected {name}"), quiet);
    Ok(())
}

/// Check or uncheck a bundle
///
/// # Errors
///
/// Returns `PakError::InvalidInput` for an index outside the bundle list.
pub fn check(project: &mut Project, index: usize, checked: bool, quiet: bool) -> Result<()> {
    let session = &mut project.session;
    session.set_selected(index, checked)?;
    if !session.data.selection.multi_select_enabled {
        output::warning("Multi-select is off; enable it with `pakpal toggle multiselect`.");
    }
    let verb = if checked { "Checked" } else { "Unchecked" };
    output::info(
        &format!(
            "{verb} {} ({} image(s) selected)",
            session.data.bundles[index].name,
            session.selection_count()
        ),
        quiet,
    );
    Ok(())
}
