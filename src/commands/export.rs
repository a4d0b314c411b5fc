//! Export enabled images

use crate::commands::Project;
use crate::export::ExportMode;
use crate::{PakError, output};

type Result<T> = std::result::Result<T, PakError>;

/// Export every enabled image, or only those in the selection
///
/// # Errors
///
/// Returns `PakError::ExportError` when a used location has no path.
pub fn execute(project: &Project, selected: bool, replace_invalid_chars: bool, quiet: bool) -> Result<()> {
    let mode = if selected { ExportMode::Selected } else { ExportMode::All };
    let report = project.session.export(mode, replace_invalid_chars)?;
    output::export_banner(&report, quiet);
    Ok(())
}
