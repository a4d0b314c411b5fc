//! Export settings of the selection or a single bundle

use crate::cli::ExportArgs;
use crate::commands::Project;
use crate::selection::ExportField;
use crate::session::Session;
use crate::{PakError, output};

type Result<T> = std::result::Result<T, PakError>;

/// Turn the requested settings into field writes, resolving names
fn fields(session: &Session, args: &ExportArgs) -> Result<Vec<ExportField>> {
    if args.is_empty() {
        return Err(PakError::InvalidInput(
            "Nothing to change. Use --enable, --disable, --location or --format".into(),
        ));
    }
    let mut fields = Vec::new();
    if let Some(field) = args.enable_field() {
        fields.push(field);
    }
    if let Some(name) = &args.location {
        fields.push(ExportField::ExportLocation(session.location_id(name)?));
    }
    if let Some(name) = &args.format {
        fields.push(ExportField::ExportFormat(session.format_id(name)?));
    }
    Ok(fields)
}

/// Write settings through the selection proxy
///
/// # Errors
///
/// Returns `PakError::InvalidInput` when no setting is given or a location or
/// format name is unknown.
pub fn set(project: &mut Project, args: &ExportArgs, quiet: bool) -> Result<()> {
    let session = &mut project.session;
    let fields = fields(session, args)?;
    if session.selection().is_empty() {
        output::warning("Nothing is selected.");
        return Ok(());
    }

    let mut updated = 0;
    for field in fields {
        updated = updated.max(session.write_proxy(field));
    }
    output::info(&format!("Updated {updated} image(s)"), quiet);
    Ok(())
}

/// Write settings on one bundle row
///
/// # Errors
///
/// Returns `PakError::InvalidInput` for a bad index, when no setting is given
/// or a location or format name is unknown.
pub fn execute(project: &mut Project, index: usize, args: &ExportArgs, quiet: bool) -> Result<()> {
    let session = &mut project.session;
    let fields = fields(session, args)?;

    let mut updated = 0;
    for field in fields {
        updated = updated.max(session.set_bundle_field(index, field)?);
    }
    output::info(
        &format!("Updated {} ({updated} image(s))", session.data.bundles[index].name),
        quiet,
    );
    Ok(())
}
