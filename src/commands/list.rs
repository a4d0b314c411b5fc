//! Bundle list and project status

use colored::Colorize;

use crate::commands::Project;
use crate::{PakError, output};

type Result<T> = std::result::Result<T, PakError>;

/// Print the bundle list
///
/// # Errors
///
/// Returns `PakError::InvalidInput` if the JSON output cannot be produced.
pub fn execute(project: &Project, json: bool, quiet: bool) -> Result<()> {
    let session = &project.session;
    if json {
        let text = output::bundles_json(session)
            .map_err(|e| PakError::InvalidInput(format!("Failed to serialize bundles: {e}")))?;
        println!("{text}");
        return Ok(());
    }

    if session.data.bundles.is_empty() {
        output::info("No bundles. Run `pakpal refresh` after adding images.", quiet);
        return Ok(());
    }
    for (index, bundle) in session.data.bundles.iter().enumerate() {
        if quiet {
            println!("{}", bundle.name);
        } else {
            println!("{}", output::bundle_row(session, index, bundle));
        }
    }
    Ok(())
}

fn switch(on: bool) -> String {
    if on { "on".green().to_string() } else { "off".dimmed().to_string() }
}

/// Print the project switches, the selection and the proxy values
pub fn status(project: &Project) {
    let session = &project.session;
    let data = &session.data;

    println!("{} {}", "Project:".bold(), project.name);
    println!("  source          {}", data.source_dir.display());
    println!("  bundles         {}", switch(data.enable_bundles));
    println!("  hidden images   {}", switch(data.enable_hidden));
    println!("  case sensitive  {}", switch(data.case_sensitive_matching));
    println!("  multi-select    {}", switch(data.selection.multi_select_enabled));
    println!(
        "  images          {} in {} bundle(s)",
        session.images.len(),
        data.bundles.len()
    );

    let selected = session.selection();
    println!(
        "{} {} bundle(s), {} image(s)",
        "Selection:".bold(),
        selected.len(),
        session.selection_count()
    );
    for bundle in selected {
        println!("  {}", bundle.name);
    }

    let proxy = &data.selection.proxy;
    let location = proxy
        .export_location
        .and_then(|id| data.locations.iter().find(|l| l.id == id))
        .map_or("none", |l| l.name.as_str());
    let format = proxy
        .export_format
        .and_then(|id| data.formats.iter().find(|f| f.id == id))
        .map_or("none", |f| f.name.as_str());
    println!(
        "  export {}, location {location}, format {format}",
        switch(proxy.enable_export)
    );
    println!(
        "{} {} location(s), {} format(s), {} suffix token(s)",
        "Presets:".bold(),
        data.locations.len(),
        data.formats.len(),
        session.suffix_tokens().len()
    );
}
