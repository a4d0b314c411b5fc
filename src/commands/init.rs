//! Register a project

use std::fs;
use std::path::{Path, PathBuf};

use crate::commands::default_store_path;
use crate::config::PakConfig;
use crate::db::Database;
use crate::session::{FileData, Session};
use crate::{PakError, library, output};

type Result<T> = std::result::Result<T, PakError>;

/// Create the project store, scan the source directory and build the first
/// bundle list
///
/// # Errors
///
/// Returns `PakError::InvalidInput` if the project already exists, and
/// library, store or config errors otherwise.
pub fn execute(
    config: &mut PakConfig,
    name: &str,
    source: &Path,
    store: Option<PathBuf>,
    quiet: bool,
) -> Result<()> {
    if config.get_project(name).is_some() {
        return Err(PakError::InvalidInput(format!("Project '{name}' already exists")));
    }
    let source = source.canonicalize().map_err(|e| {
        PakError::InvalidInput(format!("Cannot access source directory '{}': {e}", source.display()))
    })?;

    let store = match store {
        Some(path) => path,
        None => default_store_path(name)?,
    };
    fs::create_dir_all(&store)?;
    let db = Database::open(&store)?;
    if db.is_initialized()? {
        return Err(PakError::InvalidInput(format!(
            "{} already holds a project",
            store.display()
        )));
    }

    let mut images = library::scan(&source, &config.image_patterns)?;
    db.annotate(&mut images)?;
    let mut session = Session::new(FileData::new(name, &source), images, config.suffix_tokens.clone());
    session.refresh();

    db.save_file_data(&session.data)?;
    db.flush()?;

    config.add_project(name.to_string(), store.clone());
    config.save()?;

    output::info(
        &format!(
            "Project '{name}' created with {} image(s) in {} bundle(s); store at {}",
            session.images.len(),
            session.data.bundles.len(),
            store.display()
        ),
        quiet,
    );
    if config.default_project.as_deref() == Some(name) {
        output::info(&format!("Set '{name}' as default project"), quiet);
    }
    Ok(())
}
