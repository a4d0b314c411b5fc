//! Command implementations
//!
//! Each command is a module with an execute function that takes parsed CLI
//! args and runs the operation against an open [`Project`].

pub mod bundle;
pub mod config;
pub mod delete;
pub mod export;
pub mod format;
pub mod init;
pub mod list;
pub mod location;
pub mod pack;
pub mod project;
pub mod refresh;
pub mod rename;
pub mod select;
pub mod slot;
pub mod toggle;

// Re-export execute functions for convenience
pub use bundle::execute as bundle;
pub use config::execute as config;
pub use delete::execute as delete;
pub use export::execute as export;
pub use format::execute as format;
pub use init::execute as init;
pub use list::execute as list;
pub use location::execute as location;
pub use pack::execute as pack;
pub use project::execute as project;
pub use refresh::execute as refresh;
pub use rename::execute as rename;
pub use select::execute as select;
pub use slot::execute as slot;
pub use toggle::execute as toggle;

use std::path::{Path, PathBuf};

use log::debug;

use crate::config::PakConfig;
use crate::db::{Database, DbError};
use crate::session::Session;
use crate::{PakError, library};

type Result<T> = std::result::Result<T, PakError>;

/// An open project: its store and the session loaded from it
pub struct Project {
    pub name: String,
    pub db: Database,
    pub session: Session,
}

impl Project {
    /// Pick the project named on the command line, or the default one
    ///
    /// # Errors
    ///
    /// Returns `PakError::InvalidInput` when no project is given and there is
    /// no default, or the name is not registered.
    pub fn resolve<'a>(config: &'a PakConfig, name: Option<&'a str>) -> Result<(&'a str, &'a Path)> {
        let name = name.or(config.default_project.as_deref()).ok_or_else(|| {
            PakError::InvalidInput(
                "No default project set. Use 'pakpal init <name> --source <dir>' to create one, or specify --project <name>."
                    .into(),
            )
        })?;
        let store = config
            .get_project(name)
            .ok_or_else(|| PakError::InvalidInput(format!("Project '{name}' not found in configuration")))?;
        Ok((name, store.as_path()))
    }

    /// Open a project and load its session
    ///
    /// The images are rescanned from the source directory and annotated from
    /// the store; the stored bundle list is kept as is until a refresh.
    ///
    /// # Errors
    ///
    /// Returns `PakError::MissingData` when the store holds no project data,
    /// and store or library errors otherwise.
    pub fn open(config: &PakConfig, name: Option<&str>) -> Result<Self> {
        let (name, store) = Self::resolve(config, name)?;
        let db = Database::open(store)?;
        let data = match db.load_file_data() {
            Ok(data) => data,
            Err(DbError::NotInitialized(_)) => return Err(PakError::MissingData(name.to_string())),
            Err(e) => return Err(e.into()),
        };

        let mut images = library::scan(&data.source_dir, &config.image_patterns)?;
        db.annotate(&mut images)?;
        debug!("Opened project '{name}' with {} image(s)", images.len());

        let session = Session::new(data, images, config.suffix_tokens.clone());
        Ok(Self {
            name: name.to_string(),
            db,
            session,
        })
    }

    /// Persist annotations and project data
    ///
    /// # Errors
    ///
    /// Returns `PakError::DbError` if a write or the flush fails.
    pub fn save(&self) -> Result<()> {
        self.db.store_annotations(&self.session.images)?;
        self.db.save_file_data(&self.session.data)?;
        self.db.flush()?;
        Ok(())
    }

    #[must_use]
    pub fn source_dir(&self) -> &Path {
        &self.session.data.source_dir
    }
}

/// Default store location for a project
///
/// # Errors
///
/// Returns `PakError::InvalidInput` if the data directory cannot be determined.
pub fn default_store_path(name: &str) -> Result<PathBuf> {
    let data_dir = dirs::data_local_dir()
        .ok_or_else(|| PakError::InvalidInput("Could not determine data directory".into()))?;
    Ok(data_dir.join("pakpal").join(name))
}

/// Ask for confirmation; quiet mode and `--yes` confirm without asking
///
/// # Errors
///
/// Returns `PakError::InvalidInput` if the answer cannot be read.
pub fn confirm(prompt: &str, yes: bool, quiet: bool) -> Result<bool> {
    if yes || quiet {
        return Ok(true);
    }
    dialoguer::Confirm::with_theme(&dialoguer::theme::ColorfulTheme::default())
        .with_prompt(prompt)
        .default(false)
        .interact()
        .map_err(|e| PakError::InvalidInput(format!("Failed to read input: {e}")))
}
