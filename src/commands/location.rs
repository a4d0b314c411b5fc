//! Export location list

use crate::cli::LocationCommands;
use crate::commands::Project;
use crate::{PakError, output};

type Result<T> = std::result::Result<T, PakError>;

/// Execute a location subcommand
///
/// # Errors
///
/// Returns `PakError::InvalidInput` for bad indices or when there is no
/// active location.
pub fn execute(project: &mut Project, command: &LocationCommands, quiet: bool) -> Result<()> {
    let session = &mut project.session;
    match command {
        LocationCommands::Add { name, path } => {
            session.add_location();
            let last = session.data.locations.len() - 1;
            session.select_location(last)?;
            if let Some(name) = name {
                session.set_location_name(name)?;
            }
            if let Some(path) = path {
                session.set_location_path(path)?;
            }
            if let Some(location) = session.data.locations.selected() {
                output::info(&format!("Added location {}", location.name), quiet);
                if location.path.is_empty() {
                    output::warning("The location has no path yet; set one with `pakpal location set-path`.");
                }
            }
        }
        LocationCommands::Remove => match session.remove_location() {
            Some(removed) => output::info(&format!("Removed location {}", removed.name), quiet),
            None => output::warning("There are no export locations."),
        },
        LocationCommands::List => {
            if session.data.locations.is_empty() {
                output::info("No export locations. Add one with `pakpal location add`.", quiet);
            }
            let active = session.data.locations.index();
            for (index, location) in session.data.locations.iter().enumerate() {
                if quiet {
                    println!("{}", location.name);
                } else {
                    println!("{}", output::location_row(index, index == active, location));
                }
            }
        }
        LocationCommands::Select { index } => {
            session.select_location(*index)?;
        }
        LocationCommands::Move { direction } => {
            if !session.move_location(*direction) {
                output::warning("The location cannot move further.");
            }
        }
        LocationCommands::SetPath { path } => {
            session.set_location_path(path)?;
        }
        LocationCommands::Rename { name } => {
            session.set_location_name(name)?;
        }
        LocationCommands::Tag { tag } => {
            let path = session.tag_location(*tag)?;
            output::info(&format!("Added ^{}^ ({})", tag.token(), tag.description()), quiet);
            output::info(&format!("Path is now {path}"), quiet);
        }
    }
    Ok(())
}
