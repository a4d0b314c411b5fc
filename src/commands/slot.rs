//! Suffix tokens ("material slots")
//!
//! Tokens are global preferences; edits rebuild the bundle list of the open
//! project and are saved to the config.

use crate::cli::SlotCommands;
use crate::commands::Project;
use crate::config::PakConfig;
use crate::{PakError, output};

type Result<T> = std::result::Result<T, PakError>;

/// Execute a slot subcommand
///
/// # Errors
///
/// Returns `PakError::InvalidInput` for bad indices or names, and config
/// errors when saving fails.
pub fn execute(project: &mut Project, config: &mut PakConfig, command: &SlotCommands, quiet: bool) -> Result<()> {
    let session = &mut project.session;
    match command {
        SlotCommands::Add { name } => {
            let added = session.add_slot();
            let last = session.suffix_tokens().len() - 1;
            session.select_slot(last)?;
            match name {
                Some(name) => {
                    session.rename_slot(name)?;
                    output::info(&format!("Added suffix token {name}"), quiet);
                }
                None => output::info(&format!("Added suffix token {added}"), quiet),
            }
        }
        SlotCommands::Remove => match session.remove_slot() {
            Some(removed) => output::info(&format!("Removed suffix token {removed}"), quiet),
            None => output::warning("There are no suffix tokens."),
        },
        SlotCommands::List => {
            let active = session.suffix_tokens().index();
            for (index, token) in session.suffix_tokens().iter().enumerate() {
                if quiet {
                    println!("{token}");
                } else {
                    let marker = if index == active { ">" } else { " " };
                    println!("{marker} {index:>3}  {token}");
                }
            }
            return Ok(());
        }
        SlotCommands::Select { index } => {
            session.select_slot(*index)?;
        }
        SlotCommands::Move { direction } => {
            if !session.move_slot(*direction) {
                output::warning("The suffix token cannot move further.");
            }
        }
        SlotCommands::Rename { name } => {
            session.rename_slot(name)?;
        }
    }

    config.suffix_tokens = session.suffix_tokens().clone();
    config.save()?;
    Ok(())
}
