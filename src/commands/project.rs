//! Project management

use colored::Colorize;

use crate::cli::ProjectCommands;
use crate::config::PakConfig;
use crate::{PakError, output};

type Result<T> = std::result::Result<T, PakError>;

/// Execute a project subcommand
///
/// # Errors
///
/// Returns `PakError::InvalidInput` for unknown projects, and config or I/O
/// errors when saving or deleting fails.
pub fn execute(config: &mut PakConfig, command: &ProjectCommands, quiet: bool) -> Result<()> {
    match command {
        ProjectCommands::List => {
            if config.projects.is_empty() {
                output::info("No projects configured.", quiet);
                output::info("Add one with: pakpal init <name> --source <dir>", quiet);
                return Ok(());
            }

            output::info("Configured projects:", quiet);
            let default = config.default_project.as_deref();
            for name in config.list_projects() {
                if quiet {
                    println!("{name}");
                    continue;
                }
                let Some(path) = config.get_project(name) else {
                    continue;
                };
                let marker = if default == Some(name.as_str()) {
                    " (default)".green().to_string()
                } else {
                    String::new()
                };
                println!("  {} -> {}{marker}", name.bold(), path.display());
            }
        }
        ProjectCommands::Remove { name, delete_files } => {
            let Some(path) = config.remove_project(name) else {
                return Err(PakError::InvalidInput(format!("Project '{name}' does not exist")));
            };
            config.save()?;
            output::info(&format!("Project '{name}' removed from configuration"), quiet);

            if *delete_files {
                if path.exists() {
                    std::fs::remove_dir_all(&path)?;
                    output::info(&format!("Project store deleted from {}", path.display()), quiet);
                }
            } else {
                output::info(&format!("Note: the store at {} was NOT deleted", path.display()), quiet);
            }
            if config.default_project.is_none() && !config.projects.is_empty() {
                output::warning("The default project was removed. Pick a new one with `pakpal project set-default`.");
            }
        }
        ProjectCommands::SetDefault { name } => {
            if config.get_project(name).is_none() {
                return Err(PakError::InvalidInput(format!("Project '{name}' does not exist")));
            }
            config.set_default_project(name.clone())?;
            config.save()?;
            output::info(&format!("Set '{name}' as default project"), quiet);
        }
    }
    Ok(())
}
