//! PakPal CLI application entry point
//!
//! Every invocation opens one project, applies one operation and saves the
//! project again.
//!
//! # Usage
//!
//! ```bash
//! # Register a project
//! pakpal init castle --source ~/textures/castle
//!
//! # Inspect and select bundles
//! pakpal list
//! pakpal select 2
//!
//! # Export settings for the selection, then export
//! pakpal location add --name Textures --path //export/^bundle_name^
//! pakpal set --enable --location Textures
//! pakpal export
//!
//! # Pack ambient occlusion, roughness and metalness into one image
//! pakpal pack --r AO --g Roughness --b Metallic --suffix _ORM
//! ```
//!
//! # Configuration
//!
//! On first run, pakpal prompts for initial setup. Configuration is stored in
//! the user's config directory (`~/.config/pakpal/config.toml` on Linux).

use std::process::ExitCode;

use pakpal::cli::{Cli, Commands, PackCommands};
use pakpal::commands::{self, Project};
use pakpal::config::PakConfig;
use pakpal::{PakError, output};

type Result<T> = std::result::Result<T, PakError>;

/// Run a command that works on an open project and save the project
fn run_project_command(config: &mut PakConfig, cli: &Cli, quiet: bool) -> Result<()> {
    let mut project = Project::open(config, cli.project.as_deref())?;
    let replace = config.replace_invalid_chars;

    match &cli.command {
        Commands::Refresh => commands::refresh(&mut project, quiet)?,
        Commands::List { json } => commands::list(&project, *json, quiet)?,
        Commands::Status => commands::list::status(&project),
        Commands::Toggle { target } => commands::toggle(&mut project, *target, quiet),
        Commands::Select { index } => commands::select(&mut project, *index, quiet)?,
        Commands::Check { index, off } => commands::select::check(&mut project, *index, !off, quiet)?,
        Commands::Set(args) => commands::bundle::set(&mut project, args, quiet)?,
        Commands::Bundle { index, args } => commands::bundle(&mut project, *index, args, quiet)?,
        Commands::Rename { index, new_name } => commands::rename(&mut project, *index, new_name, quiet)?,
        Commands::Delete { yes } => commands::delete(&mut project, *yes, quiet)?,
        Commands::Reset { yes } => commands::delete::reset(&mut project, config, *yes, quiet)?,
        Commands::Location { command } => commands::location(&mut project, command, quiet)?,
        Commands::Format { command } => commands::format(&mut project, command, quiet)?,
        Commands::Slot { command } => commands::slot(&mut project, config, command, quiet)?,
        Commands::Export { selected } => commands::export(&project, *selected, replace, quiet)?,
        Commands::Pack { command: None, args } => commands::pack(&mut project, args, replace, quiet)?,
        Commands::Pack {
            command: Some(PackCommands::Preset { command }),
            ..
        } => commands::pack::preset(&PakConfig::presets_dir()?, Some(&mut project), command, quiet)?,
        Commands::Pack {
            command: Some(PackCommands::Source { command }),
            ..
        } => commands::pack::source(&mut project, command, quiet)?,
        Commands::Init { .. } | Commands::Project { .. } | Commands::Config { .. } => {
            return Err(PakError::InvalidInput("This command does not work on a project".into()));
        }
    }

    project.save()
}

/// Parse arguments, load configuration and dispatch
fn run(cli: &Cli) -> Result<()> {
    let mut config = PakConfig::load_or_setup()?;
    let quiet = cli.quiet || config.quiet;

    match &cli.command {
        Commands::Init { name, source, store } => {
            commands::init(&mut config, name, source, store.clone(), quiet)
        }
        Commands::Project { command } => commands::project(&mut config, command, quiet),
        Commands::Config { command } => commands::config(&mut config, command, quiet),
        Commands::Pack {
            command: Some(PackCommands::Preset { command }),
            ..
        } if !cli.command.needs_project() => {
            commands::pack::preset(&PakConfig::presets_dir()?, None, command, quiet)
        }
        _ => run_project_command(&mut config, cli, quiet),
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse_args();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(cli.log_filter())).init();

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            output::error(&e.to_string());
            ExitCode::FAILURE
        }
    }
}
