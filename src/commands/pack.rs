//! Channel packing and pack presets

use std::path::Path;

use crate::cli::{PackArgs, PresetCommands, SourceCommands};
use crate::commands::Project;
use crate::pack::{self, Channel, ChannelSource, PackSettings};
use crate::{PakError, output};

type Result<T> = std::result::Result<T, PakError>;

/// Apply the given flags to the stored settings
fn apply(args: &PackArgs, settings: &mut PackSettings) {
    let sources = [&args.r, &args.g, &args.b, &args.a];
    let channels = [args.r_channel, args.g_channel, args.b_channel, args.a_channel];
    for ((target, list), channel) in Channel::ALL.into_iter().zip(sources).zip(channels) {
        let source = settings.source_mut(target);
        if let Some(list) = list {
            source.sources = ChannelSource::parse_sources(list);
        }
        if let Some(channel) = channel {
            source.channel = channel;
        }
    }
    for &target in &args.invert {
        settings.source_mut(target).invert = true;
    }
    for &target in &args.no_invert {
        settings.source_mut(target).invert = false;
    }

    if let Some(suffix) = &args.suffix {
        settings.packed_suffix.clone_from(suffix);
    }
    if let Some(path) = &args.output {
        settings.output_path.clone_from(path);
    }
    if let Some(overwrite) = args.overwrite {
        settings.overwrite = overwrite;
    }
    if let Some(add) = args.add_to_bundle {
        settings.add_to_bundle = add;
    }
}

/// Update the pack settings and pack the selected bundles
///
/// # Errors
///
/// Returns `PakError::PackError` when packing fails.
pub fn execute(project: &mut Project, args: &PackArgs, replace_invalid_chars: bool, quiet: bool) -> Result<()> {
    let session = &mut project.session;
    apply(args, &mut session.data.pack);
    if args.save_only {
        output::info("Pack settings saved", quiet);
        return Ok(());
    }

    if !session.data.enable_bundles {
        output::warning("Image packing requires Bundles to be enabled.");
        return Ok(());
    }
    if session.selection().is_empty() {
        output::warning("Nothing is selected, nothing was packed.");
        return Ok(());
    }

    let report = session.pack(replace_invalid_chars)?;
    output::pack_banner(&report, quiet);
    Ok(())
}

/// Execute a channel source subcommand
///
/// # Errors
///
/// Returns `PakError::InvalidInput` when a token is not a suffix token.
pub fn source(project: &mut Project, command: &SourceCommands, quiet: bool) -> Result<()> {
    let session = &mut project.session;
    match command {
        SourceCommands::Add { channel, token } => {
            if session.add_pack_source(*channel, token)? {
                output::info(&format!("{channel} now reads from {token}"), quiet);
            } else {
                output::info(&format!("{channel} already reads from {token}"), quiet);
            }
        }
        SourceCommands::List => {
            for channel in Channel::ALL {
                let source = session.data.pack.source(channel);
                let sources = if source.is_empty() {
                    "(none)".to_string()
                } else {
                    source.sources.join(", ")
                };
                let invert = if source.invert { ", inverted" } else { "" };
                println!("{channel} <- {sources} [{}{invert}]", source.channel);
            }
        }
        SourceCommands::Clear { channel } => {
            session.data.pack.source_mut(*channel).sources.clear();
            output::info(&format!("Cleared the sources of {channel}"), quiet);
        }
    }
    Ok(())
}

/// Execute a preset subcommand
///
/// `save` and `load` work on the open project's settings; `list` and
/// `remove` only touch the preset directory.
///
/// # Errors
///
/// Returns `PakError::PackError` for unknown presets, bad names and I/O
/// failures.
pub fn preset(dir: &Path, project: Option<&mut Project>, command: &PresetCommands, quiet: bool) -> Result<()> {
    match (command, project) {
        (PresetCommands::Save { name }, Some(project)) => {
            let path = pack::save_preset(dir, name, &project.session.data.pack)?;
            output::info(&format!("Saved preset {name} to {}", path.display()), quiet);
        }
        (PresetCommands::Load { name }, Some(project)) => {
            pack::load_preset(dir, name)?.apply_to(&mut project.session.data.pack);
            output::info(&format!("Loaded preset {name}"), quiet);
        }
        (PresetCommands::List, _) => {
            let names = pack::list_presets(dir)?;
            if names.is_empty() {
                output::info("No pack presets saved.", quiet);
            }
            for name in names {
                println!("{name}");
            }
        }
        (PresetCommands::Remove { name }, _) => {
            if pack::remove_preset(dir, name)? {
                output::info(&format!("Removed preset {name}"), quiet);
            } else {
                return Err(pack::PackError::PresetNotFound(name.clone()).into());
            }
        }
        (PresetCommands::Save { .. } | PresetCommands::Load { .. }, None) => {
            return Err(PakError::InvalidInput("Saving and loading presets needs a project".into()));
        }
    }
    Ok(())
}
