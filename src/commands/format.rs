//! Export format list

use crate::cli::{FormatArgs, FormatCommands};
use crate::commands::Project;
use crate::export::{ExportFormat, TiffCodec};
use crate::{PakError, output};

type Result<T> = std::result::Result<T, PakError>;

fn apply(args: &FormatArgs, format: &mut ExportFormat) {
    if let Some(name) = &args.name {
        format.name.clone_from(name);
    }
    if let Some(file_format) = args.file_format {
        format.file_format = file_format;
    }
    if let Some(color_mode) = args.color_mode {
        format.color_mode = color_mode;
    }
    if let Some(color_depth) = args.color_depth {
        format.color_depth = color_depth;
    }
    if let Some(compression) = args.compression {
        format.compression = compression;
    }
    if let Some(quality) = args.quality {
        format.quality = quality;
    }
    if let Some(codec) = args.tiff_codec {
        format.tiff_codec = codec;
    }
    if let Some(codec) = args.jpeg2k_codec {
        format.jpeg2k_codec = codec;
    }
    if let Some(cinema) = args.cinema {
        format.use_jpeg2k_cinema_preset = cinema;
    }
    if let Some(cinema_48) = args.cinema_48 {
        format.use_jpeg2k_cinema_48 = cinema_48;
    }
    if let Some(ycc) = args.ycc {
        format.use_jpeg2k_ycc = ycc;
    }
}

/// Execute a format subcommand
///
/// # Errors
///
/// Returns `PakError::InvalidInput` for bad indices or when there is no
/// active format.
pub fn execute(project: &mut Project, command: &FormatCommands, quiet: bool) -> Result<()> {
    let session = &mut project.session;
    match command {
        FormatCommands::Add { name } => {
            session.add_format();
            let last = session.data.formats.len() - 1;
            session.select_format(last)?;
            let format = session.update_format(|f| {
                if let Some(name) = name {
                    f.name.clone_from(name);
                }
            })?;
            output::info(&format!("Added format {}", format.name), quiet);
        }
        FormatCommands::Remove => match session.remove_format() {
            Some(removed) => output::info(&format!("Removed format {}", removed.name), quiet),
            None => output::warning("There are no export formats."),
        },
        FormatCommands::List => {
            if session.data.formats.is_empty() {
                output::info("No export formats; images are copied as they are.", quiet);
            }
            let active = session.data.formats.index();
            for (index, format) in session.data.formats.iter().enumerate() {
                if quiet {
                    println!("{}", format.name);
                } else {
                    println!("{}", output::format_row(index, index == active, format));
                }
            }
        }
        FormatCommands::Select { index } => {
            session.select_format(*index)?;
        }
        FormatCommands::Move { direction } => {
            if !session.move_format(*direction) {
                output::warning("The format cannot move further.");
            }
        }
        FormatCommands::Set(args) => {
            if args.tiff_codec.is_some_and(|codec| codec != TiffCodec::None) {
                output::warning("TIFF files are written uncompressed; the codec setting is ignored.");
            }
            let format = session.update_format(|f| apply(args, f))?;
            output::info(&output::format_row(0, true, format), quiet);
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::export::{ColorDepth, ColorMode, FileFormat};

    #[test]
    fn test_apply_only_touches_given_fields() {
        let mut format = ExportFormat::new("Web");
        let args = FormatArgs {
            file_format: Some(FileFormat::Tiff),
            color_depth: Some(ColorDepth::Eight),
            ..FormatArgs::default()
        };

        apply(&args, &mut format);
        assert_eq!(format.name, "Web");
        assert_eq!(format.file_format, FileFormat::Tiff);
        assert_eq!(format.color_depth, ColorDepth::Eight);
        assert_eq!(format.color_mode, ColorMode::Rgba);
    }
}
