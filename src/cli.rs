//! Command-line interface definitions and parsing
//!
//! This module defines the complete CLI structure for pakpal using the `clap`
//! crate. Every invocation runs one operation against one project.
//!
//! # Commands
//!
//! - **init** / **project**: register and manage projects
//! - **refresh**, **list**, **status**: rebuild and inspect the bundle list
//! - **toggle**, **select**, **check**: bundling switches and the selection
//! - **set**, **bundle**: export settings for the selection or one bundle
//! - **rename**, **delete**, **reset**: edit bundles and project data
//! - **location**, **format**, **slot**: the preset lists
//! - **export**, **pack**: write files
//!
//! # Examples
//!
//! ```no_run
//! use pakpal::cli::{Cli, Commands};
//!
//! let cli = Cli::parse_args();
//! if let Commands::Export { selected } = cli.command {
//!     println!("exporting selected only: {selected}");
//! }
//! ```

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

use crate::export::{ColorDepth, ColorMode, FileFormat, Jpeg2kCodec, PathTag, TiffCodec};
use crate::lists::Move;
use crate::pack::Channel;
use crate::selection::ExportField;

/// Project switches flipped by `pakpal toggle`
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToggleTarget {
    /// Group images into bundles by suffix token
    Bundles,
    /// Select several bundles with checkboxes instead of the cursor
    Multiselect,
    /// Show images whose name starts with a dot
    Hidden,
    /// Match suffix tokens case sensitively at the end of the name
    CaseSensitive,
}

/// Export settings written to the selection or a single bundle
#[derive(Args, Debug, Clone, Default)]
pub struct ExportArgs {
    /// Enable export
    #[arg(long = "enable", conflicts_with = "disable")]
    pub enable: bool,

    /// Disable export
    #[arg(long = "disable")]
    pub disable: bool,

    /// Export location by name, or `none`
    #[arg(short = 'l', long = "location", value_name = "NAME")]
    pub location: Option<String>,

    /// Export format by name, or `none` to copy the source file
    #[arg(short = 'f', long = "format", value_name = "NAME")]
    pub format: Option<String>,
}

impl ExportArgs {
    /// The enable switch requested, if any
    #[must_use]
    pub const fn enable_export(&self) -> Option<bool> {
        if self.enable {
            Some(true)
        } else if self.disable {
            Some(false)
        } else {
            None
        }
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        !self.enable && !self.disable && self.location.is_none() && self.format.is_none()
    }

    /// The enable switch as a field write
    #[must_use]
    pub fn enable_field(&self) -> Option<ExportField> {
        self.enable_export().map(ExportField::EnableExport)
    }
}

/// Project management subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum ProjectCommands {
    /// List registered projects
    #[command(visible_alias = "ls")]
    List,

    /// Forget a project
    #[command(visible_alias = "rm")]
    Remove {
        /// Name of the project to remove
        name: String,

        /// Also delete the project store from disk
        #[arg(short = 'd', long = "delete-files")]
        delete_files: bool,
    },

    /// Set the default project
    #[command(name = "set-default")]
    SetDefault {
        /// Name of the project to use by default
        name: String,
    },
}

/// Export location subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum LocationCommands {
    /// Add a location and make it active
    Add {
        /// Location name (defaults to "Location N")
        #[arg(long = "name")]
        name: Option<String>,

        /// Path template, `//` is the project source directory
        #[arg(long = "path")]
        path: Option<String>,
    },

    /// Remove the active location
    #[command(visible_alias = "rm")]
    Remove,

    /// List locations
    #[command(visible_alias = "ls")]
    List,

    /// Make a location active
    Select { index: usize },

    /// Move the active location
    #[command(name = "move")]
    Move {
        #[arg(value_enum)]
        direction: Move,
    },

    /// Set the path template of the active location
    #[command(name = "set-path")]
    SetPath { path: String },

    /// Rename the active location
    Rename { name: String },

    /// Append a `^tag^` folder to the active location
    Tag {
        /// One of: bundle_name, blend_file_name, export_date_ymd,
        /// export_date_dmy, export_date_mdy, export_time_hm, export_time_hms
        tag: PathTag,
    },
}

/// Encoder settings for `pakpal format set`
#[derive(Args, Debug, Clone, Default)]
pub struct FormatArgs {
    /// Rename the format
    #[arg(long = "name")]
    pub name: Option<String>,

    /// File type
    #[arg(long = "file-format", value_enum)]
    pub file_format: Option<FileFormat>,

    #[arg(long = "color-mode", value_enum)]
    pub color_mode: Option<ColorMode>,

    /// Bits per channel
    #[arg(long = "color-depth", value_enum)]
    pub color_depth: Option<ColorDepth>,

    /// PNG compression percentage
    #[arg(long = "compression", value_parser = clap::value_parser!(u8).range(0..=100))]
    pub compression: Option<u8>,

    /// JPEG quality percentage
    #[arg(long = "quality", value_parser = clap::value_parser!(u8).range(0..=100))]
    pub quality: Option<u8>,

    /// TIFF compression; only `none` is written, other codecs are ignored
    #[arg(long = "tiff-codec", value_enum)]
    pub tiff_codec: Option<TiffCodec>,

    #[arg(long = "jpeg2k-codec", value_enum)]
    pub jpeg2k_codec: Option<Jpeg2kCodec>,

    #[arg(long = "cinema")]
    pub cinema: Option<bool>,

    #[arg(long = "cinema-48")]
    pub cinema_48: Option<bool>,

    #[arg(long = "ycc")]
    pub ycc: Option<bool>,
}

/// Export format subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum FormatCommands {
    /// Add a PNG format and make it active
    Add {
        #[arg(long = "name")]
        name: Option<String>,
    },

    /// Remove the active format
    #[command(visible_alias = "rm")]
    Remove,

    /// List formats
    #[command(visible_alias = "ls")]
    List,

    /// Make a format active
    Select { index: usize },

    /// Move the active format
    #[command(name = "move")]
    Move {
        #[arg(value_enum)]
        direction: Move,
    },

    /// Change settings of the active format
    Set(FormatArgs),
}

/// Suffix token ("material slot") subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum SlotCommands {
    /// Add a token and make it active
    Add {
        /// Token text (defaults to "MaterialSlotN")
        name: Option<String>,
    },

    /// Remove the active token
    #[command(visible_alias = "rm")]
    Remove,

    /// List tokens in matching order
    #[command(visible_alias = "ls")]
    List,

    /// Make a token active
    Select { index: usize },

    /// Move the active token; earlier tokens win ties
    #[command(name = "move")]
    Move {
        #[arg(value_enum)]
        direction: Move,
    },

    /// Change the text of the active token
    Rename { name: String },
}

/// Channel pack settings; every flag left out keeps its stored value
#[derive(Args, Debug, Clone, Default)]
pub struct PackArgs {
    /// Suffix tokens feeding the red channel, e.g. "AO, Occlusion"
    #[arg(long = "r", value_name = "TOKENS")]
    pub r: Option<String>,

    /// Suffix tokens feeding the green channel
    #[arg(long = "g", value_name = "TOKENS")]
    pub g: Option<String>,

    /// Suffix tokens feeding the blue channel
    #[arg(long = "b", value_name = "TOKENS")]
    pub b: Option<String>,

    /// Suffix tokens feeding the alpha channel
    #[arg(long = "a", value_name = "TOKENS")]
    pub a: Option<String>,

    /// Source channel read for red
    #[arg(long = "r-channel", value_enum)]
    pub r_channel: Option<Channel>,

    #[arg(long = "g-channel", value_enum)]
    pub g_channel: Option<Channel>,

    #[arg(long = "b-channel", value_enum)]
    pub b_channel: Option<Channel>,

    #[arg(long = "a-channel", value_enum)]
    pub a_channel: Option<Channel>,

    /// Output channels whose source is inverted
    #[arg(long = "invert", value_enum, num_args = 1..)]
    pub invert: Vec<Channel>,

    /// Output channels whose source is no longer inverted
    #[arg(long = "no-invert", value_enum, num_args = 1..)]
    pub no_invert: Vec<Channel>,

    /// Appended to the bundle name
    #[arg(long = "suffix")]
    pub suffix: Option<String>,

    /// Output location template
    #[arg(short = 'o', long = "output")]
    pub output: Option<String>,

    /// Replace packed images that already exist
    #[arg(long = "overwrite")]
    pub overwrite: Option<bool>,

    /// Add new packed images to their bundle
    #[arg(long = "add-to-bundle")]
    pub add_to_bundle: Option<bool>,

    /// Store the settings without packing
    #[arg(long = "save-only")]
    pub save_only: bool,
}

/// Pack preset subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum PresetCommands {
    /// Save the current channel settings
    Save { name: String },

    /// Load channel settings from a preset
    Load { name: String },

    /// List saved presets
    #[command(visible_alias = "ls")]
    List,

    /// Delete a preset
    #[command(visible_alias = "rm")]
    Remove { name: String },
}

/// Subcommands of `pakpal pack`
#[derive(Subcommand, Debug, Clone)]
pub enum PackCommands {
    /// Manage pack presets
    Preset {
        #[command(subcommand)]
        command: PresetCommands,
    },

    /// Edit the suffix tokens each output channel reads from
    Source {
        #[command(subcommand)]
        command: SourceCommands,
    },
}

/// Channel source subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum SourceCommands {
    /// Add one of the project's suffix tokens to a channel
    Add {
        #[arg(value_enum)]
        channel: Channel,
        token: String,
    },

    /// Show the sources of every channel
    #[command(visible_alias = "ls")]
    List,

    /// Remove every source of a channel
    Clear {
        #[arg(value_enum)]
        channel: Channel,
    },
}

/// Configuration management subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum ConfigCommands {
    /// Set a configuration value
    Set {
        /// Configuration key=value (e.g., quiet=true)
        #[arg(value_name = "KEY=VALUE")]
        setting: String,
    },

    /// Get a configuration value
    Get {
        /// Configuration key to retrieve (e.g., quiet)
        #[arg(value_name = "KEY")]
        key: String,
    },
}

/// Main CLI structure for parsing command-line arguments
#[derive(Parser, Debug)]
#[command(name = "pakpal")]
#[command(about = "Bundle, pack and batch-export texture sets", long_about = None)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Suppress informational output (only print results)
    #[arg(short = 'q', long = "quiet", global = true)]
    pub quiet: bool,

    /// Project to work on (overrides the default project)
    #[arg(short = 'p', long = "project", global = true, value_name = "NAME")]
    pub project: Option<String>,

    /// Log more; repeat for debug output
    #[arg(short = 'v', long = "verbose", global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

/// Available CLI commands
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Register a project and build its bundle list
    Init {
        /// Project name
        name: String,

        /// Directory holding the project's images
        #[arg(short = 's', long = "source")]
        source: PathBuf,

        /// Where to keep the project store (defaults to the data directory)
        #[arg(long = "store")]
        store: Option<PathBuf>,
    },

    /// Manage registered projects
    Project {
        #[command(subcommand)]
        command: ProjectCommands,
    },

    /// Rescan the source directory and rebuild the bundle list
    #[command(visible_alias = "r")]
    Refresh,

    /// List bundles with their export settings
    #[command(visible_alias = "l")]
    List {
        /// Print JSON instead of a table
        #[arg(long = "json")]
        json: bool,
    },

    /// Show the project switches and the selection
    Status,

    /// Flip a project switch
    Toggle {
        #[arg(value_enum)]
        target: ToggleTarget,
    },

    /// Move the bundle cursor
    Select { index: usize },

    /// Check a bundle for multi-select
    Check {
        index: usize,

        /// Uncheck instead
        #[arg(long = "off")]
        off: bool,
    },

    /// Change export settings of the selection
    Set(ExportArgs),

    /// Change export settings of one bundle
    Bundle {
        index: usize,

        #[command(flatten)]
        args: ExportArgs,
    },

    /// Rename a bundle and the image files in it
    Rename { index: usize, new_name: String },

    /// Delete the selected bundles and their image files
    Delete {
        /// Do not ask for confirmation
        #[arg(short = 'y', long = "yes")]
        yes: bool,
    },

    /// Clear every export setting, location, format and suffix token
    Reset {
        /// Do not ask for confirmation
        #[arg(short = 'y', long = "yes")]
        yes: bool,
    },

    /// Manage export locations
    Location {
        #[command(subcommand)]
        command: LocationCommands,
    },

    /// Manage export formats
    Format {
        #[command(subcommand)]
        command: FormatCommands,
    },

    /// Manage suffix tokens
    Slot {
        #[command(subcommand)]
        command: SlotCommands,
    },

    /// Export enabled images
    #[command(visible_alias = "e")]
    Export {
        /// Only export the selection
        #[arg(long = "selected")]
        selected: bool,
    },

    /// Channel pack the selected bundles
    #[command(args_conflicts_with_subcommands = true)]
    Pack {
        #[command(subcommand)]
        command: Option<PackCommands>,

        #[command(flatten)]
        args: PackArgs,
    },

    /// Manage configuration settings
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
}

impl Commands {
    /// Whether the command works on a project store
    #[must_use]
    pub const fn needs_project(&self) -> bool {
        !matches!(
            self,
            Self::Init { .. }
                | Self::Project { .. }
                | Self::Config { .. }
                | Self::Pack {
                    command: Some(PackCommands::Preset {
                        command: PresetCommands::List | PresetCommands::Remove { .. }
                    }),
                    ..
                }
        )
    }
}

impl Cli {
    /// Parse command line arguments
    #[must_use]
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Log level for `env_logger`, raised by `-v`
    #[must_use]
    pub const fn log_filter(&self) -> &'static str {
        match self.verbose {
            0 => "warn",
            1 => "info",
            _ => "debug",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("pakpal").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_set() {
        let cli = parse(&["set", "--enable", "--location", "Textures", "-f", "none"]);
        let Commands::Set(args) = cli.command else {
            panic!("expected set");
        };
        assert_eq!(args.enable_export(), Some(true));
        assert_eq!(args.location.as_deref(), Some("Textures"));
        assert_eq!(args.format.as_deref(), Some("none"));
        assert!(!args.is_empty());
    }

    #[test]
    fn test_enable_conflicts_with_disable() {
        let result = Cli::try_parse_from(["pakpal", "set", "--enable", "--disable"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_parse_global_flags() {
        let cli = parse(&["export", "--selected", "-q", "-p", "castle", "-vv"]);
        assert!(cli.quiet);
        assert_eq!(cli.project.as_deref(), Some("castle"));
        assert_eq!(cli.log_filter(), "debug");
        assert!(matches!(cli.command, Commands::Export { selected: true }));
    }

    #[test]
    fn test_parse_location_tag() {
        let cli = parse(&["location", "tag", "bundle_name"]);
        assert!(matches!(
            cli.command,
            Commands::Location { command: LocationCommands::Tag { tag: PathTag::BundleName } }
        ));
        assert!(Cli::try_parse_from(["pakpal", "location", "tag", "nope"]).is_err());
    }

    #[test]
    fn test_parse_pack_source() {
        let cli = parse(&["pack", "source", "add", "b", "Metallic"]);
        let Commands::Pack { command: Some(PackCommands::Source { command }), .. } = cli.command else {
            panic!("expected pack source");
        };
        assert!(matches!(
            command,
            SourceCommands::Add { channel: Channel::B, ref token } if token == "Metallic"
        ));
        assert!(parse(&["pack", "source", "ls"]).command.needs_project());
    }

    #[test]
    fn test_parse_pack() {
        let cli = parse(&["pack", "--r", "AO", "--g", "Roughness", "--invert", "g", "--overwrite", "true"]);
        let Commands::Pack { command: None, args } = cli.command else {
            panic!("expected pack");
        };
        assert_eq!(args.r.as_deref(), Some("AO"));
        assert_eq!(args.invert, [Channel::G]);
        assert_eq!(args.overwrite, Some(true));

        let cli = parse(&["pack", "preset", "list"]);
        assert!(!cli.command.needs_project());
    }

    #[test]
    fn test_needs_project() {
        assert!(!parse(&["init", "castle", "--source", "/tmp"]).command.needs_project());
        assert!(parse(&["refresh"]).command.needs_project());
        assert!(parse(&["pack", "preset", "save", "orm"]).command.needs_project());
    }
}
