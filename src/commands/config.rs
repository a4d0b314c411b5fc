//! Configuration settings

use crate::cli::ConfigCommands;
use crate::config::{PakConfig, SETTABLE_KEYS};
use crate::{PakError, output};

type Result<T> = std::result::Result<T, PakError>;

/// Execute a config subcommand
///
/// # Errors
///
/// Returns `PakError::InvalidInput` for malformed settings or unknown keys,
/// and config errors when a value does not parse or saving fails.
pub fn execute(config: &mut PakConfig, command: &ConfigCommands, quiet: bool) -> Result<()> {
    match command {
        ConfigCommands::Set { setting } => {
            let Some((key, value)) = setting.split_once('=') else {
                return Err(PakError::InvalidInput(
                    "Invalid format. Use: pakpal config set key=value".into(),
                ));
            };
            let key = key.trim();
            config.set_value(key, value.trim())?;
            config.save()?;
            if let Some(value) = config.get_value(key) {
                output::info(&format!("Set {key} = {value}"), quiet);
            }
        }
        ConfigCommands::Get { key } => {
            let value = config.get_value(key).ok_or_else(|| {
                PakError::InvalidInput(format!(
                    "Unknown configuration key: '{key}'. Available keys: {}",
                    SETTABLE_KEYS.join(", ")
                ))
            })?;
            println!("{value}");
        }
    }
    Ok(())
}
