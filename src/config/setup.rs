//! Interactive setup wizard for first-time configuration
//!
//! Asks for the suffix tokens used to bundle images and whether exported
//! paths should be sanitized. Projects are registered later with
//! `pakpal init`.

use super::{DEFAULT_SUFFIX_TOKENS, PakConfig};
use crate::lists::PresetList;
use config::ConfigError;
use dialoguer::{Confirm, Input, theme::ColorfulTheme};

/// Interactive first-time setup
///
/// # Errors
///
/// Returns `ConfigError` if user input cannot be read or the configuration
/// cannot be saved.
pub fn first_time_setup() -> Result<PakConfig, ConfigError> {
    println!("Welcome to PakPal! Let's set up your texture suffixes.\n");

    let tokens: String = Input::with_theme(&ColorfulTheme::default())
        .with_prompt("Suffix tokens (comma separated)")
        .default(DEFAULT_SUFFIX_TOKENS.join(", "))
        .interact_text()
        .map_err(|e| ConfigError::Message(format!("Failed to read input: {e}")))?;

    let replace_invalid_chars = Confirm::with_theme(&ColorfulTheme::default())
        .with_prompt("Replace invalid characters in export paths?")
        .default(true)
        .interact()
        .map_err(|e| ConfigError::Message(format!("Failed to read input: {e}")))?;

    let config = PakConfig {
        suffix_tokens: PresetList::from_items(parse_tokens(&tokens)),
        replace_invalid_chars,
        ..PakConfig::default()
    };
    config.save()?;

    println!("\nConfiguration saved successfully!");
    println!("Register a project with `pakpal init <name> --source <dir>`.");
    Ok(config)
}

/// Split a comma separated token list, dropping blanks
fn parse_tokens(input: &str) -> Vec<String> {
    input
        .split(',')
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(ToString::to_string)
        .collect()
}
