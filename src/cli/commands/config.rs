//! Config command implementation.

use colored::Colorize;

use crate::cli::args::{ConfigCommands, OutputFormat};
use crate::config::{Config, Paths};
use crate::error::CadenceError;
use crate::output::to_json;

/// Execute config subcommands.
///
/// # Errors
///
/// Returns an error for an unknown key, an unparsable value, or a failed
/// write.
pub fn config(
    config: &Config,
    cmd: ConfigCommands,
    format: OutputFormat,
) -> Result<String, CadenceError> {
    match cmd {
        ConfigCommands::Show => match format {
            OutputFormat::Json => to_json(config),
            OutputFormat::Pretty => Ok(serde_yaml::to_string(config)?),
        },
        ConfigCommands::Set { key, value } => {
            let mut updated = config.clone();
            apply_setting(&mut updated, &key, &value)?;
            updated.save_to(&Paths::new()?)?;

            match format {
                OutputFormat::Json => to_json(&updated),
                OutputFormat::Pretty => Ok(format!("{key} set to {value}").green().to_string()),
            }
        }
    }
}

/// Apply a dotted-key setting to a config.
fn apply_setting(config: &mut Config, key: &str, value: &str) -> Result<(), CadenceError> {
    match key {
        "general.user" => config.general.user = value.to_string(),
        "pomodoro.work_minutes" => config.pomodoro.work_minutes = parse_minutes(key, value)?,
        "pomodoro.short_break_minutes" => {
            config.pomodoro.short_break_minutes = parse_minutes(key, value)?;
        }
        "pomodoro.long_break_minutes" => {
            config.pomodoro.long_break_minutes = parse_minutes(key, value)?;
        }
        "pomodoro.long_break_after" => {
            config.pomodoro.long_break_after = parse_minutes(key, value)?;
        }
        "pomodoro.auto_start_break" => config.pomodoro.auto_start_break = parse_bool(key, value)?,
        "pomodoro.auto_start_pomodoro" => {
            config.pomodoro.auto_start_pomodoro = parse_bool(key, value)?;
        }
        "pomodoro.sound_enabled" => config.pomodoro.sound_enabled = parse_bool(key, value)?,
        _ => {
            return Err(CadenceError::Config(format!(
                "Unknown configuration key '{key}'"
            )))
        }
    }
    Ok(())
}

fn parse_minutes(key: &str, value: &str) -> Result<u32, CadenceError> {
    value.parse().map_err(|_| {
        CadenceError::Parse(format!("Invalid value '{value}' for {key} (expected a number)"))
    })
}

fn parse_bool(key: &str, value: &str) -> Result<bool, CadenceError> {
    match value.to_lowercase().as_str() {
        "true" | "yes" | "on" | "1" => Ok(true),
        "false" | "no" | "off" | "0" => Ok(false),
        _ => Err(CadenceError::Parse(format!(
            "Invalid value '{value}' for {key} (expected true or false)"
        ))),
    }
}
