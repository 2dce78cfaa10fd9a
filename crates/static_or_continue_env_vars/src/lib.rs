#![doc = include_str!("../README.md")]

use anyhow::{Context, anyhow};
use std::error::Error;
use std::str::FromStr;

/// Reads an environment variable for the current process.
///
/// Compared to [std::env::var] there are a couple of differences:
///
/// - [var] uses [dotenvy] which loads the `.env` file from the current or
///   parent directories before returning the value.
///
/// - [var] returns `Ok(None)` (instead of `Err`) if an environment variable
///   wasn't set.
#[track_caller]
pub fn var(key: &str) -> anyhow::Result<Option<String>> {
    match dotenvy::var(key) {
        Ok(content) => Ok(Some(content)),
        Err(dotenvy::Error::EnvVar(std::env::VarError::NotPresent)) => Ok(None),
        Err(error) => Err(error.into()),
    }
}

/// Reads an environment variable for the current process, and parses it if
/// it is set.
#[track_caller]
pub fn var_parsed<R>(key: &str) -> anyhow::Result<Option<R>>
where
    R: FromStr,
    R::Err: Error + Send + Sync + 'static,
{
    match var(key)? {
        Some(content) => Ok(Some(content.parse().with_context(|| {
            format!("Failed to parse {key} environment variable")
        })?)),
        None => Ok(None),
    }
}

/// Reads a boolean switch from the environment.
///
/// `1`, `true`, `yes` and `on` enable the switch, `0`, `false`, `no`, `off`
/// and the empty string disable it (case-insensitive). An unset variable
/// yields `default`.
#[track_caller]
pub fn flag(key: &str, default: bool) -> anyhow::Result<bool> {
    let Some(value) = var(key)? else {
        return Ok(default);
    };

    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "" | "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(anyhow!(
            "Failed to parse {key} environment variable: expected a boolean, got \"{value}\""
        )),
    }
}
