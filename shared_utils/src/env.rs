use std::str::FromStr;

use thiserror::Error;

/// Errors raised while reading process environment variables.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum EnvVarError {
    /// A variable required by the application is not set (or is not valid unicode).
    #[error("Missing environment variable: {0}")]
    Missing(String),

    /// The variable is set but its value could not be parsed.
    #[error("Invalid value for environment variable {name}: {value:?}")]
    Invalid {
        /// Variable name.
        name: String,
        /// The raw value that failed to parse.
        value: String,
    },
}

/// Reads an environment variable, returning a structured error if it's missing.
///
/// This is a thin wrapper around `std::env::var` that provides a more
/// ergonomic and specific error type for missing variables. Values that are
/// empty after trimming count as missing.
///
/// # Arguments
/// * `name` - The name of the environment variable to read.
pub fn get_env_var(name: &str) -> Result<String, EnvVarError> {
    match std::env::var(name) {
        Ok(v) if !v.trim().is_empty() => Ok(v.trim().to_string()),
        _ => Err(EnvVarError::Missing(name.to_string())),
    }
}

/// Like [`get_env_var`], but an unset variable is `Ok(None)`.
pub fn get_optional_env_var(name: &str) -> Option<String> {
    get_env_var(name).ok()
}

/// Reads and parses an environment variable with [`FromStr`].
pub fn get_env_parsed<T: FromStr>(name: &str) -> Result<T, EnvVarError> {
    let raw = get_env_var(name)?;
    raw.parse().map_err(|_| EnvVarError::Invalid {
        name: name.to_string(),
        value: raw,
    })
}
