//! Environment lookup shared by every configuration loader.
//!
//! Keys are resolved in order and the first non-blank value wins, so callers
//! pass a scoped key first (`NEARORBIT_<SCOPE>_<FIELD>`) and the global
//! fallback (`NEARORBIT_<FIELD>`) second. A present but unparseable value is an
//! error rather than a silent fallback to defaults.

use std::env;
use thiserror::Error;

pub const ENV_PREFIX: &str = "NEARORBIT";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EnvError {
    #[error("{key}={raw:?} is not a valid number")]
    InvalidNumber { key: String, raw: String },
    #[error("{key}={raw:?} is not a valid boolean")]
    InvalidBool { key: String, raw: String },
}

/// Scoped-then-global key list for `field`, e.g. `NEARORBIT_RACER_MAX_YAW`
/// followed by `NEARORBIT_MAX_YAW`.
pub fn scoped_keys(scope: &str, field: &str) -> [String; 2] {
    let scope_upper = scope.to_ascii_uppercase();
    let field_upper = field.to_ascii_uppercase();
    [
        format!("{ENV_PREFIX}_{scope_upper}_{field_upper}"),
        format!("{ENV_PREFIX}_{field_upper}"),
    ]
}

/// First key with a non-blank value, together with that value.
pub fn first_present_env(keys: &[String]) -> Option<(String, String)> {
    first_present_with(keys, |key| env::var(key).ok())
}

pub fn parse_f32_env(keys: &[String]) -> Result<Option<f32>, EnvError> {
    parse_f32_with(keys, |key| env::var(key).ok())
}

pub fn parse_bool_env(keys: &[String]) -> Result<Option<bool>, EnvError> {
    parse_bool_with(keys, |key| env::var(key).ok())
}

/// Same as [`parse_f32_env`] but reads through `lookup`, which keeps tests
/// independent of the process environment.
pub fn parse_f32_with(
    keys: &[String],
    lookup: impl Fn(&str) -> Option<String>,
) -> Result<Option<f32>, EnvError> {
    let Some((key, raw)) = first_present_with(keys, lookup) else {
        return Ok(None);
    };
    raw.trim()
        .parse::<f32>()
        .map(Some)
        .map_err(|_| EnvError::InvalidNumber { key, raw })
}

pub fn parse_bool_with(
    keys: &[String],
    lookup: impl Fn(&str) -> Option<String>,
) -> Result<Option<bool>, EnvError> {
    let Some((key, raw)) = first_present_with(keys, lookup) else {
        return Ok(None);
    };
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(Some(true)),
        "0" | "false" | "no" | "off" => Ok(Some(false)),
        _ => Err(EnvError::InvalidBool { key, raw }),
    }
}

fn first_present_with(
    keys: &[String],
    lookup: impl Fn(&str) -> Option<String>,
) -> Option<(String, String)> {
    for key in keys {
        if let Some(value) = lookup(key) {
            if !value.trim().is_empty() {
                return Some((key.clone(), value));
            }
        }
    }
    None
}
