//! Environment variable readers used for config overrides.
//!
//! Unset and empty values are treated the same. Values that fail to parse are
//! logged and ignored so the caller keeps its current setting.

use std::str::FromStr;

use tracing::warn;

pub fn env_string(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

pub fn env_parse<T: FromStr>(key: &str) -> Option<T> {
    let raw = env_string(key)?;
    match raw.trim().parse::<T>() {
        Ok(v) => Some(v),
        Err(_) => {
            warn!(%key, value = %raw, "invalid value in environment, keeping default");
            None
        }
    }
}

/// Accepts `1/0`, `true/false`, `yes/no`, `on/off`.
pub fn env_bool(key: &str) -> Option<bool> {
    let raw = env_string(key)?;
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => {
            warn!(%key, value = %raw, "invalid boolean in environment, keeping default");
            None
        }
    }
}

/// `PORT` may be given as `8080` or `:8080`.
pub fn env_port(key: &str) -> Option<u16> {
    let raw = env_string(key)?;
    match raw.trim().trim_start_matches(':').parse::<u16>() {
        Ok(p) => Some(p),
        Err(_) => {
            warn!(%key, value = %raw, "invalid port in environment, keeping default");
            None
        }
    }
}
