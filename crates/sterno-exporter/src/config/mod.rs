//! Exporter config loader (strict parsing).

pub mod duration;
pub mod schema;

use std::fs;
use std::path::Path;

use sterno_core::error::{Result, SternoError};

pub use schema::{Config, DEFAULT_INTERVAL};

/// Read a config file. `.json` files go through `serde_json`, everything else
/// through `serde_yaml` (which also accepts JSON).
pub fn load_from_file(path: impl AsRef<Path>) -> Result<Config> {
    let path = path.as_ref();
    let s = fs::read_to_string(path).map_err(|e| {
        SternoError::BadConfig(format!("read config failed ({}): {e}", path.display()))
    })?;

    let is_json = path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("json"));
    if is_json {
        load_from_json_str(&s)
    } else {
        load_from_str(&s)
    }
}

pub fn load_from_str(s: &str) -> Result<Config> {
    let cfg: Config = serde_yaml::from_str(s)
        .map_err(|e| SternoError::BadConfig(format!("invalid yaml: {e}")))?;
    cfg.validate()?;
    Ok(cfg)
}

pub fn load_from_json_str(s: &str) -> Result<Config> {
    let cfg: Config = serde_json::from_str(s)
        .map_err(|e| SternoError::BadConfig(format!("invalid json: {e}")))?;
    cfg.validate()?;
    Ok(cfg)
}
