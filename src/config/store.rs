//! Persisted configuration files.
//!
//! - `<root>/<platform>.config.json`: flat `key → string` map, written back
//!   after prompting.
//! - `<root>/.wx/config.json`: shared defaults keyed by platform name.
use std::path::{Path, PathBuf};

use serde::Serialize as _;
use serde_json::Value;

use super::ConfigValues;
use crate::error::ConfigError;
use crate::fs::FileSystem;

/// Directory holding the shared defaults file.
pub const DEFAULTS_DIR: &str = ".wx";
/// File name of the shared defaults file.
pub const DEFAULTS_FILE: &str = "config.json";

/// `<root>/<platform>.config.json`.
#[must_use]
pub fn platform_config_path(root: &Path, platform: &str) -> PathBuf {
    root.join(format!("{platform}.config.json"))
}

/// `<root>/.wx/config.json`.
#[must_use]
pub fn defaults_path(root: &Path) -> PathBuf {
    root.join(DEFAULTS_DIR).join(DEFAULTS_FILE)
}

/// Load the shared defaults for `platform`; empty when the file or the
/// platform entry is absent.
///
/// # Errors
///
/// Returns [`ConfigError::Parse`] if the file exists but is not a JSON object
/// whose platform entry is a flat scalar map.
pub fn load_defaults(
    fs: &dyn FileSystem,
    root: &Path,
    platform: &str,
) -> Result<ConfigValues, ConfigError> {
    let path = defaults_path(root);
    let Some(document) = read_json(fs, &path)? else {
        return Ok(ConfigValues::new());
    };
    let Value::Object(mut platforms) = document else {
        return Err(parse_error(&path, "expected a JSON object keyed by platform"));
    };
    match platforms.remove(platform) {
        None | Some(Value::Null) => Ok(ConfigValues::new()),
        Some(section) => to_values(&path, section),
    }
}

/// Load `<root>/<platform>.config.json`; empty when absent.
///
/// # Errors
///
/// Returns [`ConfigError::Parse`] if the file exists but is not a flat
/// scalar map.
pub fn load_platform(
    fs: &dyn FileSystem,
    root: &Path,
    platform: &str,
) -> Result<ConfigValues, ConfigError> {
    let path = platform_config_path(root, platform);
    read_json(fs, &path)?.map_or_else(|| Ok(ConfigValues::new()), |doc| to_values(&path, doc))
}

/// Write `values` to `<root>/<platform>.config.json` and return the path.
///
/// # Errors
///
/// Returns [`ConfigError::Fs`] if the file cannot be written.
pub fn save_platform(
    fs: &dyn FileSystem,
    root: &Path,
    platform: &str,
    values: &ConfigValues,
) -> Result<PathBuf, ConfigError> {
    let path = platform_config_path(root, platform);
    let text = to_pretty_json(values).map_err(|e| parse_error(&path, &e.to_string()))?;
    fs.write_text(&path, &text)?;
    Ok(path)
}

/// Render `values` as JSON indented by four spaces, with a trailing newline.
///
/// # Errors
///
/// Returns the serializer error; cannot happen for string maps in practice.
pub fn to_pretty_json(values: &ConfigValues) -> Result<String, serde_json::Error> {
    let mut buf = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
    let mut serializer = serde_json::Serializer::with_formatter(&mut buf, formatter);
    values.serialize(&mut serializer)?;
    buf.push(b'\n');
    Ok(String::from_utf8_lossy(&buf).into_owned())
}

fn read_json(fs: &dyn FileSystem, path: &Path) -> Result<Option<Value>, ConfigError> {
    if !fs.exists(path) {
        return Ok(None);
    }
    let text = fs.read_text(path)?;
    serde_json::from_str(&text)
        .map(Some)
        .map_err(|e| parse_error(path, &e.to_string()))
}

/// Flatten a JSON object of scalars into string values.
///
/// Numbers and booleans are stringified; `null` entries are dropped.
fn to_values(path: &Path, document: Value) -> Result<ConfigValues, ConfigError> {
    let Value::Object(map) = document else {
        return Err(parse_error(path, "expected a JSON object"));
    };
    let mut values = ConfigValues::new();
    for (key, value) in map {
        let text = match value {
            Value::Null => continue,
            Value::String(s) => s,
            Value::Bool(b) => b.to_string(),
            Value::Number(n) => n.to_string(),
            Value::Array(_) | Value::Object(_) => {
                return Err(parse_error(
                    path,
                    &format!("value of '{key}' must be a string, number or boolean"),
                ));
            }
        };
        values.insert(key, text);
    }
    Ok(values)
}

fn parse_error(path: &Path, message: &str) -> ConfigError {
    ConfigError::Parse {
        path: path.to_path_buf(),
        message: message.to_string(),
    }
}
