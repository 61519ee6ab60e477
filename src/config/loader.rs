//! Configuration override loading from disk.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use serde_json::{Map, Value};

use super::spec::ConfigError;

/// Load a JSON override mapping from a file.
///
/// The file must contain a single JSON object; its entries become the raw
/// override mapping fed to [`ConfigSpec::validate`](super::spec::ConfigSpec::validate)
/// (possibly after [`module_section`] selection).
pub fn load_overrides(path: &Path) -> Result<Map<String, Value>, ConfigError> {
    let content = fs::read_to_string(path).map_err(|e| {
        if e.kind() == ErrorKind::NotFound {
            ConfigError::FileNotFound(path.to_path_buf())
        } else {
            ConfigError::Io(e)
        }
    })?;

    let value: Value = serde_json::from_str(&content)?;
    match value {
        Value::Object(map) => Ok(map),
        other => Err(ConfigError::NotAnObject(
            super::spec::ParamType::of(&other).map_or("null", super::spec::ParamType::name).to_string(),
        )),
    }
}

/// Pick a module's own section out of a shared override file.
///
/// A file may either be flat (`{"interval": 2}`) or keyed by module name
/// (`{"heartbeat": {"interval": 2}, "other": {...}}`). When a section named
/// `module` exists and is an object it wins; a malformed section yields an
/// empty mapping (defaults apply); with no section the whole file is the
/// mapping.
pub fn module_section(overrides: &Map<String, Value>, module: &str) -> Map<String, Value> {
    match overrides.get(module) {
        Some(Value::Object(section)) => section.clone(),
        Some(_) => Map::new(),
        None => overrides.clone(),
    }
}

/// Search `search_paths` in order for a file named `file_name`.
pub fn find_config_file(file_name: &str, search_paths: &[PathBuf]) -> Option<PathBuf> {
    search_paths
        .iter()
        .map(|dir| dir.join(file_name))
        .find(|candidate| candidate.is_file())
}
