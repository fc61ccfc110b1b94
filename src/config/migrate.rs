use super::Config;
use crate::errors::{AppError, AppResult};
use crate::ui::messages::{info, success};
use serde_yaml::{Mapping, Value};
use std::fs;
use std::path::Path;

/// Reference YAML tree built from `Config::default()`.
fn default_tree() -> AppResult<Value> {
    serde_yaml::to_value(Config::default()).map_err(|e| AppError::Config(e.to_string()))
}

/// Collect dotted paths present in `reference` but absent from `actual`.
fn collect_missing(reference: &Mapping, actual: &Mapping, prefix: &str, out: &mut Vec<String>) {
    for (key, ref_val) in reference {
        let Some(name) = key.as_str() else { continue };
        let path = if prefix.is_empty() {
            name.to_string()
        } else {
            format!("{prefix}.{name}")
        };

        match actual.get(key) {
            None => out.push(path),
            Some(val) => {
                if let (Some(ref_map), Some(map)) = (ref_val.as_mapping(), val.as_mapping()) {
                    collect_missing(ref_map, map, &path, out);
                }
            }
        }
    }
}

/// Insert every key of `reference` missing from `actual`, recursively.
/// Existing values are never overwritten.
fn merge_missing(reference: &Mapping, actual: &mut Mapping) {
    for (key, ref_val) in reference {
        match actual.get_mut(key) {
            None => {
                actual.insert(key.clone(), ref_val.clone());
            }
            Some(val) => {
                if let (Some(ref_map), Some(map)) = (ref_val.as_mapping(), val.as_mapping_mut()) {
                    merge_missing(ref_map, map);
                }
            }
        }
    }
}

fn read_tree(path: &Path) -> AppResult<Mapping> {
    let content = fs::read_to_string(path)?;
    let value: Value = serde_yaml::from_str(&content)
        .map_err(|e| AppError::Config(format!("{}: {}", path.display(), e)))?;

    match value {
        Value::Mapping(m) => Ok(m),
        Value::Null => Ok(Mapping::new()),
        _ => Err(AppError::Config(format!(
            "{}: top level is not a mapping",
            path.display()
        ))),
    }
}

/// Keys (dotted paths) that the config file at `path` does not define.
pub fn missing_keys(path: &Path) -> AppResult<Vec<String>> {
    let actual = read_tree(path)?;
    let reference = default_tree()?;

    let mut out = Vec::new();
    if let Some(ref_map) = reference.as_mapping() {
        collect_missing(ref_map, &actual, "", &mut out);
    }
    Ok(out)
}

/// Add the missing keys to the config file with their default values.
/// Returns the keys that were added.
pub fn migrate_file(path: &Path) -> AppResult<Vec<String>> {
    let missing = missing_keys(path)?;
    if missing.is_empty() {
        info("Configuration file is up to date.");
        return Ok(missing);
    }

    let mut actual = read_tree(path)?;
    let reference = default_tree()?;
    if let Some(ref_map) = reference.as_mapping() {
        merge_missing(ref_map, &mut actual);
    }

    let yaml = serde_yaml::to_string(&Value::Mapping(actual)).map_err(|_| AppError::ConfigSave)?;
    fs::write(path, yaml)?;

    success(format!("Configuration migrated, added: {}", missing.join(", ")));
    Ok(missing)
}
