//! Configuration file upgrades: detect and fill keys added by newer versions.

use crate::config::Config;
use crate::errors::{AppError, AppResult};
use crate::ui::messages::{info, success};
use serde_yaml::{Mapping, Value};
use std::fs;
use std::path::Path;

/// Every key a current configuration file is expected to carry.
pub const KNOWN_KEYS: &[&str] = &[
    "database",
    "backend",
    "supabase_url",
    "supabase_key",
    "request_timeout_secs",
    "chart_height",
];

fn read_mapping(path: &Path) -> AppResult<Mapping> {
    let content = fs::read_to_string(path)?;
    match serde_yaml::from_str::<Value>(&content) {
        Ok(Value::Mapping(map)) => Ok(map),
        Ok(Value::Null) => Ok(Mapping::new()),
        Ok(_) => Err(AppError::Config(format!(
            "{} is not a key/value document",
            path.display()
        ))),
        Err(e) => Err(AppError::Config(format!(
            "failed to parse {}: {}",
            path.display(),
            e
        ))),
    }
}

/// Keys from [`KNOWN_KEYS`] absent in the file at `path`.
pub fn missing_keys(path: &Path) -> AppResult<Vec<&'static str>> {
    let map = read_mapping(path)?;
    Ok(KNOWN_KEYS
        .iter()
        .copied()
        .filter(|k| !map.contains_key(*k))
        .collect())
}

/// Add the missing keys (with default values) to the file, leaving existing
/// values untouched. Returns the keys that were added.
pub fn migrate_config_file(path: &Path) -> AppResult<Vec<&'static str>> {
    let mut map = read_mapping(path)?;
    let missing = missing_keys(path)?;

    if missing.is_empty() {
        info("Configuration is up to date.");
        return Ok(missing);
    }

    let defaults = match serde_yaml::to_value(Config::default()) {
        Ok(Value::Mapping(m)) => m,
        _ => return Err(AppError::Config("cannot build default configuration".into())),
    };

    for key in &missing {
        let k = Value::String((*key).to_string());
        if let Some(v) = defaults.get(&k) {
            map.insert(k, v.clone());
        }
    }

    let yaml = serde_yaml::to_string(&Value::Mapping(map))
        .map_err(|e| AppError::Config(format!("failed to serialize configuration: {}", e)))?;
    fs::write(path, yaml)?;

    success(format!("Configuration migrated: added {}", missing.join(", ")));
    Ok(missing)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detects_and_fills_missing_keys() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("pacer.conf");
        fs::write(&path, "database: /tmp/x.sqlite\nbackend: local\n").unwrap();

        let missing = missing_keys(&path).unwrap();
        assert!(missing.contains(&"supabase_url"));
        assert!(!missing.contains(&"backend"));

        let added = migrate_config_file(&path).unwrap();
        assert_eq!(added, missing);
        assert!(missing_keys(&path).unwrap().is_empty());

        // existing values are preserved
        let cfg = Config::from_yaml(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(cfg.database, "/tmp/x.sqlite");
        assert_eq!(cfg.backend, crate::backend::BackendKind::Local);
    }
}
