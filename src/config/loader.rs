// Copyright 2026 Layne Penney
// SPDX-License-Identifier: AGPL-3.0-or-later

//! Configuration loading from files.
//!
//! Handles loading configuration from JSON and YAML files in various locations.

use std::path::{Path, PathBuf};

use crate::error::ConfigError;

use super::types::TelemetryFileConfig;

/// Config file names to search for (in order).
pub const CONFIG_FILES: &[&str] = &[".authtel.json", ".authtel.yaml", ".authtel/config.json"];

/// Global config directory name.
pub const GLOBAL_CONFIG_DIR: &str = ".authtel";

/// Global config file name.
pub const GLOBAL_CONFIG_FILE: &str = "config.json";

/// Get the global config file path.
pub fn get_global_config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(GLOBAL_CONFIG_DIR).join(GLOBAL_CONFIG_FILE))
}

/// Load global configuration from ~/.authtel/config.json.
pub fn load_global_config() -> Result<Option<TelemetryFileConfig>, ConfigError> {
    let path = match get_global_config_path() {
        Some(p) => p,
        None => return Ok(None),
    };

    if !path.exists() {
        return Ok(None);
    }

    load_config_file(&path).map(Some)
}

/// Load workspace configuration from the workspace root.
///
/// Searches for config files in the following order:
/// 1. .authtel.json
/// 2. .authtel.yaml
/// 3. .authtel/config.json
pub fn load_workspace_config(workspace_root: &Path) -> Result<Option<TelemetryFileConfig>, ConfigError> {
    for filename in CONFIG_FILES {
        let path = workspace_root.join(filename);
        if path.exists() {
            tracing::debug!(path = %path.display(), "Loading workspace config");
            return load_config_file(&path).map(Some);
        }
    }
    Ok(None)
}

/// Load a configuration file (JSON or YAML).
pub fn load_config_file(path: &Path) -> Result<TelemetryFileConfig, ConfigError> {
    let content = std::fs::read_to_string(path)?;

    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("");

    match extension.to_lowercase().as_str() {
        "yaml" | "yml" => serde_yaml::from_str(&content).map_err(ConfigError::from),
        "json" => serde_json::from_str(&content).map_err(ConfigError::from),
        other => Err(ConfigError::InvalidFormat(format!(
            "{}: unsupported extension {:?}",
            path.display(),
            other
        ))),
    }
}

/// Save workspace configuration to a file.
pub fn save_workspace_config(
    workspace_root: &Path,
    config: &TelemetryFileConfig,
    filename: Option<&str>,
) -> Result<PathBuf, ConfigError> {
    let filename = filename.unwrap_or(".authtel.json");
    let path = workspace_root.join(filename);

    let content = serde_json::to_string_pretty(config)?;
    std::fs::write(&path, content)?;

    Ok(path)
}

/// Initialize a new config file with default or provided configuration.
pub fn init_config(
    workspace_root: &Path,
    config: Option<TelemetryFileConfig>,
) -> Result<PathBuf, ConfigError> {
    let config = config.unwrap_or_else(example_config);
    save_workspace_config(workspace_root, &config, None)
}

/// Starter configuration written by `authtel init`.
pub fn example_config() -> TelemetryFileConfig {
    TelemetryFileConfig {
        extra_known_hosts: Some(Vec::new()),
        dispatch_mode: Some(super::types::DispatchMode::Aggregated),
        log_level: Some("warn".to_string()),
        ..TelemetryFileConfig::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DispatchMode;
    use tempfile::TempDir;

    #[test]
    fn test_load_json_config() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join(".authtel.json");
        std::fs::write(&path, r#"{"knownHosts": ["login.example.com"]}"#).unwrap();

        let config = load_config_file(&path).unwrap();
        assert_eq!(config.known_hosts, Some(vec!["login.example.com".to_string()]));
    }

    #[test]
    fn test_load_unsupported_extension() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("authtel.toml");
        std::fs::write(&path, "dispatch_mode = \"perEvent\"").unwrap();

        let err = load_config_file(&path).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidFormat(_)));
        assert!(err.to_string().contains("toml"));
    }

    #[test]
    fn test_load_yaml_config() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join(".authtel.yaml");
        std::fs::write(
            &path,
            "extraKnownHosts:\n  - sts.example.com\ndispatchMode: perEvent\n",
        )
        .unwrap();

        let config = load_config_file(&path).unwrap();
        assert_eq!(config.extra_known_hosts, Some(vec!["sts.example.com".to_string()]));
        assert_eq!(config.dispatch_mode, Some(DispatchMode::PerEvent));
    }

    #[test]
    fn test_workspace_config_search_order() {
        let temp = TempDir::new().unwrap();
        std::fs::create_dir(temp.path().join(".authtel")).unwrap();
        std::fs::write(
            temp.path().join(".authtel/config.json"),
            r#"{"logLevel": "debug"}"#,
        )
        .unwrap();
        std::fs::write(temp.path().join(".authtel.json"), r#"{"logLevel": "info"}"#).unwrap();

        let config = load_workspace_config(temp.path()).unwrap().unwrap();
        assert_eq!(config.log_level.as_deref(), Some("info"));
    }

    #[test]
    fn test_missing_workspace_config() {
        let temp = TempDir::new().unwrap();
        assert!(load_workspace_config(temp.path()).unwrap().is_none());
    }

    #[test]
    fn test_invalid_json() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join(".authtel.json");
        std::fs::write(&path, "{not json").unwrap();
        assert!(matches!(load_config_file(&path), Err(ConfigError::JsonError(_))));
    }

    #[test]
    fn test_init_and_reload() {
        let temp = TempDir::new().unwrap();
        let path = init_config(temp.path(), None).unwrap();
        assert!(path.ends_with(".authtel.json"));

        let config = load_config_file(&path).unwrap();
        assert_eq!(config, example_config());
    }
}
