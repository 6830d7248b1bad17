// Copyright 2026 Layne Penney
// SPDX-License-Identifier: AGPL-3.0-or-later

//! Configuration module.
//!
//! Handles loading and merging of configuration from multiple sources:
//! - Global config: ~/.authtel/config.json
//! - Workspace config: .authtel.json, .authtel.yaml, or .authtel/config.json
//! - CLI options: command-line arguments
//!
//! Configuration is merged with precedence (CLI > workspace > global > defaults).

mod loader;
mod merger;
mod types;

pub use loader::{
    example_config, get_global_config_path, init_config, load_config_file, load_global_config,
    load_workspace_config, save_workspace_config, CONFIG_FILES, GLOBAL_CONFIG_DIR,
    GLOBAL_CONFIG_FILE,
};
pub use merger::{merge_config, CliOptions};
pub use types::{DispatchMode, ResolvedConfig, TelemetryFileConfig};

use crate::error::ConfigError;
use std::path::Path;
use tracing_subscriber::EnvFilter;

/// Load and merge all configuration sources for a workspace.
pub fn load_config(
    workspace_root: &Path,
    cli_options: CliOptions,
) -> Result<ResolvedConfig, ConfigError> {
    let global = load_global_config()?;
    let workspace = load_workspace_config(workspace_root)?;

    let config = merge_config(global, workspace, cli_options);
    validate(&config)?;
    Ok(config)
}

/// Reject settings that would only fail later, at logger startup.
pub fn validate(config: &ResolvedConfig) -> Result<(), ConfigError> {
    if let Err(err) = EnvFilter::try_new(&config.log_level) {
        return Err(ConfigError::InvalidValue {
            field: "logLevel".to_string(),
            message: format!("{:?}: {}", config.log_level, err),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_load_config_with_workspace_config() {
        let temp = TempDir::new().unwrap();
        std::fs::write(
            temp.path().join(".authtel.json"),
            r#"{"knownHosts": ["login.example.com"], "dispatchMode": "perEvent"}"#,
        )
        .unwrap();

        let config = load_config(temp.path(), CliOptions::default()).unwrap();
        assert_eq!(config.dispatch_mode, DispatchMode::PerEvent);
        assert!(config.known_hosts.contains("login.example.com"));
        assert!(!config.known_hosts.contains("login.microsoftonline.com"));
    }

    #[test]
    fn test_load_config_cli_override() {
        let temp = TempDir::new().unwrap();
        std::fs::write(
            temp.path().join(".authtel.json"),
            r#"{"dispatchMode": "perEvent"}"#,
        )
        .unwrap();

        let cli = CliOptions {
            dispatch_mode: Some(DispatchMode::Aggregated),
            ..Default::default()
        };

        let config = load_config(temp.path(), cli).unwrap();
        assert_eq!(config.dispatch_mode, DispatchMode::Aggregated); // CLI wins
    }

    #[test]
    fn test_load_config_rejects_bad_log_level() {
        let temp = TempDir::new().unwrap();
        let cli = CliOptions {
            log_level: Some("authtel=loud".to_string()),
            ..Default::default()
        };

        let err = load_config(temp.path(), cli).unwrap_err();
        match err {
            ConfigError::InvalidValue { field, message } => {
                assert_eq!(field, "logLevel");
                assert!(message.contains("authtel=loud"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_validate_accepts_defaults() {
        assert!(validate(&ResolvedConfig::default()).is_ok());
    }
}
