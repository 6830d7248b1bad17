// Copyright 2026 Layne Penney
// SPDX-License-Identifier: AGPL-3.0-or-later

//! Configuration type definitions.
//!
//! Defines the structure of file and resolved configuration,
//! supporting JSON and YAML formats.

use serde::{Deserialize, Serialize};

use crate::redact::KnownHosts;

/// How recorded events reach the dispatch sink.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum DispatchMode {
    /// Fold events per request and dispatch one record at flush.
    #[default]
    Aggregated,
    /// Dispatch each event's own properties as soon as it is recorded.
    PerEvent,
}

/// Telemetry configuration as written in a config file.
/// Can be defined in .authtel.json, .authtel.yaml or .authtel/config.json.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TelemetryFileConfig {
    /// Authorities whose request paths may be logged (replaces the defaults)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub known_hosts: Option<Vec<String>>,

    /// Authorities added on top of the known hosts
    #[serde(skip_serializing_if = "Option::is_none")]
    pub extra_known_hosts: Option<Vec<String>>,

    /// Aggregated or per-event dispatch
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dispatch_mode: Option<DispatchMode>,

    /// Log filter directive (e.g. "warn", "authtel=debug")
    #[serde(skip_serializing_if = "Option::is_none")]
    pub log_level: Option<String>,

    /// Whether to use ANSI colors in log output
    #[serde(skip_serializing_if = "Option::is_none")]
    pub log_ansi: Option<bool>,
}

/// Fully resolved configuration with defaults applied.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedConfig {
    pub known_hosts: KnownHosts,
    pub dispatch_mode: DispatchMode,
    pub log_level: String,
    pub log_ansi: bool,
}

impl Default for ResolvedConfig {
    fn default() -> Self {
        Self {
            known_hosts: KnownHosts::default(),
            dispatch_mode: DispatchMode::default(),
            log_level: "warn".to_string(),
            log_ansi: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_config_camel_case() {
        let config: TelemetryFileConfig = serde_json::from_str(
            r#"{"knownHosts": ["login.example.com"], "dispatchMode": "perEvent", "logAnsi": false}"#,
        )
        .unwrap();

        assert_eq!(config.known_hosts, Some(vec!["login.example.com".to_string()]));
        assert_eq!(config.dispatch_mode, Some(DispatchMode::PerEvent));
        assert_eq!(config.log_ansi, Some(false));
        assert!(config.log_level.is_none());
    }

    #[test]
    fn test_file_config_skips_unset_fields() {
        let json = serde_json::to_string(&TelemetryFileConfig::default()).unwrap();
        assert_eq!(json, "{}");
    }

    #[test]
    fn test_resolved_defaults() {
        let config = ResolvedConfig::default();
        assert_eq!(config.dispatch_mode, DispatchMode::Aggregated);
        assert_eq!(config.log_level, "warn");
        assert!(config.known_hosts.contains("login.microsoftonline.com"));
    }

    #[test]
    fn test_resolved_serializes_sorted_hosts() {
        let config = ResolvedConfig {
            known_hosts: KnownHosts::from_hosts(["b.example.com", "a.example.com"]),
            ..ResolvedConfig::default()
        };
        let json = serde_json::to_value(&config).unwrap();
        assert_eq!(
            json["knownHosts"],
            serde_json::json!(["a.example.com", "b.example.com"])
        );
        assert_eq!(json["dispatchMode"], "aggregated");
    }
}
