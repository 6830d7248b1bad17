// Copyright 2026 Layne Penney
// SPDX-License-Identifier: AGPL-3.0-or-later

//! Configuration merging.
//!
//! Handles merging configurations from different sources with proper precedence.

use crate::redact::KnownHosts;

use super::types::{DispatchMode, ResolvedConfig, TelemetryFileConfig};

/// CLI options that can override configuration.
#[derive(Debug, Clone, Default)]
pub struct CliOptions {
    /// Additional known hosts
    pub known_hosts: Vec<String>,
    pub dispatch_mode: Option<DispatchMode>,
    pub log_level: Option<String>,
}

/// Merge multiple configurations with precedence.
///
/// Precedence (highest to lowest):
/// 1. CLI options
/// 2. Workspace config (.authtel.json)
/// 3. Global config (~/.authtel/config.json)
/// 4. Default values
pub fn merge_config(
    global: Option<TelemetryFileConfig>,
    workspace: Option<TelemetryFileConfig>,
    cli: CliOptions,
) -> ResolvedConfig {
    let mut result = ResolvedConfig::default();

    if let Some(config) = global {
        apply_file_config(&mut result, &config);
    }

    if let Some(config) = workspace {
        apply_file_config(&mut result, &config);
    }

    apply_cli_options(&mut result, &cli);

    result
}

fn apply_file_config(result: &mut ResolvedConfig, config: &TelemetryFileConfig) {
    if let Some(ref hosts) = config.known_hosts {
        result.known_hosts = KnownHosts::from_hosts(hosts);
    }

    if let Some(ref extra) = config.extra_known_hosts {
        result.known_hosts.extend(extra);
    }

    if let Some(mode) = config.dispatch_mode {
        result.dispatch_mode = mode;
    }

    if let Some(ref level) = config.log_level {
        result.log_level = level.clone();
    }

    if let Some(ansi) = config.log_ansi {
        result.log_ansi = ansi;
    }
}

fn apply_cli_options(result: &mut ResolvedConfig, cli: &CliOptions) {
    result.known_hosts.extend(&cli.known_hosts);

    if let Some(mode) = cli.dispatch_mode {
        result.dispatch_mode = mode;
    }

    if let Some(ref level) = cli.log_level {
        result.log_level = level.clone();
    }
}
