// Copyright 2026 Layne Penney
// SPDX-License-Identifier: AGPL-3.0-or-later

//! Log output initialization.

use std::io;
use tracing::Level;
use tracing_subscriber::{
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
    EnvFilter,
};

use crate::config::ResolvedConfig;

/// Configuration for log initialization.
#[derive(Debug, Clone)]
pub struct LogConfig {
    /// Default log level if RUST_LOG is not set.
    pub default_level: Level,

    /// Whether to include span events (enter/exit).
    pub include_span_events: bool,

    /// Whether to include file/line information.
    pub include_file_line: bool,

    /// Whether to include target module path.
    pub include_target: bool,

    /// Whether to use ANSI colors in output.
    pub ansi_colors: bool,

    /// Custom filter directive (overrides default_level).
    pub filter_directive: Option<String>,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            default_level: Level::WARN,
            include_span_events: false,
            include_file_line: false,
            include_target: true,
            ansi_colors: true,
            filter_directive: None,
        }
    }
}

impl LogConfig {
    /// Create a config suitable for development with verbose output.
    pub fn development() -> Self {
        Self {
            default_level: Level::DEBUG,
            include_span_events: true,
            include_file_line: true,
            include_target: true,
            ansi_colors: true,
            filter_directive: None,
        }
    }

    /// Create a config for tests: everything from this crate, no colors.
    pub fn testing() -> Self {
        Self {
            default_level: Level::TRACE,
            include_span_events: true,
            include_file_line: true,
            include_target: true,
            ansi_colors: false,
            filter_directive: Some("authtel=trace".to_string()),
        }
    }

    /// Derive log settings from resolved configuration.
    pub fn from_resolved(config: &ResolvedConfig) -> Self {
        Self::default()
            .with_filter(config.log_level.clone())
            .with_ansi(config.log_ansi)
    }

    /// Set the default log level.
    pub fn with_level(mut self, level: Level) -> Self {
        self.default_level = level;
        self
    }

    /// Set a custom filter directive.
    pub fn with_filter(mut self, filter: impl Into<String>) -> Self {
        self.filter_directive = Some(filter.into());
        self
    }

    /// Enable or disable ANSI colors.
    pub fn with_ansi(mut self, ansi: bool) -> Self {
        self.ansi_colors = ansi;
        self
    }

    fn env_filter(&self) -> EnvFilter {
        // RUST_LOG takes precedence over the configured directive.
        if let Ok(filter) = EnvFilter::try_from_default_env() {
            return filter;
        }
        self.filter_directive
            .as_deref()
            .and_then(|directive| EnvFilter::try_new(directive).ok())
            .unwrap_or_else(|| EnvFilter::new(self.default_level.to_string()))
    }
}

/// Guard returned by [`init_logging`].
///
/// Keep this guard alive for the duration of your program.
pub struct LogGuard {
    _private: (),
}

/// Install the global `tracing` subscriber.
///
/// This should be called once at program startup; a second call fails.
pub fn init_logging(config: &LogConfig) -> io::Result<LogGuard> {
    let span_events = if config.include_span_events {
        FmtSpan::ENTER | FmtSpan::CLOSE
    } else {
        FmtSpan::NONE
    };

    let fmt_layer = fmt::layer()
        .with_writer(io::stderr)
        .with_ansi(config.ansi_colors)
        .with_target(config.include_target)
        .with_file(config.include_file_line)
        .with_line_number(config.include_file_line)
        .with_span_events(span_events)
        .compact();

    tracing_subscriber::registry()
        .with(config.env_filter())
        .with(fmt_layer)
        .try_init()
        .map_err(|e| io::Error::new(io::ErrorKind::Other, e.to_string()))?;

    Ok(LogGuard { _private: () })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_config_default() {
        let config = LogConfig::default();
        assert_eq!(config.default_level, Level::WARN);
        assert!(config.ansi_colors);
        assert!(config.filter_directive.is_none());
    }

    #[test]
    fn test_log_config_development() {
        let config = LogConfig::development();
        assert_eq!(config.default_level, Level::DEBUG);
        assert!(config.include_span_events);
    }

    #[test]
    fn test_log_config_testing() {
        let config = LogConfig::testing();
        assert_eq!(config.default_level, Level::TRACE);
        assert!(!config.ansi_colors);
        assert_eq!(config.filter_directive.as_deref(), Some("authtel=trace"));
        assert!(EnvFilter::try_new("authtel=trace").is_ok());
    }

    #[test]
    fn test_log_config_builder() {
        let config = LogConfig::default()
            .with_level(Level::DEBUG)
            .with_filter("authtel=trace")
            .with_ansi(false);

        assert_eq!(config.default_level, Level::DEBUG);
        assert_eq!(config.filter_directive, Some("authtel=trace".to_string()));
        assert!(!config.ansi_colors);
    }

    #[test]
    fn test_log_config_from_resolved() {
        let resolved = ResolvedConfig {
            log_level: "authtel=debug".to_string(),
            log_ansi: false,
            ..ResolvedConfig::default()
        };
        let config = LogConfig::from_resolved(&resolved);
        assert_eq!(config.filter_directive.as_deref(), Some("authtel=debug"));
        assert!(!config.ansi_colors);
    }
}
