// Copyright 2026 Layne Penney
// SPDX-License-Identifier: AGPL-3.0-or-later

//! Error types for the telemetry engine.
//!
//! This module provides strongly-typed errors for different parts of the crate,
//! using `thiserror` for ergonomic error definitions and `anyhow` for error propagation
//! in the binary.
//!
//! None of these are fatal to a fold: header errors are contained in the setter that
//! hit them, and unknown hosts are not errors at all.

use thiserror::Error;

/// Errors produced while parsing the `x-ms-clitelem` diagnostic header.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum HeaderError {
    #[error("Unexpected header version: {0:?}")]
    VersionUnrecognized(String),

    #[error("Malformed diagnostic header: {0:?}")]
    Malformed(String),
}

impl HeaderError {
    /// Stable error code reported alongside the warning.
    pub fn code(&self) -> &'static str {
        match self {
            Self::VersionUnrecognized(_) => "X_MS_CLITELEM_VERSION_UNRECOGNIZED",
            Self::Malformed(_) => "X_MS_CLITELEM_MALFORMED",
        }
    }
}

/// Errors raised at the event boundary.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EventError {
    #[error("Unknown property key: {0}")]
    UnknownKey(String),
}

/// Errors reported by a dispatch sink.
#[derive(Error, Debug)]
pub enum DispatchError {
    #[error("IO error writing dispatch record: {0}")]
    Io(String),

    #[error("Failed to serialize dispatch record: {0}")]
    Serialize(String),

    #[error("Dispatch record rejected: {0}")]
    Rejected(String),
}

impl From<std::io::Error> for DispatchError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}

impl From<serde_json::Error> for DispatchError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialize(err.to_string())
    }
}

/// Errors that can occur during configuration loading.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Config file not found: {0}")]
    NotFound(String),

    #[error("Invalid config format: {0}")]
    InvalidFormat(String),

    #[error("Invalid value for {field}: {message}")]
    InvalidValue { field: String, message: String },

    #[error("IO error reading config: {0}")]
    IoError(String),

    #[error("YAML parsing error: {0}")]
    YamlError(String),

    #[error("JSON parsing error: {0}")]
    JsonError(String),
}

impl From<std::io::Error> for ConfigError {
    fn from(err: std::io::Error) -> Self {
        match err.kind() {
            std::io::ErrorKind::NotFound => Self::NotFound(err.to_string()),
            _ => Self::IoError(err.to_string()),
        }
    }
}

impl From<serde_json::Error> for ConfigError {
    fn from(err: serde_json::Error) -> Self {
        Self::JsonError(err.to_string())
    }
}

impl From<serde_yaml::Error> for ConfigError {
    fn from(err: serde_yaml::Error) -> Self {
        Self::YamlError(err.to_string())
    }
}

/// Result type alias using anyhow for flexible error handling.
pub type Result<T> = anyhow::Result<T>;
