// Copyright 2026 Layne Penney
// SPDX-License-Identifier: AGPL-3.0-or-later

//! authtel - telemetry events and aggregation for auth client instrumentation.
//!
//! Outbound auth requests emit typed events. Events for the same request are
//! folded into a single dispatch record that is handed to a sink at flush time.
//!
//! # Architecture
//!
//! The crate is organized into the following modules:
//!
//! - [`event`] - Property keys, property lists and the event variants
//! - [`header`] - Parser for the `x-ms-clitelem` diagnostic header
//! - [`redact`] - Host allowlist and tenant-free URL paths
//! - [`aggregator`] - Dispatch record and serialized folds
//! - [`dispatch`] - Sinks receiving flushed records
//! - [`registry`] - Per-request aggregation entry point
//! - [`config`] - Configuration loading and merging
//! - [`logging`] - `tracing` subscriber setup
//! - [`error`] - Error types and result aliases
//!
//! # Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use authtel::{DispatchMode, MemorySink, RequestId, Telemetry};
//!
//! let telemetry = Telemetry::new(Arc::new(MemorySink::new()), DispatchMode::Aggregated);
//! let request = RequestId::new();
//!
//! let mut event = telemetry.http_event("http_event");
//! event.set_method("POST");
//! event.set_response_code(200);
//! event.set_x_ms_cli_telem_data("1,0,0,100,Ring1");
//! telemetry.record(request, event)?;
//!
//! telemetry.flush(request)?;
//! ```

pub mod aggregator;
pub mod config;
pub mod dispatch;
pub mod error;
pub mod event;
pub mod header;
pub mod logging;
pub mod redact;
pub mod registry;

// Re-export commonly used types at crate root
pub use aggregator::{Aggregator, DispatchMap};
pub use config::{DispatchMode, ResolvedConfig};
pub use dispatch::{DispatchSink, JsonLinesSink, MemorySink, TracingSink};
pub use error::{ConfigError, DispatchError, EventError, HeaderError, Result};
pub use event::{CacheEvent, Event, EventId, EventKind, HttpEvent, PropertyKey, PropertyList};
pub use header::HeaderDescriptor;
pub use redact::{HostAllowlist, KnownHosts};
pub use registry::{RequestId, Telemetry};

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
