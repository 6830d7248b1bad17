// Copyright 2026 Layne Penney
// SPDX-License-Identifier: AGPL-3.0-or-later

//! Per-request telemetry aggregation.
//!
//! [`Telemetry`] is created once by the owning client and shared by handle with
//! every operation that emits events. Events are grouped by [`RequestId`]; each
//! request has its own [`Aggregator`], so folds for different requests never
//! contend on the same lock.

use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, PoisonError, RwLock};

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::aggregator::Aggregator;
use crate::config::{DispatchMode, ResolvedConfig};
use crate::dispatch::DispatchSink;
use crate::error::DispatchError;
use crate::event::{CacheEvent, Event, EventId, EventIdGenerator, HttpEvent};
use crate::redact::KnownHosts;

/// Aggregation key grouping the events of one logical request.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RequestId(Uuid);

impl RequestId {
    /// Generate a new random request ID.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    pub fn as_uuid(&self) -> Uuid {
        self.0
    }

    /// Get a short representation (first 8 characters).
    pub fn short(&self) -> String {
        self.0.to_string()[..8].to_string()
    }
}

impl Default for RequestId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for RequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Debug for RequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "RequestId({})", self.short())
    }
}

impl From<Uuid> for RequestId {
    fn from(uuid: Uuid) -> Self {
        Self(uuid)
    }
}

/// Entry point for recording and flushing telemetry.
pub struct Telemetry {
    sink: Arc<dyn DispatchSink>,
    mode: DispatchMode,
    known_hosts: KnownHosts,
    ids: EventIdGenerator,
    pending: RwLock<HashMap<RequestId, Aggregator>>,
}

impl Telemetry {
    pub fn new(sink: Arc<dyn DispatchSink>, mode: DispatchMode) -> Self {
        Self {
            sink,
            mode,
            known_hosts: KnownHosts::default(),
            ids: EventIdGenerator::new(),
            pending: RwLock::new(HashMap::new()),
        }
    }

    /// Build from resolved configuration.
    pub fn from_config(config: &ResolvedConfig, sink: Arc<dyn DispatchSink>) -> Self {
        Self::new(sink, config.dispatch_mode).with_known_hosts(config.known_hosts.clone())
    }

    pub fn with_known_hosts(mut self, known_hosts: KnownHosts) -> Self {
        self.known_hosts = known_hosts;
        self
    }

    /// Allowlist to pass to [`HttpEvent::set_http_path`].
    pub fn known_hosts(&self) -> &KnownHosts {
        &self.known_hosts
    }

    pub fn mode(&self) -> DispatchMode {
        self.mode
    }

    pub fn next_event_id(&self) -> EventId {
        self.ids.next_id()
    }

    pub fn http_event(&self, event_name: &str) -> HttpEvent {
        HttpEvent::new(self.next_event_id(), event_name)
    }

    pub fn cache_event(&self, event_name: &str) -> CacheEvent {
        CacheEvent::new(self.next_event_id(), event_name)
    }

    /// Hand a finished event to telemetry.
    ///
    /// In aggregated mode the event is folded into its request's record. In
    /// per-event mode it is sent to the sink straight away.
    pub fn record(&self, request_id: RequestId, event: impl Into<Event>) -> Result<(), DispatchError> {
        let event = event.into();
        match self.mode {
            DispatchMode::Aggregated => {
                self.fold_pending(request_id, event);
                Ok(())
            }
            DispatchMode::PerEvent => self.sink.dispatch(&event.to_dispatch_map()),
        }
    }

    /// Send the request's aggregated record to the sink and forget the request.
    ///
    /// Returns `Ok(false)` when nothing was pending for `request_id`.
    pub fn flush(&self, request_id: RequestId) -> Result<bool, DispatchError> {
        let aggregator = self
            .pending
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(&request_id);

        let Some(aggregator) = aggregator else {
            return Ok(false);
        };

        let folds = aggregator.fold_count();
        let record = aggregator.take();
        if record.is_empty() {
            return Ok(false);
        }

        tracing::info!(
            request_id = %request_id.short(),
            folds,
            fields = record.len(),
            "Flushing telemetry record"
        );
        self.sink.dispatch(&record)?;
        Ok(true)
    }

    /// Requests with events waiting to be flushed.
    pub fn pending_requests(&self) -> Vec<RequestId> {
        self.pending
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .keys()
            .copied()
            .collect()
    }

    // Folds run under the registry lock so `flush`, which needs the write lock,
    // cannot take a record while a fold into it is still in flight.
    fn fold_pending(&self, request_id: RequestId, event: Event) {
        {
            let pending = self.pending.read().unwrap_or_else(PoisonError::into_inner);
            if let Some(aggregator) = pending.get(&request_id) {
                aggregator.fold(event);
                return;
            }
        }

        self.pending
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .entry(request_id)
            .or_default()
            .fold(event);
    }
}

impl fmt::Debug for Telemetry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Telemetry")
            .field("mode", &self.mode)
            .field("known_hosts", &self.known_hosts.len())
            .field("pending", &self.pending_requests().len())
            .finish()
    }
}
