// Copyright 2026 Layne Penney
// SPDX-License-Identifier: AGPL-3.0-or-later

//! Telemetry events.
//!
//! An [`Event`] is a closed set of variants, one per instrumented operation kind.
//! Each variant owns a [`PropertyList`] and its own fold into a [`DispatchMap`],
//! so the fields a kind resets or drops live next to the kind itself.
//!
//! Events are filled in through their setters while the operation runs and then
//! moved into an [`Aggregator`](crate::aggregator::Aggregator); nothing can touch
//! them after hand-off.

mod cache;
mod http;
mod keys;
mod property_list;

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

use serde::{Deserialize, Serialize};

use crate::aggregator::DispatchMap;
use crate::error::EventError;

pub use cache::{CacheEvent, RESET_FIELDS as CACHE_RESET_FIELDS};
pub use http::{HttpEvent, DROP_FIELDS as HTTP_DROP_FIELDS, RESET_FIELDS as HTTP_RESET_FIELDS};
pub use keys::{PropertyKey, KEY_PREFIX};
pub use property_list::PropertyList;

/// Sequence number identifying an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct EventId(u64);

impl EventId {
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    pub const fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for EventId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Issues increasing [`EventId`]s, starting at 1.
#[derive(Debug, Default)]
pub struct EventIdGenerator {
    last: AtomicU64,
}

impl EventIdGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn next_id(&self) -> EventId {
        EventId(self.last.fetch_add(1, Ordering::Relaxed) + 1)
    }
}

/// Kind tag of an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventKind {
    Http,
    Cache,
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EventKind::Http => write!(f, "http"),
            EventKind::Cache => write!(f, "cache"),
        }
    }
}

/// A telemetry event of any kind.
#[derive(Debug, Clone)]
pub enum Event {
    Http(HttpEvent),
    Cache(CacheEvent),
}

impl Event {
    pub fn kind(&self) -> EventKind {
        match self {
            Event::Http(_) => EventKind::Http,
            Event::Cache(_) => EventKind::Cache,
        }
    }

    pub fn id(&self) -> EventId {
        match self {
            Event::Http(event) => event.id(),
            Event::Cache(event) => event.id(),
        }
    }

    pub fn properties(&self) -> &PropertyList {
        match self {
            Event::Http(event) => event.properties(),
            Event::Cache(event) => event.properties(),
        }
    }

    pub fn set_property(&mut self, key: PropertyKey, value: impl Into<String>) {
        match self {
            Event::Http(event) => event.set_property(key, value),
            Event::Cache(event) => event.set_property(key, value),
        }
    }

    /// Set a property from an untyped key, rejecting keys that are not recognized.
    pub fn set_raw_property(&mut self, key: &str, value: impl Into<String>) -> Result<(), EventError> {
        let key: PropertyKey = key.parse()?;
        self.set_property(key, value);
        Ok(())
    }

    /// Merge this event into `dispatch` using the fold rules of its kind.
    pub fn fold_into(&self, dispatch: &mut DispatchMap) {
        match self {
            Event::Http(event) => event.fold_into(dispatch),
            Event::Cache(event) => event.fold_into(dispatch),
        }
    }

    /// This event's own properties as a standalone record.
    pub fn to_dispatch_map(&self) -> DispatchMap {
        let mut record = DispatchMap::new();
        for (key, value) in self.properties().entries() {
            record.insert(key, value);
        }
        record
    }
}

impl From<HttpEvent> for Event {
    fn from(event: HttpEvent) -> Self {
        Event::Http(event)
    }
}

impl From<CacheEvent> for Event {
    fn from(event: CacheEvent) -> Self {
        Event::Cache(event)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_id_generator_increases() {
        let ids = EventIdGenerator::new();
        let first = ids.next_id();
        let second = ids.next_id();
        assert_eq!(first.get(), 1);
        assert!(second > first);
    }

    #[test]
    fn test_event_kind_dispatch() {
        let http: Event = HttpEvent::new(EventId::new(1), "http_event").into();
        let cache: Event = CacheEvent::new(EventId::new(2), "cache_event").into();
        assert_eq!(http.kind(), EventKind::Http);
        assert_eq!(cache.kind(), EventKind::Cache);
        assert_eq!(cache.id(), EventId::new(2));
        assert_eq!(http.kind().to_string(), "http");
    }

    #[test]
    fn test_set_raw_property_validates_key() {
        let mut event: Event = HttpEvent::new(EventId::new(1), "http_event").into();
        event
            .set_raw_property("authtel.method", "GET")
            .unwrap();
        assert_eq!(event.properties().get(PropertyKey::HttpMethod), Some("GET"));

        let err = event.set_raw_property("method", "POST").unwrap_err();
        assert_eq!(err, EventError::UnknownKey("method".to_string()));
        assert_eq!(event.properties().get(PropertyKey::HttpMethod), Some("GET"));
    }

    #[test]
    fn test_fold_dispatches_by_kind() {
        let mut dispatch = DispatchMap::new();
        Event::from(HttpEvent::new(EventId::new(1), "http_event")).fold_into(&mut dispatch);
        Event::from(CacheEvent::new(EventId::new(2), "cache_event")).fold_into(&mut dispatch);

        assert_eq!(dispatch.get(PropertyKey::HttpEventCount), Some("1"));
        assert_eq!(dispatch.get(PropertyKey::CacheEventCount), Some("1"));
    }

    #[test]
    fn test_to_dispatch_map_keeps_all_properties() {
        let mut http = HttpEvent::new(EventId::new(1), "http_event");
        http.set_method("GET");
        let record = Event::from(http).to_dispatch_map();
        assert_eq!(record.get(PropertyKey::EventName), Some("http_event"));
        assert_eq!(record.get(PropertyKey::HttpMethod), Some("GET"));
        assert_eq!(record.len(), 2);
    }
}
