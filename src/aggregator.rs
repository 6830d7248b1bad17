// Copyright 2026 Layne Penney
// SPDX-License-Identifier: AGPL-3.0-or-later

//! Folding events into a single dispatch record.
//!
//! A [`DispatchMap`] distinguishes a key that is present with an empty value
//! (cleared since the last fold) from a key that is absent (never set, or
//! dropped this fold). Sinks see both states as-is.
//!
//! [`Aggregator`] serializes folds: each one runs start to finish inside a single
//! critical section against a working copy of the record, and the copy replaces
//! the shared record only once the fold is complete.

use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

use serde::{Deserialize, Serialize};

use crate::event::{Event, PropertyKey};

/// The aggregated record awaiting dispatch.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DispatchMap {
    fields: BTreeMap<PropertyKey, String>,
}

impl DispatchMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: PropertyKey) -> Option<&str> {
        self.fields.get(&key).map(String::as_str)
    }

    pub fn contains(&self, key: PropertyKey) -> bool {
        self.fields.contains_key(&key)
    }

    pub fn insert(&mut self, key: PropertyKey, value: impl Into<String>) {
        self.fields.insert(key, value.into());
    }

    pub fn remove(&mut self, key: PropertyKey) -> Option<String> {
        self.fields.remove(&key)
    }

    /// Clear `key` to an empty value, keeping it present. Absent keys stay absent.
    pub fn reset(&mut self, key: PropertyKey) {
        if let Some(value) = self.fields.get_mut(&key) {
            value.clear();
        }
    }

    /// Remove `key` if present.
    pub fn drop_key(&mut self, key: PropertyKey) {
        self.fields.remove(&key);
    }

    /// Bump a counter field: `1` when absent, otherwise the previous value plus one.
    pub fn increment_count(&mut self, key: PropertyKey) {
        let next = match self.fields.get(&key) {
            None => 1,
            Some(previous) => match previous.parse::<u64>() {
                Ok(count) => count.saturating_add(1),
                Err(_) => {
                    tracing::debug!(key = %key, value = %previous, "Restarting unparsable counter");
                    1
                }
            },
        };
        self.fields.insert(key, next.to_string());
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (PropertyKey, &str)> + '_ {
        self.fields.iter().map(|(k, v)| (*k, v.as_str()))
    }

    /// The record keyed by wire strings.
    pub fn to_wire(&self) -> BTreeMap<String, String> {
        self.fields
            .iter()
            .map(|(k, v)| (k.as_str().to_string(), v.clone()))
            .collect()
    }
}

#[derive(Debug, Default)]
struct State {
    record: DispatchMap,
    folds: u64,
}

/// Owner of one outstanding dispatch record.
#[derive(Debug, Default)]
pub struct Aggregator {
    state: Mutex<State>,
}

impl Aggregator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold `event` into the record.
    ///
    /// Takes the event by value: it is consumed once folded.
    pub fn fold(&self, event: Event) {
        let mut state = self.lock();
        let mut next = state.record.clone();
        event.fold_into(&mut next);
        state.record = next;
        state.folds += 1;

        tracing::debug!(
            event_id = %event.id(),
            kind = %event.kind(),
            folds = state.folds,
            "Folded telemetry event"
        );
    }

    /// Copy of the current record.
    pub fn snapshot(&self) -> DispatchMap {
        self.lock().record.clone()
    }

    /// Take the current record, leaving an empty one behind.
    pub fn take(&self) -> DispatchMap {
        let mut state = self.lock();
        state.folds = 0;
        std::mem::take(&mut state.record)
    }

    /// Number of events folded since creation or the last [`take`](Self::take).
    pub fn fold_count(&self) -> u64 {
        self.lock().folds
    }

    pub fn is_empty(&self) -> bool {
        self.lock().folds == 0
    }

    // A poisoned lock still holds a consistent record because folds only publish
    // completed work.
    fn lock(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
