// Copyright 2026 Layne Penney
// SPDX-License-Identifier: AGPL-3.0-or-later

//! Events emitted for token cache lookups and writes.

use super::keys::PropertyKey;
use super::property_list::PropertyList;
use super::EventId;
use crate::aggregator::DispatchMap;

/// Fields cleared to an empty value at the start of every fold.
pub const RESET_FIELDS: &[PropertyKey] = &[
    PropertyKey::TokenType,
    PropertyKey::TokenTypeIsRt,
    PropertyKey::TokenTypeIsMrrt,
    PropertyKey::TokenTypeIsFrt,
];

/// Telemetry for a single cache operation.
#[derive(Debug, Clone)]
pub struct CacheEvent {
    id: EventId,
    properties: PropertyList,
}

impl CacheEvent {
    pub fn new(id: EventId, event_name: &str) -> Self {
        let mut properties = PropertyList::new();
        properties.set(PropertyKey::EventName, event_name);
        Self { id, properties }
    }

    pub fn id(&self) -> EventId {
        self.id
    }

    pub fn properties(&self) -> &PropertyList {
        &self.properties
    }

    pub fn set_property(&mut self, key: PropertyKey, value: impl Into<String>) {
        self.properties.set(key, value);
    }

    pub fn set_token_type(&mut self, token_type: &str) {
        self.set_property(PropertyKey::TokenType, token_type);
    }

    /// Record which kind of refresh token the operation touched.
    pub fn set_token_type_flags(&mut self, is_rt: bool, is_mrrt: bool, is_frt: bool) {
        self.set_property(PropertyKey::TokenTypeIsRt, is_rt.to_string());
        self.set_property(PropertyKey::TokenTypeIsMrrt, is_mrrt.to_string());
        self.set_property(PropertyKey::TokenTypeIsFrt, is_frt.to_string());
    }

    pub(crate) fn fold_into(&self, dispatch: &mut DispatchMap) {
        dispatch.increment_count(PropertyKey::CacheEventCount);

        for key in RESET_FIELDS {
            dispatch.reset(*key);
        }

        for (key, value) in self.properties.entries() {
            if RESET_FIELDS.contains(&key) {
                dispatch.insert(key, value);
            }
        }
    }
}
