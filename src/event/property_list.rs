// Copyright 2026 Layne Penney
// SPDX-License-Identifier: AGPL-3.0-or-later

//! Ordered key/value storage backing every event.

use super::keys::PropertyKey;

/// Ordered list of event properties with unique keys.
///
/// Setting a key that is already present updates the value in place, so the
/// first-seen position of every key is kept. New keys are appended.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PropertyList {
    entries: Vec<(PropertyKey, String)>,
}

impl PropertyList {
    /// Create an empty list.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or update a property.
    pub fn set(&mut self, key: PropertyKey, value: impl Into<String>) {
        let value = value.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some((_, existing)) => *existing = value,
            None => self.entries.push((key, value)),
        }
    }

    /// Look up the value stored for `key`.
    pub fn get(&self, key: PropertyKey) -> Option<&str> {
        self.entries
            .iter()
            .find(|(k, _)| *k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Whether `key` has been set.
    pub fn contains(&self, key: PropertyKey) -> bool {
        self.get(key).is_some()
    }

    /// Entries in insertion order.
    pub fn entries(&self) -> impl Iterator<Item = (PropertyKey, &str)> + '_ {
        self.entries.iter().map(|(k, v)| (*k, v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_appends_new_keys_in_order() {
        let mut list = PropertyList::new();
        list.set(PropertyKey::EventName, "http");
        list.set(PropertyKey::HttpMethod, "GET");
        list.set(PropertyKey::HttpResponseCode, "200");

        let keys: Vec<_> = list.entries().map(|(k, _)| k).collect();
        assert_eq!(
            keys,
            vec![
                PropertyKey::EventName,
                PropertyKey::HttpMethod,
                PropertyKey::HttpResponseCode
            ]
        );
    }

    #[test]
    fn test_set_existing_key_updates_in_place() {
        let mut list = PropertyList::new();
        list.set(PropertyKey::EventName, "http");
        list.set(PropertyKey::HttpMethod, "GET");
        list.set(PropertyKey::HttpResponseCode, "200");
        list.set(PropertyKey::HttpMethod, "POST");

        assert_eq!(list.len(), 3);
        assert_eq!(list.get(PropertyKey::HttpMethod), Some("POST"));
        let position = list
            .entries()
            .position(|(k, _)| k == PropertyKey::HttpMethod);
        assert_eq!(position, Some(1));
    }

    #[test]
    fn test_get_missing_key() {
        let list = PropertyList::new();
        assert!(list.is_empty());
        assert_eq!(list.get(PropertyKey::SpeInfo), None);
        assert!(!list.contains(PropertyKey::SpeInfo));
    }

    #[test]
    fn test_entries_is_restartable() {
        let mut list = PropertyList::new();
        list.set(PropertyKey::HttpMethod, "GET");
        list.set(PropertyKey::HttpApiVersion, "1.0");

        let first: Vec<_> = list.entries().collect();
        let second: Vec<_> = list.entries().collect();
        assert_eq!(first, second);
        assert_eq!(first.len(), 2);
    }
}
