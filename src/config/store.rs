//! The resolved configuration value.

use crate::error::{ConfigError, Result};
use crate::format::{self, ConfigMap, FileFormat};
use std::collections::BTreeSet;

/// Flat key/value config with a derived, sorted key list.
///
/// `keys` always mirrors the keys of `entries` in ascending order. The
/// mutating methods keep it in sync; after editing through
/// [`ConfigStore::entries_mut`] callers must call
/// [`ConfigStore::refresh_keys`] before handing the store on.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigStore {
    entries: ConfigMap,
    keys: Vec<String>,
}

impl ConfigStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a store from a decoded map.
    pub fn from_map(entries: ConfigMap) -> Self {
        let mut store = Self {
            entries,
            keys: Vec::new(),
        };
        store.refresh_keys();
        store
    }

    /// Rebuild the sorted key list from the entries.
    pub fn refresh_keys(&mut self) {
        self.keys = self.entries.keys().cloned().collect();
        self.keys.sort();
    }

    pub fn entries(&self) -> &ConfigMap {
        &self.entries
    }

    /// Raw access to the entries. Call [`Self::refresh_keys`] afterwards.
    pub fn entries_mut(&mut self) -> &mut ConfigMap {
        &mut self.entries
    }

    pub fn keys(&self) -> &[String] {
        &self.keys
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    /// Like [`Self::get`], but a missing key is an error.
    pub fn value(&self, key: &str) -> Result<&str> {
        self.get(key).ok_or_else(|| ConfigError::missing_key(key))
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Set a value, returning the previous one.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) -> Option<String> {
        let previous = self.entries.insert(key.into(), value.into());
        if previous.is_none() {
            self.refresh_keys();
        }
        previous
    }

    pub fn remove(&mut self, key: &str) -> Option<String> {
        let removed = self.entries.remove(key);
        if removed.is_some() {
            self.refresh_keys();
        }
        removed
    }

    /// Add every entry of `other`. Keys must be disjoint.
    ///
    /// On a duplicate the store is left untouched and the offending key
    /// (the smallest one, so the error is deterministic) is reported.
    pub fn merge_disjoint(&mut self, other: &ConfigStore) -> Result<()> {
        if let Some(dup) = other.keys.iter().find(|k| self.entries.contains_key(*k)) {
            return Err(ConfigError::duplicate_key(dup));
        }

        for (key, value) in &other.entries {
            self.entries.insert(key.clone(), value.clone());
        }
        self.refresh_keys();
        Ok(())
    }

    /// Keys present in exactly one of the two stores, sorted.
    pub fn diff_keys(&self, other: &ConfigStore) -> Vec<String> {
        let unmatched: BTreeSet<&String> = self
            .keys
            .iter()
            .filter(|k| !other.contains_key(k))
            .chain(other.keys.iter().filter(|k| !self.contains_key(k)))
            .collect();
        unmatched.into_iter().cloned().collect()
    }

    /// Serialize in the given format, keys sorted.
    pub fn to_bytes(&self, format: FileFormat) -> Result<Vec<u8>> {
        format::encode(&self.entries, format)
    }

    pub fn into_entries(self) -> ConfigMap {
        self.entries
    }
}
