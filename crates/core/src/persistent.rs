//! Custom-data side channel attached to item metadata.
//!
//! Entries are keyed by [`RegistryKey`] and survive serialization to the
//! client and back, which is what lets a server-side annotation be recognised
//! when the item returns.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::registry::RegistryKey;

/// A typed value stored in a [`PersistentDataContainer`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum PersistentValue {
    /// 32-bit integer
    Int(i32),
    /// 64-bit integer
    Long(i64),
    /// Double precision float
    Double(f64),
    /// UTF-8 string
    String(String),
    /// Raw bytes
    Bytes(Vec<u8>),
}

/// Ordered key-value store of custom item data.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PersistentDataContainer {
    entries: BTreeMap<RegistryKey, PersistentValue>,
}

impl PersistentDataContainer {
    /// Create an empty container.
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether any value is stored under `key`, regardless of type.
    pub fn contains(&self, key: &RegistryKey) -> bool {
        self.entries.contains_key(key)
    }

    /// Raw value stored under `key`.
    pub fn get(&self, key: &RegistryKey) -> Option<&PersistentValue> {
        self.entries.get(key)
    }

    /// Integer stored under `key`. Values of any other type read as `None`.
    pub fn get_int(&self, key: &RegistryKey) -> Option<i32> {
        match self.entries.get(key) {
            Some(PersistentValue::Int(value)) => Some(*value),
            _ => None,
        }
    }

    /// Store a value, replacing any previous entry.
    pub fn set(&mut self, key: RegistryKey, value: PersistentValue) {
        self.entries.insert(key, value);
    }

    /// Store an integer, replacing any previous entry.
    pub fn set_int(&mut self, key: RegistryKey, value: i32) {
        self.set(key, PersistentValue::Int(value));
    }

    /// Remove and return the entry under `key`.
    pub fn remove(&mut self, key: &RegistryKey) -> Option<PersistentValue> {
        self.entries.remove(key)
    }

    /// Whether the container holds no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }
}
