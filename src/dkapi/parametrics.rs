use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Attribute-ID to attribute-name mapping observed in search responses.
///
/// Entries are only ever added; the first name seen for an ID wins. Kept in a
/// `BTreeMap` so the cache file is written with sorted keys.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ParametricsCache {
    entries: BTreeMap<String, String>,
}

impl ParametricsCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an attribute name. Returns `true` if the ID was new.
    pub fn register(&mut self, id: impl Into<String>, text: impl Into<String>) -> bool {
        let id = id.into();
        if self.entries.contains_key(&id) {
            return false;
        }
        self.entries.insert(id, text.into());
        true
    }

    pub fn get(&self, id: &str) -> Option<&str> {
        self.entries.get(id).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
