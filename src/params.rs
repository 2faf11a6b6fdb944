use std::fmt::Display;

/// Ordered query-string pairs. Absent values are skipped, so optional filters
/// can be threaded through without touching call sites.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryParams {
    pairs: Vec<(String, String)>,
}

impl QueryParams {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets `key` when `value` is present. A repeated key replaces the earlier value
    /// in place.
    pub fn set<V: Display>(mut self, key: &str, value: Option<V>) -> Self {
        let Some(value) = value else {
            return self;
        };
        let value = value.to_string();
        match self.pairs.iter_mut().find(|(k, _)| k == key) {
            Some(slot) => slot.1 = value,
            None => self.pairs.push((key.to_string(), value)),
        }
        self
    }

    pub fn with<V: Display>(self, key: &str, value: V) -> Self {
        self.set(key, Some(value))
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.pairs
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn pairs(&self) -> &[(String, String)] {
        &self.pairs
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }
}
