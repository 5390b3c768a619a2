use hashbrown::HashMap;

use crate::*;

/// Mementos of every cache that has been touched, keyed by [`Cell::key`].
///
/// Outlives the live [`CacheState`] objects; only a full reset empties it.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct CacheDirectory {
    entries: HashMap<String, Memento>,
}

impl CacheDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<&Memento> {
        self.entries.get(key)
    }

    pub fn set(&mut self, key: impl Into<String>, memento: Memento) {
        self.entries.insert(key.into(), memento);
    }

    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Entries as a key/value list, sorted by key so the flattened form is stable.
    pub fn flatten(&self) -> Vec<(String, Memento)> {
        let mut entries: Vec<_> = self
            .entries
            .iter()
            .map(|(key, memento)| (key.clone(), memento.clone()))
            .collect();
        entries.sort_by(|a, b| a.0.cmp(&b.0));
        entries
    }
}

impl FromIterator<(String, Memento)> for CacheDirectory {
    fn from_iter<I: IntoIterator<Item = (String, Memento)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}
