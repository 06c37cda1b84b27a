use std::collections::BTreeMap;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A store of named integer facts.
///
/// Presence of a key is what matters to planning: preconditions, effects and
/// goals are all tested by key only, never by value. Values are still tracked so
/// that aggregate facts (e.g. "free carts") can count.
///
/// Keys iterate in sorted order, which keeps planning and traces deterministic.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct Facts {
    values: BTreeMap<String, i32>,
}

impl Facts {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder form of [`Facts::set`].
    pub fn with(mut self, name: impl Into<String>, value: i32) -> Self {
        self.set(name, value);
        self
    }

    pub fn has(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    pub fn get(&self, name: &str) -> Option<i32> {
        self.values.get(name).copied()
    }

    /// Add `delta` to an existing fact, or insert it with value `delta`.
    pub fn modify(&mut self, name: &str, delta: i32) {
        match self.values.get_mut(name) {
            Some(value) => *value += delta,
            None => {
                self.values.insert(name.to_owned(), delta);
            }
        }
    }

    pub fn set(&mut self, name: impl Into<String>, value: i32) {
        self.values.insert(name.into(), value);
    }

    pub fn remove(&mut self, name: &str) -> Option<i32> {
        self.values.remove(name)
    }

    pub fn clear(&mut self) {
        self.values.clear();
    }

    /// Copy for read-only consumers such as the planner.
    pub fn snapshot(&self) -> Facts {
        self.clone()
    }

    /// True when every key of `required` is present here. Values are ignored.
    pub fn contains_all(&self, required: &Facts) -> bool {
        required.values.keys().all(|k| self.values.contains_key(k))
    }

    /// Merge `other` into `self` without overwriting keys that already exist.
    pub fn union_missing(&mut self, other: &Facts) {
        for (name, value) in &other.values {
            if !self.values.contains_key(name) {
                self.values.insert(name.clone(), *value);
            }
        }
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.values.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, i32)> {
        self.values.iter().map(|(k, v)| (k.as_str(), *v))
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl<K> FromIterator<(K, i32)> for Facts
where
    K: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, i32)>>(iter: I) -> Self {
        let mut facts = Facts::new();
        for (name, value) in iter {
            facts.set(name, value);
        }
        facts
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn modify_inserts_then_accumulates() {
        let mut facts = Facts::new();
        facts.modify("FreeCart", 3);
        facts.modify("FreeCart", -1);
        assert_eq!(facts.get("FreeCart"), Some(2));
    }

    #[test]
    fn zero_valued_fact_is_still_present() {
        let mut facts = Facts::new();
        facts.modify("hasCart", 1);
        facts.modify("hasCart", -1);
        assert!(facts.has("hasCart"));
        assert_eq!(facts.get("hasCart"), Some(0));
    }

    #[test]
    fn remove_missing_key_is_noop() {
        let mut facts = Facts::new().with("inStore", 1);
        assert_eq!(facts.remove("leftStore"), None);
        assert_eq!(facts.len(), 1);
    }

    #[test]
    fn union_missing_is_first_writer_wins() {
        let mut state = Facts::new().with("hasCart", 1);
        let effects = Facts::new().with("hasCart", 5).with("atShelf", 1);
        state.union_missing(&effects);
        assert_eq!(state.get("hasCart"), Some(1));
        assert_eq!(state.get("atShelf"), Some(1));
    }

    #[test]
    fn contains_all_ignores_values() {
        let state = Facts::new().with("hasCart", 1);
        let required = Facts::new().with("hasCart", 5);
        assert!(state.contains_all(&required));
        assert!(state.contains_all(&Facts::new()));
        assert!(!Facts::new().contains_all(&required));
    }
}
