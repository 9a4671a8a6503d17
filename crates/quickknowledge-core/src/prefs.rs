//! Locally persisted id sets: favorites and helpful votes.
//!
//! The sets belong to the client, not the store. They are kept through a
//! plain string key-value contract ([`KeyValueStore`]) and encoded as JSON
//! arrays, so any backend that can hold a string per key will do.

use std::collections::HashMap;
use std::sync::RwLock;

use anyhow::Result;
use serde::{Deserialize, Serialize};
use tracing::warn;

pub const FAVORITES_KEY: &str = "faq_favorites";
pub const VOTED_KEY: &str = "faq_helpful_votes";

/// An ordered set of record ids.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PreferenceSet {
    ids: Vec<String>,
}

impl PreferenceSet {
    pub fn contains(&self, id: &str) -> bool {
        self.ids.iter().any(|i| i == id)
    }

    /// Add `id` if absent, remove it if present. Returns whether `id` is
    /// a member afterwards.
    pub fn toggle(&mut self, id: &str) -> bool {
        if let Some(pos) = self.ids.iter().position(|i| i == id) {
            self.ids.remove(pos);
            false
        } else {
            self.ids.push(id.to_string());
            true
        }
    }

    pub fn insert(&mut self, id: &str) -> bool {
        if self.contains(id) {
            return false;
        }
        self.ids.push(id.to_string());
        true
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.ids.iter().map(String::as_str)
    }

    /// Decode a persisted value. Anything unreadable counts as empty.
    pub fn decode(raw: Option<&str>) -> Self {
        match raw {
            None => Self::default(),
            Some(s) => serde_json::from_str(s).unwrap_or_else(|e| {
                warn!(error = %e, "discarding unreadable preference set");
                Self::default()
            }),
        }
    }

    pub fn encode(&self) -> String {
        serde_json::to_string(&self.ids).unwrap_or_else(|_| "[]".to_string())
    }
}

/// String key-value persistence scoped to one client profile.
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&self, key: &str, value: &str) -> Result<()>;
}

/// Volatile [`KeyValueStore`] for tests and embedding.
#[derive(Default)]
pub struct MemoryKeyValueStore {
    values: RwLock<HashMap<String, String>>,
}

impl MemoryKeyValueStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryKeyValueStore {
    fn get(&self, key: &str) -> Option<String> {
        self.values.read().ok()?.get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        let mut values = self
            .values
            .write()
            .map_err(|_| anyhow::anyhow!("preference store lock poisoned"))?;
        values.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// Favorites and helpful votes over a [`KeyValueStore`].
pub struct LocalPreferences<K: KeyValueStore> {
    kv: K,
}

impl<K: KeyValueStore> LocalPreferences<K> {
    pub fn new(kv: K) -> Self {
        Self { kv }
    }

    pub fn favorites(&self) -> PreferenceSet {
        PreferenceSet::decode(self.kv.get(FAVORITES_KEY).as_deref())
    }

    pub fn voted(&self) -> PreferenceSet {
        PreferenceSet::decode(self.kv.get(VOTED_KEY).as_deref())
    }

    /// Flip `id` in the favorites set and persist it. Returns whether the
    /// id is a favorite afterwards.
    pub fn toggle_favorite(&self, id: &str) -> Result<bool> {
        let mut favs = self.favorites();
        let now_favorite = favs.toggle(id);
        self.kv.set(FAVORITES_KEY, &favs.encode())?;
        Ok(now_favorite)
    }

    pub fn has_voted(&self, id: &str) -> bool {
        self.voted().contains(id)
    }

    pub fn mark_voted(&self, id: &str) -> Result<()> {
        let mut voted = self.voted();
        if voted.insert(id) {
            self.kv.set(VOTED_KEY, &voted.encode())?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn double_toggle_restores_original_set() {
        let prefs = LocalPreferences::new(MemoryKeyValueStore::new());
        prefs.toggle_favorite("keep").unwrap();
        let before = prefs.favorites();

        assert!(prefs.toggle_favorite("x").unwrap());
        assert!(prefs.favorites().contains("x"));
        assert!(!prefs.toggle_favorite("x").unwrap());

        assert_eq!(prefs.favorites(), before);
    }

    #[test]
    fn toggle_removes_existing_member() {
        let mut set = PreferenceSet::default();
        assert!(set.toggle("a"));
        assert!(set.toggle("b"));
        assert!(!set.toggle("a"));
        assert_eq!(set.iter().collect::<Vec<_>>(), vec!["b"]);
    }

    #[test]
    fn unreadable_value_decodes_empty() {
        assert!(PreferenceSet::decode(Some("not json")).is_empty());
        assert!(PreferenceSet::decode(None).is_empty());
        assert_eq!(PreferenceSet::decode(Some(r#"["a","b"]"#)).len(), 2);
    }

    #[test]
    fn votes_are_persisted_once() {
        let prefs = LocalPreferences::new(MemoryKeyValueStore::new());
        assert!(!prefs.has_voted("a"));
        prefs.mark_voted("a").unwrap();
        prefs.mark_voted("a").unwrap();
        assert!(prefs.has_voted("a"));
        assert_eq!(prefs.voted().len(), 1);
    }
}
