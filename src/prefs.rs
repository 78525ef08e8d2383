//! Persisted practice preferences under fixed string keys.

use std::collections::HashMap;

pub const KEY_DECK: &str = "hanzi-ink.deck";
pub const KEY_INDEX: &str = "hanzi-ink.index";
pub const KEY_SHUFFLE: &str = "hanzi-ink.shuffle";
pub const KEY_THEME: &str = "hanzi-ink.theme";
pub const KEY_SEED: &str = "hanzi-ink.seed";

/// Key/value persistence (browser `localStorage` in production).
pub trait PrefStore {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&mut self, key: &str, value: &str);
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct Preferences {
    /// Vocabulary level.
    pub deck: u8,
    /// Position in the deck's display order.
    pub index: usize,
    pub shuffle: bool,
    /// Seed of the shuffled display order, so `index` names the same entry after a reload.
    pub seed: Option<u64>,
    pub dark_theme: bool,
}

impl Default for Preferences {
    fn default() -> Self {
        Self {
            deck: 1,
            index: 0,
            shuffle: false,
            seed: None,
            dark_theme: false,
        }
    }
}

impl Preferences {
    /// Read every key, keeping defaults for missing or malformed values.
    pub fn load(store: &dyn PrefStore) -> Self {
        let d = Self::default();
        Self {
            deck: parse(store, KEY_DECK).unwrap_or(d.deck),
            index: parse(store, KEY_INDEX).unwrap_or(d.index),
            shuffle: parse(store, KEY_SHUFFLE).unwrap_or(d.shuffle),
            seed: parse(store, KEY_SEED).or(d.seed),
            dark_theme: store
                .get(KEY_THEME)
                .map(|t| t == "dark")
                .unwrap_or(d.dark_theme),
        }
    }

    pub fn save(&self, store: &mut dyn PrefStore) {
        store.set(KEY_DECK, &self.deck.to_string());
        store.set(KEY_INDEX, &self.index.to_string());
        store.set(KEY_SHUFFLE, if self.shuffle { "true" } else { "false" });
        store.set(KEY_THEME, if self.dark_theme { "dark" } else { "light" });
        if let Some(seed) = self.seed {
            store.set(KEY_SEED, &seed.to_string());
        }
    }
}

fn parse<T: std::str::FromStr>(store: &dyn PrefStore, key: &str) -> Option<T> {
    store.get(key).and_then(|v| v.trim().parse().ok())
}

/// Non-persistent store (tests, private browsing without storage).
#[derive(Clone, Debug, Default)]
pub struct MemoryStore {
    values: HashMap<String, String>,
}

impl PrefStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) {
        self.values.insert(key.to_string(), value.to_string());
    }
}
