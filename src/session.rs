//! Practice session state: which deck, which character, which display flags.
//!
//! Navigation methods return `true` when the active character changed; the
//! caller then resets the ink engine and re-renders the mask layers.

use crate::error::InkError;
use crate::prefs::Preferences;
use crate::vocab::{VocabEntry, VocabProvider};

pub struct PracticeSession {
    level: u8,
    deck: Vec<VocabEntry>,
    /// Display order: indices into `deck`.
    order: Vec<usize>,
    /// Seed of the current shuffle; persisted so a reload rebuilds the same order.
    seed: u64,
    index: usize,
    shuffle: bool,
    hint: bool,
    dark_theme: bool,
}

impl PracticeSession {
    /// Restore a session from saved preferences. An unknown saved level falls
    /// back to level 1. `seed` is only used when no shuffle seed was saved.
    pub fn new(prefs: Preferences, provider: &dyn VocabProvider, seed: u64) -> Self {
        let seed = prefs.seed.unwrap_or(seed);
        let (level, deck) = match provider.load(prefs.deck) {
            deck if !deck.is_empty() => (prefs.deck, deck),
            _ => (1, provider.load(1)),
        };
        let order = build_order(deck.len(), prefs.shuffle, seed);
        let index = if order.is_empty() {
            0
        } else {
            prefs.index % order.len()
        };
        Self {
            level,
            deck,
            order,
            seed,
            index,
            shuffle: prefs.shuffle,
            hint: false,
            dark_theme: prefs.dark_theme,
        }
    }

    pub fn current(&self) -> Option<&VocabEntry> {
        self.order.get(self.index).and_then(|&i| self.deck.get(i))
    }

    pub fn level(&self) -> u8 {
        self.level
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn hint(&self) -> bool {
        self.hint
    }

    pub fn shuffle(&self) -> bool {
        self.shuffle
    }

    pub fn dark_theme(&self) -> bool {
        self.dark_theme
    }

    pub fn next(&mut self) -> bool {
        let len = self.order.len();
        if len < 2 {
            return false;
        }
        self.index = (self.index + 1) % len;
        true
    }

    pub fn prev(&mut self) -> bool {
        let len = self.order.len();
        if len < 2 {
            return false;
        }
        self.index = (self.index + len - 1) % len;
        true
    }

    pub fn goto(&mut self, index: usize) -> bool {
        if index >= self.order.len() || index == self.index {
            return false;
        }
        self.index = index;
        true
    }

    /// Switch deck; starts at the first entry.
    pub fn set_level(&mut self, level: u8, provider: &dyn VocabProvider, seed: u64) -> Result<(), InkError> {
        let deck = provider.load(level);
        if deck.is_empty() {
            return Err(InkError::UnknownLevel(level));
        }
        self.order = build_order(deck.len(), self.shuffle, seed);
        self.seed = seed;
        self.deck = deck;
        self.level = level;
        self.index = 0;
        Ok(())
    }

    /// Reorder the deck while keeping the current character on screen.
    pub fn set_shuffle(&mut self, shuffle: bool, seed: u64) {
        let current = self.order.get(self.index).copied();
        self.shuffle = shuffle;
        self.order = build_order(self.deck.len(), shuffle, seed);
        self.seed = seed;
        self.index = current
            .and_then(|c| self.order.iter().position(|&i| i == c))
            .unwrap_or(0);
    }

    /// Returns true when the flag changed (background needs a redraw).
    pub fn set_hint(&mut self, hint: bool) -> bool {
        let changed = self.hint != hint;
        self.hint = hint;
        changed
    }

    pub fn set_dark_theme(&mut self, dark: bool) -> bool {
        let changed = self.dark_theme != dark;
        self.dark_theme = dark;
        changed
    }

    pub fn preferences(&self) -> Preferences {
        Preferences {
            deck: self.level,
            index: self.index,
            shuffle: self.shuffle,
            seed: Some(self.seed),
            dark_theme: self.dark_theme,
        }
    }
}

fn build_order(len: usize, shuffle: bool, seed: u64) -> Vec<usize> {
    if shuffle {
        shuffled_order(len, seed)
    } else {
        (0..len).collect()
    }
}

/// Fisher–Yates permutation of `0..len` driven by a linear congruential generator.
pub fn shuffled_order(len: usize, seed: u64) -> Vec<usize> {
    let mut order: Vec<usize> = (0..len).collect();
    let mut state = seed;
    for i in (1..len).rev() {
        state = state.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
        let j = ((state >> 33) % (i as u64 + 1)) as usize;
        order.swap(i, j);
    }
    order
}
