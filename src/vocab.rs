//! Practice vocabulary: entries per proficiency level.
//!
//! The host page may hand over a JSON deck (feature `serde_json`); whenever a
//! level is missing or empty the built-in fallback set is used instead.
//! Pronunciations are tone-numbered pinyin (1–5, 5 = neutral tone).

use std::collections::BTreeMap;
use std::ops::RangeInclusive;

#[cfg(feature = "serde_json")]
use crate::error::InkError;

/// Proficiency levels known to the fallback set.
pub const LEVELS: RangeInclusive<u8> = 1..=6;

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct VocabEntry {
    pub character: String,
    pub pronunciation: String,
    pub definition: String,
}

impl VocabEntry {
    pub fn new(character: &str, pronunciation: &str, definition: &str) -> Self {
        Self {
            character: character.to_string(),
            pronunciation: pronunciation.to_string(),
            definition: definition.to_string(),
        }
    }
}

/// Source of practice entries.
pub trait VocabProvider {
    /// Entries for `level`; empty when the level is unknown.
    fn load(&self, level: u8) -> Vec<VocabEntry>;
}

// -----------------------------------------------------------------------------
// Built-in fallback set
// -----------------------------------------------------------------------------

type Row = (&'static str, &'static str, &'static str);

pub const LEVEL1: &[Row] = &[
    ("人", "ren2", "person"), ("口", "kou3", "mouth"), ("大", "da4", "big"),
    ("小", "xiao3", "small"), ("山", "shan1", "mountain"), ("水", "shui3", "water"),
    ("日", "ri4", "sun; day"), ("月", "yue4", "moon; month"), ("中", "zhong1", "middle"),
    ("天", "tian1", "sky; day"), ("好", "hao3", "good"), ("你", "ni3", "you"),
];

pub const LEVEL2: &[Row] = &[
    ("手", "shou3", "hand"), ("目", "mu4", "eye"), ("耳", "er3", "ear"),
    ("心", "xin1", "heart"), ("火", "huo3", "fire"), ("木", "mu4", "tree; wood"),
    ("上", "shang4", "above"), ("下", "xia4", "below"), ("左", "zuo3", "left"),
    ("右", "you4", "right"),
];

pub const LEVEL3: &[Row] = &[
    ("米", "mi3", "rice"), ("花", "hua1", "flower"), ("林", "lin2", "woods"),
    ("雨", "yu3", "rain"), ("风", "feng1", "wind"), ("鱼", "yu2", "fish"),
    ("黑", "hei1", "black"), ("猫", "mao1", "cat"),
];

pub const LEVEL4: &[Row] = &[
    ("学", "xue2", "to study"), ("字", "zi4", "character"), ("汉", "han4", "Han"),
    ("国", "guo2", "country"), ("电", "dian4", "electricity"), ("食", "shi2", "food"),
    ("足", "zu2", "foot"), ("气", "qi4", "air; gas"),
];

pub const LEVEL5: &[Row] = &[
    ("语", "yu3", "language"), ("言", "yan2", "speech"), ("眼", "yan3", "eye"),
    ("睛", "jing1", "eyeball"), ("朋", "peng2", "friend"), ("友", "you3", "friend"),
    ("师", "shi1", "teacher"), ("情", "qing2", "feeling"),
];

pub const LEVEL6: &[Row] = &[
    ("墨", "mo4", "ink"), ("笔", "bi3", "brush; pen"), ("纸", "zhi3", "paper"),
    ("砚", "yan4", "inkstone"), ("书", "shu1", "book; write"), ("法", "fa3", "method"),
    ("练", "lian4", "to practice"), ("写", "xie3", "to write"),
];

/// Fallback rows for a level.
pub fn builtin(level: u8) -> &'static [Row] {
    match level {
        1 => LEVEL1,
        2 => LEVEL2,
        3 => LEVEL3,
        4 => LEVEL4,
        5 => LEVEL5,
        6 => LEVEL6,
        _ => &[],
    }
}

/// Synchronous in-memory vocabulary, always available.
#[derive(Clone, Copy, Debug, Default)]
pub struct FallbackVocab;

impl VocabProvider for FallbackVocab {
    fn load(&self, level: u8) -> Vec<VocabEntry> {
        builtin(level)
            .iter()
            .map(|(c, p, d)| VocabEntry::new(c, p, d))
            .collect()
    }
}

/// Decks supplied by the host, backed by [`FallbackVocab`].
#[derive(Clone, Debug, Default)]
pub struct LoadedVocab {
    levels: BTreeMap<u8, Vec<VocabEntry>>,
}

impl LoadedVocab {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, level: u8, entries: Vec<VocabEntry>) {
        self.levels.insert(level, entries);
    }

    /// Parse a `{"<level>": [{character, pronunciation, definition}, ...]}` object.
    #[cfg(feature = "serde_json")]
    pub fn from_json(text: &str) -> Result<Self, InkError> {
        let raw: BTreeMap<String, Vec<VocabEntry>> =
            serde_json::from_str(text).map_err(|e| InkError::Vocab(e.to_string()))?;
        let mut vocab = Self::new();
        for (key, entries) in raw {
            let level: u8 = key
                .trim()
                .parse()
                .map_err(|_| InkError::Vocab(format!("level key '{}' is not a number", key)))?;
            vocab.insert(level, entries);
        }
        Ok(vocab)
    }
}

impl VocabProvider for LoadedVocab {
    fn load(&self, level: u8) -> Vec<VocabEntry> {
        match self.levels.get(&level) {
            Some(entries) if !entries.is_empty() => entries.clone(),
            _ => FallbackVocab.load(level),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_level_has_entries() {
        for level in LEVELS {
            assert!(!FallbackVocab.load(level).is_empty(), "level {level} empty");
        }
        assert!(FallbackVocab.load(0).is_empty());
        assert!(FallbackVocab.load(7).is_empty());
    }

    #[test]
    fn loaded_levels_fall_back_when_missing_or_empty() {
        let mut v = LoadedVocab::new();
        v.insert(1, vec![VocabEntry::new("永", "yong3", "eternal")]);
        v.insert(2, Vec::new());
        assert_eq!(v.load(1)[0].character, "永");
        assert_eq!(v.load(2), FallbackVocab.load(2));
        assert_eq!(v.load(3), FallbackVocab.load(3));
    }

    #[cfg(feature = "serde_json")]
    #[test]
    fn parses_json_decks() {
        let v = LoadedVocab::from_json(
            r#"{"1": [{"character": "永", "pronunciation": "yong3", "definition": "eternal"}]}"#,
        )
        .unwrap();
        assert_eq!(v.load(1), vec![VocabEntry::new("永", "yong3", "eternal")]);
        assert!(matches!(
            LoadedVocab::from_json(r#"{"one": []}"#),
            Err(InkError::Vocab(_))
        ));
    }
}
