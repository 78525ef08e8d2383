// Additional integration tests for vocabulary dataset invariants.
// These tests are native-friendly and avoid wasm/browser APIs.

use std::collections::HashSet;

use hanzi_ink::vocab::{FallbackVocab, LEVELS, VocabProvider, builtin};

#[test]
fn builtin_characters_are_unique_across_levels() {
    let mut seen = HashSet::new();
    for level in LEVELS {
        for (h, _, _) in builtin(level) {
            assert!(seen.insert(*h), "duplicate hanzi '{}' (level {})", h, level);
            assert_eq!(h.chars().count(), 1, "practice entry '{}' is not a single character", h);
        }
    }
}

#[test]
fn builtin_pinyin_is_tone_numbered() {
    for level in LEVELS {
        for (h, p, d) in builtin(level) {
            assert!(!p.is_empty(), "empty pinyin for hanzi '{}'", h);
            assert!(!d.is_empty(), "empty definition for hanzi '{}'", h);
            let last = p.chars().last().unwrap();
            assert!(('1'..='5').contains(&last), "pinyin '{}' for '{}' does not end with tone digit", p, h);
            let digit_count = p.chars().filter(|c| ('1'..='5').contains(c)).count();
            assert_eq!(digit_count, 1, "pinyin '{}' for '{}' should contain exactly one tone digit", p, h);
            for c in p.chars() {
                assert!(c.is_ascii_lowercase() || ('1'..='5').contains(&c), "invalid char '{}' in pinyin '{}' for '{}'", c, p, h);
            }
        }
    }
}

#[test]
fn fallback_provider_matches_builtin_rows() {
    for level in LEVELS {
        let entries = FallbackVocab.load(level);
        assert_eq!(entries.len(), builtin(level).len());
        assert_eq!(entries[0].character, builtin(level)[0].0);
    }
}
