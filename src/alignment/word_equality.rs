use std::collections::{HashMap, HashSet};

use crate::alignment::edit_distance::very_similar;
use crate::config::LanguageProfile;

/// Longest length difference two words may have and still be compared.
const MAX_LEN_DIFF: usize = 2;

/// Decides whether two noisy word tokens denote the same word.
#[derive(Debug, Clone, Default)]
pub struct WordEquivalence {
    variants: HashSet<(String, String)>,
    folds: HashMap<char, char>,
}

impl WordEquivalence {
    pub fn new(profile: &LanguageProfile) -> Self {
        let folds: HashMap<char, char> = profile.char_folds.iter().copied().collect();
        let mut equivalence = Self {
            variants: HashSet::with_capacity(profile.equivalent_words.len() * 2),
            folds,
        };
        for (a, b) in &profile.equivalent_words {
            let a = equivalence.normalize(a);
            let b = equivalence.normalize(b);
            equivalence.variants.insert((b.clone(), a.clone()));
            equivalence.variants.insert((a, b));
        }
        equivalence
    }

    /// Lowercases, drops punctuation and applies the profile's character folds.
    pub fn normalize(&self, word: &str) -> String {
        word.chars()
            .filter(|c| c.is_alphanumeric())
            .flat_map(char::to_lowercase)
            .map(|c| self.folds.get(&c).copied().unwrap_or(c))
            .collect()
    }

    pub fn are_equivalent(&self, a: &str, b: &str) -> bool {
        let a = self.normalize(a);
        let b = self.normalize(b);
        let a_len = a.chars().count();
        if a_len.abs_diff(b.chars().count()) > MAX_LEN_DIFF {
            return false;
        }
        if self.variants.contains(&(a.clone(), b.clone())) {
            return true;
        }
        if a == b {
            return true;
        }
        // Short words are too easy to confuse with one another.
        a_len > 3 && very_similar(&a, &b)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn english() -> WordEquivalence {
        WordEquivalence::new(&LanguageProfile::english())
    }

    #[test]
    fn reflexive_across_casing() {
        let eq = english();
        assert!(eq.are_equivalent("Hello", "hello"));
        assert!(eq.are_equivalent("HELLO", "hElLo"));
        assert!(eq.are_equivalent("a", "A"));
    }

    #[test]
    fn punctuation_is_ignored() {
        let eq = english();
        assert!(eq.are_equivalent("world.", "World"));
        assert!(eq.are_equivalent("\"Yes,\"", "yes"));
    }

    #[test]
    fn length_guard_rejects_before_distance() {
        let eq = english();
        assert!(!eq.are_equivalent("understanding", "understand"));
        assert!(!eq.are_equivalent("cat", "catalog"));
    }

    #[test]
    fn curated_variants_match_both_directions() {
        let eq = WordEquivalence::new(&LanguageProfile::polish());
        assert!(eq.are_equivalent("i", "y"));
        assert!(eq.are_equivalent("Y", "i"));
        assert!(!eq.are_equivalent("a", "y"));
    }

    #[test]
    fn diacritics_fold_through_profile() {
        let pl = WordEquivalence::new(&LanguageProfile::polish());
        assert!(pl.are_equivalent("źle", "zle"));
        let ru = WordEquivalence::new(&LanguageProfile::russian());
        assert!(ru.are_equivalent("ёж", "еж"));
    }

    #[test]
    fn fuzzy_match_only_for_longer_words() {
        let eq = english();
        assert!(eq.are_equivalent("remember", "remembered"));
        assert!(eq.are_equivalent("colour", "color"));
        assert!(eq.are_equivalent("abcdef", "abcxyz"));
        assert!(!eq.are_equivalent("abcdefg", "abwxyzg"));
        assert!(!eq.are_equivalent("cat", "cut"));
        assert!(!eq.are_equivalent("in", "on"));
    }

    #[test]
    fn empty_profile_still_compares() {
        let eq = WordEquivalence::default();
        assert!(eq.are_equivalent("Word", "word"));
        assert!(!eq.are_equivalent("word", "lamp"));
    }
}
