use crate::alignment::lexical_overlap::LexicalOverlap;
use crate::alignment::token_cache::TokenCache;
use crate::alignment::word_equality::WordEquivalence;
use crate::config::{BilingualAlignerConfig, LanguageProfile};
use crate::pipeline::traits::{OverlapMatcher, WordComparator};

/// Typo-tolerant word comparison for one language.
pub struct FuzzyWordComparator {
    equivalence: WordEquivalence,
}

impl FuzzyWordComparator {
    pub fn new(profile: &LanguageProfile) -> Self {
        Self {
            equivalence: WordEquivalence::new(profile),
        }
    }
}

impl WordComparator for FuzzyWordComparator {
    fn are_equivalent(&self, a: &str, b: &str) -> bool {
        self.equivalence.are_equivalent(a, b)
    }
}

pub struct LexicalOverlapMatcher {
    overlap: LexicalOverlap,
}

impl LexicalOverlapMatcher {
    pub fn new(profile: &LanguageProfile, config: &BilingualAlignerConfig) -> Self {
        Self {
            overlap: LexicalOverlap::new(profile, config),
        }
    }

    pub fn with_cache(
        profile: &LanguageProfile,
        config: &BilingualAlignerConfig,
        cache: Box<dyn TokenCache>,
    ) -> Self {
        Self {
            overlap: LexicalOverlap::with_cache(profile, config, cache),
        }
    }

    pub fn scan_cache_len(&self) -> Option<usize> {
        self.overlap.scan_cache_len()
    }
}

impl OverlapMatcher for LexicalOverlapMatcher {
    fn matches(&self, x: &str, y: &str) -> bool {
        self.overlap.matches(x, y)
    }

    fn end_scan(&self) {
        self.overlap.end_scan();
    }
}
