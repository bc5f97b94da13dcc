use std::collections::HashSet;

use crate::alignment::token_cache::{InMemoryTokenCache, TokenCache};
use crate::config::{BilingualAlignerConfig, LanguageProfile};

/// Lowercased words of `text`, without the stoplist entries.
pub fn content_words(text: &str, stopwords: &HashSet<String>) -> Vec<String> {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|w| !w.is_empty())
        .map(str::to_lowercase)
        .filter(|w| !stopwords.contains(w))
        .collect()
}

/// Shared-vocabulary similarity between two sentences of one language.
pub struct LexicalOverlap {
    stopwords: HashSet<String>,
    long_sentence_min_words: usize,
    long_min_ratio: f64,
    short_min_ratio: f64,
    cache: CacheScope,
}

/// Token cache backing one [`LexicalOverlap`].
enum CacheScope {
    /// Owned by the matcher and emptied once every scan finishes.
    PerScan(InMemoryTokenCache),
    /// Supplied by the caller, who owns its lifetime.
    Shared(Box<dyn TokenCache>),
}

impl CacheScope {
    fn get(&self) -> &dyn TokenCache {
        match self {
            Self::PerScan(cache) => cache,
            Self::Shared(cache) => cache.as_ref(),
        }
    }
}

impl LexicalOverlap {
    /// Memoizes tokens for the duration of one scan; see [`Self::end_scan`].
    pub fn new(profile: &LanguageProfile, config: &BilingualAlignerConfig) -> Self {
        Self::with_scope(
            profile,
            config,
            CacheScope::PerScan(InMemoryTokenCache::new()),
        )
    }

    /// Uses `cache` as is; entries survive across scans.
    pub fn with_cache(
        profile: &LanguageProfile,
        config: &BilingualAlignerConfig,
        cache: Box<dyn TokenCache>,
    ) -> Self {
        Self::with_scope(profile, config, CacheScope::Shared(cache))
    }

    fn with_scope(
        profile: &LanguageProfile,
        config: &BilingualAlignerConfig,
        cache: CacheScope,
    ) -> Self {
        Self {
            stopwords: profile
                .stopwords
                .iter()
                .map(|w| w.to_lowercase())
                .collect(),
            long_sentence_min_words: config.long_sentence_min_words,
            long_min_ratio: config.long_min_ratio,
            short_min_ratio: config.short_min_ratio,
            cache,
        }
    }

    /// Fraction of shared distinct words, relative to each side's word count.
    ///
    /// Returns `(x_word_count, ratio_x, ratio_y)`, or `None` when either side
    /// has no content words.
    pub fn overlap(&self, x: &str, y: &str) -> Option<(usize, f64, f64)> {
        let compute = |text: &str| content_words(text, &self.stopwords);
        let x_words = self.cache.get().get_or_compute(x, &compute);
        let y_words = self.cache.get().get_or_compute(y, &compute);
        if x_words.is_empty() || y_words.is_empty() {
            return None;
        }
        let x_set: HashSet<&str> = x_words.iter().map(String::as_str).collect();
        let y_set: HashSet<&str> = y_words.iter().map(String::as_str).collect();
        let shared = x_set.intersection(&y_set).count() as f64;
        Some((
            x_words.len(),
            shared / x_words.len() as f64,
            shared / y_words.len() as f64,
        ))
    }

    pub fn matches(&self, x: &str, y: &str) -> bool {
        if x == y {
            return true;
        }
        let Some((x_count, r1, r2)) = self.overlap(x, y) else {
            return false;
        };
        // Small absolute overlaps are weak evidence, so short sentences need more.
        let min_ratio = if x_count > self.long_sentence_min_words {
            self.long_min_ratio
        } else {
            self.short_min_ratio
        };
        r1 > min_ratio && r2 > min_ratio
    }

    /// Forgets the tokens memoized by the scan that just finished.
    pub fn end_scan(&self) {
        if let CacheScope::PerScan(cache) = &self.cache {
            cache.clear();
        }
    }

    /// Entries held by the per-scan cache; `None` for a caller-supplied cache.
    pub fn scan_cache_len(&self) -> Option<usize> {
        match &self.cache {
            CacheScope::PerScan(cache) => Some(cache.len()),
            CacheScope::Shared(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::alignment::token_cache::NoTokenCache;

    fn english() -> LexicalOverlap {
        LexicalOverlap::new(&LanguageProfile::english(), &BilingualAlignerConfig::default())
    }

    #[test]
    fn content_words_lowercases_and_filters() {
        let stop: HashSet<String> = ["the".to_string(), "to".to_string()].into();
        let words = content_words("The cat went to THE market, quickly!", &stop);
        assert_eq!(words, ["cat", "went", "market", "quickly"]);
    }

    #[test]
    fn identical_strings_always_match() {
        let overlap = english();
        assert!(overlap.matches("Hello", "Hello"));
        assert!(overlap.matches("", ""));
        assert!(overlap.matches("the", "the"));
    }

    #[test]
    fn disjoint_sentences_never_match() {
        let overlap = english();
        assert!(!overlap.matches("red green blue", "cats dogs birds"));
        assert!(!overlap.matches(
            "one two three four five six seven eight",
            "nine ten eleven twelve thirteen fourteen"
        ));
    }

    #[test]
    fn short_sentence_at_half_overlap_does_not_match() {
        let overlap = english();
        assert!(!overlap.matches("one two three four", "one two five six"));
        assert!(overlap.matches("one two three four", "one two three six"));
    }

    #[test]
    fn long_sentence_uses_lower_ratio() {
        let overlap = english();
        // 7 words each, 3 shared: 3/7 ≈ 0.43 > 0.42
        assert!(overlap.matches(
            "alpha beta gamma delta epsilon zeta eta",
            "alpha beta gamma one two three four"
        ));
        // 7 words each, 2 shared: 2/7 ≈ 0.29
        assert!(!overlap.matches(
            "alpha beta gamma delta epsilon zeta eta",
            "alpha beta one two three four five"
        ));
    }

    #[test]
    fn stopwords_do_not_count_as_overlap() {
        let overlap = english();
        assert!(!overlap.matches("the cat to a", "the dog to a"));
        assert_eq!(overlap.overlap("the to a", "cat"), None);
    }

    #[test]
    fn per_scan_cache_is_emptied_by_end_scan() {
        let overlap = english();
        assert!(!overlap.matches("red apple", "red pear"));
        assert_eq!(overlap.scan_cache_len(), Some(2));
        overlap.end_scan();
        assert_eq!(overlap.scan_cache_len(), Some(0));

        let shared = LexicalOverlap::with_cache(
            &LanguageProfile::english(),
            &BilingualAlignerConfig::default(),
            Box::new(InMemoryTokenCache::new()),
        );
        shared.end_scan();
        assert_eq!(shared.scan_cache_len(), None);
    }

    #[test]
    fn overlap_ratios_are_per_side() {
        let overlap = LexicalOverlap::with_cache(
            &LanguageProfile::default(),
            &BilingualAlignerConfig::default(),
            Box::new(NoTokenCache),
        );
        let (count, r1, r2) = overlap.overlap("a b", "a b c d").expect("non-empty");
        assert_eq!(count, 2);
        assert!((r1 - 1.0).abs() < 1e-9);
        assert!((r2 - 0.5).abs() < 1e-9);
    }
}
