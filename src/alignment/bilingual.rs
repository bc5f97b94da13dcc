use std::ops::RangeInclusive;

use crate::config::BilingualAlignerConfig;
use crate::pipeline::traits::OverlapMatcher;
use crate::types::{BilingualSentence, BilingualSentenceMatchingResult, TranslatedSentence};

/// Success rates under this percentage are logged and reported as suspicious.
pub const LOW_SUCCESS_RATE: f64 = 35.0;

/// Cursor into the secondary corpus plus the miss streak widening the window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BilingualScanState {
    pub next_start: usize,
    pub consecutive_failures: usize,
}

impl BilingualScanState {
    pub fn window(
        &self,
        secondary_len: usize,
        config: &BilingualAlignerConfig,
    ) -> Option<RangeInclusive<usize>> {
        let last = secondary_len.checked_sub(1)?;
        let lo = self.next_start.saturating_sub(config.look_back);
        let hi = self
            .next_start
            .saturating_add(config.look_ahead)
            .saturating_add(self.consecutive_failures)
            .min(last);
        (lo <= hi).then_some(lo..=hi)
    }

    /// A match found behind the cursor (via look-back) does not move it back.
    pub fn after_match(self, matched_index: usize) -> Self {
        Self {
            next_start: self.next_start.max(matched_index + 1),
            consecutive_failures: 0,
        }
    }

    pub fn after_miss(self) -> Self {
        Self {
            next_start: self.next_start,
            consecutive_failures: self.consecutive_failures + 1,
        }
    }
}

/// Matchers for the two languages of a bilingual alignment.
///
/// `primary` compares text in the primary corpus' language, `secondary` in
/// the other one.
pub struct LanguageMatchers<'a, P: ?Sized, S: ?Sized> {
    pub primary: &'a P,
    pub secondary: &'a S,
}

fn is_counterpart<P, S>(
    s1: &TranslatedSentence,
    s2: &TranslatedSentence,
    matchers: &LanguageMatchers<'_, P, S>,
) -> bool
where
    P: OverlapMatcher + ?Sized,
    S: OverlapMatcher + ?Sized,
{
    // Either direction may carry the better machine translation.
    matchers.primary.matches(&s1.original, &s2.translation)
        || matchers.secondary.matches(&s1.translation, &s2.original)
}

/// One step of the scan: find the first counterpart of `s1` inside the window.
pub fn scan_entry<P, S>(
    state: BilingualScanState,
    s1: &TranslatedSentence,
    secondary: &[TranslatedSentence],
    matchers: &LanguageMatchers<'_, P, S>,
    config: &BilingualAlignerConfig,
) -> (BilingualScanState, Option<BilingualSentence>)
where
    P: OverlapMatcher + ?Sized,
    S: OverlapMatcher + ?Sized,
{
    let found = state.window(secondary.len(), config).and_then(|window| {
        window.into_iter().find_map(|idx| {
            let s2 = &secondary[idx];
            if !is_counterpart(s1, s2, matchers) {
                return None;
            }
            // Blank originals cannot form a pair; keep scanning.
            BilingualSentence::new(s1.original.as_str(), s2.original.as_str())
                .ok()
                .map(|pair| (idx, pair))
        })
    });

    match found {
        Some((idx, pair)) => {
            tracing::debug!(
                secondary_index = idx,
                next_start = state.next_start,
                "bilingual scan: matched"
            );
            (state.after_match(idx), Some(pair))
        }
        None => (state.after_miss(), None),
    }
}

/// Pairs sentences of two independently translated editions of one book.
pub fn align_corpora<P, S>(
    primary: &[TranslatedSentence],
    secondary: &[TranslatedSentence],
    matchers: &LanguageMatchers<'_, P, S>,
    config: &BilingualAlignerConfig,
) -> BilingualSentenceMatchingResult
where
    P: OverlapMatcher + ?Sized,
    S: OverlapMatcher + ?Sized,
{
    let (_, pairs) = primary.iter().fold(
        (BilingualScanState::default(), Vec::new()),
        |(state, mut pairs), s1| {
            let (next, found) = scan_entry(state, s1, secondary, matchers, config);
            pairs.extend(found);
            (next, pairs)
        },
    );
    matchers.primary.end_scan();
    matchers.secondary.end_scan();

    let result = BilingualSentenceMatchingResult::new(pairs, primary.len());
    tracing::info!(
        primary = primary.len(),
        secondary = secondary.len(),
        matched = result.len(),
        success_rate = format!("{:.1}", result.success_rate()),
        "bilingual scan: finished"
    );
    if !primary.is_empty() && result.success_rate() < LOW_SUCCESS_RATE {
        tracing::warn!(
            success_rate = format!("{:.1}", result.success_rate()),
            "bilingual scan: low success rate; editions may diverge"
        );
    }
    result
}
