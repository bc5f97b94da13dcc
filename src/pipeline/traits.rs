/// Decides whether a sentence word and a transcript word are the same word.
pub trait WordComparator: Send + Sync {
    fn are_equivalent(&self, a: &str, b: &str) -> bool;
}

/// Decides whether two same-language sentences say the same thing.
///
/// Not symmetric in general: thresholds may depend on the length of `x`.
pub trait OverlapMatcher: Send + Sync {
    fn matches(&self, x: &str, y: &str) -> bool;

    /// Called once a scan over two corpora has finished.
    fn end_scan(&self) {}
}
