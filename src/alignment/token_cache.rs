use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};

/// Memoizes the filtered token list of a sentence string.
///
/// Purely an optimization: a cache that forgets entries only costs
/// recomputation, never a different answer.
pub trait TokenCache: Send + Sync {
    fn get_or_compute(&self, text: &str, compute: &dyn Fn(&str) -> Vec<String>) -> Arc<[String]>;
}

/// Thread-safe cache that lives as long as the aligner owning it.
#[derive(Debug, Default)]
pub struct InMemoryTokenCache {
    entries: RwLock<HashMap<String, Arc<[String]>>>,
}

impl InMemoryTokenCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clear(&self) {
        self.entries
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }
}

impl TokenCache for InMemoryTokenCache {
    fn get_or_compute(&self, text: &str, compute: &dyn Fn(&str) -> Vec<String>) -> Arc<[String]> {
        if let Some(tokens) = self
            .entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(text)
        {
            return Arc::clone(tokens);
        }
        // Two threads may both compute the same entry; the results are identical.
        let tokens: Arc<[String]> = compute(text).into();
        self.entries
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .entry(text.to_string())
            .or_insert_with(|| Arc::clone(&tokens));
        tokens
    }
}

/// Recomputes on every call.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoTokenCache;

impl TokenCache for NoTokenCache {
    fn get_or_compute(&self, text: &str, compute: &dyn Fn(&str) -> Vec<String>) -> Arc<[String]> {
        compute(text).into()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;

    fn split(text: &str) -> Vec<String> {
        text.split_whitespace().map(str::to_string).collect()
    }

    #[test]
    fn in_memory_cache_computes_once_per_text() {
        let cache = InMemoryTokenCache::new();
        let calls = AtomicUsize::new(0);
        let compute = |text: &str| {
            calls.fetch_add(1, Ordering::SeqCst);
            split(text)
        };
        let first = cache.get_or_compute("a b c", &compute);
        let second = cache.get_or_compute("a b c", &compute);
        assert_eq!(&*first, &*second);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        cache.get_or_compute("d e", &compute);
        assert_eq!(calls.load(Ordering::SeqCst), 2);
        assert_eq!(cache.len(), 2);
    }

    #[test]
    fn clear_forgets_entries() {
        let cache = InMemoryTokenCache::new();
        cache.get_or_compute("x y", &split);
        assert!(!cache.is_empty());
        cache.clear();
        assert!(cache.is_empty());
    }

    #[test]
    fn no_cache_always_recomputes() {
        let cache = NoTokenCache;
        let calls = AtomicUsize::new(0);
        let compute = |text: &str| {
            calls.fetch_add(1, Ordering::SeqCst);
            split(text)
        };
        cache.get_or_compute("a", &compute);
        cache.get_or_compute("a", &compute);
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn concurrent_population_is_consistent() {
        let cache = Arc::new(InMemoryTokenCache::new());
        let handles: Vec<_> = (0..4)
            .map(|_| {
                let cache = Arc::clone(&cache);
                std::thread::spawn(move || {
                    for i in 0..50 {
                        let text = format!("word{i} other{i}");
                        let tokens = cache.get_or_compute(&text, &split);
                        assert_eq!(tokens.len(), 2);
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().expect("worker panicked");
        }
        assert_eq!(cache.len(), 50);
    }
}
