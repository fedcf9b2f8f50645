use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::RwLock;

use crate::term::TermIndex;
use crate::PhenoResult;

/// Cache key of an unordered pair of terms
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
struct PairKey {
    lo: TermIndex,
    hi: TermIndex,
}

impl PairKey {
    fn new(a: TermIndex, b: TermIndex) -> Self {
        if a <= b {
            Self { lo: a, hi: b }
        } else {
            Self { lo: b, hi: a }
        }
    }
}

/// Thread-safe cache of term-term similarity scores
///
/// `(a, b)` and `(b, a)` share the same entry. Entries are never evicted,
/// the cache grows until it is dropped.
///
/// Two threads that miss the same pair at the same time will both calculate
/// the score and insert it. Since the calculation is deterministic, both
/// insert the same value.
///
/// # Examples
///
/// ```
/// use phenosim::similarity::SimilarityCache;
/// use phenosim::TermIndex;
///
/// let cache = SimilarityCache::default();
/// let a = TermIndex::from(1u32);
/// let b = TermIndex::from(2u32);
///
/// assert_eq!(cache.get(a, b), None);
/// cache.insert(a, b, 0.5);
/// assert_eq!(cache.get(b, a), Some(0.5));
///
/// assert_eq!(cache.len(), 1);
/// assert_eq!(cache.hits(), 1);
/// assert_eq!(cache.misses(), 1);
/// assert_eq!(cache.hit_rate(), 0.5);
/// ```
#[derive(Debug, Default)]
pub struct SimilarityCache {
    values: RwLock<HashMap<PairKey, f64>>,
    hits: AtomicU64,
    misses: AtomicU64,
}

impl SimilarityCache {
    /// Returns the cached score of a pair of terms
    ///
    /// Every call is recorded as hit or miss
    pub fn get(&self, a: TermIndex, b: TermIndex) -> Option<f64> {
        let key = PairKey::new(a, b);
        if let Ok(values) = self.values.read() {
            if let Some(value) = values.get(&key) {
                self.hits.fetch_add(1, Ordering::Relaxed);
                return Some(*value);
            }
        }
        self.misses.fetch_add(1, Ordering::Relaxed);
        None
    }

    /// Caches the score of a pair of terms
    pub fn insert(&self, a: TermIndex, b: TermIndex, value: f64) {
        if let Ok(mut values) = self.values.write() {
            values.insert(PairKey::new(a, b), value);
        }
    }

    /// Returns the cached score or calculates and caches it
    ///
    /// # Errors
    ///
    /// Returns the error of `compute`. Failed calculations are not cached.
    pub fn get_or_try_compute<F>(&self, a: TermIndex, b: TermIndex, compute: F) -> PhenoResult<f64>
    where
        F: FnOnce() -> PhenoResult<f64>,
    {
        if let Some(value) = self.get(a, b) {
            return Ok(value);
        }
        let value = compute()?;
        self.insert(a, b, value);
        Ok(value)
    }

    /// Returns the number of cached pairs
    pub fn len(&self) -> usize {
        self.values.read().map_or(0, |values| values.len())
    }

    /// Returns `true` if no pair is cached
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of lookups that found a cached score
    pub fn hits(&self) -> u64 {
        self.hits.load(Ordering::Relaxed)
    }

    /// Number of lookups that did not find a cached score
    pub fn misses(&self) -> u64 {
        self.misses.load(Ordering::Relaxed)
    }

    /// Fraction of lookups that found a cached score
    #[allow(clippy::cast_precision_loss)]
    pub fn hit_rate(&self) -> f64 {
        let hits = self.hits();
        let total = hits + self.misses();
        if total == 0 {
            0.0
        } else {
            hits as f64 / total as f64
        }
    }
}
