//! Construction caches.
//!
//! Every immutable constructor (`add`, `mul`, `pow`, `apply`, ...) memoizes
//! its result keyed by the literal argument tuple it was called with. The key
//! is *not* canonicalized: calling `add(x, y)` twice returns the cached handle,
//! while `add(y, x)` is a separate entry (which still canonicalizes to the
//! same node, since nodes themselves are hash-consed).
//!
//! All constructor caches live in one [`ConstructionCache`], so a single
//! [`clear`][ConstructionCache::clear] resets all of them at once.

use std::borrow::Borrow;
use std::collections::HashMap;
use std::fmt;
use std::hash::Hash;

use crate::kind::KindId;
use crate::reference::ExprRef;

/// A cache backed by [HashMap].
pub struct HashMapCache<K, V> {
    map: HashMap<K, V>,
    hits: usize,
    misses: usize,
}

impl<K, V> Default for HashMapCache<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V> HashMapCache<K, V> {
    pub fn new() -> Self {
        Self {
            map: HashMap::new(),
            hits: 0,
            misses: 0,
        }
    }

    /// Returns the number of entries in the cache.
    pub fn len(&self) -> usize {
        self.map.len()
    }

    /// Returns true if the cache is empty.
    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    /// Returns the number of cache hits.
    pub fn hits(&self) -> usize {
        self.hits
    }

    /// Returns the number of cache misses.
    pub fn misses(&self) -> usize {
        self.misses
    }

    /// Clears all entries and counters.
    pub fn clear(&mut self) {
        self.map.clear();
        self.hits = 0;
        self.misses = 0;
    }
}

impl<K, V> HashMapCache<K, V>
where
    K: Hash + Eq,
    V: Copy,
{
    /// Looks up a key in the cache.
    #[inline]
    pub fn get<Q>(&mut self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        match self.map.get(key) {
            Some(&v) => {
                self.hits += 1;
                Some(v)
            }
            None => {
                self.misses += 1;
                None
            }
        }
    }

    /// Inserts a key-value pair into the cache.
    #[inline]
    pub fn insert(&mut self, key: K, value: V) {
        self.map.insert(key, value);
    }
}

/// Which immutable constructor an entry belongs to.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum Constructor {
    Add,
    Mul,
    Pow,
    Interval,
    Apply(KindId),
}

impl fmt::Display for Constructor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Constructor::Add => write!(f, "add"),
            Constructor::Mul => write!(f, "mul"),
            Constructor::Pow => write!(f, "pow"),
            Constructor::Interval => write!(f, "interval"),
            Constructor::Apply(kind) => write!(f, "apply{}", kind),
        }
    }
}

/// Snapshot of one constructor cache.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct CacheStats {
    pub constructor: Constructor,
    pub entries: usize,
    pub hits: usize,
    pub misses: usize,
}

/// Registry of per-constructor caches.
#[derive(Default)]
pub struct ConstructionCache {
    caches: HashMap<Constructor, HashMapCache<Vec<ExprRef>, ExprRef>>,
}

impl ConstructionCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&mut self, constructor: Constructor, args: &[ExprRef]) -> Option<ExprRef> {
        self.caches.entry(constructor).or_default().get(args)
    }

    pub fn insert(&mut self, constructor: Constructor, args: Vec<ExprRef>, value: ExprRef) {
        self.caches
            .entry(constructor)
            .or_default()
            .insert(args, value);
    }

    /// Total number of cached constructions.
    pub fn len(&self) -> usize {
        self.caches.values().map(|c| c.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Empty every registered cache.
    ///
    /// Each cache is cleared as a whole, and clearing twice is the same as
    /// clearing once.
    pub fn clear(&mut self) {
        for cache in self.caches.values_mut() {
            cache.clear();
        }
    }

    /// Per-constructor statistics, sorted by constructor name.
    pub fn stats(&self) -> Vec<CacheStats> {
        let mut stats: Vec<CacheStats> = self
            .caches
            .iter()
            .map(|(&constructor, cache)| CacheStats {
                constructor,
                entries: cache.len(),
                hits: cache.hits(),
                misses: cache.misses(),
            })
            .collect();
        stats.sort_by_key(|s| s.constructor.to_string());
        stats
    }
}
