//! Time-bounded in-memory cache
//!
//! Memoizes expensive lookups (remote version listings, search results)
//! for a fixed lifetime. Entries expire lazily: staleness is checked when a
//! key is accessed, never by a background sweep.

mod clock;
mod shared;

pub use clock::{Clock, ManualClock, SystemClock};
pub use shared::SharedTimedCache;

use crate::error::ErrorKind;
use std::collections::HashMap;
use std::fmt::Debug;
use std::hash::Hash;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, trace};

/// Errors that can occur during cache operations
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CacheError {
    /// Bad constructor arguments
    #[error("Invalid cache configuration: {0}")]
    InvalidConfiguration(String),

    /// Key absent (or expired) and nothing could produce a value
    #[error("Key not found in cache: {0}")]
    NotFound(String),
}

impl CacheError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            CacheError::InvalidConfiguration(_) => ErrorKind::InvalidConfiguration,
            CacheError::NotFound(_) => ErrorKind::NotFound,
        }
    }
}

/// Produces a value for a key the cache does not hold
pub type Factory<K, V> = Box<dyn Fn(&K) -> Option<V> + Send + Sync>;

/// A cached value and the instant (on the cache's clock) after which it is stale
#[derive(Debug, Clone)]
struct Entry<V> {
    value: V,
    /// `None` never expires
    expires_at: Option<Duration>,
}

/// Keyed store whose entries expire after a lifetime
///
/// The lifetime is fixed at construction:
/// - `None`: entries never expire
/// - `Some(0)`: caching disabled, [`write`](Self::write) drops the value
/// - `Some(n)`: entries expire `n` seconds after they were written
///
/// [`write_with_expiration`](Self::write_with_expiration) overrides the
/// lifetime for a single entry.
///
/// Not synchronized; wrap in [`SharedTimedCache`] to share between threads.
pub struct TimedCache<K, V, C = SystemClock> {
    cache_time: Option<Duration>,
    factory: Option<Factory<K, V>>,
    entries: HashMap<K, Entry<V>>,
    clock: C,
}

fn validate_cache_time(cache_time: Option<i64>) -> Result<Option<Duration>, CacheError> {
    match cache_time {
        Some(secs) if secs < 0 => Err(CacheError::InvalidConfiguration(format!(
            "cache_time cannot be negative (got {})",
            secs
        ))),
        Some(secs) => Ok(Some(Duration::from_secs(secs.unsigned_abs()))),
        None => Ok(None),
    }
}

impl<K, V> TimedCache<K, V, SystemClock>
where
    K: Eq + Hash + Debug,
    V: Clone,
{
    /// Create a cache backed by the system clock
    ///
    /// # Arguments
    /// * `cache_time` - Entry lifetime in seconds, `None` for infinite,
    ///   `Some(0)` to disable caching
    ///
    /// # Returns
    /// * `Err(CacheError::InvalidConfiguration)` - `cache_time` is negative
    pub fn new(cache_time: Option<i64>) -> Result<Self, CacheError> {
        Self::with_clock(cache_time, SystemClock)
    }
}

impl<K, V, C> TimedCache<K, V, C>
where
    K: Eq + Hash + Debug,
    V: Clone,
    C: Clock,
{
    /// Create a cache that reads time from `clock`
    pub fn with_clock(cache_time: Option<i64>, clock: C) -> Result<Self, CacheError> {
        Ok(Self {
            cache_time: validate_cache_time(cache_time)?,
            factory: None,
            entries: HashMap::new(),
            clock,
        })
    }

    /// Populate misses by calling `factory` with the missing key
    ///
    /// The factory returns `None` when it has no value for the key.
    pub fn with_factory<F>(mut self, factory: F) -> Self
    where
        F: Fn(&K) -> Option<V> + Send + Sync + 'static,
    {
        self.factory = Some(Box::new(factory));
        self
    }

    /// Global entry lifetime (`None` = infinite)
    pub fn cache_time(&self) -> Option<Duration> {
        self.cache_time
    }

    fn is_disabled(&self) -> bool {
        self.cache_time == Some(Duration::ZERO)
    }

    /// Drop `key` if it is present and stale
    fn evict_expired(&mut self, key: &K) {
        let now = self.clock.now();
        let expired = matches!(
            self.entries.get(key),
            Some(Entry { expires_at: Some(deadline), .. }) if now > *deadline
        );
        if expired {
            debug!(key = ?key, "evicting expired cache entry");
            self.entries.remove(key);
        }
    }

    fn not_found(key: &K) -> CacheError {
        CacheError::NotFound(format!("{:?}", key))
    }

    /// Store a value under the global lifetime
    ///
    /// A no-op when caching is disabled.
    pub fn write(&mut self, key: K, value: V) {
        if self.is_disabled() {
            trace!(key = ?key, "caching disabled, dropping write");
            return;
        }
        let now = self.clock.now();
        // A deadline past the end of representable time never arrives
        let expires_at = self.cache_time.and_then(|lifetime| now.checked_add(lifetime));
        self.entries.insert(key, Entry { value, expires_at });
    }

    /// Store a value that expires `expiration` seconds from now, regardless
    /// of the global lifetime
    ///
    /// `None` never expires. Zero or a negative value removes any existing
    /// entry for `key` and stores nothing.
    pub fn write_with_expiration(&mut self, key: K, value: V, expiration: Option<i64>) {
        let expires_at = match expiration {
            None => None,
            Some(secs) if secs <= 0 => {
                if self.entries.remove(&key).is_some() {
                    debug!(key = ?key, "removed entry written with non-positive expiration");
                }
                return;
            }
            Some(secs) => self
                .clock
                .now()
                .checked_add(Duration::from_secs(secs.unsigned_abs())),
        };
        self.entries.insert(key, Entry { value, expires_at });
    }

    /// Look up a value
    ///
    /// Stale entries are evicted first. On a miss the factory (if any) is
    /// consulted; its value is returned but not stored.
    ///
    /// # Returns
    /// * `Err(CacheError::NotFound)` - no entry and no factory value
    pub fn read(&mut self, key: &K) -> Result<V, CacheError> {
        self.evict_expired(key);
        if let Some(entry) = self.entries.get(key) {
            return Ok(entry.value.clone());
        }
        let factory = self.factory.as_ref().ok_or_else(|| Self::not_found(key))?;
        factory(key).ok_or_else(|| Self::not_found(key))
    }

    /// Look up a value, storing whatever the factory produces on a miss
    pub fn get(&mut self, key: &K) -> Option<V>
    where
        K: Clone,
    {
        self.evict_expired(key);
        if let Some(entry) = self.entries.get(key) {
            return Some(entry.value.clone());
        }
        let value = self.factory.as_ref().and_then(|factory| factory(key))?;
        debug!(key = ?key, "populating cache from factory");
        self.write(key.clone(), value.clone());
        Some(value)
    }

    /// Like [`get`](Self::get), returning `default` when nothing can be produced
    pub fn get_or_default(&mut self, key: &K, default: V) -> V
    where
        K: Clone,
    {
        self.get(key).unwrap_or(default)
    }

    /// Whether a live entry exists for `key`
    ///
    /// Evicts a stale entry but never consults the factory.
    pub fn contains(&mut self, key: &K) -> bool {
        self.evict_expired(key);
        self.entries.contains_key(key)
    }

    /// Remove an entry, returning its value
    ///
    /// # Returns
    /// * `Err(CacheError::NotFound)` - no entry for `key`
    pub fn delete(&mut self, key: &K) -> Result<V, CacheError> {
        self.entries
            .remove(key)
            .map(|entry| entry.value)
            .ok_or_else(|| Self::not_found(key))
    }

    /// Remove every entry
    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

impl<K, V, C> std::fmt::Debug for TimedCache<K, V, C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TimedCache")
            .field("cache_time", &self.cache_time)
            .field("has_factory", &self.factory.is_some())
            .field("entries", &self.entries.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cache(cache_time: Option<i64>) -> (TimedCache<String, u32, ManualClock>, ManualClock) {
        let clock = ManualClock::new(Duration::from_secs(1_000));
        let cache = TimedCache::with_clock(cache_time, clock.clone()).unwrap();
        (cache, clock)
    }

    #[test]
    fn test_negative_cache_time() {
        let err = TimedCache::<String, u32>::new(Some(-1)).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidConfiguration);
    }

    #[test]
    fn test_entry_valid_at_exact_lifetime() {
        let (mut cache, clock) = cache(Some(5));
        cache.write("a".into(), 1);
        clock.advance_secs(5);
        assert_eq!(cache.read(&"a".into()), Ok(1));
        clock.advance(Duration::from_millis(1));
        assert!(!cache.contains(&"a".into()));
    }

    #[test]
    fn test_overwrite_resets_lifetime() {
        let (mut cache, clock) = cache(Some(5));
        cache.write("a".into(), 1);
        clock.advance_secs(4);
        cache.write("a".into(), 2);
        clock.advance_secs(4);
        assert_eq!(cache.read(&"a".into()), Ok(2));
    }

    #[test]
    fn test_expiration_override_on_disabled_cache() {
        let (mut cache, clock) = cache(Some(0));
        cache.write_with_expiration("a".into(), 1, Some(10));
        clock.advance_secs(9);
        assert_eq!(cache.read(&"a".into()), Ok(1));
        clock.advance_secs(2);
        assert!(cache.read(&"a".into()).is_err());
    }

    #[test]
    fn test_non_positive_expiration_removes_existing() {
        let (mut cache, _clock) = cache(None);
        cache.write("a".into(), 1);
        cache.write_with_expiration("a".into(), 2, Some(-3));
        assert!(!cache.contains(&"a".into()));
    }

    #[test]
    fn test_deadline_overflow_never_expires() {
        let clock = ManualClock::new(Duration::MAX - Duration::from_secs(1));
        let mut cache = TimedCache::with_clock(Some(5), clock.clone()).unwrap();
        cache.write("a".to_string(), 1);
        cache.write_with_expiration("b".to_string(), 2, Some(60));
        clock.advance_secs(1);
        assert_eq!(cache.read(&"a".to_string()), Ok(1));
        assert_eq!(cache.read(&"b".to_string()), Ok(2));
    }

    #[test]
    fn test_delete_missing() {
        let (mut cache, _clock) = cache(None);
        let err = cache.delete(&"a".into()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
    }

    #[test]
    fn test_delete_returns_value() {
        let (mut cache, _clock) = cache(None);
        cache.write("a".into(), 7);
        assert_eq!(cache.delete(&"a".into()), Ok(7));
        assert!(!cache.contains(&"a".into()));
    }
}
