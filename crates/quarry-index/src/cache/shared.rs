//! Thread-safe handle around a [`TimedCache`]

use super::{CacheError, Clock, SystemClock, TimedCache};
use parking_lot::Mutex;
use std::fmt::Debug;
use std::hash::Hash;
use std::sync::Arc;

/// A [`TimedCache`] behind a single lock
///
/// Every operation, including factory calls on a miss, runs while holding
/// the lock. Clones share the same cache.
pub struct SharedTimedCache<K, V, C = SystemClock> {
    inner: Arc<Mutex<TimedCache<K, V, C>>>,
}

impl<K, V, C> Clone for SharedTimedCache<K, V, C> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<K, V, C> From<TimedCache<K, V, C>> for SharedTimedCache<K, V, C> {
    fn from(cache: TimedCache<K, V, C>) -> Self {
        Self {
            inner: Arc::new(Mutex::new(cache)),
        }
    }
}

impl<K, V, C> SharedTimedCache<K, V, C>
where
    K: Eq + Hash + Debug + Clone,
    V: Clone,
    C: Clock,
{
    pub fn new(cache: TimedCache<K, V, C>) -> Self {
        cache.into()
    }

    pub fn write(&self, key: K, value: V) {
        self.inner.lock().write(key, value);
    }

    pub fn write_with_expiration(&self, key: K, value: V, expiration: Option<i64>) {
        self.inner.lock().write_with_expiration(key, value, expiration);
    }

    pub fn read(&self, key: &K) -> Result<V, CacheError> {
        self.inner.lock().read(key)
    }

    pub fn get(&self, key: &K) -> Option<V> {
        self.inner.lock().get(key)
    }

    pub fn get_or_default(&self, key: &K, default: V) -> V {
        self.inner.lock().get_or_default(key, default)
    }

    pub fn contains(&self, key: &K) -> bool {
        self.inner.lock().contains(key)
    }

    pub fn delete(&self, key: &K) -> Result<V, CacheError> {
        self.inner.lock().delete(key)
    }

    pub fn clear(&self) {
        self.inner.lock().clear();
    }
}

impl<K, V, C> Debug for SharedTimedCache<K, V, C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("SharedTimedCache").field(&*self.inner.lock()).finish()
    }
}
