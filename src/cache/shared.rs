//! Shared Cache Module
//!
//! Places the engine behind one exclusive lock so both execution contexts can
//! use it. Every operation holds the lock for its whole duration, index update
//! and storage I/O included.

use std::fmt;
use std::hash::Hash;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Mutex;

use crate::cache::{CacheEngine, CacheStats, SlotView};
use crate::error::Result;
use crate::storage::SlotValue;

// == Shared Cache ==
/// Cloneable handle to a single [`CacheEngine`].
pub struct SharedCache<K, V> {
    inner: Arc<Mutex<CacheEngine<K, V>>>,
}

impl<K, V> Clone for SharedCache<K, V> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<K, V> SharedCache<K, V>
where
    K: Eq + Hash + Clone + fmt::Display,
    V: SlotValue,
{
    pub fn new(engine: CacheEngine<K, V>) -> Self {
        Self {
            inner: Arc::new(Mutex::new(engine)),
        }
    }

    pub async fn put(&self, key: K, value: V, ttl: Option<Duration>) -> Result<()> {
        self.inner.lock().await.put(key, value, ttl)
    }

    pub async fn get(&self, key: &K) -> Result<V> {
        self.inner.lock().await.get(key)
    }

    pub async fn evict(&self, key: &K) -> bool {
        self.inner.lock().await.evict(key)
    }

    pub async fn sweep_expired(&self) -> usize {
        self.inner.lock().await.sweep_expired()
    }

    pub async fn stats(&self) -> CacheStats {
        self.inner.lock().await.stats()
    }

    pub async fn layout(&self) -> Vec<SlotView> {
        self.inner.lock().await.layout()
    }

    pub async fn capacity(&self) -> usize {
        self.inner.lock().await.capacity()
    }

    /// Runs `f` against the engine inside the critical section.
    pub async fn with_engine<R>(&self, f: impl FnOnce(&mut CacheEngine<K, V>) -> R) -> R {
        let mut engine = self.inner.lock().await;
        f(&mut *engine)
    }
}
