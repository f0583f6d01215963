//! Cache Engine Module
//!
//! Main cache engine: an in-memory index over slot-backed storage with FIFO
//! eviction for capacity and TTL expiry for freshness.

use std::collections::{BTreeSet, HashMap};
use std::fmt;
use std::hash::Hash;
use std::marker::PhantomData;
use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, trace, warn};

use crate::cache::{CacheStats, Entry, FifoOrder, SlotState, SlotView};
use crate::clock::{Clock, Timestamp};
use crate::error::{CacheError, Result, StorageError};
use crate::storage::{SlotId, SlotValue, StorageBackend};

// == Slot Plan ==
/// Where a `put` will write, decided before any state is touched.
#[derive(Debug)]
enum SlotPlan<K> {
    /// Key is live; overwrite its slot in place
    Update(SlotId),
    /// Take a slot nobody owns
    Free(SlotId),
    /// Take the slot of an expired entry
    Reclaim(K, SlotId),
    /// Take the slot of the FIFO-oldest live entry
    Evict(K, SlotId),
}

impl<K> SlotPlan<K> {
    fn slot(&self) -> SlotId {
        match self {
            SlotPlan::Update(slot)
            | SlotPlan::Free(slot)
            | SlotPlan::Reclaim(_, slot)
            | SlotPlan::Evict(_, slot) => *slot,
        }
    }
}

// == Cache Engine ==
/// Bounded cache whose values live in a [`StorageBackend`].
///
/// The engine holds one entry per slot at most. New keys take a free slot
/// first, then any expired slot, and only then displace the live entry with
/// the smallest insertion sequence. Updating a live key rewrites its slot but
/// keeps its FIFO position.
///
/// The engine itself is not synchronized; share it through
/// [`SharedCache`](crate::cache::SharedCache).
pub struct CacheEngine<K, V> {
    /// Metadata for every registered entry
    index: HashMap<K, Entry>,
    /// Registered keys by insertion sequence
    fifo: FifoOrder<K>,
    /// Slots not owned by any entry, lowest first
    free_slots: BTreeSet<SlotId>,
    storage: Box<dyn StorageBackend>,
    clock: Arc<dyn Clock>,
    stats: CacheStats,
    capacity: usize,
    default_ttl: Duration,
    _value: PhantomData<fn() -> V>,
}

impl<K, V> fmt::Debug for CacheEngine<K, V>
where
    K: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CacheEngine")
            .field("index", &self.index)
            .field("free_slots", &self.free_slots)
            .field("capacity", &self.capacity)
            .field("default_ttl", &self.default_ttl)
            .finish_non_exhaustive()
    }
}

impl<K, V> CacheEngine<K, V>
where
    K: Eq + Hash + Clone + fmt::Display,
    V: SlotValue,
{
    // == Constructor ==
    /// Creates an empty engine over `storage`. Capacity is the backend's slot
    /// count.
    pub fn new(
        storage: Box<dyn StorageBackend>,
        clock: Arc<dyn Clock>,
        default_ttl: Duration,
    ) -> Result<Self> {
        let capacity = storage.slot_count();
        if capacity == 0 {
            return Err(CacheError::InvalidConfig(
                "storage backend exposes no slots".to_string(),
            ));
        }
        if default_ttl.is_zero() {
            return Err(CacheError::InvalidConfig(
                "default TTL must be non-zero".to_string(),
            ));
        }

        Ok(Self {
            index: HashMap::with_capacity(capacity),
            fifo: FifoOrder::new(),
            free_slots: (0..capacity).collect(),
            storage,
            clock,
            stats: CacheStats::new(),
            capacity,
            default_ttl,
            _value: PhantomData,
        })
    }

    // == Put ==
    /// Stores `value` under `key` with `ttl` (or the default TTL).
    ///
    /// On a storage fault the index is left exactly as it was before the call.
    pub fn put(&mut self, key: K, value: V, ttl: Option<Duration>) -> Result<()> {
        let now = self.clock.now();
        let ttl = ttl.unwrap_or(self.default_ttl);
        let plan = self.plan_slot(&key, now)?;
        let slot = plan.slot();

        if let Err(err) = self.storage.write(slot, &value.encode()) {
            self.stats.record_storage_fault();
            warn!(key = %key, slot, error = %err, "put failed, index unchanged");
            return Err(err.into());
        }

        match plan {
            SlotPlan::Update(_) => {
                if let Some(entry) = self.index.get_mut(&key) {
                    entry.refresh(now, ttl);
                }
                self.stats.record_put(true);
                trace!(key = %key, slot, "updated in place");
                return Ok(());
            }
            SlotPlan::Free(slot) => {
                self.free_slots.remove(&slot);
            }
            SlotPlan::Reclaim(victim, _) => {
                self.detach(&victim);
                self.stats.record_expirations(1);
                debug!(victim = %victim, slot, "reused expired slot");
            }
            SlotPlan::Evict(victim, _) => {
                self.detach(&victim);
                self.stats.record_eviction();
                debug!(victim = %victim, slot, "evicted oldest entry");
            }
        }

        let sequence = self.fifo.admit(key.clone());
        trace!(key = %key, slot, sequence, "inserted");
        self.index.insert(key, Entry::new(sequence, slot, now, ttl));
        self.stats.record_put(false);
        self.stats.set_total_entries(self.index.len());
        Ok(())
    }

    /// Picks the slot a `put` of `key` will write without mutating anything.
    fn plan_slot(&self, key: &K, now: Timestamp) -> Result<SlotPlan<K>> {
        if let Some(entry) = self.index.get(key) {
            return Ok(if entry.is_expired(now) {
                SlotPlan::Reclaim(key.clone(), entry.storage_slot)
            } else {
                SlotPlan::Update(entry.storage_slot)
            });
        }

        if let Some(&slot) = self.free_slots.first() {
            return Ok(SlotPlan::Free(slot));
        }

        // Any expired entry goes before a live one
        if let Some((victim, entry)) = self.index.iter().find(|(_, e)| e.is_expired(now)) {
            return Ok(SlotPlan::Reclaim(victim.clone(), entry.storage_slot));
        }

        match self.fifo.oldest() {
            Some((sequence, victim)) => {
                let entry = self.index.get(victim).ok_or_else(|| {
                    CacheError::CapacityInvariantViolation(format!(
                        "sequence {} in FIFO order has no index entry",
                        sequence
                    ))
                })?;
                Ok(SlotPlan::Evict(victim.clone(), entry.storage_slot))
            }
            None => Err(CacheError::CapacityInvariantViolation(format!(
                "no free, expired or live slot among {} slots",
                self.capacity
            ))),
        }
    }

    // == Get ==
    /// Returns the value stored under `key`.
    ///
    /// An expired entry is evicted on the spot. A storage fault leaves the
    /// entry in place so the lookup can be retried.
    pub fn get(&mut self, key: &K) -> Result<V> {
        let now = self.clock.now();
        let (slot, expired) = match self.index.get(key) {
            Some(entry) => (entry.storage_slot, entry.is_expired(now)),
            None => {
                self.stats.record_miss();
                return Err(CacheError::NotFound(key.to_string()));
            }
        };

        if expired {
            self.release(key);
            self.stats.record_expired_lookup();
            self.stats.record_expirations(1);
            self.stats.set_total_entries(self.index.len());
            debug!(key = %key, slot, "expired on lookup");
            return Err(CacheError::Expired(key.to_string()));
        }

        let decoded = self
            .storage
            .read(slot)
            .and_then(|bytes| V::decode(&bytes).ok_or(StorageError::Corrupt(slot)));

        match decoded {
            Ok(value) => {
                self.stats.record_hit();
                Ok(value)
            }
            Err(err) => {
                self.stats.record_storage_fault();
                warn!(key = %key, slot, error = %err, "read failed, entry kept");
                Err(err.into())
            }
        }
    }

    // == Evict ==
    /// Removes the entry for `key`. Returns whether one was present.
    ///
    /// The slot is only marked free; its bytes are left for the next writer.
    pub fn evict(&mut self, key: &K) -> bool {
        let removed = self.release(key).is_some();
        if removed {
            self.stats.record_removal();
            self.stats.set_total_entries(self.index.len());
            debug!(key = %key, "evicted on request");
        }
        removed
    }

    // == Sweep Expired ==
    /// Reclaims every expired entry. Returns the number removed.
    pub fn sweep_expired(&mut self) -> usize {
        let now = self.clock.now();
        let expired: Vec<K> = self
            .index
            .iter()
            .filter(|(_, entry)| entry.is_expired(now))
            .map(|(key, _)| key.clone())
            .collect();

        for key in &expired {
            self.release(key);
        }

        let count = expired.len();
        self.stats.record_expirations(count as u64);
        self.stats.set_total_entries(self.index.len());
        count
    }

    /// Drops `key` from the index and FIFO order without freeing its slot.
    fn detach(&mut self, key: &K) -> Option<Entry> {
        let entry = self.index.remove(key)?;
        self.fifo.remove(entry.insertion_sequence);
        Some(entry)
    }

    /// Drops `key` and returns its slot to the free set.
    fn release(&mut self, key: &K) -> Option<Entry> {
        let entry = self.detach(key)?;
        self.free_slots.insert(entry.storage_slot);
        Some(entry)
    }

    // == Introspection ==
    /// Whether `key` has an entry that has not expired.
    pub fn contains(&self, key: &K) -> bool {
        let now = self.clock.now();
        self.index.get(key).is_some_and(|e| !e.is_expired(now))
    }

    /// Index metadata for `key`, expired or not.
    pub fn peek(&self, key: &K) -> Option<&Entry> {
        self.index.get(key)
    }

    /// Registered keys from oldest to newest.
    pub fn keys(&self) -> Vec<K> {
        self.fifo.iter().map(|(_, key)| key.clone()).collect()
    }

    /// Number of registered entries, including expired ones not yet reclaimed.
    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    /// Number of entries that have not expired.
    pub fn live_len(&self) -> usize {
        let now = self.clock.now();
        self.index.values().filter(|e| !e.is_expired(now)).count()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn default_ttl(&self) -> Duration {
        self.default_ttl
    }

    pub fn stats(&self) -> CacheStats {
        let mut stats = self.stats.clone();
        stats.set_total_entries(self.index.len());
        stats
    }

    // == Layout ==
    /// One view per slot, in slot order.
    pub fn layout(&self) -> Vec<SlotView> {
        let now = self.clock.now();
        let mut views: Vec<SlotView> = (0..self.capacity).map(SlotView::empty).collect();

        for (key, entry) in &self.index {
            if let Some(view) = views.get_mut(entry.storage_slot) {
                view.state = if entry.is_expired(now) {
                    SlotState::Expired
                } else {
                    SlotState::Live
                };
                view.key = Some(key.to_string());
                view.insertion_sequence = Some(entry.insertion_sequence);
                view.ttl_remaining_ms = Some(entry.ttl_remaining_ms(now));
            }
        }
        views
    }

    // == Invariant Check ==
    /// Verifies the index bookkeeping: every slot is owned by at most one
    /// entry or is free, never both, and FIFO order mirrors the index.
    pub fn check_invariants(&self) -> Result<()> {
        let violation = |msg: String| Err(CacheError::CapacityInvariantViolation(msg));

        if self.index.len() > self.capacity {
            return violation(format!(
                "{} entries exceed {} slots",
                self.index.len(),
                self.capacity
            ));
        }
        if self.fifo.len() != self.index.len() {
            return violation(format!(
                "FIFO order has {} keys, index has {}",
                self.fifo.len(),
                self.index.len()
            ));
        }

        let mut owned = BTreeSet::new();
        for entry in self.index.values() {
            if entry.storage_slot >= self.capacity || !owned.insert(entry.storage_slot) {
                return violation(format!("slot {} owned twice", entry.storage_slot));
            }
            if self.free_slots.contains(&entry.storage_slot) {
                return violation(format!("slot {} both owned and free", entry.storage_slot));
            }
        }
        if owned.len() + self.free_slots.len() != self.capacity {
            return violation(format!(
                "{} owned + {} free slots != {}",
                owned.len(),
                self.free_slots.len(),
                self.capacity
            ));
        }

        for (sequence, key) in self.fifo.iter() {
            match self.index.get(key) {
                Some(entry) if entry.insertion_sequence == sequence => {}
                _ => return violation(format!("FIFO sequence {} out of sync", sequence)),
            }
        }
        Ok(())
    }
}
