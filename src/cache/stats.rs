//! Cache Statistics Module
//!
//! Tracks cache performance metrics including hits, misses, and evictions.

use serde::Serialize;

// == Cache Stats ==
/// Tracks cache performance metrics.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CacheStats {
    /// Lookups that returned a value
    pub hits: u64,
    /// Lookups for keys with no entry
    pub misses: u64,
    /// Lookups that found an expired entry
    pub expired_lookups: u64,
    /// Live entries displaced by FIFO eviction
    pub evictions: u64,
    /// Expired entries reclaimed (lazily, by sweep, or by slot reuse)
    pub expirations: u64,
    /// Entries removed through explicit eviction
    pub removals: u64,
    /// Storage backend failures surfaced to callers
    pub storage_faults: u64,
    /// Successful puts, including in-place updates
    pub puts: u64,
    /// Puts that updated an existing live entry
    pub updates: u64,
    /// Current number of entries in the index
    pub total_entries: usize,
}

impl CacheStats {
    // == Constructor ==
    pub fn new() -> Self {
        Self::default()
    }

    // == Hit Rate ==
    /// Hits over all lookups, or 0.0 if no lookup has been made.
    pub fn hit_rate(&self) -> f64 {
        let total = self.lookups();
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }

    /// Every lookup that reached the index, including failed reads.
    pub fn lookups(&self) -> u64 {
        self.hits + self.misses + self.expired_lookups
    }

    pub fn record_hit(&mut self) {
        self.hits += 1;
    }

    pub fn record_miss(&mut self) {
        self.misses += 1;
    }

    pub fn record_expired_lookup(&mut self) {
        self.expired_lookups += 1;
    }

    pub fn record_eviction(&mut self) {
        self.evictions += 1;
    }

    pub fn record_expirations(&mut self, count: u64) {
        self.expirations += count;
    }

    pub fn record_removal(&mut self) {
        self.removals += 1;
    }

    pub fn record_storage_fault(&mut self) {
        self.storage_faults += 1;
    }

    pub fn record_put(&mut self, update: bool) {
        self.puts += 1;
        if update {
            self.updates += 1;
        }
    }

    pub fn set_total_entries(&mut self, count: usize) {
        self.total_entries = count;
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stats_new() {
        let stats = CacheStats::new();
        assert_eq!(stats.hits, 0);
        assert_eq!(stats.misses, 0);
        assert_eq!(stats.evictions, 0);
        assert_eq!(stats.total_entries, 0);
    }

    #[test]
    fn test_hit_rate_no_requests() {
        let stats = CacheStats::new();
        assert_eq!(stats.hit_rate(), 0.0);
    }

    #[test]
    fn test_hit_rate_counts_expired_as_lookups() {
        let mut stats = CacheStats::new();
        stats.record_hit();
        stats.record_miss();
        stats.record_expired_lookup();
        stats.record_hit();

        assert_eq!(stats.lookups(), 4);
        assert_eq!(stats.hit_rate(), 0.5);
    }

    #[test]
    fn test_record_put_tracks_updates() {
        let mut stats = CacheStats::new();
        stats.record_put(false);
        stats.record_put(true);
        stats.record_put(true);

        assert_eq!(stats.puts, 3);
        assert_eq!(stats.updates, 2);
    }

    #[test]
    fn test_record_expirations() {
        let mut stats = CacheStats::new();
        stats.record_expirations(2);
        stats.record_expirations(1);
        assert_eq!(stats.expirations, 3);
    }
}
