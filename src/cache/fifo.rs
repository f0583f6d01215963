//! FIFO Order Module
//!
//! Tracks live keys by insertion sequence for FIFO eviction.

use std::collections::BTreeMap;

// == FIFO Order ==
/// Ordered set of live keys keyed by insertion sequence.
///
/// Sequence numbers are handed out by [`FifoOrder::admit`], are strictly
/// increasing and are never reused, so the first entry of the map is always
/// the oldest live key even after out-of-order removals.
#[derive(Debug)]
pub struct FifoOrder<K> {
    order: BTreeMap<u64, K>,
    next_sequence: u64,
}

impl<K> Default for FifoOrder<K> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K> FifoOrder<K> {
    pub fn new() -> Self {
        Self {
            order: BTreeMap::new(),
            next_sequence: 0,
        }
    }

    // == Admit ==
    /// Appends `key` as the newest entry and returns its insertion sequence.
    pub fn admit(&mut self, key: K) -> u64 {
        let sequence = self.next_sequence;
        self.next_sequence += 1;
        self.order.insert(sequence, key);
        sequence
    }

    // == Remove ==
    /// Removes the key registered under `sequence`, if any.
    pub fn remove(&mut self, sequence: u64) -> Option<K> {
        self.order.remove(&sequence)
    }

    // == Oldest ==
    /// Returns the entry with the smallest insertion sequence.
    pub fn oldest(&self) -> Option<(u64, &K)> {
        self.order.iter().next().map(|(seq, key)| (*seq, key))
    }

    /// Sequence the next admitted key will receive.
    pub fn next_sequence(&self) -> u64 {
        self.next_sequence
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Keys from oldest to newest.
    pub fn iter(&self) -> impl Iterator<Item = (u64, &K)> {
        self.order.iter().map(|(seq, key)| (*seq, key))
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fifo_new() {
        let fifo: FifoOrder<&str> = FifoOrder::new();
        assert!(fifo.is_empty());
        assert_eq!(fifo.len(), 0);
        assert_eq!(fifo.oldest(), None);
    }

    #[test]
    fn test_fifo_admit_assigns_increasing_sequences() {
        let mut fifo = FifoOrder::new();

        assert_eq!(fifo.admit("a"), 0);
        assert_eq!(fifo.admit("b"), 1);
        assert_eq!(fifo.admit("c"), 2);

        assert_eq!(fifo.len(), 3);
        assert_eq!(fifo.oldest(), Some((0, &"a")));
    }

    #[test]
    fn test_fifo_remove_out_of_order() {
        let mut fifo = FifoOrder::new();
        fifo.admit("a");
        let b = fifo.admit("b");
        fifo.admit("c");

        assert_eq!(fifo.remove(b), Some("b"));
        assert_eq!(fifo.remove(b), None);

        let order: Vec<_> = fifo.iter().map(|(_, k)| *k).collect();
        assert_eq!(order, vec!["a", "c"]);
    }

    #[test]
    fn test_fifo_oldest_after_removing_head() {
        let mut fifo = FifoOrder::new();
        let a = fifo.admit("a");
        fifo.admit("b");

        fifo.remove(a);
        assert_eq!(fifo.oldest(), Some((1, &"b")));
    }

    #[test]
    fn test_fifo_sequences_never_reused() {
        let mut fifo = FifoOrder::new();
        let a = fifo.admit("a");
        fifo.remove(a);

        // Same key again gets a fresh, larger sequence
        let again = fifo.admit("a");
        assert!(again > a);
        assert_eq!(fifo.next_sequence(), again + 1);
    }
}
