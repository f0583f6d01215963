//! Cache Entry Module
//!
//! Index metadata for one cached record. The serialized value itself lives in
//! the storage backend at `storage_slot`.

use std::time::Duration;

use crate::clock::Timestamp;
use crate::storage::SlotId;

// == Cache Entry ==
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    /// Position in FIFO order, assigned once at creation
    pub insertion_sequence: u64,
    /// Slot holding the serialized value
    pub storage_slot: SlotId,
    /// Time of the most recent write of the value
    pub written_at: Timestamp,
    /// Absolute deadline after which the entry is dead
    pub expires_at: Timestamp,
}

impl Entry {
    // == Constructor ==
    pub fn new(
        insertion_sequence: u64,
        storage_slot: SlotId,
        now: Timestamp,
        ttl: Duration,
    ) -> Self {
        Self {
            insertion_sequence,
            storage_slot,
            written_at: now,
            expires_at: deadline(now, ttl),
        }
    }

    // == Refresh ==
    /// Records an in-place value update. The insertion sequence is kept.
    pub fn refresh(&mut self, now: Timestamp, ttl: Duration) {
        self.written_at = now;
        self.expires_at = deadline(now, ttl);
    }

    // == Is Expired ==
    /// An entry is expired once `now` reaches `expires_at`.
    pub fn is_expired(&self, now: Timestamp) -> bool {
        now >= self.expires_at
    }

    // == Time To Live ==
    /// Remaining lifetime in milliseconds, zero once expired.
    pub fn ttl_remaining_ms(&self, now: Timestamp) -> u64 {
        self.expires_at.saturating_sub(now)
    }
}

fn deadline(now: Timestamp, ttl: Duration) -> Timestamp {
    now.saturating_add(ttl.as_millis() as u64)
}
