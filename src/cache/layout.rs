//! Slot Layout Module
//!
//! Point-in-time view of every storage slot, used for diagnostics.

use serde::Serialize;

use crate::storage::SlotId;

// == Slot State ==
/// Lifecycle state of one slot: `Empty -> Live -> (Expired | evicted) -> Empty`.
///
/// Eviction releases the slot in the same critical section, so it is never
/// observed as a resting state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SlotState {
    Empty,
    Live,
    Expired,
}

// == Slot View ==
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SlotView {
    pub slot: SlotId,
    pub state: SlotState,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub insertion_sequence: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ttl_remaining_ms: Option<u64>,
}

impl SlotView {
    pub fn empty(slot: SlotId) -> Self {
        Self {
            slot,
            state: SlotState::Empty,
            key: None,
            insertion_sequence: None,
            ttl_remaining_ms: None,
        }
    }
}
