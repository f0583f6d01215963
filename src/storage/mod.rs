//! Storage Module
//!
//! Narrow interface over a fixed-capacity persistent byte store, divided into
//! fixed-size slots with no header.

mod eeprom;

pub use eeprom::{Eeprom, EepromControl, EEPROM_PAGE_SIZE, EEPROM_SIZE};

use crate::error::StorageError;

/// Index of a slot in the backing store.
pub type SlotId = usize;

/// Size in bytes of one slot.
pub const SLOT_SIZE: usize = 4;

/// The serialized contents of one slot.
pub type SlotBuffer = [u8; SLOT_SIZE];

// == Storage Backend Trait ==
/// Raw slot access to a bounded persistent store.
///
/// The slot count is fixed when the backend is constructed. Calls are expected
/// to complete in bounded time.
pub trait StorageBackend: Send {
    /// Total number of slots the backend holds.
    fn slot_count(&self) -> usize;

    /// Reads the bytes currently held by `slot`.
    fn read(&mut self, slot: SlotId) -> Result<SlotBuffer, StorageError>;

    /// Overwrites `slot` with `bytes`.
    fn write(&mut self, slot: SlotId, bytes: &SlotBuffer) -> Result<(), StorageError>;
}

// == Slot Value Trait ==
/// A payload that serializes to exactly one slot.
pub trait SlotValue: Sized {
    fn encode(&self) -> SlotBuffer;

    /// Returns `None` if the bytes are not a valid encoding.
    fn decode(bytes: &SlotBuffer) -> Option<Self>;
}

impl SlotValue for u32 {
    fn encode(&self) -> SlotBuffer {
        self.to_le_bytes()
    }

    fn decode(bytes: &SlotBuffer) -> Option<Self> {
        Some(u32::from_le_bytes(*bytes))
    }
}

/// Erased cells read back as NaN, which is never a valid value.
impl SlotValue for f32 {
    fn encode(&self) -> SlotBuffer {
        self.to_le_bytes()
    }

    fn decode(bytes: &SlotBuffer) -> Option<Self> {
        let value = f32::from_le_bytes(*bytes);
        (!value.is_nan()).then_some(value)
    }
}
