//! EEPROM Model
//!
//! In-memory stand-in for an AT24C32 serial EEPROM: 4 KiB organised in
//! 32-byte pages, erased to `0xFF`.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tracing::trace;

use super::{SlotBuffer, SlotId, StorageBackend, SLOT_SIZE};
use crate::error::StorageError;

/// Total size of the part in bytes.
pub const EEPROM_SIZE: usize = 4096;

/// Write page size of the part in bytes.
pub const EEPROM_PAGE_SIZE: usize = 32;

const ERASED: u8 = 0xFF;

// == Fault Lines ==
#[derive(Debug, Default)]
struct FaultLines {
    write_protect: AtomicBool,
    bus_fault: AtomicBool,
}

/// Handle for driving the part's fault lines from outside the owning lock.
#[derive(Debug, Clone)]
pub struct EepromControl {
    lines: Arc<FaultLines>,
}

impl EepromControl {
    /// Asserts or releases the write-protect pin. Reads are unaffected.
    pub fn set_write_protect(&self, on: bool) {
        self.lines.write_protect.store(on, Ordering::SeqCst);
    }

    /// Makes every subsequent bus transaction fail while `on`.
    pub fn set_bus_fault(&self, on: bool) {
        self.lines.bus_fault.store(on, Ordering::SeqCst);
    }
}

// == EEPROM ==
/// Simulated EEPROM exposing `slots` fixed-size slots from address zero.
#[derive(Debug)]
pub struct Eeprom {
    memory: Vec<u8>,
    slots: usize,
    lines: Arc<FaultLines>,
}

impl Eeprom {
    /// Creates an erased part exposing `slots` slots.
    ///
    /// Returns `None` if the slots would not fit in [`EEPROM_SIZE`] bytes.
    pub fn new(slots: usize) -> Option<Self> {
        if slots.checked_mul(SLOT_SIZE)? > EEPROM_SIZE {
            return None;
        }
        Some(Self {
            memory: vec![ERASED; EEPROM_SIZE],
            slots,
            lines: Arc::new(FaultLines::default()),
        })
    }

    /// Largest slot count that fits in the part.
    pub const fn max_slots() -> usize {
        EEPROM_SIZE / SLOT_SIZE
    }

    pub fn control(&self) -> EepromControl {
        EepromControl {
            lines: Arc::clone(&self.lines),
        }
    }

    /// Byte address of the first byte of `slot`.
    pub fn address_of(slot: SlotId) -> usize {
        slot * SLOT_SIZE
    }

    /// Page holding the first byte of `slot`.
    pub fn page_of(slot: SlotId) -> usize {
        Self::address_of(slot) / EEPROM_PAGE_SIZE
    }

    fn check(&self, slot: SlotId) -> Result<usize, StorageError> {
        if slot >= self.slots {
            return Err(StorageError::OutOfRange {
                slot,
                slots: self.slots,
            });
        }
        if self.lines.bus_fault.load(Ordering::SeqCst) {
            return Err(StorageError::Bus(slot));
        }
        Ok(Self::address_of(slot))
    }
}

impl StorageBackend for Eeprom {
    fn slot_count(&self) -> usize {
        self.slots
    }

    fn read(&mut self, slot: SlotId) -> Result<SlotBuffer, StorageError> {
        let addr = self.check(slot)?;
        let mut buf = [0u8; SLOT_SIZE];
        buf.copy_from_slice(&self.memory[addr..addr + SLOT_SIZE]);
        trace!(slot, addr, "eeprom read");
        Ok(buf)
    }

    fn write(&mut self, slot: SlotId, bytes: &SlotBuffer) -> Result<(), StorageError> {
        let addr = self.check(slot)?;
        if self.lines.write_protect.load(Ordering::SeqCst) {
            return Err(StorageError::WriteProtected(slot));
        }
        self.memory[addr..addr + SLOT_SIZE].copy_from_slice(bytes);
        trace!(slot, addr, page = Self::page_of(slot), "eeprom write");
        Ok(())
    }
}
