//! Display Module
//!
//! The text sink the consumer task writes to, plus the rendering of lookup
//! results into display lines.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex, PoisonError};

use tracing::info;

use crate::error::CacheError;
use crate::sensor::{Reading, SensorChannel};

// == Display Sink Trait ==
/// Receives status and result strings for rendering.
pub trait DisplaySink: Send {
    fn show(&mut self, text: String);
}

// == Rendering ==
/// Formats a lookup result for one channel.
pub fn render(channel: SensorChannel, result: &Result<Reading, CacheError>) -> String {
    match result {
        Ok(reading) => format!("{} = {:.2}", channel, reading.value()),
        Err(CacheError::NotFound(_)) => format!("{}: no data", channel),
        Err(CacheError::Expired(_)) => format!("{}: expired", channel),
        Err(CacheError::StorageFault(_)) => format!("{}: storage fault", channel),
        Err(err) => format!("{}: error ({})", channel, err),
    }
}

// == Screen ==
/// Simulated OLED panel keeping the most recent lines.
///
/// Clones share the same panel, so one clone can be handed to the consumer
/// task while another serves diagnostics.
#[derive(Debug, Clone)]
pub struct Screen {
    lines: Arc<Mutex<VecDeque<String>>>,
    history: usize,
}

impl Screen {
    /// Creates a blank panel remembering up to `history` lines.
    pub fn new(history: usize) -> Self {
        Self {
            lines: Arc::new(Mutex::new(VecDeque::with_capacity(history))),
            history: history.max(1),
        }
    }

    /// The line currently on the panel.
    pub fn current(&self) -> Option<String> {
        self.guard().back().cloned()
    }

    /// Remembered lines, oldest first.
    pub fn lines(&self) -> Vec<String> {
        self.guard().iter().cloned().collect()
    }

    fn guard(&self) -> std::sync::MutexGuard<'_, VecDeque<String>> {
        // A panic while holding the lock cannot leave the deque half-updated
        self.lines.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl DisplaySink for Screen {
    fn show(&mut self, text: String) {
        info!(target: "eeprom_cache::display", "{}", text);
        let mut lines = self.guard();
        if lines.len() == self.history {
            lines.pop_front();
        }
        lines.push_back(text);
    }
}
