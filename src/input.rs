//! Input Module
//!
//! Physical button model: a press injector, the stream of raw press edges it
//! feeds, and a debouncer that collapses bounce into one logical press.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;
use tracing::trace;

use crate::clock::{Clock, Timestamp};

// == Press ==
/// One falling edge on the button line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Press {
    pub at: Timestamp,
}

/// Creates a connected button and trigger source.
///
/// `buffer` bounds how many undelivered edges are held before new ones are
/// dropped.
pub fn button(clock: Arc<dyn Clock>, buffer: usize) -> (Button, TriggerSource) {
    let (tx, rx) = mpsc::channel(buffer.max(1));
    (Button { tx, clock }, TriggerSource { rx })
}

// == Button ==
/// Cloneable handle that injects press edges.
#[derive(Clone)]
pub struct Button {
    tx: mpsc::Sender<Press>,
    clock: Arc<dyn Clock>,
}

impl Button {
    /// Injects one edge. Returns false if the edge was dropped because the
    /// buffer is full or nobody listens any more.
    pub fn press(&self) -> bool {
        let press = Press {
            at: self.clock.now(),
        };
        self.tx.try_send(press).is_ok()
    }

    /// Whether the trigger source has been dropped.
    pub fn is_disconnected(&self) -> bool {
        self.tx.is_closed()
    }
}

// == Trigger Source ==
/// Lazy sequence of raw press edges. It cannot be cloned or restarted.
#[derive(Debug)]
pub struct TriggerSource {
    rx: mpsc::Receiver<Press>,
}

impl TriggerSource {
    /// Waits for the next edge. Returns `None` once every [`Button`] is gone.
    pub async fn next(&mut self) -> Option<Press> {
        self.rx.recv().await
    }

    /// Wraps the source so bounce within `window` is swallowed.
    pub fn debounced(self, window: Duration) -> DebouncedTrigger {
        DebouncedTrigger {
            source: self,
            debouncer: Debouncer::new(window),
        }
    }
}

// == Debouncer ==
/// Accepts an edge only if it is at least `window` after the last accepted one.
#[derive(Debug, Clone)]
pub struct Debouncer {
    window_ms: u64,
    last_accepted: Option<Timestamp>,
}

impl Debouncer {
    pub fn new(window: Duration) -> Self {
        Self {
            window_ms: window.as_millis() as u64,
            last_accepted: None,
        }
    }

    pub fn accept(&mut self, press: Press) -> bool {
        match self.last_accepted {
            Some(last) if press.at.saturating_sub(last) < self.window_ms => false,
            _ => {
                self.last_accepted = Some(press.at);
                true
            }
        }
    }
}

// == Debounced Trigger ==
#[derive(Debug)]
pub struct DebouncedTrigger {
    source: TriggerSource,
    debouncer: Debouncer,
}

impl DebouncedTrigger {
    /// Waits for the next logical press.
    pub async fn next_press(&mut self) -> Option<Press> {
        while let Some(press) = self.source.next().await {
            if self.debouncer.accept(press) {
                return Some(press);
            }
            trace!(at = press.at, "bounce ignored");
        }
        None
    }
}
