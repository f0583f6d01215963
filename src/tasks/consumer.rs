//! Consumer Task
//!
//! Turns button presses into cache lookups and shows the outcome.

use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::{Interval, MissedTickBehavior};
use tracing::{debug, info};

use crate::display::{render, DisplaySink};
use crate::input::DebouncedTrigger;
use crate::sensor::{SensorCache, SensorChannel};

// == Consumer ==
/// Display-side state: which channel is selected and what is on screen.
pub struct Consumer<D> {
    cache: SensorCache,
    display: D,
    channels: Vec<SensorChannel>,
    cursor: usize,
    last_shown: Option<String>,
}

impl<D: DisplaySink> Consumer<D> {
    /// Creates a consumer cycling through `channels`, or every channel if the
    /// list is empty. The first channel starts selected.
    pub fn new(cache: SensorCache, display: D, channels: Vec<SensorChannel>) -> Self {
        let channels = if channels.is_empty() {
            SensorChannel::ALL.to_vec()
        } else {
            channels
        };
        Self {
            cache,
            display,
            channels,
            cursor: 0,
            last_shown: None,
        }
    }

    pub fn selected(&self) -> SensorChannel {
        self.channels[self.cursor]
    }

    /// Handles one logical press: selects the next channel and shows it.
    pub async fn on_press(&mut self) {
        self.cursor = (self.cursor + 1) % self.channels.len();
        debug!(channel = %self.selected(), "button press");
        let text = lookup(&self.cache, self.selected()).await;
        self.show(text);
    }

    /// Re-reads the selected channel, redrawing only if the text changed.
    pub async fn refresh(&mut self) {
        let text = lookup(&self.cache, self.selected()).await;
        if self.last_shown.as_deref() != Some(text.as_str()) {
            self.show(text);
        }
    }

    fn show(&mut self, text: String) {
        self.last_shown = Some(text.clone());
        self.display.show(text);
    }
}

async fn lookup(cache: &SensorCache, channel: SensorChannel) -> String {
    let result = cache.get(&channel).await;
    render(channel, &result)
}

/// Spawns the consumer task.
///
/// Presses are served as they arrive; with `refresh` set the selected channel
/// is also re-read on that period. The task ends when the trigger source is
/// closed.
pub fn spawn_consumer_task<D>(
    mut consumer: Consumer<D>,
    mut trigger: DebouncedTrigger,
    refresh: Option<Duration>,
) -> JoinHandle<()>
where
    D: DisplaySink + 'static,
{
    tokio::spawn(async move {
        info!(
            "Starting consumer task on {} (refresh {:?})",
            consumer.selected(),
            refresh
        );

        let mut ticker = refresh.map(|period| {
            let mut ticker = tokio::time::interval(period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            ticker
        });

        loop {
            tokio::select! {
                press = trigger.next_press() => match press {
                    Some(_) => consumer.on_press().await,
                    None => {
                        info!("Trigger source closed, consumer stopping");
                        break;
                    }
                },
                _ = next_tick(&mut ticker) => consumer.refresh().await,
            }
        }
    })
}

async fn next_tick(ticker: &mut Option<Interval>) {
    match ticker {
        Some(ticker) => {
            ticker.tick().await;
        }
        None => std::future::pending().await,
    }
}
