//! Producer Task
//!
//! Samples every sensor on a fixed period and stores the readings. Runs on
//! its own worker and shares nothing with the consumer except the cache.

use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, error, info, warn};

use crate::error::CacheError;
use crate::sensor::{SensorCache, SensorSource};

/// Outcome of one sampling cycle.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CycleReport {
    /// Readings written to the cache
    pub stored: usize,
    /// Sensors that produced no reading
    pub sensor_failures: usize,
    /// Readings dropped because the cache rejected the write
    pub store_failures: usize,
}

/// Samples each sensor once and puts its reading under the sensor's channel.
///
/// Failures only skip the affected reading.
pub async fn sample_cycle(
    cache: &SensorCache,
    sensors: &mut [Box<dyn SensorSource>],
    ttl: Option<Duration>,
) -> CycleReport {
    let mut report = CycleReport::default();

    for sensor in sensors.iter_mut() {
        let channel = sensor.channel();
        let reading = match sensor.sample() {
            Ok(reading) => reading,
            Err(err) => {
                warn!(%channel, error = %err, "sensor read failed, skipping");
                report.sensor_failures += 1;
                continue;
            }
        };

        match cache.put(channel, reading, ttl).await {
            Ok(()) => {
                debug!(%channel, value = reading.value(), "reading stored");
                report.stored += 1;
            }
            Err(err @ CacheError::StorageFault(_)) => {
                warn!(%channel, error = %err, "storage fault, skipping reading");
                report.store_failures += 1;
            }
            Err(err) => {
                error!(%channel, error = %err, "cache rejected reading");
                report.store_failures += 1;
            }
        }
    }

    report
}

/// Spawns the producer task.
///
/// The first cycle runs immediately; later cycles follow `interval`. A slow
/// cycle delays the next one instead of bursting to catch up.
///
/// # Returns
/// A JoinHandle for the spawned task, which can be used to abort the task
/// during graceful shutdown.
pub fn spawn_producer_task(
    cache: SensorCache,
    mut sensors: Vec<Box<dyn SensorSource>>,
    interval: Duration,
    ttl: Option<Duration>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        info!(
            "Starting producer task: {} sensors every {}ms",
            sensors.len(),
            interval.as_millis()
        );

        let mut ticker = tokio::time::interval(interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            ticker.tick().await;
            let report = sample_cycle(&cache, &mut sensors, ttl).await;
            debug!(?report, "sampling cycle finished");
        }
    })
}
