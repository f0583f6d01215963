//! Expiry Sweep Task
//!
//! Background task that periodically reclaims expired cache entries so their
//! slots are free before the next put needs them.

use std::fmt;
use std::hash::Hash;
use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::cache::SharedCache;
use crate::storage::SlotValue;

/// Spawns a background task that periodically sweeps expired entries.
///
/// The task runs in an infinite loop, sleeping for the specified interval
/// between sweeps. Each sweep holds the cache lock for its whole duration.
///
/// # Returns
/// A JoinHandle for the spawned task, which can be used to abort the task
/// during graceful shutdown.
pub fn spawn_sweep_task<K, V>(cache: SharedCache<K, V>, interval: Duration) -> JoinHandle<()>
where
    K: Eq + Hash + Clone + fmt::Display + Send + 'static,
    V: SlotValue + 'static,
{
    tokio::spawn(async move {
        info!(
            "Starting expiry sweep task with interval of {}ms",
            interval.as_millis()
        );

        loop {
            tokio::time::sleep(interval).await;

            let removed = cache.sweep_expired().await;

            if removed > 0 {
                info!("Expiry sweep: reclaimed {} expired entries", removed);
            } else {
                debug!("Expiry sweep: no expired entries found");
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use crate::cache::CacheEngine;
    use crate::clock::ManualClock;
    use crate::storage::Eeprom;

    fn cache(clock: &ManualClock) -> SharedCache<&'static str, u32> {
        let engine = CacheEngine::new(
            Box::new(Eeprom::new(4).unwrap()),
            Arc::new(clock.clone()),
            Duration::from_millis(100),
        )
        .unwrap();
        SharedCache::new(engine)
    }

    #[tokio::test]
    async fn test_sweep_task_reclaims_expired_entries() {
        let clock = ManualClock::new(0);
        let cache = cache(&clock);
        cache.put("expire_soon", 1, Some(Duration::from_millis(10))).await.unwrap();
        cache.put("long_lived", 2, Some(Duration::from_secs(3600))).await.unwrap();

        let handle = spawn_sweep_task(cache.clone(), Duration::from_millis(10));
        clock.advance(Duration::from_millis(20));
        tokio::time::sleep(Duration::from_millis(60)).await;

        let layout = cache.layout().await;
        let keys: Vec<_> = layout.iter().filter_map(|v| v.key.as_deref()).collect();
        assert_eq!(keys, vec!["long_lived"]);
        assert_eq!(cache.stats().await.expirations, 1);

        handle.abort();
    }

    #[tokio::test]
    async fn test_sweep_task_can_be_aborted() {
        let cache = cache(&ManualClock::new(0));

        let handle = spawn_sweep_task(cache, Duration::from_millis(10));
        handle.abort();

        tokio::time::sleep(Duration::from_millis(50)).await;
        assert!(handle.is_finished(), "Task should be finished after abort");
    }
}
