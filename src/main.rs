//! EEPROM Cache - a dual-core memory hierarchy simulation
//!
//! Runs the producer and consumer tasks against a simulated EEPROM and serves
//! a small diagnostics API.

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{anyhow, Context};
use tokio::signal;
use tokio::task::JoinHandle;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use eeprom_cache::api::{create_router, AppState};
use eeprom_cache::cache::{CacheEngine, SharedCache};
use eeprom_cache::clock::{Clock, MonotonicClock};
use eeprom_cache::config::Config;
use eeprom_cache::display::Screen;
use eeprom_cache::input;
use eeprom_cache::sensor::{self, SensorCache};
use eeprom_cache::storage::Eeprom;
use eeprom_cache::tasks::{spawn_consumer_task, spawn_producer_task, spawn_sweep_task, Consumer};

/// Undelivered button edges held before new ones are dropped.
const BUTTON_BUFFER: usize = 16;
/// Lines the simulated panel remembers for the diagnostics API.
const SCREEN_HISTORY: usize = 32;

/// Main entry point for the simulation.
///
/// # Startup Sequence
/// 1. Initialize tracing subscriber for logging
/// 2. Load and validate configuration from environment variables
/// 3. Build the EEPROM-backed cache engine
/// 4. Start producer, consumer and expiry sweep tasks
/// 5. Serve the diagnostics API until SIGINT/SIGTERM
///
/// Two worker threads stand in for the two cores.
#[tokio::main(flavor = "multi_thread", worker_threads = 2)]
async fn main() -> anyhow::Result<()> {
    // Defaults to "info" level, can be overridden with RUST_LOG env var
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "eeprom_cache=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting EEPROM cache simulation");

    let config = Config::from_env();
    config.validate()?;
    info!(
        "Configuration loaded: slots={}, ttl={}ms, sample_interval={}ms, port={}",
        config.cache_slots, config.default_ttl_ms, config.sample_interval_ms, config.server_port
    );

    let clock: Arc<dyn Clock> = Arc::new(MonotonicClock::new());
    let cache = build_cache(&config, Arc::clone(&clock))?;
    info!("Cache engine initialized over {} EEPROM slots", config.cache_slots);

    let screen = Screen::new(SCREEN_HISTORY);
    let (button, trigger) = input::button(Arc::clone(&clock), BUTTON_BUFFER);

    let mut handles = vec![
        spawn_producer_task(
            cache.clone(),
            sensor::simulated_bank(),
            config.sample_interval(),
            Some(config.default_ttl()),
        ),
        spawn_consumer_task(
            Consumer::new(cache.clone(), screen.clone(), Vec::new()),
            trigger.debounced(config.debounce()),
            config.refresh_interval(),
        ),
    ];
    if let Some(interval) = config.sweep_interval() {
        handles.push(spawn_sweep_task(cache.clone(), interval));
    }
    info!("Producer and consumer tasks started");

    let app = create_router(AppState::new(cache, button, screen));

    let addr = SocketAddr::from(([0, 0, 0, 0], config.server_port));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("binding {}", addr))?;
    info!("Diagnostics listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(handles))
        .await
        .context("serving diagnostics API")?;

    info!("Simulation shutdown complete");
    Ok(())
}

fn build_cache(config: &Config, clock: Arc<dyn Clock>) -> anyhow::Result<SensorCache> {
    let eeprom = Eeprom::new(config.cache_slots)
        .ok_or_else(|| anyhow!("{} slots do not fit in the EEPROM", config.cache_slots))?;
    let engine = CacheEngine::new(Box::new(eeprom), clock, config.default_ttl())?;
    Ok(SharedCache::new(engine))
}

/// Waits for shutdown signal (Ctrl+C or SIGTERM).
///
/// On shutdown signal, aborts the simulation tasks and allows graceful shutdown.
async fn shutdown_signal(handles: Vec<JoinHandle<()>>) {
    let ctrl_c = async {
        if let Err(err) = signal::ctrl_c().await {
            warn!("Failed to listen for Ctrl+C: {}", err);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(err) => {
                warn!("Failed to install SIGTERM handler: {}", err);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, initiating shutdown...");
        }
        _ = terminate => {
            info!("Received SIGTERM, initiating shutdown...");
        }
    }

    for handle in &handles {
        handle.abort();
    }
    warn!("Simulation tasks aborted");
}
