//! API Handlers
//!
//! HTTP request handlers for each diagnostics endpoint.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};

use crate::display::Screen;
use crate::error::{CacheError, Result};
use crate::input::Button;
use crate::models::{
    DisplayResponse, EvictResponse, HealthResponse, LayoutResponse, PressResponse, StatsResponse,
};
use crate::sensor::{SensorCache, SensorChannel};

/// Application state shared across all handlers.
///
/// Holds the same cache, button and panel the simulation tasks use.
#[derive(Clone)]
pub struct AppState {
    /// Cache shared with the producer and consumer tasks
    pub cache: SensorCache,
    /// Simulated push button feeding the consumer task
    pub button: Button,
    /// Simulated display panel written by the consumer task
    pub screen: Screen,
}

impl AppState {
    /// Creates a new AppState from its parts.
    pub fn new(cache: SensorCache, button: Button, screen: Screen) -> Self {
        Self {
            cache,
            button,
            screen,
        }
    }
}

/// Handler for GET /stats
pub async fn stats_handler(State(state): State<AppState>) -> Json<StatsResponse> {
    let (stats, capacity) = state
        .cache
        .with_engine(|engine| (engine.stats(), engine.capacity()))
        .await;

    Json(StatsResponse::new(stats, capacity))
}

/// Handler for GET /layout
pub async fn layout_handler(State(state): State<AppState>) -> Json<LayoutResponse> {
    Json(LayoutResponse::new(state.cache.layout().await))
}

/// Handler for GET /display
pub async fn display_handler(State(state): State<AppState>) -> Json<DisplayResponse> {
    Json(DisplayResponse {
        current: state.screen.current(),
        lines: state.screen.lines(),
    })
}

/// Handler for POST /button
///
/// Injects one raw edge; the consumer task debounces it.
pub async fn press_handler(State(state): State<AppState>) -> (StatusCode, Json<PressResponse>) {
    if state.button.press() {
        (StatusCode::ACCEPTED, Json(PressResponse::accepted()))
    } else {
        (StatusCode::SERVICE_UNAVAILABLE, Json(PressResponse::dropped()))
    }
}

/// Handler for DELETE /slots/:channel
///
/// Evicts the channel's reading. Evicting an empty channel is not an error.
pub async fn evict_handler(
    State(state): State<AppState>,
    Path(channel): Path<String>,
) -> Result<Json<EvictResponse>> {
    let parsed: SensorChannel = channel
        .parse()
        .map_err(|_| CacheError::NotFound(channel.clone()))?;
    let evicted = state.cache.evict(&parsed).await;

    Ok(Json(EvictResponse {
        channel: parsed.to_string(),
        evicted,
    }))
}

/// Handler for GET /health
///
/// Returns health status of the server.
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::healthy())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::time::Duration;

    use crate::cache::{CacheEngine, SharedCache};
    use crate::clock::ManualClock;
    use crate::input::{button, TriggerSource};
    use crate::sensor::Reading;
    use crate::storage::Eeprom;

    fn state() -> (AppState, TriggerSource) {
        let clock = Arc::new(ManualClock::new(0));
        let engine = CacheEngine::new(
            Box::new(Eeprom::new(4).unwrap()),
            clock.clone(),
            Duration::from_secs(60),
        )
        .unwrap();
        let (button, source) = button(clock, 4);
        (
            AppState::new(SharedCache::new(engine), button, Screen::new(4)),
            source,
        )
    }

    #[tokio::test]
    async fn test_stats_handler() {
        let (state, _source) = state();
        state
            .cache
            .put(SensorChannel::Smoke, Reading(1.0), None)
            .await
            .unwrap();

        let response = stats_handler(State(state)).await;
        assert_eq!(response.stats.total_entries, 1);
        assert_eq!(response.capacity, 4);
    }

    #[tokio::test]
    async fn test_evict_handler() {
        let (state, _source) = state();
        state
            .cache
            .put(SensorChannel::Smoke, Reading(1.0), None)
            .await
            .unwrap();

        let response = evict_handler(State(state.clone()), Path("MQII".to_string()))
            .await
            .unwrap();
        assert!(response.evicted);

        let response = evict_handler(State(state.clone()), Path("MQII".to_string()))
            .await
            .unwrap();
        assert!(!response.evicted);

        let result = evict_handler(State(state), Path("nope".to_string())).await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_press_handler_delivers_edge() {
        let (state, mut source) = state();

        let (status, _) = press_handler(State(state)).await;
        assert_eq!(status, StatusCode::ACCEPTED);
        assert!(source.next().await.is_some());
    }

    #[tokio::test]
    async fn test_press_handler_without_listener() {
        let (state, source) = state();
        drop(source);

        let (status, response) = press_handler(State(state)).await;
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert!(!response.accepted);
    }

    #[tokio::test]
    async fn test_health_handler() {
        let response = health_handler().await;
        assert_eq!(response.status, "healthy");
    }
}
