//! Integration Tests for API Endpoints
//!
//! Drives the diagnostics router together with live simulation tasks.

use std::sync::Arc;
use std::time::Duration;

use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use eeprom_cache::{
    api::create_router,
    cache::{CacheEngine, SharedCache},
    clock::ManualClock,
    display::Screen,
    input::{self, TriggerSource},
    sensor::{Reading, SensorCache, SensorChannel},
    storage::Eeprom,
    tasks::{spawn_consumer_task, Consumer},
    AppState,
};
use serde_json::Value;
use tower::ServiceExt;

// == Helper Functions ==

struct TestApp {
    router: Router,
    cache: SensorCache,
    screen: Screen,
    trigger: Option<TriggerSource>,
}

fn create_test_app() -> TestApp {
    let clock = Arc::new(ManualClock::new(0));
    let engine = CacheEngine::new(
        Box::new(Eeprom::new(4).unwrap()),
        clock.clone(),
        Duration::from_secs(60),
    )
    .unwrap();
    let cache = SharedCache::new(engine);
    let screen = Screen::new(8);
    let (button, trigger) = input::button(clock, 8);
    let state = AppState::new(cache.clone(), button, screen.clone());

    TestApp {
        router: create_router(state),
        cache,
        screen,
        trigger: Some(trigger),
    }
}

async fn body_to_json(body: Body) -> Value {
    let bytes = axum::body::to_bytes(body, usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

async fn send(app: &Router, method: &str, uri: &str) -> (StatusCode, Value) {
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method(method)
                .uri(uri)
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    let status = response.status();
    (status, body_to_json(response.into_body()).await)
}

// == Health Endpoint Tests ==

#[tokio::test]
async fn test_health_endpoint() {
    let app = create_test_app();

    let (status, json) = send(&app.router, "GET", "/health").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["status"].as_str().unwrap(), "healthy");
    assert!(json.get("timestamp").is_some());
}

// == Stats Endpoint Tests ==

#[tokio::test]
async fn test_stats_endpoint_tracks_lookups() {
    let app = create_test_app();
    app.cache
        .put(SensorChannel::Temperature, Reading(21.5), None)
        .await
        .unwrap();
    app.cache.get(&SensorChannel::Temperature).await.unwrap();
    let _ = app.cache.get(&SensorChannel::Smoke).await;

    let (status, json) = send(&app.router, "GET", "/stats").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["hits"], 1);
    assert_eq!(json["misses"], 1);
    assert_eq!(json["total_entries"], 1);
    assert_eq!(json["capacity"], 4);
    assert!((json["hit_rate"].as_f64().unwrap() - 0.5).abs() < 0.001);
}

// == Layout Endpoint Tests ==

#[tokio::test]
async fn test_layout_endpoint_reports_slots() {
    let app = create_test_app();
    app.cache
        .put(SensorChannel::Smoke, Reading(384.1), None)
        .await
        .unwrap();

    let (status, json) = send(&app.router, "GET", "/layout").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["capacity"], 4);
    let slots = json["slots"].as_array().unwrap();
    assert_eq!(slots.len(), 4);
    assert_eq!(slots[0]["state"], "live");
    assert_eq!(slots[0]["key"], "MQII");
    assert_eq!(slots[0]["insertion_sequence"], 0);
    assert_eq!(slots[1]["state"], "empty");
    assert!(slots[1].get("key").is_none());
}

// == Evict Endpoint Tests ==

#[tokio::test]
async fn test_evict_endpoint() {
    let app = create_test_app();
    app.cache
        .put(SensorChannel::CarbonMonoxide, Reading(12.0), None)
        .await
        .unwrap();

    let (status, json) = send(&app.router, "DELETE", "/slots/MQIV").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["channel"], "MQIV");
    assert_eq!(json["evicted"], true);

    // Second eviction succeeds but reports nothing removed
    let (status, json) = send(&app.router, "DELETE", "/slots/0x12").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["evicted"], false);
}

#[tokio::test]
async fn test_evict_endpoint_unknown_channel() {
    let app = create_test_app();

    let (status, json) = send(&app.router, "DELETE", "/slots/CO2").await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(json["error"].as_str().unwrap().contains("CO2"));
}

// == Button and Display Tests ==

#[tokio::test]
async fn test_button_press_reaches_display() {
    let mut app = create_test_app();
    app.cache
        .put(SensorChannel::Smoke, Reading(384.1), None)
        .await
        .unwrap();

    let consumer = Consumer::new(app.cache.clone(), app.screen.clone(), Vec::new());
    let trigger = app.trigger.take().unwrap().debounced(Duration::from_millis(50));
    let handle = spawn_consumer_task(consumer, trigger, None);

    let (status, json) = send(&app.router, "POST", "/button").await;
    assert_eq!(status, StatusCode::ACCEPTED);
    assert_eq!(json["accepted"], true);

    // Give the consumer task a moment to serve the press
    let mut shown = None;
    for _ in 0..50 {
        tokio::time::sleep(Duration::from_millis(10)).await;
        let (_, json) = send(&app.router, "GET", "/display").await;
        if !json["current"].is_null() {
            shown = Some(json);
            break;
        }
    }

    let json = shown.expect("display never updated");
    assert_eq!(json["current"], "MQII = 384.10");
    assert_eq!(json["lines"].as_array().unwrap().len(), 1);

    handle.abort();
}

#[tokio::test]
async fn test_button_without_consumer_is_unavailable() {
    let mut app = create_test_app();
    drop(app.trigger.take());

    let (status, json) = send(&app.router, "POST", "/button").await;

    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(json["accepted"], false);
}

#[tokio::test]
async fn test_unknown_route() {
    let app = create_test_app();

    let response = app
        .router
        .oneshot(
            Request::builder()
                .uri("/get/anything")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
