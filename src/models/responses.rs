//! Response DTOs for the diagnostics API
//!
//! Defines the structure of outgoing HTTP response bodies.

use serde::Serialize;

use crate::cache::{CacheStats, SlotView};

/// Response body for the stats endpoint (GET /stats)
#[derive(Debug, Clone, Serialize)]
pub struct StatsResponse {
    #[serde(flatten)]
    pub stats: CacheStats,
    /// Number of slots the cache manages
    pub capacity: usize,
    /// Hit rate (hits / all lookups)
    pub hit_rate: f64,
}

impl StatsResponse {
    /// Creates a new StatsResponse from cache statistics
    pub fn new(stats: CacheStats, capacity: usize) -> Self {
        Self {
            hit_rate: stats.hit_rate(),
            stats,
            capacity,
        }
    }
}

/// Response body for the layout endpoint (GET /layout)
#[derive(Debug, Clone, Serialize)]
pub struct LayoutResponse {
    pub capacity: usize,
    pub slots: Vec<SlotView>,
}

impl LayoutResponse {
    pub fn new(slots: Vec<SlotView>) -> Self {
        Self {
            capacity: slots.len(),
            slots,
        }
    }
}

/// Response body for the display endpoint (GET /display)
#[derive(Debug, Clone, Serialize)]
pub struct DisplayResponse {
    /// Line currently on the panel
    pub current: Option<String>,
    /// Recent lines, oldest first
    pub lines: Vec<String>,
}

/// Response body for the button endpoint (POST /button)
#[derive(Debug, Clone, Serialize)]
pub struct PressResponse {
    pub accepted: bool,
    pub message: String,
}

impl PressResponse {
    pub fn accepted() -> Self {
        Self {
            accepted: true,
            message: "Button pressed".to_string(),
        }
    }

    pub fn dropped() -> Self {
        Self {
            accepted: false,
            message: "Press dropped: consumer is not listening".to_string(),
        }
    }
}

/// Response body for the evict endpoint (DELETE /slots/:channel)
#[derive(Debug, Clone, Serialize)]
pub struct EvictResponse {
    pub channel: String,
    pub evicted: bool,
}

/// Response body for the health endpoint (GET /health)
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    /// Health status (e.g., "healthy")
    pub status: String,
    /// Current timestamp in ISO 8601 format
    pub timestamp: String,
}

impl HealthResponse {
    /// Creates a new HealthResponse with current timestamp
    pub fn healthy() -> Self {
        Self {
            status: "healthy".to_string(),
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }
}

/// Error response body for all error conditions
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    /// Error message describing what went wrong
    pub error: String,
}

impl ErrorResponse {
    /// Creates a new ErrorResponse
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }
}
