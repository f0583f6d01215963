//! Response models for the diagnostics API
//!
//! This module defines the DTOs (Data Transfer Objects) serialized into
//! HTTP response bodies.

pub mod responses;

// Re-export commonly used types
pub use responses::{
    DisplayResponse, ErrorResponse, EvictResponse, HealthResponse, LayoutResponse, PressResponse,
    StatsResponse,
};
