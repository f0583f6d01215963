//! API Module
//!
//! HTTP handlers and routing for the simulation's diagnostics surface.
//!
//! # Endpoints
//! - `GET /health` - Health check endpoint
//! - `GET /stats` - Cache statistics
//! - `GET /layout` - Per-slot view of the EEPROM
//! - `GET /display` - What the simulated panel shows
//! - `POST /button` - Press the simulated button
//! - `DELETE /slots/:channel` - Evict one channel's reading

pub mod handlers;
pub mod routes;

pub use handlers::*;
pub use routes::create_router;
