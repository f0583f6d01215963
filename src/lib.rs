//! EEPROM Cache - a dual-core memory hierarchy simulation
//!
//! A bounded EEPROM acts as a backing cache for periodically sampled sensor
//! readings, evicted by FIFO order under capacity pressure and by TTL for
//! freshness. One task produces readings while another serves button-driven
//! lookups to a display, both through a single locked cache engine.

pub mod api;
pub mod cache;
pub mod clock;
pub mod config;
pub mod display;
pub mod error;
pub mod input;
pub mod models;
pub mod sensor;
pub mod storage;
pub mod tasks;

pub use api::AppState;
pub use cache::{CacheEngine, SharedCache};
pub use config::Config;
pub use error::{CacheError, Result};
pub use sensor::SensorCache;
