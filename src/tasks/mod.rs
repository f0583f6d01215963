//! Background Tasks Module
//!
//! The execution contexts that run alongside each other during a simulation.
//!
//! # Tasks
//! - Producer: samples the sensors and stores readings
//! - Consumer: serves button presses from the cache to the display
//! - Sweep: reclaims expired entries at configured intervals

mod consumer;
mod producer;
mod sweep;

pub use consumer::{spawn_consumer_task, Consumer};
pub use producer::{sample_cycle, spawn_producer_task, CycleReport};
pub use sweep::spawn_sweep_task;
