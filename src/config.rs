//! Configuration Module
//!
//! Handles loading and validating simulation parameters from environment
//! variables.

use std::env;
use std::str::FromStr;
use std::time::Duration;

use crate::error::CacheError;
use crate::storage::Eeprom;

/// Simulation configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Number of EEPROM slots the cache may use
    pub cache_slots: usize,
    /// TTL in milliseconds given to every sampled reading
    pub default_ttl_ms: u64,
    /// Period of the producer task in milliseconds
    pub sample_interval_ms: u64,
    /// Period of the expiry sweep in milliseconds, 0 = lazy expiry only
    pub sweep_interval_ms: u64,
    /// Button debounce window in milliseconds
    pub debounce_ms: u64,
    /// Display refresh period of the consumer task in milliseconds, 0 = off
    pub refresh_interval_ms: u64,
    /// Diagnostics HTTP port
    pub server_port: u16,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `CACHE_SLOTS` - EEPROM slots used by the cache (default: 4)
    /// - `DEFAULT_TTL_MS` - Reading TTL (default: 2000)
    /// - `SAMPLE_INTERVAL_MS` - Sensor sampling period (default: 800)
    /// - `SWEEP_INTERVAL_MS` - Expiry sweep period (default: 1000)
    /// - `DEBOUNCE_MS` - Button debounce window (default: 50)
    /// - `REFRESH_INTERVAL_MS` - Display refresh period (default: 1000)
    /// - `SERVER_PORT` - Diagnostics HTTP port (default: 3000)
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            cache_slots: var_or("CACHE_SLOTS", defaults.cache_slots),
            default_ttl_ms: var_or("DEFAULT_TTL_MS", defaults.default_ttl_ms),
            sample_interval_ms: var_or("SAMPLE_INTERVAL_MS", defaults.sample_interval_ms),
            sweep_interval_ms: var_or("SWEEP_INTERVAL_MS", defaults.sweep_interval_ms),
            debounce_ms: var_or("DEBOUNCE_MS", defaults.debounce_ms),
            refresh_interval_ms: var_or("REFRESH_INTERVAL_MS", defaults.refresh_interval_ms),
            server_port: var_or("SERVER_PORT", defaults.server_port),
        }
    }

    /// Rejects values the simulation cannot run with.
    pub fn validate(&self) -> Result<(), CacheError> {
        if self.cache_slots == 0 {
            return Err(CacheError::InvalidConfig("CACHE_SLOTS must be at least 1".into()));
        }
        if self.cache_slots > Eeprom::max_slots() {
            return Err(CacheError::InvalidConfig(format!(
                "CACHE_SLOTS {} exceeds the {} slots the EEPROM holds",
                self.cache_slots,
                Eeprom::max_slots()
            )));
        }
        if self.default_ttl_ms == 0 {
            return Err(CacheError::InvalidConfig("DEFAULT_TTL_MS must be non-zero".into()));
        }
        if self.sample_interval_ms == 0 {
            return Err(CacheError::InvalidConfig(
                "SAMPLE_INTERVAL_MS must be non-zero".into(),
            ));
        }
        Ok(())
    }

    pub fn default_ttl(&self) -> Duration {
        Duration::from_millis(self.default_ttl_ms)
    }

    pub fn sample_interval(&self) -> Duration {
        Duration::from_millis(self.sample_interval_ms)
    }

    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }

    pub fn sweep_interval(&self) -> Option<Duration> {
        non_zero_ms(self.sweep_interval_ms)
    }

    pub fn refresh_interval(&self) -> Option<Duration> {
        non_zero_ms(self.refresh_interval_ms)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            cache_slots: 4,
            default_ttl_ms: 2000,
            sample_interval_ms: 800,
            sweep_interval_ms: 1000,
            debounce_ms: 50,
            refresh_interval_ms: 1000,
            server_port: 3000,
        }
    }
}

fn var_or<T: FromStr>(name: &str, default: T) -> T {
    env::var(name)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

fn non_zero_ms(ms: u64) -> Option<Duration> {
    (ms > 0).then(|| Duration::from_millis(ms))
}
