//! DS18B20 thermometer

use super::{Reading, SensorChannel, SensorSource};
use crate::error::SensorError;

/// Simulated one-wire thermometer drifting around a room temperature.
#[derive(Debug, Clone)]
pub struct TemperatureSensor {
    tick: u32,
    base_celsius: f32,
    swing_celsius: f32,
}

impl TemperatureSensor {
    pub fn new() -> Self {
        Self::with_waveform(21.5, 1.5)
    }

    pub fn with_waveform(base_celsius: f32, swing_celsius: f32) -> Self {
        Self {
            tick: 0,
            base_celsius,
            swing_celsius,
        }
    }
}

impl Default for TemperatureSensor {
    fn default() -> Self {
        Self::new()
    }
}

impl SensorSource for TemperatureSensor {
    fn channel(&self) -> SensorChannel {
        SensorChannel::Temperature
    }

    fn sample(&mut self) -> Result<Reading, SensorError> {
        let phase = self.tick as f32 * 0.1;
        self.tick = self.tick.wrapping_add(1);
        let celsius = self.base_celsius + self.swing_celsius * phase.sin();

        // A conversion that never completed reads back as zero or below
        if celsius <= 0.0 {
            return Err(SensorError::NoReading {
                channel: self.channel().to_string(),
            });
        }
        // The part resolves 1/16 degree
        Ok(Reading((celsius * 16.0).round() / 16.0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_sample_is_base() {
        let mut sensor = TemperatureSensor::new();
        assert_eq!(sensor.sample().unwrap(), Reading(21.5));
    }

    #[test]
    fn test_samples_stay_in_band() {
        let mut sensor = TemperatureSensor::new();
        for _ in 0..100 {
            let celsius = sensor.sample().unwrap().value();
            assert!((20.0..=23.0).contains(&celsius), "{celsius}");
        }
    }

    #[test]
    fn test_non_positive_reading_rejected() {
        let mut sensor = TemperatureSensor::with_waveform(0.0, 0.0);
        assert!(matches!(
            sensor.sample(),
            Err(SensorError::NoReading { .. })
        ));
    }
}
