//! Sensor Module
//!
//! Channel identifiers, the reading payload, and the sensor sources that feed
//! the producer task.

mod gas;
mod temperature;

pub use gas::{calculate_ppm, GasKind, GasSensor};
pub use temperature::TemperatureSensor;

use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use crate::cache::SharedCache;
use crate::error::SensorError;
use crate::storage::{SlotBuffer, SlotValue};

/// The cache shared by the producer and consumer tasks.
pub type SensorCache = SharedCache<SensorChannel, Reading>;

// == Sensor Channel ==
/// One physical sensor, used as the cache key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum SensorChannel {
    /// DS18B20 one-wire thermometer
    Temperature,
    /// MQ-2 combustible gas / smoke sensor
    Smoke,
    /// MQ-7 carbon monoxide sensor
    CarbonMonoxide,
}

impl SensorChannel {
    pub const ALL: [SensorChannel; 3] = [
        SensorChannel::Temperature,
        SensorChannel::Smoke,
        SensorChannel::CarbonMonoxide,
    ];

    /// Bus address of the channel.
    pub fn address(self) -> u8 {
        match self {
            SensorChannel::Temperature => 0x10,
            SensorChannel::Smoke => 0x11,
            SensorChannel::CarbonMonoxide => 0x12,
        }
    }

    /// Four-character label shown on the display.
    pub fn label(self) -> &'static str {
        match self {
            SensorChannel::Temperature => "TEMP",
            SensorChannel::Smoke => "MQII",
            SensorChannel::CarbonMonoxide => "MQIV",
        }
    }
}

impl fmt::Display for SensorChannel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Parses a display label (`TEMP`, `MQII`, `MQIV`, any case) or a bus
/// address such as `0x11`.
impl FromStr for SensorChannel {
    type Err = SensorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SensorChannel::ALL
            .into_iter()
            .find(|channel| {
                channel.label().eq_ignore_ascii_case(s)
                    || format!("{:#04x}", channel.address()).eq_ignore_ascii_case(s)
            })
            .ok_or_else(|| SensorError::Unavailable {
                channel: s.to_string(),
            })
    }
}

// == Reading ==
/// One sampled value: degrees Celsius or gas concentration in ppm.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Reading(pub f32);

impl Reading {
    pub fn value(self) -> f32 {
        self.0
    }
}

impl SlotValue for Reading {
    fn encode(&self) -> SlotBuffer {
        self.0.encode()
    }

    fn decode(bytes: &SlotBuffer) -> Option<Self> {
        f32::decode(bytes).map(Reading)
    }
}

// == Sensor Source Trait ==
/// Something that can be sampled for a [`Reading`].
pub trait SensorSource: Send {
    fn channel(&self) -> SensorChannel;

    fn sample(&mut self) -> Result<Reading, SensorError>;
}

/// The default bank of simulated sensors, one per channel.
pub fn simulated_bank() -> Vec<Box<dyn SensorSource>> {
    vec![
        Box::new(TemperatureSensor::new()),
        Box::new(GasSensor::new(GasKind::Mq2)),
        Box::new(GasSensor::new(GasKind::Mq7)),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_channel_labels_and_addresses() {
        let labels: Vec<_> = SensorChannel::ALL.iter().map(|c| c.to_string()).collect();
        assert_eq!(labels, vec!["TEMP", "MQII", "MQIV"]);
        assert_eq!(SensorChannel::Smoke.address(), 0x11);
    }

    #[test]
    fn test_channel_parse() {
        assert_eq!("MQIV".parse::<SensorChannel>().unwrap(), SensorChannel::CarbonMonoxide);
        assert_eq!("temp".parse::<SensorChannel>().unwrap(), SensorChannel::Temperature);
        assert_eq!("0x11".parse::<SensorChannel>().unwrap(), SensorChannel::Smoke);
        assert!("CO2".parse::<SensorChannel>().is_err());
    }

    #[test]
    fn test_reading_slot_encoding() {
        let reading = Reading(412.37);
        assert_eq!(Reading::decode(&reading.encode()), Some(reading));
        assert_eq!(Reading::decode(&[0xFF; 4]), None);
    }

    #[test]
    fn test_simulated_bank_covers_every_channel() {
        let channels: Vec<_> = simulated_bank().iter().map(|s| s.channel()).collect();
        assert_eq!(channels, SensorChannel::ALL.to_vec());
    }
}
