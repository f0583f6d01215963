//! MQ-series gas sensors
//!
//! The sensor's load-resistor voltage is converted to a concentration with the
//! datasheet sensitivity curve `ppm = (Rs / R0 / A) ^ B`.

use super::{Reading, SensorChannel, SensorSource};
use crate::error::SensorError;

/// ADC reference voltage.
const ADC_VREF: f32 = 3.3;
/// Sensor heater/circuit supply voltage.
const SUPPLY_VOLTS: f32 = 5.0;
/// Load resistance in ohms.
const LOAD_OHMS: f32 = 1000.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GasKind {
    Mq2,
    Mq7,
}

impl GasKind {
    /// Sensor resistance in clean air, calibrated per part.
    fn r0(self) -> f32 {
        match self {
            GasKind::Mq2 => 22_500.0,
            GasKind::Mq7 => 15_000.0,
        }
    }

    /// `(A, B)` of the sensitivity curve.
    fn curve(self) -> (f32, f32) {
        match self {
            GasKind::Mq2 => (11.5428, -1.526),
            GasKind::Mq7 => (22.07, -1.498),
        }
    }

    fn channel(self) -> SensorChannel {
        match self {
            GasKind::Mq2 => SensorChannel::Smoke,
            GasKind::Mq7 => SensorChannel::CarbonMonoxide,
        }
    }
}

/// Converts the divided-down load voltage to ppm, rounded to two decimals.
///
/// Returns `None` when the voltage gives no physical sensor resistance.
pub fn calculate_ppm(divided_volts: f32, kind: GasKind) -> Option<f32> {
    if divided_volts <= 0.0 {
        return None;
    }
    // Voltage divider in front of the ADC halves the signal
    let vrl = divided_volts * 2.0;
    let rs = (SUPPLY_VOLTS - vrl) * LOAD_OHMS / vrl;
    let ratio = rs / kind.r0();
    if ratio <= 0.0 {
        return None;
    }

    let (a, b) = kind.curve();
    let ppm = (ratio / a).powf(b);
    ppm.is_finite().then(|| (ppm * 100.0).round() / 100.0)
}

// == Gas Sensor ==
/// Simulated MQ sensor whose ADC input follows a slow triangle wave.
#[derive(Debug, Clone)]
pub struct GasSensor {
    kind: GasKind,
    tick: u32,
    base_volts: f32,
    swing_volts: f32,
}

impl GasSensor {
    pub fn new(kind: GasKind) -> Self {
        Self::with_waveform(kind, 0.4, 0.05)
    }

    /// Input voltage oscillates between `base - swing` and `base + swing`.
    pub fn with_waveform(kind: GasKind, base_volts: f32, swing_volts: f32) -> Self {
        Self {
            kind,
            tick: 0,
            base_volts,
            swing_volts,
        }
    }

    fn adc_volts(&mut self) -> f32 {
        const PERIOD: u32 = 20;
        let phase = self.tick % PERIOD;
        self.tick = self.tick.wrapping_add(1);

        // Triangle in [-1, 1]
        let half = (PERIOD / 2) as f32;
        let tri = (phase as f32 - half).abs() / half * 2.0 - 1.0;
        let volts = self.base_volts + self.swing_volts * tri;

        // Quantize to the 16-bit ADC
        let raw = (volts / ADC_VREF * 65535.0).clamp(0.0, 65535.0) as u16;
        raw as f32 * ADC_VREF / 65535.0
    }
}

impl SensorSource for GasSensor {
    fn channel(&self) -> SensorChannel {
        self.kind.channel()
    }

    fn sample(&mut self) -> Result<Reading, SensorError> {
        let volts = self.adc_volts();
        calculate_ppm(volts, self.kind)
            .map(Reading)
            .ok_or_else(|| SensorError::NoReading {
                channel: self.channel().to_string(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ppm_rejects_non_positive_voltage() {
        assert_eq!(calculate_ppm(0.0, GasKind::Mq2), None);
        assert_eq!(calculate_ppm(-0.1, GasKind::Mq7), None);
    }

    #[test]
    fn test_ppm_rejects_saturated_divider() {
        // 2.5 V doubles to the full supply, leaving no sensor resistance
        assert_eq!(calculate_ppm(2.5, GasKind::Mq2), None);
        assert_eq!(calculate_ppm(3.0, GasKind::Mq2), None);
    }

    #[test]
    fn test_ppm_known_point() {
        // Vrl = 0.8 V -> Rs = 5250 ohm
        let mq2 = calculate_ppm(0.4, GasKind::Mq2).unwrap();
        let expected = ((5250.0f32 / 22_500.0) / 11.5428).powf(-1.526);
        assert!((mq2 - expected).abs() < 0.01, "{mq2} vs {expected}");
    }

    #[test]
    fn test_ppm_rises_with_voltage() {
        let low = calculate_ppm(0.3, GasKind::Mq7).unwrap();
        let high = calculate_ppm(0.6, GasKind::Mq7).unwrap();
        assert!(high > low);
    }

    #[test]
    fn test_ppm_is_rounded_to_two_decimals() {
        let ppm = calculate_ppm(0.45, GasKind::Mq2).unwrap();
        assert!(((ppm * 100.0).round() - ppm * 100.0).abs() < 1e-2);
    }

    #[test]
    fn test_sensor_samples_within_waveform() {
        let mut sensor = GasSensor::new(GasKind::Mq2);
        let low = calculate_ppm(0.35, GasKind::Mq2).unwrap();
        let high = calculate_ppm(0.45, GasKind::Mq2).unwrap();

        for _ in 0..40 {
            let reading = sensor.sample().unwrap().value();
            assert!(reading >= low - 1.0 && reading <= high + 1.0, "{reading}");
        }
    }

    #[test]
    fn test_dead_sensor_reports_no_reading() {
        let mut sensor = GasSensor::with_waveform(GasKind::Mq7, 0.0, 0.0);
        assert_eq!(
            sensor.sample(),
            Err(SensorError::NoReading {
                channel: "MQIV".to_string()
            })
        );
    }
}
