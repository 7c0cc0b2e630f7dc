//! Sensor sampling for the sensor-node role
//!
//! A sensor node carries a resistive soil-moisture probe on an ADC pin and
//! an I2C barometer. Both are optional in practice: probes corrode and
//! boards ship without the barometer fitted, so every read outcome is a
//! tagged [`SensorValue`] rather than a bare float. Absent hardware is
//! logged once at detection and then quietly reported as unavailable.

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use std::time::Duration;
use tracing::{debug, warn};

use terramesh_core::{SensorReport, SensorValue};

/// Fixed sampling interval
pub const SENSOR_INTERVAL: Duration = Duration::from_secs(10);

/// ADC samples averaged per moisture reading
const NUM_SAMPLES: u32 = 10;

/// Raw ADC count for bone-dry soil (calibration default)
pub const DEFAULT_DRY_RAW: f64 = 3600.0;

/// Raw ADC count for saturated soil (calibration default)
pub const DEFAULT_WET_RAW: f64 = 1300.0;

/// Averaged counts below this mean the probe is disconnected
const PROBE_DISCONNECT_THRESHOLD: f64 = 100.0;

/// One raw ADC read from the soil-moisture probe
pub trait SoilProbe: Send {
    /// Read a single raw ADC count
    fn read_raw(&mut self) -> f64;
}

/// Barometric pressure sensor
pub trait Barometer: Send {
    /// Read the current pressure in hPa
    fn read_pressure_hpa(&mut self) -> f64;
}

/// Periodic sampler combining both sensors into one [`SensorReport`].
///
/// The barometer is `None` when probing at startup found no device; the
/// moisture probe is always read but treated as disconnected when the
/// averaged count sits near zero.
pub struct SensorSampler<P, B> {
    probe: P,
    barometer: Option<B>,
    dry_raw: f64,
    wet_raw: f64,
    probe_warned: bool,
    barometer_warned: bool,
}

impl<P: SoilProbe, B: Barometer> SensorSampler<P, B> {
    /// Create a sampler with default calibration
    pub fn new(probe: P, barometer: Option<B>) -> Self {
        Self {
            probe,
            barometer,
            dry_raw: DEFAULT_DRY_RAW,
            wet_raw: DEFAULT_WET_RAW,
            probe_warned: false,
            barometer_warned: false,
        }
    }

    /// Override the dry/wet ADC calibration points
    pub fn with_calibration(mut self, dry_raw: f64, wet_raw: f64) -> Self {
        self.dry_raw = dry_raw;
        self.wet_raw = wet_raw;
        self
    }

    /// Take one sampling round
    pub fn sample(&mut self) -> SensorReport {
        let mut total = 0.0;
        for _ in 0..NUM_SAMPLES {
            total += self.probe.read_raw();
        }
        let average = total / f64::from(NUM_SAMPLES);

        let moisture = if average < PROBE_DISCONNECT_THRESHOLD {
            if !self.probe_warned {
                warn!(average, "soil probe reading near zero, treating as disconnected");
                self.probe_warned = true;
            }
            SensorValue::Unavailable
        } else {
            SensorValue::Reading(self.moisture_percent(average))
        };

        let pressure = match self.barometer.as_mut() {
            Some(b) => SensorValue::Reading(b.read_pressure_hpa()),
            None => {
                if !self.barometer_warned {
                    warn!("no barometer fitted, pressure reported as unavailable");
                    self.barometer_warned = true;
                }
                SensorValue::Unavailable
            }
        };

        debug!(?moisture, ?pressure, "sensor sampling round complete");
        SensorReport { moisture, pressure }
    }

    /// Map an averaged raw count onto 0-100 % of saturation.
    ///
    /// Lower counts mean wetter soil, so the dry calibration point maps to
    /// 0 % and the wet point to 100 %, clamped at both ends.
    fn moisture_percent(&self, raw: f64) -> f64 {
        let clamped = raw.clamp(self.wet_raw, self.dry_raw);
        let percent = (self.dry_raw - clamped) / (self.dry_raw - self.wet_raw) * 100.0;
        percent.clamp(0.0, 100.0)
    }
}

/// Host-run stand-in for the moisture probe: noisy readings around a
/// configurable midpoint.
pub struct SimulatedSoilProbe {
    rng: SmallRng,
    midpoint: f64,
}

impl SimulatedSoilProbe {
    /// Simulate moderately damp soil
    pub fn new() -> Self {
        Self::around(2400.0)
    }

    /// Simulate readings around a given raw count
    pub fn around(midpoint: f64) -> Self {
        Self {
            rng: SmallRng::from_entropy(),
            midpoint,
        }
    }
}

impl Default for SimulatedSoilProbe {
    fn default() -> Self {
        Self::new()
    }
}

impl SoilProbe for SimulatedSoilProbe {
    fn read_raw(&mut self) -> f64 {
        self.midpoint + self.rng.gen_range(-150.0..150.0)
    }
}

/// Host-run stand-in for the barometer: sea-level pressure with jitter
pub struct SimulatedBarometer {
    rng: SmallRng,
}

impl SimulatedBarometer {
    /// Create a simulated barometer
    pub fn new() -> Self {
        Self {
            rng: SmallRng::from_entropy(),
        }
    }
}

impl Default for SimulatedBarometer {
    fn default() -> Self {
        Self::new()
    }
}

impl Barometer for SimulatedBarometer {
    fn read_pressure_hpa(&mut self) -> f64 {
        1013.25 + self.rng.gen_range(-2.0..2.0)
    }
}
