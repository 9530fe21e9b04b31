//! Pedal mapping and APPS plausibility cross-check.
//!
//! Each throttle-position sensor has its own raw calibration window
//! `[low, high]`, measured on the car after centring the pedal.  A reading
//! is mapped linearly onto 0–100 % and clamped at both ends.  The two
//! channels must then agree within a tolerance; if they do not, neither
//! value can be trusted and the caller raises Panic.

use core::fmt;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::sensors::RawReading;

/// Normalised pedal travel in whole percent, always `0..=100`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub struct ThrottleOutput(u8);

impl ThrottleOutput {
    pub const ZERO: Self = Self(0);
    pub const FULL: Self = Self(100);

    /// Values above 100 saturate.
    pub fn new(percent: u8) -> Self {
        Self(percent.min(100))
    }

    pub const fn percent(self) -> u8 {
        self.0
    }
}

impl fmt::Display for ThrottleOutput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}%", self.0)
    }
}

/// Raw reading window corresponding to 0 % and 100 % pedal travel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalibrationBounds {
    pub low: u16,
    pub high: u16,
}

impl CalibrationBounds {
    pub const fn new(low: u16, high: u16) -> Self {
        Self { low, high }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.low >= self.high {
            return Err(ConfigError::ValidationFailed(
                "throttle calibration low must be below high",
            ));
        }
        if self.high > RawReading::MAX {
            return Err(ConfigError::ValidationFailed(
                "throttle calibration high exceeds the ADC range",
            ));
        }
        Ok(())
    }

    /// Map a raw reading onto 0–100 %, clamping outside the window.
    pub fn map(&self, raw: RawReading) -> ThrottleOutput {
        let value = raw.value().clamp(self.low, self.high);
        let span = u32::from(self.high - self.low);
        if span == 0 {
            return ThrottleOutput::ZERO;
        }
        let travel = u32::from(value - self.low) * 100 / span;
        ThrottleOutput::new(travel as u8)
    }
}

/// Result of mapping both pedal channels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ThrottleMapping {
    pub out1: ThrottleOutput,
    pub out2: ThrottleOutput,
    /// Both channels agree within tolerance.
    pub plausible: bool,
}

impl ThrottleMapping {
    /// Absolute disagreement between the channels, in percentage points.
    pub fn deviation(&self) -> u8 {
        self.out1.percent().abs_diff(self.out2.percent())
    }

    /// The larger of the two outputs, used for brake-conflict checks.
    pub fn pedal(&self) -> ThrottleOutput {
        self.out1.max(self.out2)
    }
}

/// Map both channels through their calibrations and cross-check them.
pub fn map(
    raw1: RawReading,
    raw2: RawReading,
    calib1: &CalibrationBounds,
    calib2: &CalibrationBounds,
    tolerance_pct: u8,
) -> ThrottleMapping {
    let out1 = calib1.map(raw1);
    let out2 = calib2.map(raw2);
    ThrottleMapping {
        out1,
        out2,
        plausible: out1.percent().abs_diff(out2.percent()) <= tolerance_pct,
    }
}
