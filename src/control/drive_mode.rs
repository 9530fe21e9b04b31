//! Drive-mode classification from the selector voltage.
//!
//! The selector is a resistor-ladder rotary switch read through one ADC
//! channel.  Five strictly increasing lower bounds `B0 < … < B4` split the
//! raw range into six bands:
//!
//! | Reading            | Mode           | Error code |
//! |--------------------|----------------|------------|
//! | `r < B0`           | `Error`        | 1          |
//! | `B0 <= r < B1`     | `Standard`     | 0          |
//! | `B1 <= r < B2`     | `Acceleration` | 0          |
//! | `B2 <= r < B3`     | `Skidpad`      | 0          |
//! | `B3 <= r < B4`     | `Autocross`    | 0          |
//! | `r >= B4`          | `Endurance`    | 0          |
//!
//! A reading exactly on a bound belongs to the band above it.

use core::fmt;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::indicator::ErrorCode;
use crate::sensors::RawReading;

/// Operating profile requested by the driver.  The discriminant is the
/// value carried in the command frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[repr(u8)]
pub enum DriveMode {
    /// No valid selector signal.
    #[default]
    Error = 0,
    /// Linear torque request.
    Standard = 1,
    Acceleration = 2,
    Skidpad = 3,
    Autocross = 4,
    Endurance = 5,
}

impl DriveMode {
    /// Modes in band order, index = discriminant.
    pub const ALL: [DriveMode; 6] = [
        Self::Error,
        Self::Standard,
        Self::Acceleration,
        Self::Skidpad,
        Self::Autocross,
        Self::Endurance,
    ];

    pub const fn as_u8(self) -> u8 {
        self as u8
    }

    pub fn from_u8(raw: u8) -> Option<Self> {
        Self::ALL.get(raw as usize).copied()
    }
}

impl fmt::Display for DriveMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Error => "error",
            Self::Standard => "standard",
            Self::Acceleration => "acceleration",
            Self::Skidpad => "skidpad",
            Self::Autocross => "autocross",
            Self::Endurance => "endurance",
        };
        f.write_str(name)
    }
}

/// Validated lower bounds of the five non-error modes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DriveModeBounds([u16; 5]);

impl DriveModeBounds {
    /// Build a bound table, rejecting anything not strictly increasing or
    /// beyond the ADC range.
    pub fn new(bounds: [u16; 5]) -> Result<Self, ConfigError> {
        let table = Self(bounds);
        table.validate()?;
        Ok(table)
    }

    /// Re-check the invariant (needed after deserialisation).
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.0.windows(2).any(|w| w[0] >= w[1]) {
            return Err(ConfigError::ValidationFailed(
                "drive-mode bounds must be strictly increasing",
            ));
        }
        if self.0[0] == 0 {
            return Err(ConfigError::ValidationFailed(
                "drive-mode bound B0 must be above zero or Error is unreachable",
            ));
        }
        if self.0[4] > RawReading::MAX {
            return Err(ConfigError::ValidationFailed(
                "drive-mode bound B4 exceeds the ADC range",
            ));
        }
        Ok(())
    }

    pub fn as_array(&self) -> [u16; 5] {
        self.0
    }
}

impl Default for DriveModeBounds {
    /// Five-position ladder centred on 1/6 steps of the 10-bit range, with
    /// a dead band near 0 V for a disconnected selector.
    fn default() -> Self {
        Self([64, 256, 448, 640, 832])
    }
}

/// Classify a selector reading.  Pure: same input, same output.
pub fn classify(raw: RawReading, bounds: &DriveModeBounds) -> (DriveMode, ErrorCode) {
    let value = raw.value();
    match bounds.0.iter().position(|&b| value < b) {
        Some(0) => (DriveMode::Error, ErrorCode::DRIVE_MODE),
        Some(i) => (DriveMode::ALL[i], ErrorCode::NONE),
        None => (DriveMode::Endurance, ErrorCode::NONE),
    }
}
