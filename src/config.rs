//! Board configuration.
//!
//! All tunable parameters of the throttle board.  They are compile-time
//! constants on the car (there is no persistent storage); the struct is
//! serde-enabled so bench tooling can describe a board in JSON.

use serde::{Deserialize, Serialize};

use crate::control::drive_mode::DriveModeBounds;
use crate::control::throttle::CalibrationBounds;
use crate::error::ConfigError;
use crate::sensors::switches::SwitchLevels;

/// Core board configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoardConfig {
    // --- Pedal sensors ---
    /// Raw window of throttle sensor 1.
    pub throttle1: CalibrationBounds,
    /// Raw window of throttle sensor 2.
    pub throttle2: CalibrationBounds,
    /// Maximum disagreement between the two sensors (percentage points)
    /// before Panic is raised.
    pub plausibility_tolerance_pct: u8,

    // --- Drive mode selector ---
    pub drive_mode_bounds: DriveModeBounds,

    // --- Derived flags ---
    /// Pedal travel above which a pressed brake is a conflict (%).
    pub brake_conflict_threshold_pct: u8,
    /// Commanded throttle above which the THROTTLE_10 flag is set (%).
    pub throttle_active_pct: u8,

    // --- Switch wiring ---
    pub switch_levels: SwitchLevels,

    // --- Timing / bus ---
    /// Control loop period (milliseconds).
    pub control_loop_interval_ms: u32,
    /// Standard 11-bit CAN identifier of the command frame.
    pub can_id: u32,
}

impl Default for BoardConfig {
    fn default() -> Self {
        Self {
            // Pedal, measured after centring
            throttle1: CalibrationBounds::new(0x0C, 0xA0),
            throttle2: CalibrationBounds::new(0x06, 0xA0),
            plausibility_tolerance_pct: 10,

            drive_mode_bounds: DriveModeBounds::default(),

            brake_conflict_threshold_pct: 25,
            throttle_active_pct: 10,

            switch_levels: SwitchLevels::default(),

            control_loop_interval_ms: 16, // ~61 Hz
            can_id: 0x0C0,
        }
    }
}

impl BoardConfig {
    /// Reject out-of-range values.  Nothing is clamped.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.throttle1.validate()?;
        self.throttle2.validate()?;
        self.drive_mode_bounds.validate()?;

        if !(1..=50).contains(&self.plausibility_tolerance_pct) {
            return Err(ConfigError::ValidationFailed(
                "plausibility tolerance must be 1-50 %",
            ));
        }
        if self.brake_conflict_threshold_pct > 100 {
            return Err(ConfigError::ValidationFailed(
                "brake conflict threshold above 100 %",
            ));
        }
        if self.throttle_active_pct > 100 {
            return Err(ConfigError::ValidationFailed("throttle active threshold above 100 %"));
        }
        if self.control_loop_interval_ms == 0 {
            return Err(ConfigError::ValidationFailed("control loop interval is zero"));
        }
        if self.can_id > 0x7FF {
            return Err(ConfigError::ValidationFailed("CAN id exceeds 11 bits"));
        }
        Ok(())
    }
}
