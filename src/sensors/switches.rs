//! Hardwired safety switch inputs.
//!
//! The shutdown-sense lines (emergency stop, inertia switch, brake
//! over-travel) and the brake-pressed switch are plain digital inputs.
//! Each has a wiring-dependent active level kept in [`SwitchLevels`].
//! No debouncing happens here.

use embedded_hal::digital::InputPin;
use serde::{Deserialize, Serialize};

use crate::app::ports::SwitchPort;
use crate::error::SensorError;

/// Discrete inputs read every cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SafetySwitch {
    EmergencyStop,
    InertiaSwitch,
    BrakeOverTravel,
    BrakePressed,
}

impl SafetySwitch {
    pub const ALL: [SafetySwitch; 4] = [
        Self::EmergencyStop,
        Self::InertiaSwitch,
        Self::BrakeOverTravel,
        Self::BrakePressed,
    ];
}

/// Electrical level at which a switch counts as active.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ActiveLevel {
    High,
    Low,
}

impl ActiveLevel {
    pub fn is_active(self, line_high: bool) -> bool {
        match self {
            Self::High => line_high,
            Self::Low => !line_high,
        }
    }
}

/// Active level of every switch, per board wiring.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SwitchLevels {
    pub estop: ActiveLevel,
    pub inertia_switch: ActiveLevel,
    pub brake_over_travel: ActiveLevel,
    pub brake: ActiveLevel,
}

impl SwitchLevels {
    pub fn level_of(&self, switch: SafetySwitch) -> ActiveLevel {
        match switch {
            SafetySwitch::EmergencyStop => self.estop,
            SafetySwitch::InertiaSwitch => self.inertia_switch,
            SafetySwitch::BrakeOverTravel => self.brake_over_travel,
            SafetySwitch::BrakePressed => self.brake,
        }
    }
}

impl Default for SwitchLevels {
    /// Shutdown-sense lines sit high while the loop is closed and drop when
    /// it opens; the brake switch pulls high when pressed.
    fn default() -> Self {
        Self {
            estop: ActiveLevel::Low,
            inertia_switch: ActiveLevel::Low,
            brake_over_travel: ActiveLevel::Low,
            brake: ActiveLevel::High,
        }
    }
}

/// Four input pins behind the [`SwitchPort`].
pub struct SwitchBank<P: InputPin> {
    estop: P,
    inertia_switch: P,
    brake_over_travel: P,
    brake: P,
}

impl<P: InputPin> SwitchBank<P> {
    pub fn new(estop: P, inertia_switch: P, brake_over_travel: P, brake: P) -> Self {
        Self {
            estop,
            inertia_switch,
            brake_over_travel,
            brake,
        }
    }

    fn pin(&mut self, switch: SafetySwitch) -> &mut P {
        match switch {
            SafetySwitch::EmergencyStop => &mut self.estop,
            SafetySwitch::InertiaSwitch => &mut self.inertia_switch,
            SafetySwitch::BrakeOverTravel => &mut self.brake_over_travel,
            SafetySwitch::BrakePressed => &mut self.brake,
        }
    }
}

impl<P: InputPin> SwitchPort for SwitchBank<P> {
    fn read_level(&mut self, switch: SafetySwitch) -> Result<bool, SensorError> {
        self.pin(switch)
            .is_high()
            .map_err(|_| SensorError::GpioReadFailed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::convert::Infallible;
    use embedded_hal::digital::ErrorType;

    struct FixedPin(bool);

    impl ErrorType for FixedPin {
        type Error = Infallible;
    }

    impl InputPin for FixedPin {
        fn is_high(&mut self) -> Result<bool, Infallible> {
            Ok(self.0)
        }
        fn is_low(&mut self) -> Result<bool, Infallible> {
            Ok(!self.0)
        }
    }

    #[test]
    fn bank_reads_each_pin_separately() {
        let mut bank = SwitchBank::new(
            FixedPin(true),
            FixedPin(false),
            FixedPin(true),
            FixedPin(false),
        );
        assert_eq!(bank.read_level(SafetySwitch::EmergencyStop), Ok(true));
        assert_eq!(bank.read_level(SafetySwitch::InertiaSwitch), Ok(false));
        assert_eq!(bank.read_level(SafetySwitch::BrakeOverTravel), Ok(true));
        assert_eq!(bank.read_level(SafetySwitch::BrakePressed), Ok(false));
    }

    #[test]
    fn active_level_inverts_for_low() {
        assert!(ActiveLevel::Low.is_active(false));
        assert!(!ActiveLevel::Low.is_active(true));
        assert!(ActiveLevel::High.is_active(true));
    }
}
