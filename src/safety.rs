//! Safety flag aggregation.
//!
//! The flag register is rebuilt from scratch every cycle; nothing is
//! latched.  It is filled in three steps, in pipeline order:
//!
//! 1. [`read_switches`] + [`aggregate`]: hardwired switch trips and the
//!    brake-pressed input.
//! 2. [`FlagRegister::apply_mapping`]: Panic on an implausible APPS pair,
//!    throttle/brake conflict.
//! 3. [`FlagRegister::apply_commanded`]: motor-on and >10 % flags from the
//!    throttle actually commanded after the Panic override.
//!
//! Switch trips are *reported*, never escalated to Panic here; the motor
//! controller decides how to react to them.

use core::fmt;

use log::warn;

use crate::app::ports::SwitchPort;
use crate::control::panic::CommandedThrottle;
use crate::control::throttle::ThrottleMapping;
use crate::sensors::switches::{SafetySwitch, SwitchLevels};

/// Individual flags, with their bit in the packed register byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum Flag {
    Brake = 0b0000_0001,
    ThrottleBrakeConflict = 0b0000_0010,
    EmergencyStop = 0b0000_0100,
    InertiaSwitch = 0b0000_1000,
    BrakeOverTravel = 0b0001_0000,
    MotorOn = 0b0010_0000,
    Throttle10 = 0b0100_0000,
    Panic = 0b1000_0000,
}

impl Flag {
    pub const ALL: [Flag; 8] = [
        Self::Brake,
        Self::ThrottleBrakeConflict,
        Self::EmergencyStop,
        Self::InertiaSwitch,
        Self::BrakeOverTravel,
        Self::MotorOn,
        Self::Throttle10,
        Self::Panic,
    ];

    pub const fn mask(self) -> u8 {
        self as u8
    }
}

impl fmt::Display for Flag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Brake => "BRAKE",
            Self::ThrottleBrakeConflict => "THROTTLE_BRAKE",
            Self::EmergencyStop => "ESTOP",
            Self::InertiaSwitch => "IS",
            Self::BrakeOverTravel => "BOTS",
            Self::MotorOn => "MOTOR_ON",
            Self::Throttle10 => "THROTTLE_10",
            Self::Panic => "PANIC",
        };
        f.write_str(name)
    }
}

/// Every safety/status condition for one cycle, each in its own field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FlagRegister {
    pub brake: bool,
    pub throttle_brake_conflict: bool,
    pub estop: bool,
    pub inertia_switch: bool,
    pub brake_over_travel: bool,
    pub motor_on: bool,
    pub throttle_10: bool,
    pub panic: bool,
}

impl FlagRegister {
    pub fn get(&self, flag: Flag) -> bool {
        match flag {
            Flag::Brake => self.brake,
            Flag::ThrottleBrakeConflict => self.throttle_brake_conflict,
            Flag::EmergencyStop => self.estop,
            Flag::InertiaSwitch => self.inertia_switch,
            Flag::BrakeOverTravel => self.brake_over_travel,
            Flag::MotorOn => self.motor_on,
            Flag::Throttle10 => self.throttle_10,
            Flag::Panic => self.panic,
        }
    }

    pub fn set(&mut self, flag: Flag, on: bool) {
        let slot = match flag {
            Flag::Brake => &mut self.brake,
            Flag::ThrottleBrakeConflict => &mut self.throttle_brake_conflict,
            Flag::EmergencyStop => &mut self.estop,
            Flag::InertiaSwitch => &mut self.inertia_switch,
            Flag::BrakeOverTravel => &mut self.brake_over_travel,
            Flag::MotorOn => &mut self.motor_on,
            Flag::Throttle10 => &mut self.throttle_10,
            Flag::Panic => &mut self.panic,
        };
        *slot = on;
    }

    /// Packed register byte (bit 0 = brake … bit 7 = panic).
    pub fn to_bits(&self) -> u8 {
        Flag::ALL
            .iter()
            .filter(|f| self.get(**f))
            .fold(0, |acc, f| acc | f.mask())
    }

    pub fn from_bits(bits: u8) -> Self {
        let mut flags = Self::default();
        for f in Flag::ALL {
            flags.set(f, bits & f.mask() != 0);
        }
        flags
    }

    /// Any hardwired shutdown switch tripped.
    pub fn shutdown_tripped(&self) -> bool {
        self.estop || self.inertia_switch || self.brake_over_travel
    }

    /// Raise Panic on an implausible pedal pair and flag brake/throttle
    /// conflict.  `brake` must already be set from the switches.
    pub fn apply_mapping(&mut self, mapping: &ThrottleMapping, conflict_threshold_pct: u8) {
        if !mapping.plausible {
            self.panic = true;
        }
        self.throttle_brake_conflict =
            self.brake && mapping.pedal().percent() > conflict_threshold_pct;
    }

    /// Status flags derived from the throttle actually commanded.
    pub fn apply_commanded(&mut self, commanded: &CommandedThrottle, active_threshold_pct: u8) {
        let pedal = commanded.max().percent();
        self.motor_on = pedal > 0;
        self.throttle_10 = pedal > active_threshold_pct;
    }
}

impl fmt::Display for FlagRegister {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for flag in Flag::ALL.iter().filter(|fl| self.get(**fl)) {
            if !first {
                f.write_str("|")?;
            }
            write!(f, "{flag}")?;
            first = false;
        }
        if first {
            f.write_str("-")?;
        }
        Ok(())
    }
}

/// Active/inactive state of every switch for one cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SwitchStates {
    pub estop: bool,
    pub inertia_switch: bool,
    pub brake_over_travel: bool,
    pub brake_pressed: bool,
}

/// Read every switch through the port and resolve its active level.
///
/// An unreadable line counts as active.
pub fn read_switches(port: &mut impl SwitchPort, levels: &SwitchLevels) -> SwitchStates {
    let mut active = |switch: SafetySwitch| match port.read_level(switch) {
        Ok(high) => levels.level_of(switch).is_active(high),
        Err(e) => {
            warn!("switch {:?} unreadable ({}), treating as tripped", switch, e);
            true
        }
    };
    SwitchStates {
        estop: active(SafetySwitch::EmergencyStop),
        inertia_switch: active(SafetySwitch::InertiaSwitch),
        brake_over_travel: active(SafetySwitch::BrakeOverTravel),
        brake_pressed: active(SafetySwitch::BrakePressed),
    }
}

/// Fresh flag register from the switch states.  Derived flags start false.
pub fn aggregate(states: &SwitchStates) -> FlagRegister {
    FlagRegister {
        brake: states.brake_pressed,
        estop: states.estop,
        inertia_switch: states.inertia_switch,
        brake_over_travel: states.brake_over_travel,
        ..FlagRegister::default()
    }
}
