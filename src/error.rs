//! Unified error types for the throttle board firmware.
//!
//! A single `Error` enum that every subsystem converts into, keeping the
//! control loop's error handling uniform.  All variants are `Copy` so they
//! can be passed through the per-cycle pipeline without allocation.
//!
//! Note that none of these are *safety faults*: plausibility failures,
//! selector-range faults and switch trips travel as data (flags, error
//! code) through the pipeline, never as `Err`.

use core::fmt;

// ---------------------------------------------------------------------------
// Top-level firmware error
// ---------------------------------------------------------------------------

/// Every fallible operation in the firmware funnels into this type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// A sensor or switch line could not be read.
    Sensor(SensorError),
    /// An indicator output could not be driven.
    Actuator(ActuatorError),
    /// The bus transport rejected a frame.
    Comms(CommsError),
    /// Board configuration failed validation.
    Config(ConfigError),
    /// A received frame does not follow the command layout.
    Decode(DecodeError),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Sensor(e) => write!(f, "sensor: {e}"),
            Self::Actuator(e) => write!(f, "actuator: {e}"),
            Self::Comms(e) => write!(f, "comms: {e}"),
            Self::Config(e) => write!(f, "config: {e}"),
            Self::Decode(e) => write!(f, "decode: {e}"),
        }
    }
}

impl std::error::Error for Error {}

// ---------------------------------------------------------------------------
// Sensor errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SensorError {
    /// GPIO input read returned an error.
    GpioReadFailed,
}

impl fmt::Display for SensorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::GpioReadFailed => write!(f, "GPIO read failed"),
        }
    }
}

impl From<SensorError> for Error {
    fn from(e: SensorError) -> Self {
        Self::Sensor(e)
    }
}

// ---------------------------------------------------------------------------
// Actuator errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActuatorError {
    /// GPIO output write failed.
    GpioWriteFailed,
    /// Indicator index outside `0..INDICATOR_COUNT`.
    NoSuchIndicator(usize),
}

impl fmt::Display for ActuatorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::GpioWriteFailed => write!(f, "GPIO write failed"),
            Self::NoSuchIndicator(i) => write!(f, "no indicator at index {i}"),
        }
    }
}

impl From<ActuatorError> for Error {
    fn from(e: ActuatorError) -> Self {
        Self::Actuator(e)
    }
}

// ---------------------------------------------------------------------------
// Communications errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommsError {
    /// CAN controller not started or bus-off.
    BusUnavailable,
    /// Transmit queue full or transmit timed out.
    TransmitFailed(i32),
}

impl fmt::Display for CommsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::BusUnavailable => write!(f, "CAN bus unavailable"),
            Self::TransmitFailed(rc) => write!(f, "CAN transmit failed (rc={rc})"),
        }
    }
}

impl From<CommsError> for Error {
    fn from(e: CommsError) -> Self {
        Self::Comms(e)
    }
}

// ---------------------------------------------------------------------------
// Configuration errors
// ---------------------------------------------------------------------------

/// Invalid ranges are rejected, never silently clamped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigError {
    /// A field failed range validation; the message names the field.
    ValidationFailed(&'static str),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ValidationFailed(msg) => write!(f, "validation failed: {msg}"),
        }
    }
}

impl std::error::Error for ConfigError {}

impl From<ConfigError> for Error {
    fn from(e: ConfigError) -> Self {
        Self::Config(e)
    }
}

// ---------------------------------------------------------------------------
// Frame decode errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecodeError {
    /// Drive-mode byte outside 0–5.
    UnknownDriveMode(u8),
    /// A throttle byte above 100 %.
    ThrottleOutOfRange(u8),
    /// A binary flag byte other than 0x00 / 0xFF.
    BadFlagByte { slot: usize, value: u8 },
    /// Per-switch bytes disagree with the packed flag register.
    FlagMismatch,
    /// Reserved byte is not zero.
    ReservedNonZero(u8),
}

impl fmt::Display for DecodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownDriveMode(m) => write!(f, "unknown drive mode {m}"),
            Self::ThrottleOutOfRange(v) => write!(f, "throttle {v}% out of range"),
            Self::BadFlagByte { slot, value } => {
                write!(f, "byte {slot} = 0x{value:02X} is not a binary flag")
            }
            Self::FlagMismatch => write!(f, "switch bytes disagree with flag register"),
            Self::ReservedNonZero(v) => write!(f, "reserved byte = 0x{v:02X}"),
        }
    }
}

impl From<DecodeError> for Error {
    fn from(e: DecodeError) -> Self {
        Self::Decode(e)
    }
}

// ---------------------------------------------------------------------------
// Convenience Result alias
// ---------------------------------------------------------------------------

/// Firmware-wide `Result` alias.
pub type Result<T> = core::result::Result<T, Error>;
