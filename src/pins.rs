//! GPIO / peripheral pin assignments for the throttle board.
//!
//! Single source of truth: every driver references this module rather than
//! hard-coding pin numbers.

use crate::sensors::AdcChannel;

// ---------------------------------------------------------------------------
// Analog inputs (ADC1, 12-bit, 12 dB attenuation)
// ---------------------------------------------------------------------------

/// Throttle position sensor 1 (APPS1).  ADC1 channel 3 (GPIO 4 on ESP32-S3).
pub const THROTTLE1_ADC_CH: u32 = 3;
/// Throttle position sensor 2 (APPS2).  ADC1 channel 4 (GPIO 5).
pub const THROTTLE2_ADC_CH: u32 = 4;
/// Drive-mode rotary selector, resistor ladder.  ADC1 channel 5 (GPIO 6).
pub const DRIVE_MODE_ADC_CH: u32 = 5;

/// Converter channel wired to each logical input.
pub const fn adc_channel(channel: AdcChannel) -> u32 {
    match channel {
        AdcChannel::Throttle1 => THROTTLE1_ADC_CH,
        AdcChannel::Throttle2 => THROTTLE2_ADC_CH,
        AdcChannel::DriveMode => DRIVE_MODE_ADC_CH,
    }
}

// ---------------------------------------------------------------------------
// Shutdown-circuit sense lines (inputs, external pull-ups)
// ---------------------------------------------------------------------------

/// Emergency stop loop.  HIGH = loop closed.
pub const SS_ESTOP_GPIO: i32 = 7;
/// Inertia switch.  HIGH = not tripped.
pub const SS_IS_GPIO: i32 = 8;
/// Brake over-travel switch.  HIGH = not tripped.
pub const SS_BOTS_GPIO: i32 = 9;

/// Brake pedal switch.  HIGH = pressed.
pub const BRAKE_GPIO: i32 = 10;

// ---------------------------------------------------------------------------
// Fault indicator LEDs (outputs, active HIGH)
// ---------------------------------------------------------------------------

pub const PLED1_GPIO: i32 = 11;
pub const PLED2_GPIO: i32 = 12;
pub const PLED3_GPIO: i32 = 13;

// ---------------------------------------------------------------------------
// CAN (TWAI) to the motor controller
// ---------------------------------------------------------------------------

pub const CAN_TX_GPIO: i32 = 17;
pub const CAN_RX_GPIO: i32 = 18;
/// Bus bit rate.
pub const CAN_BITRATE: u32 = 500_000;
