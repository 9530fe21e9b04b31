//! Error indicator encoder.
//!
//! Three discrete fault LEDs show the cycle's error code in binary, least
//! significant bit on indicator 1.  The code is a one-shot signal: the
//! encoder clears it after driving the LEDs, so a transient selector glitch
//! blinks for one cycle instead of latching a fault light.  When the Panic
//! override asked for it, all three LEDs are lit instead.

use core::fmt;

use log::warn;

use crate::app::ports::IndicatorPort;

/// Number of fault indicator outputs.
pub const INDICATOR_COUNT: usize = 3;

/// Per-cycle fault code shown on the indicators (0 = none).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ErrorCode(u8);

impl ErrorCode {
    pub const NONE: Self = Self(0);
    /// Selector voltage below every drive-mode bound.
    pub const DRIVE_MODE: Self = Self(1);

    pub const fn new(code: u8) -> Self {
        Self(code)
    }

    pub const fn value(self) -> u8 {
        self.0
    }

    pub const fn is_set(self) -> bool {
        self.0 != 0
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Self::NONE => f.write_str("none"),
            Self::DRIVE_MODE => f.write_str("drive-mode selector"),
            Self(other) => write!(f, "code {other}"),
        }
    }
}

/// On/off state of each indicator, index 0 = indicator 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct IndicatorPattern(pub [bool; INDICATOR_COUNT]);

impl IndicatorPattern {
    pub const ALL_ON: Self = Self([true; INDICATOR_COUNT]);
    pub const ALL_OFF: Self = Self([false; INDICATOR_COUNT]);

    /// Low three bits of `code`, LSB first.  Higher bits are not shown.
    pub fn from_code(code: ErrorCode) -> Self {
        let mut lit = [false; INDICATOR_COUNT];
        for (i, led) in lit.iter_mut().enumerate() {
            *led = (code.value() >> i) & 1 == 1;
        }
        Self(lit)
    }

    pub fn is_lit(&self, index: usize) -> bool {
        self.0.get(index).copied().unwrap_or(false)
    }
}

/// Drive the indicators for this cycle and consume the error code.
///
/// Returns the pattern that was driven.  Output failures are logged; the
/// remaining indicators are still driven.
pub fn encode(
    port: &mut impl IndicatorPort,
    code: &mut ErrorCode,
    force_all: bool,
) -> IndicatorPattern {
    let pattern = if force_all {
        IndicatorPattern::ALL_ON
    } else {
        IndicatorPattern::from_code(*code)
    };
    for (index, &on) in pattern.0.iter().enumerate() {
        if let Err(e) = port.set_indicator(index, on) {
            warn!("indicator {} write failed: {}", index + 1, e);
        }
    }
    *code = ErrorCode::NONE;
    pattern
}
