//! Sensor acquisition — the serial ADC sampler and the safety switch bank.
//!
//! Every cycle samples three analog channels in a fixed order, each into
//! its own slot of a [`RawSnapshot`]:
//!
//! 1. throttle sensor 1
//! 2. throttle sensor 2
//! 3. drive-mode selector
//!
//! Each read selects its channel, starts a conversion and busy-waits on the
//! converter's ready flag.  The wait is bounded by the hardware conversion
//! time, so there is no software timeout.

pub mod switches;

use core::fmt;

use log::trace;

use crate::app::ports::AdcPort;

/// One analog sample, saturated to the 10-bit converter range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub struct RawReading(u16);

impl RawReading {
    /// Full-scale 10-bit reading.
    pub const MAX: u16 = 1023;

    pub fn new(value: u16) -> Self {
        Self(value.min(Self::MAX))
    }

    pub const fn value(self) -> u16 {
        self.0
    }
}

impl fmt::Display for RawReading {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{:03X}", self.0)
    }
}

/// Logical analog inputs on the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdcChannel {
    Throttle1,
    Throttle2,
    DriveMode,
}

impl AdcChannel {
    /// Sampling order within one cycle.
    pub const SEQUENCE: [AdcChannel; 3] = [Self::Throttle1, Self::Throttle2, Self::DriveMode];
}

/// Raw readings for one cycle, one slot per channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RawSnapshot {
    pub throttle1: RawReading,
    pub throttle2: RawReading,
    pub drive_mode: RawReading,
}

/// Take one blocking sample from `channel`.
pub fn sample(adc: &mut impl AdcPort, channel: AdcChannel) -> RawReading {
    adc.select_channel(channel);
    adc.start_conversion();
    while !adc.conversion_ready() {
        core::hint::spin_loop();
    }
    let raw = RawReading::new(adc.read_result());
    trace!("adc {:?} = {}", channel, raw);
    raw
}

/// Sample every channel, strictly one after the other.
pub fn sample_all(adc: &mut impl AdcPort) -> RawSnapshot {
    let throttle1 = sample(adc, AdcChannel::Throttle1);
    let throttle2 = sample(adc, AdcChannel::Throttle2);
    let drive_mode = sample(adc, AdcChannel::DriveMode);
    RawSnapshot {
        throttle1,
        throttle2,
        drive_mode,
    }
}
