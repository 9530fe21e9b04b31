//! Panic override.
//!
//! Runs after mapping and before the indicator/frame stages.  When Panic is
//! flagged both pedal outputs are forced to zero and every fault indicator
//! is forced on, whatever else was computed this cycle.

use crate::control::throttle::ThrottleOutput;
use crate::safety::FlagRegister;

/// The two throttle values that will actually be commanded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CommandedThrottle {
    pub throttle1: ThrottleOutput,
    pub throttle2: ThrottleOutput,
}

impl CommandedThrottle {
    pub const ZERO: Self = Self {
        throttle1: ThrottleOutput::ZERO,
        throttle2: ThrottleOutput::ZERO,
    };

    pub fn new(throttle1: ThrottleOutput, throttle2: ThrottleOutput) -> Self {
        Self { throttle1, throttle2 }
    }

    /// Larger of the two channels.
    pub fn max(&self) -> ThrottleOutput {
        self.throttle1.max(self.throttle2)
    }
}

/// Outcome of the override stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PanicOutcome {
    pub throttle: CommandedThrottle,
    /// All indicators must be lit regardless of the error code.
    pub force_indicators: bool,
}

/// Apply the Panic override.
pub fn apply_panic(flags: &FlagRegister, outputs: CommandedThrottle) -> PanicOutcome {
    if flags.panic {
        PanicOutcome {
            throttle: CommandedThrottle::ZERO,
            force_indicators: true,
        }
    } else {
        PanicOutcome {
            throttle: outputs,
            force_indicators: false,
        }
    }
}
