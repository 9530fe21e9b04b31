//! Per-cycle context threaded through every pipeline stage.
//!
//! A fresh [`CycleContext`] is created at the start of each cycle and
//! handed stage to stage by `&mut`.  Each stage writes only its own
//! fields; nothing survives into the next cycle except the finished copy
//! the control loop keeps for change detection.

use crate::control::drive_mode::DriveMode;
use crate::control::panic::CommandedThrottle;
use crate::control::throttle::ThrottleMapping;
use crate::indicator::{ErrorCode, IndicatorPattern};
use crate::message::OutgoingPayload;
use crate::safety::{FlagRegister, SwitchStates};
use crate::sensors::RawSnapshot;

/// Everything computed in one control cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CycleContext {
    // --- Acquisition ---
    pub raw: RawSnapshot,
    pub switches: SwitchStates,

    // --- Classification ---
    pub mode: DriveMode,
    /// Pending indicator code.  Consumed (reset to none) by the indicator
    /// stage; see `indicated_code` for what was shown.
    pub error_code: ErrorCode,
    pub indicated_code: ErrorCode,

    // --- Flags / throttle ---
    pub flags: FlagRegister,
    pub mapping: ThrottleMapping,
    pub commanded: CommandedThrottle,

    // --- Outputs ---
    pub indicators: IndicatorPattern,
    pub payload: OutgoingPayload,
}

impl CycleContext {
    pub fn new(raw: RawSnapshot) -> Self {
        Self {
            raw,
            ..Self::default()
        }
    }

    /// Selector voltage fell below every drive-mode band.
    pub fn selector_fault(&self) -> bool {
        self.mode == DriveMode::Error
    }

    pub fn in_panic(&self) -> bool {
        self.flags.panic
    }
}
