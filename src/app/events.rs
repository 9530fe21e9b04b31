//! Outbound application events.
//!
//! The [`ControlLoop`](super::service::ControlLoop) emits these through
//! the [`EventSink`](super::ports::EventSink) port when the cycle outcome
//! changes from one cycle to the next.  They are observations only and
//! never feed back into the pipeline.

use crate::control::drive_mode::DriveMode;
use crate::safety::FlagRegister;

/// Which fault class changed state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FaultKind {
    /// Selector voltage below every drive-mode bound.
    SelectorRange,
    /// Emergency stop, inertia switch or brake over-travel tripped.
    ShutdownSwitch,
    /// Brake pressed with pedal above the conflict threshold.
    ThrottleBrakeConflict,
}

/// Structured events emitted by the control loop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppEvent {
    /// The control loop has started (carries the plausibility tolerance in use).
    Started { tolerance_pct: u8 },

    /// A fault class became active this cycle.
    FaultDetected(FaultKind, FlagRegister),

    /// A fault class that was active last cycle is gone.
    FaultCleared(FaultKind),

    /// Panic asserted: throttle forced to zero.
    PanicEntered { deviation_pct: u8 },

    /// Panic no longer asserted.
    PanicCleared,

    /// The selector moved to a different band.
    DriveModeChanged { from: DriveMode, to: DriveMode },
}
