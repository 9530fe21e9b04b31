//! Port traits — the hexagonal boundary between the control cycle and the
//! board.
//!
//! ```text
//!   Adapter ──▶ Port trait ──▶ ControlLoop (domain)
//! ```
//!
//! Driven adapters (converter, switch lines, indicator LEDs, CAN
//! transmitter, event sinks) implement these traits.  The
//! [`ControlLoop`](super::service::ControlLoop) consumes them via generics,
//! so the pipeline never touches hardware directly.

use crate::error::{ActuatorError, CommsError, SensorError};
use crate::message::OutgoingPayload;
use crate::sensors::AdcChannel;
use crate::sensors::switches::SafetySwitch;

// ───────────────────────────────────────────────────────────────
// Analog converter (driven adapter: hardware → domain)
// ───────────────────────────────────────────────────────────────

/// Single-conversion ADC, driven register-style.
///
/// The sampler calls these in order: select, start, poll ready until
/// `true`, read.  A conversion is guaranteed to finish in a fixed number
/// of converter clocks.
pub trait AdcPort {
    /// Route `channel` to the converter input.
    fn select_channel(&mut self, channel: AdcChannel);

    /// Begin one conversion on the selected channel.
    fn start_conversion(&mut self);

    /// `true` once the started conversion has completed.
    fn conversion_ready(&mut self) -> bool;

    /// Result of the last completed conversion.
    fn read_result(&mut self) -> u16;
}

// ───────────────────────────────────────────────────────────────
// Discrete inputs (driven adapter: hardware → domain)
// ───────────────────────────────────────────────────────────────

/// Boolean line level of each safety switch.
pub trait SwitchPort {
    /// `Ok(true)` when the line is electrically high.
    fn read_level(&mut self, switch: SafetySwitch) -> Result<bool, SensorError>;
}

// ───────────────────────────────────────────────────────────────
// Indicator outputs (driven adapter: domain → hardware)
// ───────────────────────────────────────────────────────────────

/// Write-only fault indicator LEDs, indexed from 0.
pub trait IndicatorPort {
    fn set_indicator(&mut self, index: usize, on: bool) -> Result<(), ActuatorError>;
}

// ───────────────────────────────────────────────────────────────
// Bus transport (driven adapter: domain → motor controller)
// ───────────────────────────────────────────────────────────────

/// Send-only sink for the command frame.
///
/// Delivery failures are the transport's business; the control loop does
/// not retry and does not act on the result.
pub trait TransportPort {
    fn send(&mut self, payload: &OutgoingPayload) -> Result<(), CommsError>;
}

// ───────────────────────────────────────────────────────────────
// Event sink port (driven adapter: domain → logging / telemetry)
// ───────────────────────────────────────────────────────────────

/// The domain emits structured [`AppEvent`](super::events::AppEvent)s
/// through this port.  Adapters decide where they go.
pub trait EventSink {
    fn emit(&mut self, event: &super::events::AppEvent);
}
