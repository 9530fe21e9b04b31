//! Mock board for integration tests.
//!
//! Implements every hardware port, records every indicator write and sent
//! frame, and lets tests set analog readings and switch line levels
//! without touching real registers.

use throttle::app::events::AppEvent;
use throttle::app::ports::{AdcPort, EventSink, IndicatorPort, SwitchPort, TransportPort};
use throttle::error::{ActuatorError, CommsError, SensorError};
use throttle::message::OutgoingPayload;
use throttle::sensors::AdcChannel;
use throttle::sensors::switches::SafetySwitch;

// ── Call record ───────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoardCall {
    Select(AdcChannel),
    Start,
    Read(u16),
    Indicator { index: usize, on: bool },
    Send(OutgoingPayload),
}

// ── MockBoard ─────────────────────────────────────────────────

/// Board in its nominal state: pedal centred, selector in Acceleration,
/// shutdown loop closed, brake released.
pub struct MockBoard {
    pub throttle1: u16,
    pub throttle2: u16,
    pub selector: u16,
    /// Ready-polls each conversion needs before completing.
    pub conversion_polls: u32,

    pub estop_line: bool,
    pub inertia_line: bool,
    pub bots_line: bool,
    pub brake_line: bool,
    /// Switch whose read fails.
    pub broken_switch: Option<SafetySwitch>,

    pub bus_off: bool,
    pub calls: Vec<BoardCall>,

    selected: Option<AdcChannel>,
    polls_left: u32,
}

#[allow(dead_code)]
impl MockBoard {
    pub fn new() -> Self {
        Self {
            throttle1: 0x50,
            throttle2: 0x50,
            selector: 300,
            conversion_polls: 0,
            estop_line: true,
            inertia_line: true,
            bots_line: true,
            brake_line: false,
            broken_switch: None,
            bus_off: false,
            calls: Vec::new(),
            selected: None,
            polls_left: 0,
        }
    }

    pub fn sent(&self) -> Vec<OutgoingPayload> {
        self.calls
            .iter()
            .filter_map(|c| match c {
                BoardCall::Send(p) => Some(*p),
                _ => None,
            })
            .collect()
    }

    pub fn last_sent(&self) -> Option<OutgoingPayload> {
        self.sent().last().copied()
    }

    /// Level of each indicator after the most recent write to it.
    pub fn indicators(&self) -> [bool; 3] {
        let mut lit = [false; 3];
        for c in &self.calls {
            if let BoardCall::Indicator { index, on } = *c {
                lit[index] = on;
            }
        }
        lit
    }

    pub fn selected_channels(&self) -> Vec<AdcChannel> {
        self.calls
            .iter()
            .filter_map(|c| match c {
                BoardCall::Select(ch) => Some(*ch),
                _ => None,
            })
            .collect()
    }

    pub fn clear_calls(&mut self) {
        self.calls.clear();
    }
}

impl Default for MockBoard {
    fn default() -> Self {
        Self::new()
    }
}

impl AdcPort for MockBoard {
    fn select_channel(&mut self, channel: AdcChannel) {
        self.selected = Some(channel);
        self.calls.push(BoardCall::Select(channel));
    }

    fn start_conversion(&mut self) {
        self.polls_left = self.conversion_polls;
        self.calls.push(BoardCall::Start);
    }

    fn conversion_ready(&mut self) -> bool {
        if self.polls_left == 0 {
            true
        } else {
            self.polls_left -= 1;
            false
        }
    }

    fn read_result(&mut self) -> u16 {
        let value = match self.selected {
            Some(AdcChannel::Throttle1) => self.throttle1,
            Some(AdcChannel::Throttle2) => self.throttle2,
            Some(AdcChannel::DriveMode) => self.selector,
            None => 0,
        };
        self.calls.push(BoardCall::Read(value));
        value
    }
}

impl SwitchPort for MockBoard {
    fn read_level(&mut self, switch: SafetySwitch) -> Result<bool, SensorError> {
        if self.broken_switch == Some(switch) {
            return Err(SensorError::GpioReadFailed);
        }
        Ok(match switch {
            SafetySwitch::EmergencyStop => self.estop_line,
            SafetySwitch::InertiaSwitch => self.inertia_line,
            SafetySwitch::BrakeOverTravel => self.bots_line,
            SafetySwitch::BrakePressed => self.brake_line,
        })
    }
}

impl IndicatorPort for MockBoard {
    fn set_indicator(&mut self, index: usize, on: bool) -> Result<(), ActuatorError> {
        if index >= 3 {
            return Err(ActuatorError::NoSuchIndicator(index));
        }
        self.calls.push(BoardCall::Indicator { index, on });
        Ok(())
    }
}

impl TransportPort for MockBoard {
    fn send(&mut self, payload: &OutgoingPayload) -> Result<(), CommsError> {
        self.calls.push(BoardCall::Send(*payload));
        if self.bus_off {
            Err(CommsError::BusUnavailable)
        } else {
            Ok(())
        }
    }
}

// ── Recording event sink ──────────────────────────────────────

#[derive(Default)]
pub struct RecordingSink {
    pub events: Vec<AppEvent>,
}

#[allow(dead_code)]
impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn take(&mut self) -> Vec<AppEvent> {
        core::mem::take(&mut self.events)
    }
}

impl EventSink for RecordingSink {
    fn emit(&mut self, event: &AppEvent) {
        self.events.push(event.clone());
    }
}
