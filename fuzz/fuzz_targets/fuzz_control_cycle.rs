//! Fuzz target: one `ControlLoop` cycle over arbitrary inputs.
//!
//! The first 6 bytes are three little-endian readings (APPS1, APPS2,
//! selector), byte 7 holds the four switch line levels.  Whatever comes
//! in, the cycle must send exactly one decodable frame, and an
//! implausible pedal pair must command zero throttle.
//!
//! cargo fuzz run fuzz_control_cycle

#![no_main]

use libfuzzer_sys::fuzz_target;
use throttle::app::events::AppEvent;
use throttle::app::ports::{AdcPort, EventSink, IndicatorPort, SwitchPort, TransportPort};
use throttle::app::service::ControlLoop;
use throttle::config::BoardConfig;
use throttle::error::{ActuatorError, CommsError, SensorError};
use throttle::message::{self, OutgoingPayload};
use throttle::sensors::AdcChannel;
use throttle::sensors::switches::SafetySwitch;

struct Board {
    readings: [u16; 3],
    lines: u8,
    selected: usize,
    sent: Vec<OutgoingPayload>,
}

impl AdcPort for Board {
    fn select_channel(&mut self, channel: AdcChannel) {
        self.selected = channel as usize;
    }
    fn start_conversion(&mut self) {}
    fn conversion_ready(&mut self) -> bool {
        true
    }
    fn read_result(&mut self) -> u16 {
        self.readings[self.selected]
    }
}

impl SwitchPort for Board {
    fn read_level(&mut self, switch: SafetySwitch) -> Result<bool, SensorError> {
        Ok(self.lines & (1 << switch as u8) != 0)
    }
}

impl IndicatorPort for Board {
    fn set_indicator(&mut self, _index: usize, _on: bool) -> Result<(), ActuatorError> {
        Ok(())
    }
}

impl TransportPort for Board {
    fn send(&mut self, payload: &OutgoingPayload) -> Result<(), CommsError> {
        self.sent.push(*payload);
        Ok(())
    }
}

struct Discard;

impl EventSink for Discard {
    fn emit(&mut self, _event: &AppEvent) {}
}

fuzz_target!(|data: &[u8]| {
    if data.len() < 7 {
        return;
    }
    let word = |i: usize| u16::from_le_bytes([data[i], data[i + 1]]);
    let mut board = Board {
        readings: [word(0), word(2), word(4)],
        lines: data[6],
        selected: 0,
        sent: Vec::new(),
    };

    let Ok(mut cl) = ControlLoop::new(BoardConfig::default()) else {
        return;
    };
    let ctx = cl.run_cycle(&mut board, &mut Discard);

    assert_eq!(board.sent.len(), 1);
    let decoded = message::decode(&board.sent[0]).expect("cycle frame must decode");
    assert_eq!(decoded.flags, ctx.flags);
    if !ctx.mapping.plausible {
        assert_eq!(board.sent[0].byte(message::SLOT_THROTTLE1), 0);
        assert_eq!(board.sent[0].byte(message::SLOT_THROTTLE2), 0);
    }
});
