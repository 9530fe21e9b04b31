//! Converter driver behind the [`AdcPort`].
//!
//! The ESP-IDF oneshot API converts synchronously, so `start_conversion`
//! performs the whole read and `conversion_ready` reports the latched
//! result.  The select/start/poll/read sequence the sampler drives stays
//! the same as on a register-level converter.

use crate::app::ports::AdcPort;
use crate::drivers::hw_init;
use crate::pins;
use crate::sensors::AdcChannel;

pub struct AdcDriver {
    selected: AdcChannel,
    result: Option<u16>,
}

impl AdcDriver {
    pub fn new() -> Self {
        Self {
            selected: AdcChannel::Throttle1,
            result: None,
        }
    }
}

impl Default for AdcDriver {
    fn default() -> Self {
        Self::new()
    }
}

impl AdcPort for AdcDriver {
    fn select_channel(&mut self, channel: AdcChannel) {
        self.selected = channel;
        self.result = None;
    }

    fn start_conversion(&mut self) {
        self.result = Some(hw_init::adc1_read(pins::adc_channel(self.selected)));
    }

    fn conversion_ready(&mut self) -> bool {
        self.result.is_some()
    }

    fn read_result(&mut self) -> u16 {
        self.result.take().unwrap_or(0)
    }
}
