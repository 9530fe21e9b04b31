//! Fault indicator LED bank.
//!
//! Three discrete LEDs, active high, driven through `embedded-hal` output
//! pins.  All are switched off at construction.

use embedded_hal::digital::OutputPin;

use crate::app::ports::IndicatorPort;
use crate::error::ActuatorError;
use crate::indicator::INDICATOR_COUNT;

pub struct IndicatorBank<P: OutputPin> {
    leds: [P; INDICATOR_COUNT],
    lit: [bool; INDICATOR_COUNT],
}

impl<P: OutputPin> IndicatorBank<P> {
    pub fn new(mut leds: [P; INDICATOR_COUNT]) -> Self {
        for led in &mut leds {
            led.set_low().ok();
        }
        Self {
            leds,
            lit: [false; INDICATOR_COUNT],
        }
    }

    /// Last level written to each LED.
    #[inline]
    pub fn lit(&self) -> [bool; INDICATOR_COUNT] {
        self.lit
    }

    pub fn free(self) -> [P; INDICATOR_COUNT] {
        self.leds
    }
}

impl<P: OutputPin> IndicatorPort for IndicatorBank<P> {
    fn set_indicator(&mut self, index: usize, on: bool) -> Result<(), ActuatorError> {
        let led = self
            .leds
            .get_mut(index)
            .ok_or(ActuatorError::NoSuchIndicator(index))?;
        let res = if on { led.set_high() } else { led.set_low() };
        res.map_err(|_| ActuatorError::GpioWriteFailed)?;
        self.lit[index] = on;
        Ok(())
    }
}
