//! Hardware adapter — bridges real peripherals to domain port traits.
//!
//! Owns the converter, switch bank, indicator bank and CAN transmitter
//! and exposes them through the four hardware ports.  This is the only
//! module in the system that touches actual hardware.  On non-espidf
//! targets the underlying drivers use cfg-gated simulation stubs.

use crate::app::ports::{AdcPort, IndicatorPort, SwitchPort, TransportPort};
use crate::drivers::adc::AdcDriver;
use crate::drivers::can::CanTransmitter;
use crate::drivers::gpio::GpioPin;
use crate::drivers::indicators::IndicatorBank;
use crate::error::{ActuatorError, CommsError, SensorError};
use crate::message::OutgoingPayload;
use crate::pins;
use crate::sensors::AdcChannel;
use crate::sensors::switches::{SafetySwitch, SwitchBank};

/// Concrete adapter that combines all hardware behind port traits.
pub struct HardwareAdapter {
    adc: AdcDriver,
    switches: SwitchBank<GpioPin>,
    indicators: IndicatorBank<GpioPin>,
    can: CanTransmitter,
}

impl HardwareAdapter {
    pub fn new(
        adc: AdcDriver,
        switches: SwitchBank<GpioPin>,
        indicators: IndicatorBank<GpioPin>,
        can: CanTransmitter,
    ) -> Self {
        Self {
            adc,
            switches,
            indicators,
            can,
        }
    }

    /// Adapter wired to the board pins in [`crate::pins`].
    pub fn from_board(can_id: u32) -> Self {
        Self::new(
            AdcDriver::new(),
            SwitchBank::new(
                GpioPin::new(pins::SS_ESTOP_GPIO),
                GpioPin::new(pins::SS_IS_GPIO),
                GpioPin::new(pins::SS_BOTS_GPIO),
                GpioPin::new(pins::BRAKE_GPIO),
            ),
            IndicatorBank::new([
                GpioPin::new(pins::PLED1_GPIO),
                GpioPin::new(pins::PLED2_GPIO),
                GpioPin::new(pins::PLED3_GPIO),
            ]),
            CanTransmitter::new(can_id),
        )
    }

    pub fn can(&self) -> &CanTransmitter {
        &self.can
    }

    pub fn indicators(&self) -> &IndicatorBank<GpioPin> {
        &self.indicators
    }
}

// ── AdcPort ───────────────────────────────────────────────────

impl AdcPort for HardwareAdapter {
    fn select_channel(&mut self, channel: AdcChannel) {
        self.adc.select_channel(channel);
    }

    fn start_conversion(&mut self) {
        self.adc.start_conversion();
    }

    fn conversion_ready(&mut self) -> bool {
        self.adc.conversion_ready()
    }

    fn read_result(&mut self) -> u16 {
        self.adc.read_result()
    }
}

// ── SwitchPort ────────────────────────────────────────────────

impl SwitchPort for HardwareAdapter {
    fn read_level(&mut self, switch: SafetySwitch) -> Result<bool, SensorError> {
        self.switches.read_level(switch)
    }
}

// ── IndicatorPort ─────────────────────────────────────────────

impl IndicatorPort for HardwareAdapter {
    fn set_indicator(&mut self, index: usize, on: bool) -> Result<(), ActuatorError> {
        self.indicators.set_indicator(index, on)
    }
}

// ── TransportPort ─────────────────────────────────────────────

impl TransportPort for HardwareAdapter {
    fn send(&mut self, payload: &OutgoingPayload) -> Result<(), CommsError> {
        self.can.send(payload)
    }
}
