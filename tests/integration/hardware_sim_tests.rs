//! End-to-end run through the real adapter stack on the host simulation:
//! HardwareAdapter → drivers → hw_init sim atomics.
//!
//! The simulated peripherals are process-global, so everything lives in a
//! single test.

#![cfg(not(target_os = "espidf"))]

use crate::mock_hw::RecordingSink;

use throttle::adapters::hardware::HardwareAdapter;
use throttle::app::service::ControlLoop;
use throttle::config::BoardConfig;
use throttle::drivers::hw_init::{
    sim_frames_sent, sim_gpio_level, sim_last_frame, sim_set_adc, sim_set_bus_off, sim_set_gpio,
};
use throttle::pins;

#[test]
fn simulated_board_runs_the_full_pipeline() {
    let config = BoardConfig::default();
    let mut cl = ControlLoop::new(config.clone()).unwrap();
    let mut hw = HardwareAdapter::from_board(config.can_id);
    let mut sink = RecordingSink::new();

    // Nominal: loop closed, brake released, pedal centred.
    sim_set_gpio(pins::SS_ESTOP_GPIO, true);
    sim_set_gpio(pins::SS_IS_GPIO, true);
    sim_set_gpio(pins::SS_BOTS_GPIO, true);
    sim_set_gpio(pins::BRAKE_GPIO, false);
    sim_set_adc(pins::THROTTLE1_ADC_CH, 0x50);
    sim_set_adc(pins::THROTTLE2_ADC_CH, 0x50);
    sim_set_adc(pins::DRIVE_MODE_ADC_CH, 300);

    let before = sim_frames_sent();
    cl.run_cycle(&mut hw, &mut sink);
    assert_eq!(sim_frames_sent(), before + 1);
    let (id, data) = sim_last_frame().expect("frame sent");
    assert_eq!(id, 0x0C0);
    assert_eq!(data, [45, 48, 2, 0, 0, 0, 0x60, 0]);
    assert!(!sim_gpio_level(pins::PLED1_GPIO));

    // Selector disconnected: indicator 1 on the real output line.
    sim_set_adc(pins::DRIVE_MODE_ADC_CH, 0);
    cl.run_cycle(&mut hw, &mut sink);
    assert!(sim_gpio_level(pins::PLED1_GPIO));
    assert!(!sim_gpio_level(pins::PLED2_GPIO));
    assert_eq!(hw.indicators().lit(), [true, false, false]);

    // E-stop opened.
    sim_set_adc(pins::DRIVE_MODE_ADC_CH, 300);
    sim_set_gpio(pins::SS_ESTOP_GPIO, false);
    cl.run_cycle(&mut hw, &mut sink);
    let (_, data) = sim_last_frame().unwrap();
    assert_eq!(data[3], 0xFF);
    assert!(!sim_gpio_level(pins::PLED1_GPIO));

    // Bus off: frames refused and counted, loop keeps running.
    sim_set_bus_off(true);
    cl.run_cycle(&mut hw, &mut sink);
    cl.run_cycle(&mut hw, &mut sink);
    sim_set_bus_off(false);
    assert_eq!(hw.can().failures(), 2);
    assert_eq!(cl.cycle_count(), 5);
}
