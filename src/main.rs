//! Throttle board firmware — main entry point.
//!
//! Hexagonal architecture with a timer-driven control loop.
//!
//! ```text
//! ┌────────────────────────────────────────────────────────────┐
//! │                   Adapters (outer ring)                    │
//! │                                                            │
//! │  HardwareAdapter                        LogEventSink       │
//! │  (ADC · switches · LEDs · CAN)          (EventSink)        │
//! │                                                            │
//! │  ──────────────── Port Trait Boundary ───────────────      │
//! │                                                            │
//! │  ┌──────────────────────────────────────────────────────┐  │
//! │  │            ControlLoop (pure logic)                  │  │
//! │  │  sample · classify · flags · map · panic · frame     │  │
//! │  └──────────────────────────────────────────────────────┘  │
//! │                                                            │
//! │  esp_timer ──signal()──▶ CONTROL_TICK ──take()──▶ loop     │
//! └────────────────────────────────────────────────────────────┘
//! ```
#![deny(unused_must_use)]

use anyhow::Result;
use log::info;

use throttle::adapters::hardware::HardwareAdapter;
use throttle::adapters::log_sink::LogEventSink;
use throttle::app::service::ControlLoop;
use throttle::config::BoardConfig;
use throttle::drivers;
use throttle::events::CONTROL_TICK;

fn main() -> Result<()> {
    // ── 1. ESP-IDF bootstrap ──────────────────────────────────
    #[cfg(target_os = "espidf")]
    {
        esp_idf_svc::sys::link_patches();
        esp_idf_logger::init()?;
    }

    info!("╔══════════════════════════════════════╗");
    info!("║  Throttle board v{}               ║", env!("CARGO_PKG_VERSION"));
    info!("╚══════════════════════════════════════╝");

    // ── 2. Configuration ──────────────────────────────────────
    let config = BoardConfig::default();
    let mut control = ControlLoop::new(config.clone())?;

    // ── 3. Hardware ───────────────────────────────────────────
    drivers::hw_init::init_peripherals()?;
    let mut hw = HardwareAdapter::from_board(config.can_id);
    let mut log_sink = LogEventSink::new();

    #[cfg(not(target_os = "espidf"))]
    sim_nominal_inputs();

    // ── 4. Start ──────────────────────────────────────────────
    control.start(&mut log_sink);
    drivers::hw_timer::start_control_timer(config.control_loop_interval_ms)?;
    info!("System ready. Entering control loop.");

    // ── 5. Control loop ───────────────────────────────────────
    loop {
        // Simulate the timer on non-espidf targets.
        #[cfg(not(target_os = "espidf"))]
        {
            std::thread::sleep(std::time::Duration::from_millis(u64::from(
                config.control_loop_interval_ms,
            )));
            CONTROL_TICK.signal();
        }

        if control.poll(&CONTROL_TICK, &mut hw, &mut log_sink).is_none() {
            // Nothing pending: yield to FreeRTOS until the next tick.
            #[cfg(target_os = "espidf")]
            esp_idf_svc::hal::delay::FreeRtos::delay_ms(1);
            continue;
        }

        // Periodic health line, roughly every 10 s at the default period.
        if control.cycle_count() % 625 == 0 {
            info!(
                "HEALTH | cycles={} panic_cycles={} coalesced={} can_failures={}",
                control.cycle_count(),
                control.panic_cycles(),
                control.coalesced_ticks(),
                hw.can().failures()
            );
        }
    }
}

/// Close the shutdown loop and centre the pedal on the host simulation.
#[cfg(not(target_os = "espidf"))]
fn sim_nominal_inputs() {
    use throttle::drivers::hw_init::{sim_set_adc, sim_set_gpio};
    use throttle::pins;

    sim_set_gpio(pins::SS_ESTOP_GPIO, true);
    sim_set_gpio(pins::SS_IS_GPIO, true);
    sim_set_gpio(pins::SS_BOTS_GPIO, true);
    sim_set_gpio(pins::BRAKE_GPIO, false);
    sim_set_adc(pins::THROTTLE1_ADC_CH, 0x50);
    sim_set_adc(pins::THROTTLE2_ADC_CH, 0x50);
    sim_set_adc(pins::DRIVE_MODE_ADC_CH, 300);
}
