//! Periodic control timer using ESP-IDF's esp_timer API.
//!
//! The callback only marks [`CONTROL_TICK`] ready; the main loop runs the
//! cycle.  On simulation targets no timer exists and the main loop signals
//! the trigger itself after sleeping.
//!
//! Timer callbacks execute in the ESP timer task context (not ISR), and
//! `CycleTrigger::signal` is a single atomic swap.

#[cfg(target_os = "espidf")]
use esp_idf_svc::sys::*;

#[cfg(target_os = "espidf")]
use log::info;

use crate::drivers::hw_init::HwInitError;
#[cfg(target_os = "espidf")]
use crate::events::CONTROL_TICK;

#[cfg(target_os = "espidf")]
static mut CONTROL_TIMER: esp_timer_handle_t = core::ptr::null_mut();

/// SAFETY: CONTROL_TIMER is written once in `start_control_timer()` before
/// any callback fires.  Only called from the single main task.
#[cfg(target_os = "espidf")]
unsafe fn control_timer() -> esp_timer_handle_t { unsafe { CONTROL_TIMER } }

#[cfg(target_os = "espidf")]
unsafe extern "C" fn control_tick_cb(_arg: *mut core::ffi::c_void) {
    CONTROL_TICK.signal();
}

/// Start the periodic control timer with the given period.
#[cfg(target_os = "espidf")]
pub fn start_control_timer(period_ms: u32) -> Result<(), HwInitError> {
    // SAFETY: CONTROL_TIMER is written here once at boot from the single
    // main-task context before any timer callback fires.
    unsafe {
        let args = esp_timer_create_args_t {
            callback: Some(control_tick_cb),
            arg: core::ptr::null_mut(),
            dispatch_method: esp_timer_dispatch_t_ESP_TIMER_TASK,
            name: c"control".as_ptr(),
            // Missed periods collapse into one callback.
            skip_unhandled_events: true,
        };
        let ret = esp_timer_create(&args, &raw mut CONTROL_TIMER);
        if ret != ESP_OK as i32 {
            return Err(HwInitError::TimerStartFailed(ret));
        }
        let ret = esp_timer_start_periodic(control_timer(), u64::from(period_ms) * 1_000);
        if ret != ESP_OK as i32 {
            return Err(HwInitError::TimerStartFailed(ret));
        }
    }
    info!("hw_timer: control@{}ms started", period_ms);
    Ok(())
}

#[cfg(not(target_os = "espidf"))]
pub fn start_control_timer(period_ms: u32) -> Result<(), HwInitError> {
    log::info!("hw_timer(sim): {}ms timer not started (ticks driven by sleep loop)", period_ms);
    Ok(())
}

/// Stop the control timer.
#[cfg(target_os = "espidf")]
pub fn stop_control_timer() {
    // SAFETY: control_timer() contract; the null check covers a failed start.
    unsafe {
        let ct = control_timer();
        if !ct.is_null() { esp_timer_stop(ct); }
    }
}

#[cfg(not(target_os = "espidf"))]
pub fn stop_control_timer() {}
