//! One-shot hardware peripheral initialization and raw peripheral access.
//!
//! Configures the ADC channels, GPIO directions and the TWAI (CAN)
//! controller using raw ESP-IDF sys calls.  Called once from `main()`
//! before the control loop starts.
//!
//! On host targets every accessor is backed by atomics so tests and the
//! simulation loop can set inputs (`sim_set_*`) and observe outputs
//! (`sim_gpio_level`, `sim_last_frame`).

#[cfg(target_os = "espidf")]
use esp_idf_svc::sys::*;

#[cfg(target_os = "espidf")]
use log::info;

#[cfg(target_os = "espidf")]
use crate::pins;

// ── Error type ────────────────────────────────────────────────

/// Errors during one-shot peripheral initialization.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HwInitError {
    AdcInitFailed(i32),
    GpioConfigFailed(i32),
    TwaiInstallFailed(i32),
    TwaiStartFailed(i32),
    TimerStartFailed(i32),
}

impl core::fmt::Display for HwInitError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::AdcInitFailed(rc)     => write!(f, "ADC1 init failed (rc={})", rc),
            Self::GpioConfigFailed(rc)  => write!(f, "GPIO config failed (rc={})", rc),
            Self::TwaiInstallFailed(rc) => write!(f, "TWAI driver install failed (rc={})", rc),
            Self::TwaiStartFailed(rc)   => write!(f, "TWAI start failed (rc={})", rc),
            Self::TimerStartFailed(rc)  => write!(f, "control timer start failed (rc={})", rc),
        }
    }
}

impl std::error::Error for HwInitError {}

#[cfg(target_os = "espidf")]
pub fn init_peripherals() -> Result<(), HwInitError> {
    // SAFETY: Called once from main() before the control loop; single-threaded.
    unsafe {
        init_adc()?;
        init_gpio_inputs()?;
        init_gpio_outputs()?;
        init_twai()?;
    }
    info!("hw_init: all peripherals configured");
    Ok(())
}

#[cfg(not(target_os = "espidf"))]
pub fn init_peripherals() -> Result<(), HwInitError> {
    log::info!("hw_init(sim): peripheral init skipped");
    Ok(())
}

// ── ADC (oneshot) ─────────────────────────────────────────────

#[cfg(target_os = "espidf")]
static mut ADC1_HANDLE: adc_oneshot_unit_handle_t = core::ptr::null_mut();

/// SAFETY: Must be called only from the single-threaded init path or the
/// main-loop ADC read path.  `init_adc()` completes before the loop starts.
#[cfg(target_os = "espidf")]
unsafe fn adc1_handle() -> adc_oneshot_unit_handle_t {
    unsafe { ADC1_HANDLE }
}

#[cfg(target_os = "espidf")]
unsafe fn init_adc() -> Result<(), HwInitError> {
    let init_cfg = adc_oneshot_unit_init_cfg_t {
        unit_id: adc_unit_t_ADC_UNIT_1,
        ulp_mode: adc_ulp_mode_t_ADC_ULP_MODE_DISABLE,
        ..Default::default()
    };
    // SAFETY: ADC1_HANDLE is only written here, once at boot.
    let ret = unsafe { adc_oneshot_new_unit(&init_cfg, &raw mut ADC1_HANDLE) };
    if ret != ESP_OK as i32 { return Err(HwInitError::AdcInitFailed(ret)); }

    let chan_cfg = adc_oneshot_chan_cfg_t {
        atten: adc_atten_t_ADC_ATTEN_DB_12,
        bitwidth: adc_bitwidth_t_ADC_BITWIDTH_12,
    };

    for ch in [pins::THROTTLE1_ADC_CH, pins::THROTTLE2_ADC_CH, pins::DRIVE_MODE_ADC_CH] {
        let ret = unsafe { adc_oneshot_config_channel(adc1_handle(), ch, &chan_cfg) };
        if ret != ESP_OK as i32 { return Err(HwInitError::AdcInitFailed(ret)); }
    }

    info!(
        "hw_init: ADC1 configured (CH{}=APPS1, CH{}=APPS2, CH{}=mode)",
        pins::THROTTLE1_ADC_CH, pins::THROTTLE2_ADC_CH, pins::DRIVE_MODE_ADC_CH
    );
    Ok(())
}

/// Blocking single conversion, scaled down to 10 bits.  A failed read
/// yields 0, which the pipeline treats as a disconnected input.
#[cfg(target_os = "espidf")]
pub fn adc1_read(channel: u32) -> u16 {
    let mut raw: i32 = 0;
    // SAFETY: adc1_handle() contract — single-threaded main-loop access only.
    let ret = unsafe { adc_oneshot_read(adc1_handle(), channel, &mut raw) };
    if ret != ESP_OK as i32 {
        return 0;
    }
    (raw.clamp(0, 4095) as u16) >> 2
}

#[cfg(not(target_os = "espidf"))]
pub fn adc1_read(channel: u32) -> u16 {
    sim::ADC.get(channel as usize)
        .map_or(0, |v| v.load(core::sync::atomic::Ordering::Relaxed))
}

// ── GPIO Inputs ───────────────────────────────────────────────

#[cfg(target_os = "espidf")]
unsafe fn init_gpio_inputs() -> Result<(), HwInitError> {
    let input_pins = [
        pins::SS_ESTOP_GPIO,
        pins::SS_IS_GPIO,
        pins::SS_BOTS_GPIO,
        pins::BRAKE_GPIO,
    ];

    for &pin in &input_pins {
        // Pull-ups are on the harness; the internal ones stay off so a
        // broken wire reads low (tripped).
        let cfg = gpio_config_t {
            pin_bit_mask: 1u64 << pin,
            mode: gpio_mode_t_GPIO_MODE_INPUT,
            pull_up_en: gpio_pullup_t_GPIO_PULLUP_DISABLE,
            pull_down_en: gpio_pulldown_t_GPIO_PULLDOWN_ENABLE,
            intr_type: gpio_int_type_t_GPIO_INTR_DISABLE,
        };
        let ret = unsafe { gpio_config(&cfg) };
        if ret != ESP_OK as i32 { return Err(HwInitError::GpioConfigFailed(ret)); }
    }

    info!("hw_init: GPIO inputs configured (estop, IS, BOTS, brake)");
    Ok(())
}

#[cfg(target_os = "espidf")]
pub fn gpio_read(pin: i32) -> bool {
    // SAFETY: gpio_get_level is a read-only register access on an
    // already-configured input pin; safe to call from main context.
    (unsafe { gpio_get_level(pin) }) != 0
}

#[cfg(not(target_os = "espidf"))]
pub fn gpio_read(pin: i32) -> bool {
    sim::gpio_level(pin)
}

// ── GPIO Outputs ──────────────────────────────────────────────

#[cfg(target_os = "espidf")]
unsafe fn init_gpio_outputs() -> Result<(), HwInitError> {
    let output_pins = [pins::PLED1_GPIO, pins::PLED2_GPIO, pins::PLED3_GPIO];

    for &pin in &output_pins {
        let cfg = gpio_config_t {
            pin_bit_mask: 1u64 << pin,
            mode: gpio_mode_t_GPIO_MODE_OUTPUT,
            pull_up_en: gpio_pullup_t_GPIO_PULLUP_DISABLE,
            pull_down_en: gpio_pulldown_t_GPIO_PULLDOWN_DISABLE,
            intr_type: gpio_int_type_t_GPIO_INTR_DISABLE,
        };
        let ret = unsafe { gpio_config(&cfg) };
        if ret != ESP_OK as i32 { return Err(HwInitError::GpioConfigFailed(ret)); }
        unsafe { gpio_set_level(pin, 0) };
    }

    info!("hw_init: indicator outputs configured");
    Ok(())
}

#[cfg(target_os = "espidf")]
pub fn gpio_write(pin: i32, high: bool) {
    // SAFETY: gpio_set_level writes to an already-configured output pin.
    // Main-loop only.
    unsafe { gpio_set_level(pin, u32::from(high)); }
}

#[cfg(not(target_os = "espidf"))]
pub fn gpio_write(pin: i32, high: bool) {
    sim::set_gpio(pin, high);
}

// ── TWAI (CAN) ────────────────────────────────────────────────

#[cfg(target_os = "espidf")]
unsafe fn init_twai() -> Result<(), HwInitError> {
    let g_config = twai_general_config_t {
        mode: twai_mode_t_TWAI_MODE_NORMAL,
        tx_io: pins::CAN_TX_GPIO,
        rx_io: pins::CAN_RX_GPIO,
        clkout_io: -1,
        bus_off_io: -1,
        tx_queue_len: 4,
        rx_queue_len: 1,
        ..Default::default()
    };
    // 500 kbit/s from the 80 MHz APB clock.
    let t_config = twai_timing_config_t {
        brp: 8,
        tseg_1: 15,
        tseg_2: 4,
        sjw: 3,
        triple_sampling: false,
        ..Default::default()
    };
    // Nothing is ever received; the filter stays at accept-all.
    let f_config = twai_filter_config_t {
        acceptance_code: 0,
        acceptance_mask: 0xFFFF_FFFF,
        single_filter: true,
    };

    let ret = unsafe { twai_driver_install(&g_config, &t_config, &f_config) };
    if ret != ESP_OK as i32 { return Err(HwInitError::TwaiInstallFailed(ret)); }
    let ret = unsafe { twai_start() };
    if ret != ESP_OK as i32 { return Err(HwInitError::TwaiStartFailed(ret)); }

    info!("hw_init: TWAI started at {} bit/s", pins::CAN_BITRATE);
    Ok(())
}

/// Queue one standard data frame.  Never blocks; a full queue or a
/// bus-off controller is reported as the raw ESP-IDF error code.
#[cfg(target_os = "espidf")]
pub fn twai_send(id: u32, data: &[u8; 8]) -> Result<(), i32> {
    let mut msg = twai_message_t::default();
    msg.identifier = id;
    msg.data_length_code = 8;
    msg.data = *data;
    // SAFETY: the driver was installed and started in init_twai(); msg
    // lives for the duration of the call, which copies it into the queue.
    let ret = unsafe { twai_transmit(&msg, 0) };
    if ret == ESP_OK as i32 { Ok(()) } else { Err(ret) }
}

#[cfg(not(target_os = "espidf"))]
pub fn twai_send(id: u32, data: &[u8; 8]) -> Result<(), i32> {
    sim::record_frame(id, data)
}

// ── Host simulation ──────────────────────────────────────────

#[cfg(not(target_os = "espidf"))]
mod sim {
    use core::sync::atomic::{AtomicBool, AtomicU16, AtomicU32, AtomicU64, Ordering};

    pub(super) static ADC: [AtomicU16; 10] = [const { AtomicU16::new(0) }; 10];
    static GPIO: AtomicU64 = AtomicU64::new(0);
    static FRAME_ID: AtomicU32 = AtomicU32::new(0);
    static FRAME_DATA: AtomicU64 = AtomicU64::new(0);
    static FRAMES_SENT: AtomicU32 = AtomicU32::new(0);
    static BUS_OFF: AtomicBool = AtomicBool::new(false);

    /// Stand-in for ESP_ERR_INVALID_STATE.
    const ERR_BUS_OFF: i32 = 0x103;

    fn bit(pin: i32) -> u64 {
        1u64 << (pin as u32 & 63)
    }

    pub(super) fn gpio_level(pin: i32) -> bool {
        GPIO.load(Ordering::Relaxed) & bit(pin) != 0
    }

    pub(super) fn set_gpio(pin: i32, high: bool) {
        if high {
            GPIO.fetch_or(bit(pin), Ordering::Relaxed);
        } else {
            GPIO.fetch_and(!bit(pin), Ordering::Relaxed);
        }
    }

    pub(super) fn record_frame(id: u32, data: &[u8; 8]) -> Result<(), i32> {
        if BUS_OFF.load(Ordering::Relaxed) {
            return Err(ERR_BUS_OFF);
        }
        FRAME_ID.store(id, Ordering::Relaxed);
        FRAME_DATA.store(u64::from_le_bytes(*data), Ordering::Relaxed);
        FRAMES_SENT.fetch_add(1, Ordering::Release);
        Ok(())
    }

    pub(super) fn last_frame() -> Option<(u32, [u8; 8])> {
        if FRAMES_SENT.load(Ordering::Acquire) == 0 {
            return None;
        }
        Some((
            FRAME_ID.load(Ordering::Relaxed),
            FRAME_DATA.load(Ordering::Relaxed).to_le_bytes(),
        ))
    }

    pub(super) fn frames_sent() -> u32 {
        FRAMES_SENT.load(Ordering::Acquire)
    }

    pub(super) fn set_bus_off(off: bool) {
        BUS_OFF.store(off, Ordering::Relaxed);
    }
}

/// Set the 10-bit value returned by the next conversion on `channel`.
#[cfg(not(target_os = "espidf"))]
pub fn sim_set_adc(channel: u32, raw: u16) {
    if let Some(slot) = sim::ADC.get(channel as usize) {
        slot.store(raw, core::sync::atomic::Ordering::Relaxed);
    }
}

/// Drive a simulated input line.
#[cfg(not(target_os = "espidf"))]
pub fn sim_set_gpio(pin: i32, high: bool) {
    sim::set_gpio(pin, high);
}

/// Current level of a simulated line (inputs and outputs alike).
#[cfg(not(target_os = "espidf"))]
pub fn sim_gpio_level(pin: i32) -> bool {
    sim::gpio_level(pin)
}

/// Identifier and data of the most recent frame, if any was sent.
#[cfg(not(target_os = "espidf"))]
pub fn sim_last_frame() -> Option<(u32, [u8; 8])> {
    sim::last_frame()
}

#[cfg(not(target_os = "espidf"))]
pub fn sim_frames_sent() -> u32 {
    sim::frames_sent()
}

/// Make every subsequent transmit fail as if the controller were bus-off.
#[cfg(not(target_os = "espidf"))]
pub fn sim_set_bus_off(off: bool) {
    sim::set_bus_off(off);
}
