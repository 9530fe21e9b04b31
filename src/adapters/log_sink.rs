//! Log-based event sink adapter.
//!
//! Implements [`EventSink`] by writing application events to the log
//! facade (the ESP-IDF logger on UART / USB-CDC in production).  Faults go
//! out at `warn`, Panic at `error`.

use log::{error, info, warn};

use crate::app::events::AppEvent;
use crate::app::ports::EventSink;

/// Adapter that logs every [`AppEvent`] to the serial console.
#[derive(Debug, Default)]
pub struct LogEventSink;

impl LogEventSink {
    pub fn new() -> Self {
        Self
    }
}

impl EventSink for LogEventSink {
    fn emit(&mut self, event: &AppEvent) {
        match event {
            AppEvent::Started { tolerance_pct } => {
                info!("START | plausibility tolerance={}pp", tolerance_pct);
            }
            AppEvent::FaultDetected(kind, flags) => {
                warn!("FAULT | {:?} detected, flags={} (0b{:08b})", kind, flags, flags.to_bits());
            }
            AppEvent::FaultCleared(kind) => {
                info!("FAULT | {:?} cleared", kind);
            }
            AppEvent::PanicEntered { deviation_pct } => {
                error!(
                    "PANIC | throttle sensors disagree by {}pp, throttle forced to 0",
                    deviation_pct
                );
            }
            AppEvent::PanicCleared => {
                warn!("PANIC | cleared, sensors agree again");
            }
            AppEvent::DriveModeChanged { from, to } => {
                info!("MODE  | {} -> {}", from, to);
            }
        }
    }
}
