//! CAN (TWAI) transmitter for the command frame.

use log::trace;

use crate::app::ports::TransportPort;
use crate::drivers::hw_init;
use crate::error::CommsError;
use crate::message::OutgoingPayload;

/// Sends every payload as one 8-byte standard frame with a fixed id.
pub struct CanTransmitter {
    id: u32,
    failures: u32,
}

impl CanTransmitter {
    pub fn new(id: u32) -> Self {
        Self { id, failures: 0 }
    }

    pub fn id(&self) -> u32 {
        self.id
    }

    /// Frames the controller refused since boot.
    pub fn failures(&self) -> u32 {
        self.failures
    }
}

impl TransportPort for CanTransmitter {
    fn send(&mut self, payload: &OutgoingPayload) -> Result<(), CommsError> {
        hw_init::twai_send(self.id, payload.as_bytes()).map_err(|rc| {
            self.failures = self.failures.wrapping_add(1);
            trace!("can: transmit refused (rc={})", rc);
            CommsError::TransmitFailed(rc)
        })
    }
}
