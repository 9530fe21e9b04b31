//! Motor controller command frame.
//!
//! Wire format (8 bytes, one logical field per slot):
//! ```text
//! ┌────┬────┬────┬──────┬────┬──────┬───────┬──────┐
//! │ T1 │ T2 │ DM │ESTOP │ IS │ BOTS │ FLAGS │ RSVD │
//! └────┴────┴────┴──────┴────┴──────┴───────┴──────┘
//!   0    1    2    3      4     5      6       7
//! ```
//! - T1/T2: commanded throttle per channel, 0–100 %, 0 on Panic.
//! - DM: drive mode 0–5.
//! - ESTOP/IS/BOTS: 0x00 clear, 0xFF tripped.
//! - FLAGS: packed flag register (bit 0 brake … bit 7 panic).
//! - RSVD: always 0x00.

use crate::control::drive_mode::DriveMode;
use crate::control::panic::CommandedThrottle;
use crate::control::throttle::ThrottleOutput;
use crate::error::DecodeError;
use crate::safety::FlagRegister;

/// Frame length in bytes.
pub const PAYLOAD_LEN: usize = 8;

pub const SLOT_THROTTLE1: usize = 0;
pub const SLOT_THROTTLE2: usize = 1;
pub const SLOT_DRIVE_MODE: usize = 2;
pub const SLOT_ESTOP: usize = 3;
pub const SLOT_INERTIA_SWITCH: usize = 4;
pub const SLOT_BRAKE_OVER_TRAVEL: usize = 5;
pub const SLOT_FLAGS: usize = 6;
pub const SLOT_RESERVED: usize = 7;

const FLAG_SET: u8 = 0xFF;
const FLAG_CLEAR: u8 = 0x00;

/// Frame handed to the bus transport.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct OutgoingPayload([u8; PAYLOAD_LEN]);

impl OutgoingPayload {
    pub fn from_bytes(bytes: [u8; PAYLOAD_LEN]) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; PAYLOAD_LEN] {
        &self.0
    }

    pub fn byte(&self, slot: usize) -> u8 {
        self.0[slot]
    }
}

/// Fields recovered from a frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecodedPayload {
    pub flags: FlagRegister,
    pub mode: DriveMode,
    pub throttle: CommandedThrottle,
}

fn binary(on: bool) -> u8 {
    if on { FLAG_SET } else { FLAG_CLEAR }
}

/// Pack one cycle's outputs into a frame.
pub fn build(flags: &FlagRegister, mode: DriveMode, throttle: &CommandedThrottle) -> OutgoingPayload {
    let mut bytes = [0u8; PAYLOAD_LEN];
    bytes[SLOT_THROTTLE1] = throttle.throttle1.percent();
    bytes[SLOT_THROTTLE2] = throttle.throttle2.percent();
    bytes[SLOT_DRIVE_MODE] = mode.as_u8();
    bytes[SLOT_ESTOP] = binary(flags.estop);
    bytes[SLOT_INERTIA_SWITCH] = binary(flags.inertia_switch);
    bytes[SLOT_BRAKE_OVER_TRAVEL] = binary(flags.brake_over_travel);
    bytes[SLOT_FLAGS] = flags.to_bits();
    bytes[SLOT_RESERVED] = 0;
    OutgoingPayload(bytes)
}

fn decode_binary(bytes: &[u8; PAYLOAD_LEN], slot: usize) -> Result<bool, DecodeError> {
    match bytes[slot] {
        FLAG_SET => Ok(true),
        FLAG_CLEAR => Ok(false),
        value => Err(DecodeError::BadFlagByte { slot, value }),
    }
}

fn decode_throttle(byte: u8) -> Result<ThrottleOutput, DecodeError> {
    if byte > 100 {
        return Err(DecodeError::ThrottleOutOfRange(byte));
    }
    Ok(ThrottleOutput::new(byte))
}

/// Parse a frame back into its fields, rejecting anything [`build`]
/// could not have produced.
pub fn decode(payload: &OutgoingPayload) -> Result<DecodedPayload, DecodeError> {
    let bytes = payload.as_bytes();

    let throttle = CommandedThrottle::new(
        decode_throttle(bytes[SLOT_THROTTLE1])?,
        decode_throttle(bytes[SLOT_THROTTLE2])?,
    );
    let mode = DriveMode::from_u8(bytes[SLOT_DRIVE_MODE])
        .ok_or(DecodeError::UnknownDriveMode(bytes[SLOT_DRIVE_MODE]))?;

    let estop = decode_binary(bytes, SLOT_ESTOP)?;
    let inertia_switch = decode_binary(bytes, SLOT_INERTIA_SWITCH)?;
    let brake_over_travel = decode_binary(bytes, SLOT_BRAKE_OVER_TRAVEL)?;

    let flags = FlagRegister::from_bits(bytes[SLOT_FLAGS]);
    if flags.estop != estop
        || flags.inertia_switch != inertia_switch
        || flags.brake_over_travel != brake_over_travel
    {
        return Err(DecodeError::FlagMismatch);
    }
    if bytes[SLOT_RESERVED] != 0 {
        return Err(DecodeError::ReservedNonZero(bytes[SLOT_RESERVED]));
    }

    Ok(DecodedPayload { flags, mode, throttle })
}
