//! Fuzz target: `message::decode`
//!
//! Feeds arbitrary 8-byte frames to the decoder.  It must never panic, and
//! anything it accepts must rebuild to the identical frame.
//!
//! cargo fuzz run fuzz_payload_decode

#![no_main]

use libfuzzer_sys::fuzz_target;
use throttle::message::{self, OutgoingPayload, PAYLOAD_LEN};

fuzz_target!(|data: &[u8]| {
    let Ok(bytes) = <[u8; PAYLOAD_LEN]>::try_from(data) else {
        return;
    };
    let frame = OutgoingPayload::from_bytes(bytes);
    if let Ok(decoded) = message::decode(&frame) {
        let rebuilt = message::build(&decoded.flags, decoded.mode, &decoded.throttle);
        assert_eq!(rebuilt, frame, "accepted frame does not rebuild identically");
    }
});
