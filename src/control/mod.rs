//! Pure decision stages of the control cycle: drive-mode classification,
//! pedal mapping with plausibility, and the Panic override.

pub mod drive_mode;
pub mod panic;
pub mod throttle;
