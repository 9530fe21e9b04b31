//! Application core — pure domain logic, zero I/O.
//!
//! The control loop and its per-cycle context live here.  All interaction
//! with hardware happens through **port traits** defined in [`ports`], so
//! the pipeline is fully testable without real peripherals.

pub mod context;
pub mod events;
pub mod ports;
pub mod service;
