//! Peripheral drivers and hardware initialisation.

pub mod adc;
pub mod can;
pub mod gpio;
pub mod hw_init;
pub mod hw_timer;
pub mod indicators;
