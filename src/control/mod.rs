//! Control decisions derived from device state.

pub mod thresholds;
