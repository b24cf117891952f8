//! Air-purifier remote-control firmware library.
//!
//! Exposes the pure-logic modules for integration testing and the adapters
//! `main` wires together. All ESP-IDF-specific code is guarded by
//! `#[cfg(target_os = "espidf")]` within each module.

#![deny(unused_must_use)]

pub mod app;
pub mod config;
pub mod control;
pub mod error;
pub mod events;
pub mod pins;
pub mod protocol;

// Hardware-facing modules; on the host they fall back to simulation stubs.
pub mod adapters;
pub mod drivers;
pub mod sensors;
