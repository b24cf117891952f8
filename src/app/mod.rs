//! Application core: pure domain logic, zero I/O.
//!
//! This module holds the business rules for the purifier remote: the
//! device state store, the command/notification flow and the control loop
//! iteration. All interaction with hardware happens through **port traits**
//! defined in [`ports`], keeping this layer fully testable without real
//! peripherals.

pub mod events;
pub mod ports;
pub mod service;
pub mod startup;
pub mod state;
