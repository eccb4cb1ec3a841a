//! Application core — pure domain logic, zero I/O.
//!
//! Event interpretation, threshold classification and the reporting
//! operations.  All interaction with the sensor and the console happens
//! through **port traits** defined in [`ports`], keeping this layer fully
//! testable without real peripherals.

pub mod events;
pub mod ports;
pub mod report;
pub mod supervisor;
