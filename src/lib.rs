//! Thermal manager library.
//!
//! A single supervisor task drains a bounded event queue, reads the
//! temperature sensor and reports telemetry or over-temperature alerts.
//!
//! ```text
//!  IsrHandle ─┐
//!             ├──▶ EventQueue ──▶ SupervisorTask ──▶ ThermalSupervisor ──▶ ReportSink
//!  EventSender┘      (10 slots)                          │
//!                                                       ▼
//!                                              TemperatureSensor
//! ```

#![deny(unused_must_use)]

pub mod adapters;
pub mod app;
pub mod config;
pub mod diagnostics;
pub mod error;
pub mod events;
pub mod manager;
pub mod scheduler;
pub mod task;

pub use config::{ReceiveMode, SignalPolicy, SupervisorOptions, ThermalConfig};
pub use error::{Error, Result, SensorError};
pub use events::{QUEUE_CAPACITY, ThermalEvent, ThermalEventKind};
pub use manager::{EventSender, IsrHandle, ThermalManager};
