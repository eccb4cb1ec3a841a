//! Unified error types for the thermal manager.
//!
//! A single `Error` enum that every entry point returns, keeping the
//! supervisor's error handling uniform.  All variants are `Copy` so they
//! can be returned from interrupt-context submission paths without
//! allocation.

use core::fmt;

// ---------------------------------------------------------------------------
// Top-level error
// ---------------------------------------------------------------------------

/// Every fallible operation in the thermal manager funnels into this type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// Component used before initialisation (or after shutdown).
    InvalidState,
    /// Malformed event: a raw record whose tag names no event kind.
    NullInput,
    /// The bounded event queue had no free slot; the event was dropped.
    QueueFull,
    /// The temperature sensor could not be read.
    Sensor(SensorError),
    /// Configuration is invalid.
    Config(&'static str),
    /// Task or peripheral initialisation failed.
    Init(&'static str),
}

impl Error {
    /// Stable numeric code used in log lines and telemetry.
    pub const fn code(self) -> u8 {
        match self {
            Self::InvalidState => 1,
            Self::NullInput => 2,
            Self::QueueFull => 3,
            Self::Sensor(e) => e.code(),
            Self::Config(_) => 20,
            Self::Init(_) => 21,
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidState => write!(f, "invalid state"),
            Self::NullInput => write!(f, "null input"),
            Self::QueueFull => write!(f, "queue full"),
            Self::Sensor(e) => write!(f, "sensor: {e}"),
            Self::Config(msg) => write!(f, "config: {msg}"),
            Self::Init(msg) => write!(f, "init: {msg}"),
        }
    }
}

impl core::error::Error for Error {}

// ---------------------------------------------------------------------------
// Sensor errors
// ---------------------------------------------------------------------------

/// Failures reported by the temperature sensor shim.  The supervisor does
/// not interpret these beyond logging them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SensorError {
    /// Bus transaction failed (NACK, arbitration loss, ...).
    BusFault,
    /// Sensor did not answer in time.
    Timeout,
    /// Sensor answered with a value that is not a temperature.
    InvalidReading,
}

impl SensorError {
    pub const fn code(self) -> u8 {
        match self {
            Self::BusFault => 10,
            Self::Timeout => 11,
            Self::InvalidReading => 12,
        }
    }
}

impl fmt::Display for SensorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::BusFault => write!(f, "bus fault"),
            Self::Timeout => write!(f, "timeout"),
            Self::InvalidReading => write!(f, "invalid reading"),
        }
    }
}

impl From<SensorError> for Error {
    fn from(e: SensorError) -> Self {
        Self::Sensor(e)
    }
}

// ---------------------------------------------------------------------------
// Convenience Result alias
// ---------------------------------------------------------------------------

/// Crate-wide `Result` alias.
pub type Result<T> = core::result::Result<T, Error>;
