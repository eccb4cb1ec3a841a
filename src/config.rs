//! Thermal manager configuration.
//!
//! [`ThermalConfig`] is handed to the supervisor once at initialisation and
//! never mutated afterwards.  [`SupervisorOptions`] selects how the
//! supervisor task waits for work and how it signals classifications.

use core::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Lowest temperature the sensor can report (Celsius).
pub const SENSOR_MIN_C: f32 = -55.0;
/// Highest temperature the sensor can report (Celsius).
pub const SENSOR_MAX_C: f32 = 125.0;

/// Smallest accepted supervisor stack (KiB).
pub const MIN_STACK_KB: usize = 4;
/// Largest accepted supervisor stack (KiB).
pub const MAX_STACK_KB: usize = 16 * 1024;

/// Supervisor-scoped configuration, read-only after initialisation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ThermalConfig {
    /// 7-bit bus address of the temperature sensor.
    pub device_address: u8,
    /// Readings strictly above this value are over-temperature (Celsius).
    pub over_temp_threshold_c: f32,
}

impl Default for ThermalConfig {
    fn default() -> Self {
        Self {
            device_address: 0x4F,
            over_temp_threshold_c: 80.0,
        }
    }
}

impl ThermalConfig {
    /// Reject values the supervisor cannot act on.
    ///
    /// Invalid ranges are rejected, not clamped: a NaN or out-of-range
    /// threshold would silently disable over-temperature detection.
    pub fn validate(&self) -> Result<()> {
        if self.device_address > 0x7F {
            return Err(Error::Config("device_address must be a 7-bit address"));
        }
        if !self.over_temp_threshold_c.is_finite() {
            return Err(Error::Config("over_temp_threshold_c must be finite"));
        }
        if !(SENSOR_MIN_C..=SENSOR_MAX_C).contains(&self.over_temp_threshold_c) {
            return Err(Error::Config("over_temp_threshold_c outside sensor range"));
        }
        Ok(())
    }
}

/// How the supervisor task waits for the next event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReceiveMode {
    /// Park the task until an event (or shutdown) arrives.
    Blocking,
    /// Non-blocking poll; sleep `idle` after an empty poll.
    /// `Duration::ZERO` yields instead of sleeping.
    Poll { idle: Duration },
}

/// Whether repeated identical classifications are re-signalled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SignalPolicy {
    /// Every successful interrupt-triggered read signals its classification.
    EveryReading,
    /// Only signal when the classification differs from the last one signalled.
    OnChange,
}

/// Runtime options for the supervisor task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SupervisorOptions {
    pub receive: ReceiveMode,
    pub signal_policy: SignalPolicy,
    /// Stack size of the supervisor thread in KiB.
    pub stack_kb: usize,
}

impl Default for SupervisorOptions {
    fn default() -> Self {
        Self {
            receive: ReceiveMode::Blocking,
            signal_policy: SignalPolicy::EveryReading,
            stack_kb: 32,
        }
    }
}

impl SupervisorOptions {
    /// Reject a stack size outside `MIN_STACK_KB..=MAX_STACK_KB`.
    pub fn validate(&self) -> Result<()> {
        if !(MIN_STACK_KB..=MAX_STACK_KB).contains(&self.stack_kb) {
            return Err(Error::Config("stack_kb outside supported range"));
        }
        Ok(())
    }
}
