//! Outbound supervisor reports.
//!
//! The [`ThermalSupervisor`](super::supervisor::ThermalSupervisor) emits
//! these through the [`ReportSink`](super::ports::ReportSink) port.

use serde::Serialize;

/// Result of comparing a reading against the over-temperature threshold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ThermalState {
    /// Reading at or below the threshold.
    Safe,
    /// Reading strictly above the threshold.
    OverTemperature,
}

/// Structured reports emitted by the supervisor.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ThermalReport {
    /// Temperature telemetry from a measurement command.
    Telemetry { celsius: f32 },
    /// Over-temperature detected.
    OverTemperature,
    /// Operating conditions are safe.
    SafeConditions,
}

impl From<ThermalState> for ThermalReport {
    fn from(state: ThermalState) -> Self {
        match state {
            ThermalState::Safe => Self::SafeConditions,
            ThermalState::OverTemperature => Self::OverTemperature,
        }
    }
}
