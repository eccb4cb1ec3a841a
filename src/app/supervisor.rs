//! Thermal supervisor — the event-driven decision core.
//!
//! [`ThermalSupervisor`] owns the configuration and the classification
//! memory.  It interprets one [`ThermalEvent`] at a time; the sensor and
//! the report sink are injected at the call site, making the whole
//! decision path testable with mock adapters.
//!
//! ```text
//!  EventQueue ──▶ ┌────────────────────────┐ ──▶ ReportSink
//!                 │   ThermalSupervisor    │
//!  Sensor ◀──────▶│  dispatch · classify   │
//!                 └────────────────────────┘
//! ```

use std::sync::Arc;

use log::{debug, error, info};

use crate::config::{SignalPolicy, ThermalConfig};
use crate::diagnostics::SupervisorMetrics;
use crate::error::{Error, SensorError};
use crate::events::{ThermalEvent, ThermalEventKind};

use super::events::ThermalState;
use super::ports::{ReportSink, TemperatureSensor};
use super::report;

/// Classify a reading against the threshold.
///
/// Strict greater-than: a reading equal to the threshold is safe.
pub fn classify(reading_c: f32, threshold_c: f32) -> ThermalState {
    if reading_c > threshold_c {
        ThermalState::OverTemperature
    } else {
        ThermalState::Safe
    }
}

/// Supervisor activity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SupervisorState {
    /// Waiting for the next event.
    Idle,
    /// Handling one event.
    Processing,
}

/// What handling a single event produced.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Outcome {
    /// A measurement command reported this temperature.
    Telemetry(f32),
    /// An interrupt notice was classified and signalled.
    Signalled(ThermalState),
    /// An interrupt notice was classified but the signal was suppressed
    /// because it repeats the previous one ([`SignalPolicy::OnChange`]).
    Suppressed(ThermalState),
    /// The sensor read failed; nothing was reported.
    SensorFault(SensorError),
}

// ───────────────────────────────────────────────────────────────
// ThermalSupervisor
// ───────────────────────────────────────────────────────────────

pub struct ThermalSupervisor {
    config: ThermalConfig,
    policy: SignalPolicy,
    state: SupervisorState,
    /// Last classification actually signalled (used by `OnChange` only).
    last_signal: Option<ThermalState>,
    metrics: Arc<SupervisorMetrics>,
}

impl ThermalSupervisor {
    /// Construct a supervisor that re-signals every classification.
    pub fn new(config: ThermalConfig) -> Self {
        Self::with_policy(config, SignalPolicy::EveryReading, Arc::default())
    }

    pub fn with_policy(
        config: ThermalConfig,
        policy: SignalPolicy,
        metrics: Arc<SupervisorMetrics>,
    ) -> Self {
        Self {
            config,
            policy,
            state: SupervisorState::Idle,
            last_signal: None,
            metrics,
        }
    }

    // ── Event handling ────────────────────────────────────────

    /// Interpret one event: read the sensor and drive the reporting calls.
    ///
    /// Sensor failures are logged and end handling of this event only.
    pub fn handle_event(
        &mut self,
        event: ThermalEvent,
        sensor: &mut impl TemperatureSensor,
        sink: &mut impl ReportSink,
    ) -> Outcome {
        self.state = SupervisorState::Processing;
        debug!("supervisor: processing {:?}", event.kind);

        let outcome = match self.read(sensor) {
            Err(e) => {
                self.metrics.record_sensor_fault();
                let err = Error::from(e);
                error!(
                    "supervisor: {:?} dropped, sensor read failed (code={}): {}",
                    event.kind,
                    err.code(),
                    err
                );
                Outcome::SensorFault(e)
            }
            Ok(celsius) => match event.kind {
                ThermalEventKind::MeasureCommand => {
                    report::report_temperature(sink, celsius);
                    self.metrics.record_telemetry();
                    Outcome::Telemetry(celsius)
                }
                ThermalEventKind::InterruptNotice => self.signal(celsius, sink),
            },
        };

        self.metrics.record_event();
        self.state = SupervisorState::Idle;
        outcome
    }

    // ── Queries ───────────────────────────────────────────────

    pub fn state(&self) -> SupervisorState {
        self.state
    }

    pub fn config(&self) -> &ThermalConfig {
        &self.config
    }

    pub fn policy(&self) -> SignalPolicy {
        self.policy
    }

    /// Last classification signalled to the sink, if any.
    pub fn last_signal(&self) -> Option<ThermalState> {
        self.last_signal
    }

    pub fn metrics(&self) -> &Arc<SupervisorMetrics> {
        &self.metrics
    }

    // ── Internal ──────────────────────────────────────────────

    fn read(&self, sensor: &mut impl TemperatureSensor) -> Result<f32, SensorError> {
        let celsius = sensor.read_temperature(self.config.device_address)?;
        // NaN compares false against the threshold and would classify safe.
        // Infinities still order correctly and go through.
        if celsius.is_nan() {
            Err(SensorError::InvalidReading)
        } else {
            Ok(celsius)
        }
    }

    fn signal(&mut self, celsius: f32, sink: &mut impl ReportSink) -> Outcome {
        let state = classify(celsius, self.config.over_temp_threshold_c);

        if self.policy == SignalPolicy::OnChange && self.last_signal == Some(state) {
            debug!("supervisor: {:?} unchanged at {:.2} C, not re-signalled", state, celsius);
            self.metrics.record_suppressed();
            return Outcome::Suppressed(state);
        }

        match state {
            ThermalState::OverTemperature => {
                info!(
                    "supervisor: {:.2} C > {:.2} C threshold",
                    celsius, self.config.over_temp_threshold_c
                );
                report::report_over_temperature(sink);
                self.metrics.record_over_temp();
            }
            ThermalState::Safe => {
                report::report_safe_conditions(sink);
                self.metrics.record_safe();
            }
        }
        self.last_signal = Some(state);
        Outcome::Signalled(state)
    }
}
