//! Port traits — the boundary between the supervisor and the outside world.
//!
//! ```text
//!   Adapter ──▶ Port trait ──▶ ThermalSupervisor (domain)
//! ```
//!
//! The sensor driver and the telemetry/console sink are external
//! collaborators.  The supervisor consumes them via generics at the call
//! site, so the domain core never touches a bus or a console directly.

use crate::error::SensorError;

use super::events::ThermalReport;

// ───────────────────────────────────────────────────────────────
// Sensor port (driven adapter: hardware → domain)
// ───────────────────────────────────────────────────────────────

/// Read-side port: the supervisor calls this to obtain a temperature.
pub trait TemperatureSensor {
    /// Read the current temperature in Celsius from the sensor at
    /// `device_address`.
    fn read_temperature(&mut self, device_address: u8) -> Result<f32, SensorError>;
}

// ───────────────────────────────────────────────────────────────
// Report sink port (driven adapter: domain → console / telemetry)
// ───────────────────────────────────────────────────────────────

/// The supervisor emits [`ThermalReport`]s through this port.  Adapters
/// decide where they go (serial console, telemetry downlink, ...).
///
/// Fire-and-forget: implementations swallow their own failures.
pub trait ReportSink {
    fn emit(&mut self, report: &ThermalReport);
}

impl<T: TemperatureSensor + ?Sized> TemperatureSensor for Box<T> {
    fn read_temperature(&mut self, device_address: u8) -> Result<f32, SensorError> {
        (**self).read_temperature(device_address)
    }
}

impl<T: ReportSink + ?Sized> ReportSink for Box<T> {
    fn emit(&mut self, report: &ThermalReport) {
        (**self).emit(report);
    }
}

// ───────────────────────────────────────────────────────────────
// Scheduler delegate (decouples the scheduler from the event queue)
// ───────────────────────────────────────────────────────────────

/// Callback the [`MeasureScheduler`](crate::scheduler::MeasureScheduler)
/// invokes when a measurement is due.  The usual implementation is
/// [`EventSender`](crate::manager::EventSender), which submits a
/// `MeasureCommand`; the scheduler itself knows nothing about queues.
pub trait SchedulerDelegate {
    fn on_measure_due(&mut self);
}
