//! Reporting operations invoked by the supervisor.
//!
//! Each call forwards one [`ThermalReport`] to the sink and returns
//! nothing: a sink that fails must not stall thermal supervision.

use super::events::ThermalReport;
use super::ports::ReportSink;

pub fn report_temperature(sink: &mut impl ReportSink, celsius: f32) {
    sink.emit(&ThermalReport::Telemetry { celsius });
}

pub fn report_over_temperature(sink: &mut impl ReportSink) {
    sink.emit(&ThermalReport::OverTemperature);
}

pub fn report_safe_conditions(sink: &mut impl ReportSink) {
    sink.emit(&ThermalReport::SafeConditions);
}
