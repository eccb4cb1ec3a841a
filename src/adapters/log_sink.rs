//! Log-based report sink adapter.
//!
//! Implements [`ReportSink`] by writing the console lines of the thermal
//! subsystem to the logger (UART / host stdout).  A telemetry downlink
//! adapter would implement the same trait.

use log::{info, warn};

use crate::app::events::ThermalReport;
use crate::app::ports::ReportSink;

/// Adapter that logs every [`ThermalReport`] to the console.
pub struct LogReportSink;

impl LogReportSink {
    pub fn new() -> Self {
        Self
    }
}

impl Default for LogReportSink {
    fn default() -> Self {
        Self::new()
    }
}

impl ReportSink for LogReportSink {
    fn emit(&mut self, report: &ThermalReport) {
        match report {
            ThermalReport::Telemetry { celsius } => {
                info!("TELEM | Temperature telemetry: {:.2} deg C", celsius);
            }
            ThermalReport::OverTemperature => {
                warn!("ALERT | Over temperature detected!");
            }
            ThermalReport::SafeConditions => {
                info!("ALERT | Returned to safe operating conditions!");
            }
        }
    }
}
