//! JSON-lines telemetry sink.
//!
//! Writes one JSON object per [`ThermalReport`], newline-terminated, to any
//! `std::io::Write`.  Write errors are logged and dropped.

use std::io::Write;

use log::warn;

use crate::app::events::ThermalReport;
use crate::app::ports::ReportSink;

pub struct JsonLineSink<W: Write> {
    out: W,
    write_errors: u32,
}

impl<W: Write> JsonLineSink<W> {
    pub fn new(out: W) -> Self {
        Self {
            out,
            write_errors: 0,
        }
    }

    /// Reports that could not be written.
    pub fn write_errors(&self) -> u32 {
        self.write_errors
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn write_line(&mut self, report: &ThermalReport) -> std::io::Result<()> {
        serde_json::to_writer(&mut self.out, report)?;
        self.out.write_all(b"\n")?;
        self.out.flush()
    }
}

impl<W: Write> ReportSink for JsonLineSink<W> {
    fn emit(&mut self, report: &ThermalReport) {
        if let Err(e) = self.write_line(report) {
            self.write_errors = self.write_errors.saturating_add(1);
            warn!("json sink: report dropped: {}", e);
        }
    }
}
