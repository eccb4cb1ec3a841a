//! Mock sensor, recording sink and log capture for integration tests.
//!
//! Records every report so tests can assert on the full reporting history
//! without a console or a real bus.

use std::sync::mpsc::{Receiver, Sender, channel};
use std::sync::{Arc, Mutex};
use std::thread::ThreadId;
use std::time::{Duration, Instant};

use log::{Level, LevelFilter, Log, Metadata, Record};
use thermal_mgr::SensorError;
use thermal_mgr::app::events::ThermalReport;
use thermal_mgr::app::ports::{ReportSink, TemperatureSensor};

// ── FixedSensor ───────────────────────────────────────────────

/// Returns the same result on every read and records the addresses used.
pub struct FixedSensor {
    pub reading: Result<f32, SensorError>,
    pub addresses: Vec<u8>,
}

#[allow(dead_code)]
impl FixedSensor {
    pub fn ok(celsius: f32) -> Self {
        Self {
            reading: Ok(celsius),
            addresses: Vec::new(),
        }
    }

    pub fn failing(fault: SensorError) -> Self {
        Self {
            reading: Err(fault),
            addresses: Vec::new(),
        }
    }
}

impl TemperatureSensor for FixedSensor {
    fn read_temperature(&mut self, device_address: u8) -> Result<f32, SensorError> {
        self.addresses.push(device_address);
        self.reading
    }
}

// ── ScriptedSensor ────────────────────────────────────────────

/// Blocks on every read until the test supplies the result.  Lets a test
/// hold the supervisor inside an event while it fills the queue.
/// Dropping the feeder makes every pending and later read time out.
pub struct ScriptedSensor {
    rx: Receiver<Result<f32, SensorError>>,
}

pub type SensorFeed = Sender<Result<f32, SensorError>>;

#[allow(dead_code)]
pub fn scripted_sensor() -> (ScriptedSensor, SensorFeed) {
    let (tx, rx) = channel();
    (ScriptedSensor { rx }, tx)
}

impl TemperatureSensor for ScriptedSensor {
    fn read_temperature(&mut self, _device_address: u8) -> Result<f32, SensorError> {
        self.rx.recv().unwrap_or(Err(SensorError::Timeout))
    }
}

// ── RecordingSink ─────────────────────────────────────────────

/// Sink whose history stays readable after the sink moved into the task.
#[derive(Clone, Default)]
pub struct RecordingSink {
    reports: Arc<Mutex<Vec<ThermalReport>>>,
}

#[allow(dead_code)]
impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reports(&self) -> Vec<ThermalReport> {
        self.reports.lock().unwrap().clone()
    }

    pub fn telemetry(&self) -> Vec<f32> {
        self.reports()
            .iter()
            .filter_map(|r| match r {
                ThermalReport::Telemetry { celsius } => Some(*celsius),
                _ => None,
            })
            .collect()
    }

    pub fn signals(&self) -> Vec<ThermalReport> {
        self.reports()
            .into_iter()
            .filter(|r| !matches!(r, ThermalReport::Telemetry { .. }))
            .collect()
    }
}

impl ReportSink for RecordingSink {
    fn emit(&mut self, report: &ThermalReport) {
        self.reports.lock().unwrap().push(*report);
    }
}

// ── Log capture ───────────────────────────────────────────────

struct CaptureLogger {
    records: Mutex<Vec<(ThreadId, Level, String)>>,
}

static LOGGER: CaptureLogger = CaptureLogger {
    records: Mutex::new(Vec::new()),
};

impl Log for CaptureLogger {
    fn enabled(&self, _metadata: &Metadata<'_>) -> bool {
        true
    }

    fn log(&self, record: &Record<'_>) {
        let entry = (
            std::thread::current().id(),
            record.level(),
            record.args().to_string(),
        );
        if let Ok(mut records) = self.records.lock() {
            records.push(entry);
        }
    }

    fn flush(&self) {}
}

/// Install the capturing logger (idempotent).
#[allow(dead_code)]
pub fn capture_logs() {
    if log::set_logger(&LOGGER).is_ok() {
        log::set_max_level(LevelFilter::Trace);
    }
}

/// Error-level messages logged by the calling thread.
#[allow(dead_code)]
pub fn errors_on_this_thread() -> Vec<String> {
    let me = std::thread::current().id();
    LOGGER
        .records
        .lock()
        .unwrap()
        .iter()
        .filter(|(id, level, _)| *id == me && *level == Level::Error)
        .map(|(_, _, msg)| msg.clone())
        .collect()
}

// ── Helpers ───────────────────────────────────────────────────

/// Poll `cond` until it holds or `timeout` elapses.
#[allow(dead_code)]
pub fn wait_until(timeout: Duration, mut cond: impl FnMut() -> bool) -> bool {
    let deadline = Instant::now() + timeout;
    while Instant::now() < deadline {
        if cond() {
            return true;
        }
        std::thread::sleep(Duration::from_millis(2));
    }
    cond()
}
