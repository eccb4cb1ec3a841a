//! Thermal manager — host simulation entry point.
//!
//! Wires the supervisor to a simulated sensor and the console sink, then
//! plays a short thermal excursion:
//!
//! ```text
//!  PeriodicMeasure ──▶┐
//!                     ├──▶ ThermalManager ──▶ LogReportSink
//!  simulated ISR ────▶┘          │
//!                                ▼
//!                         SimulatedSensor ◀── excursion script
//! ```

use std::time::Duration;

use anyhow::{Context, Result};
use log::{info, warn};
use tracing_subscriber::EnvFilter;

use thermal_mgr::adapters::log_sink::LogReportSink;
use thermal_mgr::adapters::sim_sensor::SimulatedSensor;
use thermal_mgr::scheduler::PeriodicMeasure;
use thermal_mgr::{SupervisorOptions, ThermalConfig, ThermalManager};

/// Temperatures played by the simulated sensor, one per step.
const EXCURSION_C: [f32; 8] = [24.0, 31.5, 48.0, 50.0, 63.2, 71.8, 55.0, 42.0];
const STEP: Duration = Duration::from_millis(250);
const MEASURE_PERIOD: Duration = Duration::from_millis(500);

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    info!("thermal-mgr v{}", env!("CARGO_PKG_VERSION"));

    let config = ThermalConfig {
        over_temp_threshold_c: 50.0,
        ..ThermalConfig::default()
    };

    let (sensor, sensor_ctl) = SimulatedSensor::new(EXCURSION_C[0]);
    let sensor = sensor.at_address(config.device_address);

    let mut manager = ThermalManager::new();
    manager
        .init(config, sensor, LogReportSink::new(), SupervisorOptions::default())
        .context("thermal manager init failed")?;

    let isr = manager.isr_handle();
    let measure = PeriodicMeasure::spawn(manager.sender(), MEASURE_PERIOD)
        .context("measurement producer failed")?;

    // The sensor's OS line fires whenever the reading crosses the threshold.
    let mut was_over = false;
    for &celsius in &EXCURSION_C {
        sensor_ctl.set_celsius(celsius);
        let is_over = celsius > config.over_temp_threshold_c;
        if is_over != was_over {
            isr.on_interrupt();
            was_over = is_over;
        }
        std::thread::sleep(STEP);
    }

    measure.stop();
    let undelivered = manager
        .shutdown()
        .context("thermal manager shutdown failed")?;
    if !undelivered.is_empty() {
        warn!("{} events left in the queue", undelivered.len());
    }

    let metrics = manager.metrics();
    info!("metrics: {}", serde_json::to_string(&metrics)?);
    if isr.dropped() > 0 {
        warn!("{} interrupt notices dropped", isr.dropped());
    }
    Ok(())
}
