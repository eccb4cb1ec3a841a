//! Simulated temperature sensor.
//!
//! Host stand-in for the bus sensor driver.  The reading lives in a shared
//! atomic so a test or the simulation binary can inject temperatures and
//! faults while the supervisor thread owns the sensor.

use core::sync::atomic::{AtomicU8, AtomicU32, Ordering};
use std::sync::Arc;

use crate::app::ports::TemperatureSensor;
use crate::error::SensorError;

const FAULT_NONE: u8 = 0;
const FAULT_BUS: u8 = 1;
const FAULT_TIMEOUT: u8 = 2;
const FAULT_INVALID: u8 = 3;

#[derive(Debug)]
struct SimState {
    /// `f32` bit pattern of the current reading.
    celsius_bits: AtomicU32,
    fault: AtomicU8,
    reads: AtomicU32,
}

/// Sensor half, handed to the supervisor.
#[derive(Debug, Clone)]
pub struct SimulatedSensor {
    state: Arc<SimState>,
    expected_address: Option<u8>,
}

/// Control half, kept by whoever drives the simulation.
#[derive(Debug, Clone)]
pub struct SimulatedSensorControl {
    state: Arc<SimState>,
}

impl SimulatedSensor {
    /// Create a sensor reading `celsius` and its control handle.
    pub fn new(celsius: f32) -> (Self, SimulatedSensorControl) {
        let state = Arc::new(SimState {
            celsius_bits: AtomicU32::new(celsius.to_bits()),
            fault: AtomicU8::new(FAULT_NONE),
            reads: AtomicU32::new(0),
        });
        (
            Self {
                state: Arc::clone(&state),
                expected_address: None,
            },
            SimulatedSensorControl { state },
        )
    }

    /// Answer only at `address`; other addresses fail with a bus fault.
    #[must_use]
    pub fn at_address(mut self, address: u8) -> Self {
        self.expected_address = Some(address);
        self
    }
}

impl TemperatureSensor for SimulatedSensor {
    fn read_temperature(&mut self, device_address: u8) -> Result<f32, SensorError> {
        self.state.reads.fetch_add(1, Ordering::Relaxed);
        if self.expected_address.is_some_and(|a| a != device_address) {
            return Err(SensorError::BusFault);
        }
        match self.state.fault.load(Ordering::Acquire) {
            FAULT_BUS => Err(SensorError::BusFault),
            FAULT_TIMEOUT => Err(SensorError::Timeout),
            FAULT_INVALID => Err(SensorError::InvalidReading),
            _ => Ok(f32::from_bits(self.state.celsius_bits.load(Ordering::Acquire))),
        }
    }
}

impl SimulatedSensorControl {
    pub fn set_celsius(&self, celsius: f32) {
        self.state.celsius_bits.store(celsius.to_bits(), Ordering::Release);
    }

    pub fn celsius(&self) -> f32 {
        f32::from_bits(self.state.celsius_bits.load(Ordering::Acquire))
    }

    /// Make subsequent reads fail with `fault`, or succeed again with `None`.
    pub fn set_fault(&self, fault: Option<SensorError>) {
        let raw = match fault {
            None => FAULT_NONE,
            Some(SensorError::BusFault) => FAULT_BUS,
            Some(SensorError::Timeout) => FAULT_TIMEOUT,
            Some(SensorError::InvalidReading) => FAULT_INVALID,
        };
        self.state.fault.store(raw, Ordering::Release);
    }

    /// Reads attempted so far.
    pub fn reads(&self) -> u32 {
        self.state.reads.load(Ordering::Relaxed)
    }
}
