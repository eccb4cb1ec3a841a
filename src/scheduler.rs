//! Periodic measurement scheduler.
//!
//! The task-level producer of `MeasureCommand` events.  The tick-driven
//! [`MeasureScheduler`] notifies a [`SchedulerDelegate`] when a
//! measurement is due; [`PeriodicMeasure`] drives it from its own thread
//! with an [`EventSender`] as the delegate.
//!
//! ```text
//!  PeriodicMeasure thread ──tick──▶ MeasureScheduler
//!                                        │ on_measure_due
//!                                        ▼
//!                                   EventSender ──▶ EventQueue
//! ```

use core::time::Duration;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread::JoinHandle;

use log::{info, warn};

use crate::app::ports::SchedulerDelegate;
use crate::error::{Error, Result};
use crate::manager::EventSender;

// ═══════════════════════════════════════════════════════════════
//  Scheduler engine
// ═══════════════════════════════════════════════════════════════

/// Fires a measurement every `period`.
pub struct MeasureScheduler {
    period: Duration,
    elapsed: Duration,
    enabled: bool,
    fired: u64,
}

impl MeasureScheduler {
    pub fn new(period: Duration) -> Self {
        Self {
            period,
            elapsed: Duration::ZERO,
            enabled: true,
            fired: 0,
        }
    }

    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
        if !enabled {
            self.elapsed = Duration::ZERO;
        }
    }

    /// Advance the scheduler by `dt`.  Fires at most once per call; a
    /// late tick does not produce a burst of catch-up measurements.
    pub fn tick(&mut self, dt: Duration, delegate: &mut dyn SchedulerDelegate) {
        if !self.enabled || self.period.is_zero() {
            return;
        }
        self.elapsed += dt;
        if self.elapsed >= self.period {
            self.elapsed = Duration::ZERO;
            self.fired += 1;
            delegate.on_measure_due();
        }
    }

    pub fn period(&self) -> Duration {
        self.period
    }

    /// Measurements fired since construction.
    pub fn fired(&self) -> u64 {
        self.fired
    }
}

// ── EventSender as delegate ───────────────────────────────────

impl SchedulerDelegate for EventSender {
    fn on_measure_due(&mut self) {
        match self.request_measurement() {
            Ok(()) => {}
            Err(Error::QueueFull) => warn!("scheduler: queue full, measurement dropped"),
            Err(e) => warn!("scheduler: measurement not submitted: {}", e),
        }
    }
}

// ═══════════════════════════════════════════════════════════════
//  Thread driver
// ═══════════════════════════════════════════════════════════════

/// Thread that submits a `MeasureCommand` every `period` until stopped.
pub struct PeriodicMeasure {
    running: Arc<AtomicBool>,
    handle: JoinHandle<()>,
}

impl PeriodicMeasure {
    pub fn spawn(sender: EventSender, period: Duration) -> Result<Self> {
        if period.is_zero() {
            return Err(Error::Config("measurement period must be non-zero"));
        }
        let running = Arc::new(AtomicBool::new(true));
        let flag = Arc::clone(&running);

        let handle = std::thread::Builder::new()
            .name("thermal-measure".into())
            .spawn(move || {
                let mut sched = MeasureScheduler::new(period);
                let mut delegate = sender;
                info!("scheduler: measuring every {:?}", period);
                while flag.load(Ordering::Acquire) {
                    std::thread::park_timeout(period);
                    if !flag.load(Ordering::Acquire) {
                        break;
                    }
                    sched.tick(period, &mut delegate);
                }
                info!("scheduler: stopped after {} measurements", sched.fired());
            })
            .map_err(|_| Error::Init("measurement thread spawn failed"))?;

        Ok(Self { running, handle })
    }

    /// Stop the thread and wait for it to exit.
    pub fn stop(self) {
        self.running.store(false, Ordering::Release);
        self.handle.thread().unpark();
        if self.handle.join().is_err() {
            warn!("scheduler: measurement thread panicked");
        }
    }
}

// ═══════════════════════════════════════════════════════════════
//  Tests
// ═══════════════════════════════════════════════════════════════
