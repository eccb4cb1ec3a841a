//! Thermal manager — owned context and producer entry points.
//!
//! [`ThermalManager`] owns the event queue, the metrics and the supervisor
//! task.  Producers never reach a process-wide global; they hold one of
//! two capabilities cloned from the manager:
//!
//! | Capability     | Context          | May log | Returns errors |
//! |----------------|------------------|---------|----------------|
//! | [`EventSender`]| task / timer     | caller  | yes            |
//! | [`IsrHandle`]  | interrupt        | no      | no (counted)   |
//!
//! Both only perform a single non-blocking, non-allocating push.

use std::sync::Arc;

use heapless::Vec;
use log::{error, info, warn};

use crate::app::ports::{ReportSink, TemperatureSensor};
use crate::app::supervisor::ThermalSupervisor;
use crate::config::{SupervisorOptions, ThermalConfig};
use crate::diagnostics::{MetricsSnapshot, SupervisorMetrics};
use crate::error::{Error, Result};
use crate::events::{EventQueue, QUEUE_CAPACITY, ThermalEvent};
use crate::task::SupervisorTask;

/// Events still queued when the manager shut down.
pub type Undelivered = Vec<ThermalEvent, QUEUE_CAPACITY>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Lifecycle {
    Uninitialised,
    Running,
    Stopped,
}

// ───────────────────────────────────────────────────────────────
// ThermalManager
// ───────────────────────────────────────────────────────────────

pub struct ThermalManager {
    queue: Arc<EventQueue>,
    metrics: Arc<SupervisorMetrics>,
    task: Option<SupervisorTask>,
    lifecycle: Lifecycle,
}

impl Default for ThermalManager {
    fn default() -> Self {
        Self::new()
    }
}

impl ThermalManager {
    /// Create the manager with a closed queue.  Producer handles may be
    /// taken before [`init`](Self::init); their submissions fail with
    /// [`Error::InvalidState`] until then.
    pub fn new() -> Self {
        Self {
            queue: Arc::new(EventQueue::new()),
            metrics: Arc::new(SupervisorMetrics::new()),
            task: None,
            lifecycle: Lifecycle::Uninitialised,
        }
    }

    /// Validate `config` and `options`, open the queue and start the supervisor task.
    ///
    /// Must be called exactly once; any later call returns
    /// [`Error::InvalidState`].
    pub fn init<S, R>(
        &mut self,
        config: ThermalConfig,
        sensor: S,
        sink: R,
        options: SupervisorOptions,
    ) -> Result<()>
    where
        S: TemperatureSensor + Send + 'static,
        R: ReportSink + Send + 'static,
    {
        if self.lifecycle != Lifecycle::Uninitialised {
            warn!("thermal manager: init called twice");
            return Err(Error::InvalidState);
        }
        config.validate()?;
        options.validate()?;

        let supervisor =
            ThermalSupervisor::with_policy(config, options.signal_policy, Arc::clone(&self.metrics));
        // Open first so nothing submitted between spawn and return is refused.
        self.queue.open();
        let task = SupervisorTask::spawn(
            supervisor,
            sensor,
            sink,
            Arc::clone(&self.queue),
            options.receive,
            options.stack_kb,
        );
        match task {
            Ok(task) => {
                self.task = Some(task);
                self.lifecycle = Lifecycle::Running;
                info!(
                    "thermal manager: initialised (queue={} slots, policy={:?})",
                    QUEUE_CAPACITY, options.signal_policy
                );
                Ok(())
            }
            Err(e) => {
                self.queue.close();
                Err(e)
            }
        }
    }

    /// Submit one event (single non-blocking enqueue).
    pub fn submit_event(&self, event: ThermalEvent) -> Result<()> {
        self.queue.try_push(event)
    }

    /// Task-context producer capability.
    pub fn sender(&self) -> EventSender {
        EventSender {
            queue: Arc::clone(&self.queue),
        }
    }

    /// Interrupt-context producer capability.
    pub fn isr_handle(&self) -> IsrHandle {
        IsrHandle {
            queue: Arc::clone(&self.queue),
            metrics: Arc::clone(&self.metrics),
        }
    }

    pub fn is_running(&self) -> bool {
        self.lifecycle == Lifecycle::Running
    }

    /// Number of events waiting for the supervisor.
    pub fn pending(&self) -> usize {
        self.queue.len()
    }

    pub fn metrics(&self) -> MetricsSnapshot {
        self.metrics.snapshot()
    }

    /// Stop the supervisor task and close the queue.
    ///
    /// The task finishes the event it is handling; events still queued are
    /// returned undelivered.  Later submissions fail with
    /// [`Error::InvalidState`].
    pub fn shutdown(&mut self) -> Result<Undelivered> {
        if self.lifecycle != Lifecycle::Running {
            return Err(Error::InvalidState);
        }
        self.queue.close();
        self.lifecycle = Lifecycle::Stopped;

        let joined = match self.task.take() {
            Some(task) => task.stop(),
            None => Ok(()),
        };

        // The queue is closed and the task joined, so the drain sees every
        // event that will ever be left, at most QUEUE_CAPACITY of them.
        let mut undelivered = Undelivered::new();
        let mut overflow = 0usize;
        self.queue.drain(|event| {
            if undelivered.push(event).is_err() {
                overflow += 1;
            }
        });
        if overflow > 0 {
            error!("thermal manager: {} undelivered events lost at shutdown", overflow);
        }
        if !undelivered.is_empty() {
            warn!("thermal manager: {} events undelivered at shutdown", undelivered.len());
        }
        info!("thermal manager: shut down");

        joined.map(|()| undelivered)
    }
}

impl Drop for ThermalManager {
    fn drop(&mut self) {
        if self.is_running() {
            let _ = self.shutdown();
        }
    }
}

// ───────────────────────────────────────────────────────────────
// Producer capabilities
// ───────────────────────────────────────────────────────────────

/// Task-context submission capability.
#[derive(Clone)]
pub struct EventSender {
    queue: Arc<EventQueue>,
}

impl EventSender {
    /// Single non-blocking enqueue; the caller decides what to do on error.
    pub fn submit(&self, event: ThermalEvent) -> Result<()> {
        self.queue.try_push(event)
    }

    /// Submit a measurement request.
    pub fn request_measurement(&self) -> Result<()> {
        self.submit(ThermalEvent::measure())
    }
}

/// Interrupt-context submission capability.
///
/// [`on_interrupt`](Self::on_interrupt) never blocks, allocates, logs or
/// retries.  A refused notice only bumps the `isr_drops` counter.
#[derive(Clone)]
pub struct IsrHandle {
    queue: Arc<EventQueue>,
    metrics: Arc<SupervisorMetrics>,
}

impl IsrHandle {
    /// Entry point for the sensor's over-temperature interrupt line.
    pub fn on_interrupt(&self) {
        if self.queue.try_push(ThermalEvent::interrupt()).is_err() {
            self.metrics.record_isr_drop();
        }
    }

    /// Interrupt notices refused so far (queue full or not initialised).
    pub fn dropped(&self) -> u32 {
        self.metrics.snapshot().isr_drops
    }
}
