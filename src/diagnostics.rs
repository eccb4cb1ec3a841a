//! Runtime diagnostics for the supervisor.
//!
//! Counters are atomics so the supervisor thread, the interrupt path and
//! any observer can touch them without locking.  [`MetricsSnapshot`] is
//! the serialisable read-out.

use core::sync::atomic::{AtomicU32, Ordering};

use serde::Serialize;

/// Live counters, shared between the supervisor task and its owner.
#[derive(Debug, Default)]
pub struct SupervisorMetrics {
    events_processed: AtomicU32,
    telemetry_reports: AtomicU32,
    over_temp_signals: AtomicU32,
    safe_signals: AtomicU32,
    suppressed_signals: AtomicU32,
    sensor_faults: AtomicU32,
    isr_drops: AtomicU32,
}

/// Point-in-time copy of [`SupervisorMetrics`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct MetricsSnapshot {
    pub events_processed: u32,
    pub telemetry_reports: u32,
    pub over_temp_signals: u32,
    pub safe_signals: u32,
    pub suppressed_signals: u32,
    pub sensor_faults: u32,
    pub isr_drops: u32,
}

impl SupervisorMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            events_processed: self.events_processed.load(Ordering::Acquire),
            telemetry_reports: self.telemetry_reports.load(Ordering::Relaxed),
            over_temp_signals: self.over_temp_signals.load(Ordering::Relaxed),
            safe_signals: self.safe_signals.load(Ordering::Relaxed),
            suppressed_signals: self.suppressed_signals.load(Ordering::Relaxed),
            sensor_faults: self.sensor_faults.load(Ordering::Relaxed),
            isr_drops: self.isr_drops.load(Ordering::Relaxed),
        }
    }

    /// Events fully handled by the supervisor.  Bumped last for each event
    /// (Release), so a reader that sees it also sees that event's counters.
    pub(crate) fn record_event(&self) {
        self.events_processed.fetch_add(1, Ordering::Release);
    }

    pub(crate) fn record_telemetry(&self) {
        self.telemetry_reports.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_over_temp(&self) {
        self.over_temp_signals.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_safe(&self) {
        self.safe_signals.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_suppressed(&self) {
        self.suppressed_signals.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_sensor_fault(&self) {
        self.sensor_faults.fetch_add(1, Ordering::Relaxed);
    }

    /// Lock-free; safe from interrupt context.
    pub(crate) fn record_isr_drop(&self) {
        self.isr_drops.fetch_add(1, Ordering::Relaxed);
    }
}
