//! Thermal events and the bounded hand-off queue.
//!
//! Events are produced by:
//! - the sensor interrupt path (out-of-range notice)
//! - periodic / commanded measurement requests
//!
//! and consumed exactly once by the supervisor task.
//!
//! ```text
//! ┌──────────────┐     ┌──────────────┐     ┌──────────────┐
//! │ Sensor ISR   │────▶│  EventQueue  │────▶│  Supervisor  │
//! │ Measure cmd  │────▶│  (10 slots)  │     │  (consumer)  │
//! └──────────────┘     └──────────────┘     └──────────────┘
//! ```

use core::sync::atomic::{AtomicBool, Ordering};

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::channel::Channel;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Number of events the queue can hold before submissions are dropped.
pub const QUEUE_CAPACITY: usize = 10;

/// What a [`ThermalEvent`] asks the supervisor to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum ThermalEventKind {
    /// Read the sensor and report the temperature as telemetry.
    MeasureCommand = 0,
    /// The sensor asserted its over-temperature output; re-classify.
    InterruptNotice = 1,
}

/// A fixed-layout event record.  Address and threshold live in the
/// supervisor's configuration, not in the event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(C)]
pub struct ThermalEvent {
    pub kind: ThermalEventKind,
}

impl ThermalEvent {
    pub const fn measure() -> Self {
        Self {
            kind: ThermalEventKind::MeasureCommand,
        }
    }

    pub const fn interrupt() -> Self {
        Self {
            kind: ThermalEventKind::InterruptNotice,
        }
    }
}

impl From<ThermalEvent> for u8 {
    fn from(event: ThermalEvent) -> Self {
        event.kind as u8
    }
}

impl TryFrom<u8> for ThermalEvent {
    type Error = Error;

    fn try_from(raw: u8) -> Result<Self> {
        match raw {
            0 => Ok(Self::measure()),
            1 => Ok(Self::interrupt()),
            _ => Err(Error::NullInput),
        }
    }
}

// ── Bounded MPSC queue ────────────────────────────────────────
//
// Any number of producers (ISR, timer, task) push with `try_push`; the
// single supervisor pops.  The channel's critical sections only guard
// index bookkeeping, so pushing is safe from interrupt context.

/// Bounded, thread-safe FIFO of [`ThermalEvent`]s.
///
/// The queue starts closed: submissions fail with [`Error::InvalidState`]
/// until the owner calls [`open`](Self::open).
pub struct EventQueue {
    channel: Channel<CriticalSectionRawMutex, ThermalEvent, QUEUE_CAPACITY>,
    open: AtomicBool,
}

impl Default for EventQueue {
    fn default() -> Self {
        Self::new()
    }
}

impl EventQueue {
    /// Create a closed, empty queue.  `const` so it can live in a `static`.
    pub const fn new() -> Self {
        Self {
            channel: Channel::new(),
            open: AtomicBool::new(false),
        }
    }

    /// Start accepting submissions.
    pub fn open(&self) {
        self.open.store(true, Ordering::Release);
    }

    /// Stop accepting submissions.  Pending events stay queued.
    ///
    /// Once this returns, no push that saw the queue open can still land.
    pub fn close(&self) {
        critical_section::with(|_| self.open.store(false, Ordering::Release));
    }

    pub fn is_open(&self) -> bool {
        self.open.load(Ordering::Acquire)
    }

    /// Single non-blocking enqueue attempt.
    ///
    /// Never blocks and never allocates.  On a full queue the event is
    /// discarded and [`Error::QueueFull`] returned; retrying is the
    /// caller's business.
    pub fn try_push(&self, event: ThermalEvent) -> Result<()> {
        // The open check and the send share one critical section with
        // `close`.  The channel's own lock nests inside it.
        critical_section::with(|_| {
            if !self.is_open() {
                return Err(Error::InvalidState);
            }
            self.channel.try_send(event).map_err(|_| Error::QueueFull)
        })
    }

    /// Pop the oldest event, or `None` if the queue is empty.
    pub fn try_pop(&self) -> Option<ThermalEvent> {
        self.channel.try_receive().ok()
    }

    /// Wait until an event is available and pop it.
    pub async fn pop(&self) -> ThermalEvent {
        self.channel.receive().await
    }

    /// Drain all pending events into a callback, in FIFO order.
    pub fn drain(&self, mut handler: impl FnMut(ThermalEvent)) {
        while let Some(event) = self.try_pop() {
            handler(event);
        }
    }

    /// Number of pending events.
    pub fn len(&self) -> usize {
        self.channel.len()
    }

    pub fn is_empty(&self) -> bool {
        self.channel.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.channel.is_full()
    }

    pub const fn capacity(&self) -> usize {
        QUEUE_CAPACITY
    }
}
