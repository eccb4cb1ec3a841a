//! Supervisor task — the long-lived consumer thread.
//!
//! The task owns the [`ThermalSupervisor`], the sensor and the sink, and
//! feeds it one event at a time from the shared [`EventQueue`].
//!
//! In [`ReceiveMode::Blocking`] the only suspension point is "wait for the
//! next event or a stop request": `futures_lite::future::block_on` parks
//! the thread and the channel's waker unparks it when a producer pushes.
//!
//! ```text
//!        ┌──────────── Idle ◀─────────────┐
//!        │  block_on(pop | stop)          │
//!        ▼                                │
//!    Processing ── handle_event ──────────┘
//! ```

use std::sync::Arc;
use std::thread::JoinHandle;

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::signal::Signal;
use futures_lite::future;
use log::{error, info};

use crate::app::ports::{ReportSink, TemperatureSensor};
use crate::app::supervisor::ThermalSupervisor;
use crate::config::ReceiveMode;
use crate::error::{Error, Result};
use crate::events::{EventQueue, ThermalEvent};

/// Stop request shared between the owner and the task.
pub type StopSignal = Signal<CriticalSectionRawMutex, ()>;

/// Thread name of the supervisor task.
pub const TASK_NAME: &str = "thermal-mgr";

enum Wake {
    Event(ThermalEvent),
    Stop,
}

/// Handle to a running supervisor task.
pub struct SupervisorTask {
    stop: Arc<StopSignal>,
    handle: JoinHandle<()>,
}

impl SupervisorTask {
    /// Spawn the supervisor thread.
    pub fn spawn<S, R>(
        supervisor: ThermalSupervisor,
        sensor: S,
        sink: R,
        queue: Arc<EventQueue>,
        receive: ReceiveMode,
        stack_kb: usize,
    ) -> Result<Self>
    where
        S: TemperatureSensor + Send + 'static,
        R: ReportSink + Send + 'static,
    {
        let stop = Arc::new(StopSignal::new());
        let task_stop = Arc::clone(&stop);

        info!("Spawning '{}' (stack={}KB, receive={:?})", TASK_NAME, stack_kb, receive);

        let handle = std::thread::Builder::new()
            .name(TASK_NAME.into())
            .stack_size(stack_kb.saturating_mul(1024))
            .spawn(move || {
                run_loop(supervisor, sensor, sink, &queue, &task_stop, receive);
            })
            .map_err(|e| {
                error!("supervisor thread spawn failed: {}", e);
                Error::Init("supervisor thread spawn failed")
            })?;

        Ok(Self { stop, handle })
    }

    /// Ask the task to stop after the event it is currently handling.
    pub fn request_stop(&self) {
        self.stop.signal(());
    }

    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }

    /// Request a stop and wait for the thread to exit.
    pub fn stop(self) -> Result<()> {
        self.request_stop();
        self.handle.join().map_err(|_| {
            error!("supervisor thread panicked");
            Error::InvalidState
        })
    }
}

/// The supervisor loop.  Runs until a stop is requested.
pub fn run_loop<S, R>(
    mut supervisor: ThermalSupervisor,
    mut sensor: S,
    mut sink: R,
    queue: &EventQueue,
    stop: &StopSignal,
    receive: ReceiveMode,
) where
    S: TemperatureSensor,
    R: ReportSink,
{
    info!(
        "supervisor: started (addr=0x{:02X}, threshold={:.2} C)",
        supervisor.config().device_address,
        supervisor.config().over_temp_threshold_c
    );

    loop {
        if stop.signaled() {
            break;
        }

        let wake = match receive {
            ReceiveMode::Blocking => future::block_on(future::or(
                async { Wake::Event(queue.pop().await) },
                async {
                    stop.wait().await;
                    Wake::Stop
                },
            )),
            ReceiveMode::Poll { idle } => match queue.try_pop() {
                Some(event) => Wake::Event(event),
                None => {
                    if idle.is_zero() {
                        std::thread::yield_now();
                    } else {
                        std::thread::sleep(idle);
                    }
                    continue;
                }
            },
        };

        match wake {
            Wake::Event(event) => {
                supervisor.handle_event(event, &mut sensor, &mut sink);
            }
            Wake::Stop => break,
        }
    }

    info!(
        "supervisor: stopped after {} events",
        supervisor.metrics().snapshot().events_processed
    );
}
