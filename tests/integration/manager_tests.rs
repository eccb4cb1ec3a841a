//! Integration tests for the manager lifecycle and the threaded
//! supervisor task: queue capacity, ordering, shutdown.

use std::time::Duration;

use thermal_mgr::app::events::ThermalReport;
use thermal_mgr::scheduler::PeriodicMeasure;
use thermal_mgr::{
    Error, QUEUE_CAPACITY, ReceiveMode, SensorError, SignalPolicy, SupervisorOptions,
    ThermalConfig, ThermalEvent, ThermalManager,
};

use crate::mock_hw::{FixedSensor, RecordingSink, scripted_sensor, wait_until};

const WAIT: Duration = Duration::from_secs(5);

fn config(threshold: f32) -> ThermalConfig {
    ThermalConfig {
        device_address: 0x48,
        over_temp_threshold_c: threshold,
    }
}

fn running(sensor: FixedSensor, sink: RecordingSink) -> ThermalManager {
    let mut mgr = ThermalManager::new();
    mgr.init(config(50.0), sensor, sink, SupervisorOptions::default())
        .unwrap();
    mgr
}

fn processed(mgr: &ThermalManager, n: u32) -> bool {
    wait_until(WAIT, || mgr.metrics().events_processed >= n)
}

// ── Lifecycle ─────────────────────────────────────────────────

#[test]
fn submit_before_init_is_invalid_state() {
    let mgr = ThermalManager::new();

    assert_eq!(mgr.submit_event(ThermalEvent::measure()), Err(Error::InvalidState));
    assert_eq!(mgr.sender().request_measurement(), Err(Error::InvalidState));
    assert!(!mgr.is_running());
}

#[test]
fn interrupt_before_init_is_counted_as_dropped() {
    let mgr = ThermalManager::new();
    let isr = mgr.isr_handle();

    isr.on_interrupt();
    isr.on_interrupt();

    assert_eq!(isr.dropped(), 2);
    assert_eq!(mgr.pending(), 0);
}

#[test]
fn second_init_is_rejected() {
    let mut mgr = running(FixedSensor::ok(20.0), RecordingSink::new());

    let again = mgr.init(
        config(50.0),
        FixedSensor::ok(20.0),
        RecordingSink::new(),
        SupervisorOptions::default(),
    );

    assert_eq!(again, Err(Error::InvalidState));
    assert!(mgr.is_running());
}

#[test]
fn invalid_config_leaves_queue_closed_and_allows_retry() {
    let mut mgr = ThermalManager::new();
    let bad = ThermalConfig {
        device_address: 0x80,
        ..config(50.0)
    };

    let res = mgr.init(bad, FixedSensor::ok(20.0), RecordingSink::new(), SupervisorOptions::default());
    assert!(matches!(res, Err(Error::Config(_))));
    assert_eq!(mgr.submit_event(ThermalEvent::measure()), Err(Error::InvalidState));

    mgr.init(config(50.0), FixedSensor::ok(20.0), RecordingSink::new(), SupervisorOptions::default())
        .unwrap();
    assert!(mgr.is_running());
}

#[test]
fn oversized_stack_is_rejected_before_spawn() {
    let mut mgr = ThermalManager::new();
    let options = SupervisorOptions {
        stack_kb: usize::MAX,
        ..SupervisorOptions::default()
    };

    let res = mgr.init(config(50.0), FixedSensor::ok(20.0), RecordingSink::new(), options);

    assert!(matches!(res, Err(Error::Config(_))));
    assert!(!mgr.is_running());
    assert_eq!(mgr.submit_event(ThermalEvent::measure()), Err(Error::InvalidState));
}

#[test]
fn dropping_a_running_manager_closes_the_queue() {
    let mgr = running(FixedSensor::ok(20.0), RecordingSink::new());
    let sender = mgr.sender();
    assert!(sender.request_measurement().is_ok());

    drop(mgr);

    assert_eq!(sender.request_measurement(), Err(Error::InvalidState));
}

// ── End-to-end scenarios ──────────────────────────────────────

#[test]
fn interrupt_over_threshold_reaches_sink() {
    let sink = RecordingSink::new();
    let mut mgr = running(FixedSensor::ok(60.0), sink.clone());

    mgr.isr_handle().on_interrupt();

    assert!(processed(&mgr, 1));
    assert_eq!(sink.reports(), vec![ThermalReport::OverTemperature]);
    assert!(mgr.shutdown().unwrap().is_empty());
}

#[test]
fn measure_command_reaches_sink_as_telemetry() {
    let sink = RecordingSink::new();
    let mut mgr = running(FixedSensor::ok(23.5), sink.clone());

    mgr.sender().request_measurement().unwrap();

    assert!(processed(&mgr, 1));
    assert_eq!(sink.reports(), vec![ThermalReport::Telemetry { celsius: 23.5 }]);
    mgr.shutdown().unwrap();
}

#[test]
fn sensor_fault_in_task_keeps_supervisor_alive() {
    let (sensor, feed) = scripted_sensor();
    let sink = RecordingSink::new();
    let mut mgr = ThermalManager::new();
    mgr.init(config(50.0), sensor, sink.clone(), SupervisorOptions::default())
        .unwrap();

    feed.send(Err(SensorError::BusFault)).unwrap();
    feed.send(Ok(31.0)).unwrap();
    mgr.submit_event(ThermalEvent::measure()).unwrap();
    mgr.submit_event(ThermalEvent::measure()).unwrap();

    assert!(processed(&mgr, 2));
    assert_eq!(sink.telemetry(), vec![31.0]);
    assert_eq!(mgr.metrics().sensor_faults, 1);
    mgr.shutdown().unwrap();
}

// ── Queue capacity and ordering ───────────────────────────────

fn kind_for(i: usize) -> ThermalEvent {
    if i % 2 == 0 {
        ThermalEvent::measure()
    } else {
        ThermalEvent::interrupt()
    }
}

fn reading_for(i: usize) -> f32 {
    match i % 4 {
        1 => 60.0,
        3 => 40.0,
        _ => 30.0 + i as f32,
    }
}

fn expected_report(i: usize) -> ThermalReport {
    match i % 4 {
        1 => ThermalReport::OverTemperature,
        3 => ThermalReport::SafeConditions,
        _ => ThermalReport::Telemetry {
            celsius: reading_for(i),
        },
    }
}

#[test]
fn full_queue_rejects_eleventh_event_and_delivers_the_rest_in_order() {
    let (sensor, feed) = scripted_sensor();
    let sink = RecordingSink::new();
    let mut mgr = ThermalManager::new();
    mgr.init(config(50.0), sensor, sink.clone(), SupervisorOptions::default())
        .unwrap();

    // Park the supervisor inside event A so nothing drains meanwhile.
    mgr.submit_event(ThermalEvent::measure()).unwrap();
    assert!(wait_until(WAIT, || mgr.pending() == 0));

    for i in 0..QUEUE_CAPACITY {
        mgr.submit_event(kind_for(i)).unwrap();
    }
    assert_eq!(mgr.pending(), QUEUE_CAPACITY);
    assert_eq!(mgr.submit_event(ThermalEvent::measure()), Err(Error::QueueFull));

    feed.send(Ok(20.0)).unwrap();
    for i in 0..QUEUE_CAPACITY {
        feed.send(Ok(reading_for(i))).unwrap();
    }
    assert!(processed(&mgr, 1 + QUEUE_CAPACITY as u32));

    let mut expected = vec![ThermalReport::Telemetry { celsius: 20.0 }];
    expected.extend((0..QUEUE_CAPACITY).map(expected_report));
    assert_eq!(sink.reports(), expected);
    assert_eq!(mgr.metrics().events_processed, 11);
    mgr.shutdown().unwrap();
}

#[test]
fn single_producer_events_are_delivered_once_in_order() {
    const N: usize = 40;
    let (sensor, feed) = scripted_sensor();
    for i in 0..N {
        feed.send(Ok(reading_for(i))).unwrap();
    }
    let sink = RecordingSink::new();
    let mut mgr = ThermalManager::new();
    mgr.init(config(50.0), sensor, sink.clone(), SupervisorOptions::default())
        .unwrap();

    let sender = mgr.sender();
    for i in 0..N {
        loop {
            match sender.submit(kind_for(i)) {
                Ok(()) => break,
                Err(Error::QueueFull) => std::thread::yield_now(),
                Err(e) => panic!("unexpected submit error: {e}"),
            }
        }
    }

    assert!(processed(&mgr, N as u32));
    let expected: Vec<_> = (0..N).map(expected_report).collect();
    assert_eq!(sink.reports(), expected);
    mgr.shutdown().unwrap();
}

#[test]
fn isr_drops_are_counted_when_queue_is_full() {
    let (sensor, feed) = scripted_sensor();
    let mut mgr = ThermalManager::new();
    mgr.init(config(50.0), sensor, RecordingSink::new(), SupervisorOptions::default())
        .unwrap();
    mgr.submit_event(ThermalEvent::measure()).unwrap();
    assert!(wait_until(WAIT, || mgr.pending() == 0));

    let isr = mgr.isr_handle();
    for _ in 0..QUEUE_CAPACITY + 3 {
        isr.on_interrupt();
    }

    assert_eq!(isr.dropped(), 3);
    drop(feed);
    mgr.shutdown().unwrap();
}

// ── Shutdown ──────────────────────────────────────────────────

#[test]
fn shutdown_returns_undelivered_events() {
    let (sensor, feed) = scripted_sensor();
    let sink = RecordingSink::new();
    let mut mgr = ThermalManager::new();
    mgr.init(config(50.0), sensor, sink.clone(), SupervisorOptions::default())
        .unwrap();

    mgr.submit_event(ThermalEvent::measure()).unwrap();
    assert!(wait_until(WAIT, || mgr.pending() == 0));
    mgr.submit_event(ThermalEvent::measure()).unwrap();
    mgr.submit_event(ThermalEvent::interrupt()).unwrap();

    // Release the in-flight read only after the stop request is posted.
    let releaser = std::thread::spawn(move || {
        std::thread::sleep(Duration::from_millis(100));
        drop(feed);
    });
    let undelivered = mgr.shutdown().unwrap();
    releaser.join().unwrap();

    assert_eq!(
        undelivered.as_slice(),
        &[ThermalEvent::measure(), ThermalEvent::interrupt()]
    );
    assert_eq!(mgr.metrics().events_processed, 1);
    assert!(sink.reports().is_empty());
}

#[test]
fn every_accepted_event_is_processed_or_returned_across_shutdown() {
    let mut mgr = running(FixedSensor::ok(20.0), RecordingSink::new());

    let producers: Vec<_> = (0..4)
        .map(|_| {
            let sender = mgr.sender();
            std::thread::spawn(move || {
                let mut accepted = 0u32;
                loop {
                    match sender.request_measurement() {
                        Ok(()) => accepted += 1,
                        Err(Error::QueueFull) => std::thread::yield_now(),
                        Err(_) => return accepted,
                    }
                }
            })
        })
        .collect();

    assert!(processed(&mgr, 20));
    let undelivered = mgr.shutdown().unwrap();
    let accepted: u32 = producers.into_iter().map(|p| p.join().unwrap()).sum();

    assert_eq!(
        mgr.metrics().events_processed + undelivered.len() as u32,
        accepted
    );
}

#[test]
fn submissions_after_shutdown_are_refused() {
    let mut mgr = running(FixedSensor::ok(20.0), RecordingSink::new());
    let sender = mgr.sender();
    let isr = mgr.isr_handle();

    mgr.shutdown().unwrap();

    assert!(!mgr.is_running());
    assert_eq!(mgr.submit_event(ThermalEvent::measure()), Err(Error::InvalidState));
    assert_eq!(sender.request_measurement(), Err(Error::InvalidState));
    isr.on_interrupt();
    assert_eq!(isr.dropped(), 1);
    assert!(matches!(mgr.shutdown(), Err(Error::InvalidState)));
    assert_eq!(
        mgr.init(config(50.0), FixedSensor::ok(20.0), RecordingSink::new(), SupervisorOptions::default()),
        Err(Error::InvalidState)
    );
}

// ── Options ───────────────────────────────────────────────────

#[test]
fn poll_receive_mode_processes_events() {
    let sink = RecordingSink::new();
    let mut mgr = ThermalManager::new();
    let options = SupervisorOptions {
        receive: ReceiveMode::Poll {
            idle: Duration::from_millis(1),
        },
        ..SupervisorOptions::default()
    };
    mgr.init(config(50.0), FixedSensor::ok(25.0), sink.clone(), options)
        .unwrap();

    for _ in 0..3 {
        mgr.sender().request_measurement().unwrap();
    }

    assert!(processed(&mgr, 3));
    assert_eq!(sink.telemetry(), vec![25.0; 3]);
    assert!(mgr.shutdown().unwrap().is_empty());
}

#[test]
fn on_change_policy_suppresses_repeats_through_the_task() {
    let (sensor, feed) = scripted_sensor();
    for t in [40.0, 45.0, 60.0, 61.0, 30.0] {
        feed.send(Ok(t)).unwrap();
    }
    let sink = RecordingSink::new();
    let mut mgr = ThermalManager::new();
    let options = SupervisorOptions {
        signal_policy: SignalPolicy::OnChange,
        ..SupervisorOptions::default()
    };
    mgr.init(config(50.0), sensor, sink.clone(), options).unwrap();

    let isr = mgr.isr_handle();
    for _ in 0..5 {
        isr.on_interrupt();
    }

    assert!(processed(&mgr, 5));
    assert_eq!(
        sink.signals(),
        vec![
            ThermalReport::SafeConditions,
            ThermalReport::OverTemperature,
            ThermalReport::SafeConditions,
        ]
    );
    assert_eq!(mgr.metrics().suppressed_signals, 2);
    mgr.shutdown().unwrap();
}

#[test]
fn periodic_measure_drives_telemetry() {
    let sink = RecordingSink::new();
    let mut mgr = running(FixedSensor::ok(21.5), sink.clone());

    let measure = PeriodicMeasure::spawn(mgr.sender(), Duration::from_millis(10)).unwrap();
    assert!(wait_until(WAIT, || mgr.metrics().telemetry_reports >= 3));
    measure.stop();
    mgr.shutdown().unwrap();

    let telemetry = sink.telemetry();
    assert!(telemetry.len() >= 3);
    assert!(telemetry.iter().all(|&t| t == 21.5));
    assert!(sink.signals().is_empty());
}

#[test]
fn periodic_measure_rejects_zero_period() {
    let mgr = ThermalManager::new();
    assert!(matches!(
        PeriodicMeasure::spawn(mgr.sender(), Duration::ZERO),
        Err(Error::Config(_))
    ));
}
