// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use rivulet_scheduler::Scheduler;
use rivulet_stream::Observable;
use rivulet_test_utils::Recorder;

fn current_thread_name() -> String {
    std::thread::current().name().unwrap_or("unnamed").to_string()
}

#[test]
fn test_subscribe_on_runs_producer_on_pool_thread() {
    // Arrange
    let producer_thread = Arc::new(Mutex::new(String::new()));
    let seen = Arc::clone(&producer_thread);
    let recorder = Recorder::new();

    // Act
    Observable::create(move |subscriber| {
        *seen.lock() = current_thread_name();
        subscriber.on_next(1u64);
        subscriber.on_complete();
    })
    .subscribe_on(Scheduler::Io)
    .subscribe_observer(recorder.observer());

    // Assert
    assert!(recorder.await_terminal(Duration::from_secs(5)));
    assert!(
        producer_thread.lock().starts_with("rivulet-io-"),
        "producer ran on {}",
        producer_thread.lock()
    );
}

#[test]
fn test_observe_on_moves_delivery_off_the_caller() {
    // Arrange
    let delivery_thread = Arc::new(Mutex::new(String::new()));
    let seen = Arc::clone(&delivery_thread);
    let recorder = Recorder::new();

    // Act - producer stays on the caller, delivery hops to the compute pool
    Observable::just(7u64)
        .observe_on(Scheduler::Compute)
        .tap(move |_| *seen.lock() = current_thread_name())
        .subscribe_observer(recorder.observer());

    // Assert
    assert!(recorder.await_terminal(Duration::from_secs(5)));
    assert!(
        delivery_thread.lock().starts_with("rivulet-compute-"),
        "delivery ran on {}",
        delivery_thread.lock()
    );
}

#[test]
fn test_observe_on_preserves_order_under_load() -> anyhow::Result<()> {
    // Act - a long synchronous burst through the hand-off queue
    let values = Observable::range(0, 10_000)
        .observe_on(Scheduler::Compute)
        .blocking()
        .collect()?;

    // Assert - serialized drain keeps emission order across the hop
    assert_eq!(values, (0..10_000).collect::<Vec<_>>());
    Ok(())
}

#[test]
fn test_observe_on_delivers_terminal_on_scheduler() {
    // Arrange
    let recorder = Recorder::new();

    // Act
    Observable::range(1, 3)
        .observe_on(Scheduler::Io)
        .subscribe_observer(recorder.observer());

    // Assert - terminal crosses the hop exactly once
    assert!(recorder.await_terminal(Duration::from_secs(5)));
    assert_eq!(recorder.values(), vec![1, 2, 3]);
    assert!(recorder.is_completed());
    assert_eq!(recorder.terminal_count(), 1);
}

#[test]
fn test_subscribe_on_then_observe_on_compose() -> anyhow::Result<()> {
    // Act - produce on io, transform, deliver on compute
    let values = Observable::range(1, 5)
        .subscribe_on(Scheduler::Io)
        .map(|n| n * 10)
        .observe_on(Scheduler::Compute)
        .blocking()
        .collect()?;

    // Assert
    assert_eq!(values, vec![10, 20, 30, 40, 50]);
    Ok(())
}

#[test]
fn test_new_thread_scheduler_names_its_thread() {
    // Arrange
    let producer_thread = Arc::new(Mutex::new(String::new()));
    let seen = Arc::clone(&producer_thread);
    let recorder = Recorder::<u64>::new();

    // Act
    Observable::create(move |subscriber| {
        *seen.lock() = current_thread_name();
        subscriber.on_complete();
    })
    .subscribe_on(Scheduler::NewThread)
    .subscribe_observer(recorder.observer());

    // Assert
    assert!(recorder.await_terminal(Duration::from_secs(5)));
    assert!(
        producer_thread.lock().starts_with("rivulet-thread"),
        "producer ran on {}",
        producer_thread.lock()
    );
}
