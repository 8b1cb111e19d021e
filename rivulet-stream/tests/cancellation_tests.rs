// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use rivulet_scheduler::Scheduler;
use rivulet_stream::Observable;
use rivulet_test_utils::{counted_infinite, Recorder};

#[test]
fn test_cancel_stops_an_infinite_producer() {
    // Arrange - infinite counter running off-thread
    let emitted = Arc::new(AtomicUsize::new(0));
    let recorder = Recorder::new();
    let subscription = counted_infinite(Arc::clone(&emitted))
        .subscribe_on(Scheduler::NewThread)
        .subscribe_observer(recorder.observer());

    // Act - wait for output to start flowing, then cancel
    while emitted.load(Ordering::SeqCst) == 0 {
        std::thread::yield_now();
    }
    subscription.cancel();

    // Assert - the producer observes the token and freezes
    std::thread::sleep(Duration::from_millis(50));
    let frozen = emitted.load(Ordering::SeqCst);
    std::thread::sleep(Duration::from_millis(50));
    assert_eq!(emitted.load(Ordering::SeqCst), frozen);
}

#[test]
fn test_cancelled_subscription_goes_silent() {
    // Arrange
    let emitted = Arc::new(AtomicUsize::new(0));
    let recorder = Recorder::new();
    let subscription = counted_infinite(Arc::clone(&emitted))
        .subscribe_on(Scheduler::NewThread)
        .observe_on(Scheduler::Io)
        .subscribe_observer(recorder.observer());

    // Act
    while recorder.value_count() == 0 {
        std::thread::yield_now();
    }
    subscription.cancel();
    let seen_at_cancel = recorder.value_count();

    // Assert - deliveries stop without any terminal event
    std::thread::sleep(Duration::from_millis(100));
    let settled = recorder.value_count();
    assert!(settled >= seen_at_cancel);
    std::thread::sleep(Duration::from_millis(100));
    assert_eq!(recorder.value_count(), settled);
    assert_eq!(recorder.terminal_count(), 0);
}

#[test]
fn test_cancel_before_subscribe_effects_nothing() {
    // Arrange - cancellation races ahead of the producer
    let recorder = Recorder::new();
    let subscription = Observable::<u64>::never().subscribe_observer(recorder.observer());

    // Act
    subscription.cancel();
    assert!(subscription.is_cancelled());

    // Assert
    assert_eq!(recorder.value_count(), 0);
    assert_eq!(recorder.terminal_count(), 0);
}

#[test]
fn test_cancel_is_idempotent() {
    // Arrange
    let recorder = Recorder::new();
    let subscription = Observable::from_vec(vec![1u64]).subscribe_observer(recorder.observer());

    // Act - terminal already delivered; extra cancels are no-ops
    subscription.cancel();
    subscription.cancel();

    // Assert
    assert_eq!(recorder.values(), vec![1]);
    assert_eq!(recorder.terminal_count(), 1);
}

#[test]
fn test_cancel_drops_pending_delayed_emission() {
    // Arrange - a timer that would fire well after the cancel
    let recorder = Recorder::new();
    let subscription = Observable::timer(Duration::from_millis(80))
        .subscribe_observer(recorder.observer());

    // Act
    subscription.cancel();

    // Assert - the due time passes without any delivery
    std::thread::sleep(Duration::from_millis(160));
    assert_eq!(recorder.value_count(), 0);
    assert_eq!(recorder.terminal_count(), 0);
}

#[test]
fn test_terminal_completes_the_subscription() {
    // Arrange
    let recorder = Recorder::new();

    // Act
    let subscription = Observable::from_vec(vec![1u64, 2]).subscribe_observer(recorder.observer());

    // Assert - delivery of the terminal tears the subscription down
    assert!(subscription.is_cancelled());
    assert!(recorder.is_completed());
}
