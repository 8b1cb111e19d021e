// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use rivulet_stream::Observable;
use rivulet_test_utils::{counted_infinite, Recorder};

#[test]
fn test_take_stops_infinite_producer_after_n_values() -> anyhow::Result<()> {
    // Arrange
    let emitted = Arc::new(AtomicUsize::new(0));

    // Act
    let values = counted_infinite(Arc::clone(&emitted)).take(5).blocking().collect()?;

    // Assert - exactly five values, and the producer observably stopped
    assert_eq!(values, vec![0, 1, 2, 3, 4]);
    let frozen = emitted.load(Ordering::SeqCst);
    std::thread::sleep(Duration::from_millis(50));
    assert_eq!(emitted.load(Ordering::SeqCst), frozen);
    assert!(frozen <= 6, "producer kept running: {frozen} emissions");
    Ok(())
}

#[test]
fn test_take_fewer_available_than_requested() -> anyhow::Result<()> {
    // Act
    let values = Observable::range(1, 3).take(10).blocking().collect()?;

    // Assert - completes with what was available
    assert_eq!(values, vec![1, 2, 3]);
    Ok(())
}

#[test]
fn test_take_zero_completes_without_subscribing_upstream() {
    // Arrange
    let emitted = Arc::new(AtomicUsize::new(0));
    let recorder = Recorder::new();

    // Act
    counted_infinite(Arc::clone(&emitted))
        .take(0)
        .subscribe_observer(recorder.observer());

    // Assert
    assert!(recorder.is_completed());
    assert_eq!(recorder.value_count(), 0);
    assert_eq!(emitted.load(Ordering::SeqCst), 0);
}

#[test]
fn test_take_while_completes_on_first_predicate_failure() -> anyhow::Result<()> {
    // Arrange
    let emitted = Arc::new(AtomicUsize::new(0));

    // Act
    let values = counted_infinite(Arc::clone(&emitted))
        .take_while(|n| *n < 3)
        .blocking()
        .collect()?;

    // Assert - the failing value is not emitted, termination is completion
    assert_eq!(values, vec![0, 1, 2]);
    Ok(())
}

#[test]
fn test_take_while_passes_errors_through() {
    // Arrange
    let source = Observable::<i32>::create(|subscriber| {
        subscriber.on_next(1);
        subscriber.on_error(rivulet_core::RivuletError::stream_error("mid-stream"));
    });
    let recorder = Recorder::new();

    // Act
    source.take_while(|_| true).subscribe_observer(recorder.observer());

    // Assert
    assert_eq!(recorder.values(), vec![1]);
    assert!(recorder.is_errored());
}
