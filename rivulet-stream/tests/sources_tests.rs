// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use std::time::{Duration, Instant};

use rivulet_core::RivuletError;
use rivulet_stream::Observable;
use rivulet_test_utils::{person_alice, person_bob, Recorder};

#[test]
fn test_just_emits_single_value_then_completes() -> anyhow::Result<()> {
    // Arrange
    let recorder = Recorder::new();

    // Act
    Observable::just(person_alice()).subscribe_observer(recorder.observer());

    // Assert
    assert_eq!(recorder.values(), vec![person_alice()]);
    assert!(recorder.is_completed());
    Ok(())
}

#[test]
fn test_from_vec_preserves_order() -> anyhow::Result<()> {
    // Act
    let values = Observable::from_vec(vec![person_alice(), person_bob()])
        .blocking()
        .collect()?;

    // Assert
    assert_eq!(values, vec![person_alice(), person_bob()]);
    Ok(())
}

#[test]
fn test_resubscription_replays_from_scratch() -> anyhow::Result<()> {
    // Arrange
    let source = Observable::range(1, 3);

    // Act - two independent subscriptions
    let first = source.clone().blocking().collect()?;
    let second = source.blocking().collect()?;

    // Assert - no sharing between subscriptions
    assert_eq!(first, vec![1, 2, 3]);
    assert_eq!(second, vec![1, 2, 3]);
    Ok(())
}

#[test]
fn test_range_saturates_at_the_top_of_the_domain() -> anyhow::Result<()> {
    // Act - a count reaching past u64::MAX must not wrap
    let values = Observable::range(u64::MAX - 2, 10).blocking().collect()?;

    // Assert
    assert_eq!(values, vec![u64::MAX - 2, u64::MAX - 1]);
    Ok(())
}

#[test]
fn test_empty_completes_without_values() -> anyhow::Result<()> {
    // Act
    let values = Observable::<i32>::empty().blocking().collect()?;

    // Assert
    assert!(values.is_empty());
    Ok(())
}

#[test]
fn test_error_source_fails_immediately() {
    // Act
    let result = Observable::<i32>::error(RivuletError::stream_error("broken"))
        .blocking()
        .collect();

    // Assert
    assert!(result.unwrap_err().to_string().contains("broken"));
}

#[test]
fn test_producer_panic_becomes_terminal_error() {
    // Arrange - a producer that violates the contract by panicking
    let source = Observable::<i32>::create(|subscriber| {
        subscriber.on_next(1);
        panic!("producer blew up");
    });

    // Act
    let recorder = Recorder::new();
    source.subscribe_observer(recorder.observer());

    // Assert - the value arrived, then the panic surfaced as on_error
    assert_eq!(recorder.values(), vec![1]);
    let error = recorder.error().expect("panic must surface as error");
    assert!(error.to_string().contains("producer blew up"));
    assert_eq!(recorder.terminal_count(), 1);
}

#[test]
fn test_emissions_after_terminal_are_ignored() {
    // Arrange - a producer that keeps emitting after completing
    let source = Observable::<i32>::create(|subscriber| {
        subscriber.on_next(1);
        subscriber.on_complete();
        subscriber.on_next(2);
        subscriber.on_error(RivuletError::stream_error("late"));
    });

    // Act
    let recorder = Recorder::new();
    source.subscribe_observer(recorder.observer());

    // Assert
    assert_eq!(recorder.values(), vec![1]);
    assert!(recorder.is_completed());
    assert_eq!(recorder.terminal_count(), 1);
}

#[test]
fn test_timer_fires_once_after_delay() -> anyhow::Result<()> {
    // Arrange
    let started = Instant::now();

    // Act
    let values = Observable::timer(Duration::from_millis(50)).blocking().collect()?;

    // Assert
    assert_eq!(values, vec![0]);
    assert!(started.elapsed() >= Duration::from_millis(45));
    Ok(())
}

#[test]
fn test_interval_counts_up_until_taken() -> anyhow::Result<()> {
    // Act
    let ticks = Observable::interval(Duration::from_millis(5), Duration::from_millis(5))
        .take(4)
        .blocking()
        .collect()?;

    // Assert
    assert_eq!(ticks, vec![0, 1, 2, 3]);
    Ok(())
}
