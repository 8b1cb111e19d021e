// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use std::time::Duration;

use rivulet_core::RivuletError;
use rivulet_scheduler::Scheduler;
use rivulet_stream::Observable;
use rivulet_test_utils::Recorder;

#[test]
fn test_flat_map_merges_inner_streams() -> anyhow::Result<()> {
    // Act - each n expands to n copies of n
    let values = Observable::from_vec(vec![1u64, 2, 3])
        .flat_map(|n| Observable::from_iter(std::iter::repeat(n).take(n as usize)))
        .blocking()
        .collect()?;

    // Assert - synchronous inners preserve upstream order
    assert_eq!(values, vec![1, 2, 2, 3, 3, 3]);
    Ok(())
}

#[test]
fn test_flat_map_completes_after_all_inners() -> anyhow::Result<()> {
    // Arrange - upstream completes immediately, inners are delayed
    let recorder = Recorder::new();
    Observable::from_vec(vec![30u64, 60])
        .flat_map(|delay| Observable::timer(Duration::from_millis(delay)).map(move |_| delay))
        .subscribe_observer(recorder.observer());

    // Assert - no completion until the slowest inner finishes
    std::thread::sleep(Duration::from_millis(10));
    assert!(!recorder.is_completed());
    assert!(recorder.await_terminal(Duration::from_secs(5)));
    assert!(recorder.is_completed());
    assert_eq!(recorder.value_count(), 2);
    Ok(())
}

#[test]
fn test_flat_map_selector_panic_terminates_with_error() {
    // Act
    let recorder = Recorder::new();
    Observable::range(0, 10)
        .flat_map(|n| {
            assert!(n < 2, "selector rejects {n}");
            Observable::just(n)
        })
        .subscribe_observer(recorder.observer());

    // Assert
    assert_eq!(recorder.values(), vec![0, 1]);
    assert!(recorder.is_errored());
    assert_eq!(recorder.terminal_count(), 1);
}

#[test]
fn test_flat_map_inner_error_cancels_subtree() {
    // Arrange - a delayed inner that would emit after the failing one
    let recorder = Recorder::new();
    Observable::from_vec(vec![1u64, 2])
        .flat_map(|n| {
            if n == 1 {
                Observable::<u64>::error(RivuletError::stream_error("inner died"))
                    .subscribe_on(Scheduler::Io)
            } else {
                Observable::timer(Duration::from_millis(80))
            }
        })
        .subscribe_observer(recorder.observer());

    // Assert - error forwarded once, pending inner silenced
    assert!(recorder.await_terminal(Duration::from_secs(5)));
    assert!(recorder.is_errored());
    std::thread::sleep(Duration::from_millis(150));
    assert_eq!(recorder.value_count(), 0);
    assert_eq!(recorder.terminal_count(), 1);
}

#[test]
fn test_flat_map_parallel_inners_deliver_everything() -> anyhow::Result<()> {
    // Act - fan each value out to the compute pool and back
    let mut values = Observable::range(0, 20)
        .flat_map(|n| Observable::just(n).subscribe_on(Scheduler::Compute).map(|n| n * 2))
        .blocking()
        .collect()?;

    // Assert - permutation of the expected set
    values.sort_unstable();
    assert_eq!(values, (0..20).map(|n| n * 2).collect::<Vec<_>>());
    Ok(())
}
