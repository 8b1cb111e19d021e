// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use rivulet_core::RivuletError;
use rivulet_stream::Observable;
use rivulet_test_utils::Recorder;

#[test]
fn test_group_by_parity_yields_two_lists() -> anyhow::Result<()> {
    // Act - split 1..=6 into odds and evens, collect each group
    let groups = Observable::from_vec(vec![1u64, 2, 3, 4, 5, 6])
        .group_by(|n| n % 2 == 0)
        .flat_map(|group| {
            let is_even = *group.key();
            group.observable().to_list().map(move |values| (is_even, values))
        })
        .blocking()
        .collect()?;

    // Assert - exactly two groups, each in upstream order
    assert_eq!(groups.len(), 2);
    let odds = groups.iter().find(|(is_even, _)| !is_even).map(|(_, v)| v);
    let evens = groups.iter().find(|(is_even, _)| *is_even).map(|(_, v)| v);
    assert_eq!(odds, Some(&vec![1, 3, 5]));
    assert_eq!(evens, Some(&vec![2, 4, 6]));
    Ok(())
}

#[test]
fn test_group_by_emits_group_once_per_key() -> anyhow::Result<()> {
    // Act
    let keys = Observable::from_vec(vec!["a", "b", "a", "c", "b", "a"])
        .group_by(|word| word.to_string())
        .map(|group| group.key().clone())
        .blocking()
        .collect()?;

    // Assert - outer stream carries each key exactly once, first-seen order
    assert_eq!(keys, vec!["a", "b", "c"]);
    Ok(())
}

#[test]
fn test_group_by_buffers_until_first_subscriber() -> anyhow::Result<()> {
    // Arrange - hold the groups, subscribe only after upstream finished
    let groups = Observable::range(1, 6)
        .group_by(|n| n % 2)
        .blocking()
        .collect()?;

    // Act - late subscription replays the buffered values and the terminal
    let mut replayed = Vec::new();
    for group in groups {
        replayed.push(group.observable().blocking().collect()?);
    }

    // Assert
    assert_eq!(replayed, vec![vec![1, 3, 5], vec![2, 4, 6]]);
    Ok(())
}

#[test]
fn test_group_by_take_within_group() -> anyhow::Result<()> {
    // Act - keep only the first two members of each parity class
    let mut truncated = Observable::range(1, 10)
        .group_by(|n| n % 2)
        .flat_map(|group| group.observable().take(2).to_list())
        .blocking()
        .collect()?;

    // Assert
    truncated.sort();
    assert_eq!(truncated, vec![vec![1, 3], vec![2, 4]]);
    Ok(())
}

#[test]
fn test_group_by_upstream_error_reaches_groups_and_outer() {
    // Arrange - upstream fails after routing values into both groups
    let outer_errored = Arc::new(AtomicBool::new(false));
    let outer_flag = Arc::clone(&outer_errored);
    let inner = Recorder::new();
    let inner_feed = inner.clone();
    Observable::create(|subscriber| {
        subscriber.on_next(1u64);
        subscriber.on_next(2);
        subscriber.on_error(RivuletError::stream_error("source failed"));
    })
    .group_by(|n| n % 2)
    .subscribe_all(
        move |group| {
            group.observable().subscribe_observer(inner_feed.observer());
        },
        move |_error| {
            outer_flag.store(true, Ordering::SeqCst);
        },
        || {},
    );

    // Assert - both open groups and the outer stream saw the error
    assert_eq!(inner.values(), vec![1, 2]);
    assert_eq!(inner.terminal_count(), 2);
    assert!(inner.is_errored());
    assert!(outer_errored.load(Ordering::SeqCst));
}

#[test]
fn test_group_by_key_selector_panic_fails_the_stream() {
    // Act
    let recorder = Recorder::new();
    Observable::range(1, 6)
        .group_by(|n| {
            assert!(*n != 4, "selector rejects {n}");
            n % 2
        })
        .flat_map(|group| group.observable())
        .subscribe_observer(recorder.observer());

    // Assert - values before the failure were routed, then one error
    assert_eq!(recorder.values(), vec![1, 2, 3]);
    assert!(recorder.is_errored());
    assert_eq!(recorder.terminal_count(), 1);
}
