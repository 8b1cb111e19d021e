// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::mpsc;
use std::sync::Arc;
use std::time::{Duration, Instant};

use rivulet_core::CancellationToken;
use rivulet_scheduler::Scheduler;

fn current_thread_name() -> String {
    std::thread::current().name().unwrap_or("<unnamed>").to_string()
}

#[test]
fn test_immediate_runs_on_calling_thread() {
    // Arrange
    let ran_on = Arc::new(parking_lot::Mutex::new(String::new()));
    let slot = Arc::clone(&ran_on);

    // Act
    Scheduler::Immediate.schedule(move || {
        *slot.lock() = current_thread_name();
    });

    // Assert - ran synchronously, on this very thread
    assert_eq!(*ran_on.lock(), current_thread_name());
}

#[test]
fn test_io_pool_runs_on_named_worker() -> anyhow::Result<()> {
    // Arrange
    let (tx, rx) = mpsc::channel();

    // Act
    Scheduler::Io.schedule(move || {
        let _ = tx.send(current_thread_name());
    });

    // Assert
    let name = rx.recv_timeout(Duration::from_secs(5))?;
    assert!(name.starts_with("rivulet-io-"), "unexpected worker: {name}");
    Ok(())
}

#[test]
fn test_compute_pool_runs_on_named_worker() -> anyhow::Result<()> {
    // Arrange
    let (tx, rx) = mpsc::channel();

    // Act
    Scheduler::Compute.schedule(move || {
        let _ = tx.send(current_thread_name());
    });

    // Assert
    let name = rx.recv_timeout(Duration::from_secs(5))?;
    assert!(
        name.starts_with("rivulet-compute-"),
        "unexpected worker: {name}"
    );
    Ok(())
}

#[test]
fn test_new_thread_runs_off_calling_thread() -> anyhow::Result<()> {
    // Arrange
    let (tx, rx) = mpsc::channel();
    let caller = current_thread_name();

    // Act
    Scheduler::NewThread.schedule(move || {
        let _ = tx.send(current_thread_name());
    });

    // Assert
    let name = rx.recv_timeout(Duration::from_secs(5))?;
    assert_ne!(name, caller);
    assert!(name.starts_with("rivulet-thread"), "unexpected worker: {name}");
    Ok(())
}

#[test]
fn test_delayed_task_fires_after_delay() -> anyhow::Result<()> {
    // Arrange
    let (tx, rx) = mpsc::channel();
    let started = Instant::now();

    // Act
    Scheduler::Io.schedule_after(Duration::from_millis(50), move || {
        let _ = tx.send(Instant::now());
    });

    // Assert
    let fired = rx.recv_timeout(Duration::from_secs(5))?;
    assert!(fired.duration_since(started) >= Duration::from_millis(45));
    Ok(())
}

#[test]
fn test_delayed_tasks_fire_in_deadline_order() -> anyhow::Result<()> {
    // Arrange
    let (tx, rx) = mpsc::channel();
    let tx_late = tx.clone();

    // Act - submit the later deadline first
    Scheduler::Io.schedule_after(Duration::from_millis(120), move || {
        let _ = tx_late.send("late");
    });
    Scheduler::Io.schedule_after(Duration::from_millis(30), move || {
        let _ = tx.send("early");
    });

    // Assert
    assert_eq!(rx.recv_timeout(Duration::from_secs(5))?, "early");
    assert_eq!(rx.recv_timeout(Duration::from_secs(5))?, "late");
    Ok(())
}

#[test]
fn test_cancelled_pending_task_never_runs() {
    // Arrange
    let ran = Arc::new(AtomicUsize::new(0));
    let marker = Arc::clone(&ran);

    // Act - cancel while the task is still pending on the timer
    let handle = Scheduler::Io.schedule_after(Duration::from_millis(100), move || {
        marker.fetch_add(1, Ordering::SeqCst);
    });
    handle.cancel();
    std::thread::sleep(Duration::from_millis(250));

    // Assert
    assert_eq!(ran.load(Ordering::SeqCst), 0);
}

#[test]
fn test_task_scheduled_under_cancelled_token_is_dropped() {
    // Arrange
    let token = CancellationToken::new();
    token.cancel();
    let ran = Arc::new(AtomicUsize::new(0));
    let marker = Arc::clone(&ran);

    // Act
    Scheduler::Compute.schedule_with_token(token, move || {
        marker.fetch_add(1, Ordering::SeqCst);
    });
    std::thread::sleep(Duration::from_millis(100));

    // Assert
    assert_eq!(ran.load(Ordering::SeqCst), 0);
}

#[test]
fn test_immediate_delay_wakes_early_on_cancel() {
    // Arrange
    let token = CancellationToken::new();
    let canceller = token.clone();
    std::thread::spawn(move || {
        std::thread::sleep(Duration::from_millis(30));
        canceller.cancel();
    });
    let ran = Arc::new(AtomicUsize::new(0));
    let marker = Arc::clone(&ran);
    let started = Instant::now();

    // Act - blocks the caller, but only until the cancel lands
    Scheduler::Immediate.schedule_after_with_token(token, Duration::from_secs(10), move || {
        marker.fetch_add(1, Ordering::SeqCst);
    });

    // Assert
    assert!(started.elapsed() < Duration::from_secs(5));
    assert_eq!(ran.load(Ordering::SeqCst), 0);
}
