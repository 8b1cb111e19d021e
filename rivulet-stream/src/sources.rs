// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Source constructors: fixed sequences, signals and timed emitters.

use std::time::Duration;

use rivulet_core::{RivuletError, Subscriber};
use rivulet_scheduler::Scheduler;

use crate::observable::Observable;

impl<T: Send + 'static> Observable<T> {
    /// Emit a single value, then complete.
    pub fn just(value: T) -> Self
    where
        T: Clone + Sync,
    {
        Self::create(move |subscriber| {
            subscriber.on_next(value.clone());
            subscriber.on_complete();
        })
    }

    /// Emit the elements of a vector in order, then complete.
    pub fn from_vec(values: Vec<T>) -> Self
    where
        T: Clone + Sync,
    {
        Self::create(move |subscriber| {
            for value in &values {
                if subscriber.is_cancelled() {
                    return;
                }
                subscriber.on_next(value.clone());
            }
            subscriber.on_complete();
        })
    }

    /// Emit the elements of an iterable in order, then complete.
    ///
    /// The iterable is cloned per subscription, so every subscriber sees the
    /// full sequence from the start.
    pub fn from_iter<I>(iterable: I) -> Self
    where
        I: IntoIterator<Item = T> + Clone + Send + Sync + 'static,
    {
        Self::create(move |subscriber| {
            for value in iterable.clone() {
                if subscriber.is_cancelled() {
                    return;
                }
                subscriber.on_next(value);
            }
            subscriber.on_complete();
        })
    }

    /// Complete immediately without emitting.
    pub fn empty() -> Self {
        Self::create(|subscriber| subscriber.on_complete())
    }

    /// Never emit and never terminate.
    pub fn never() -> Self {
        Self::create(|_subscriber| {})
    }

    /// Fail immediately with `error`.
    pub fn error(error: RivuletError) -> Self {
        Self::create(move |subscriber| subscriber.on_error(error.clone()))
    }
}

impl Observable<u64> {
    /// Emit `count` consecutive integers starting at `start`, then complete.
    ///
    /// A range reaching past `u64::MAX` is truncated at the end of the
    /// domain rather than wrapping.
    pub fn range(start: u64, count: u64) -> Self {
        Self::from_iter(start..start.saturating_add(count))
    }

    /// Emit a single `0` after `delay` on the compute scheduler, then
    /// complete.
    pub fn timer(delay: Duration) -> Self {
        Self::timer_on(delay, Scheduler::Compute)
    }

    /// Emit a single `0` after `delay` on the given scheduler, then
    /// complete.
    ///
    /// Subscribing returns immediately (except under
    /// [`Scheduler::Immediate`], whose delay blocks the caller); the pending
    /// tick is dropped unrun if the subscription is cancelled first.
    pub fn timer_on(delay: Duration, scheduler: Scheduler) -> Self {
        Self::create(move |subscriber| {
            let token = subscriber.token().clone();
            scheduler.schedule_after_with_token(token, delay, move || {
                subscriber.on_next(0);
                subscriber.on_complete();
            });
        })
    }

    /// Emit an increasing counter forever: the first tick after
    /// `initial_delay`, subsequent ticks every `period`, on the compute
    /// scheduler.
    pub fn interval(initial_delay: Duration, period: Duration) -> Self {
        Self::interval_on(initial_delay, period, Scheduler::Compute)
    }

    /// Periodic counter on an explicit scheduler.
    ///
    /// The sequence never completes on its own; compose with `take` or
    /// cancel the subscription to stop it.
    pub fn interval_on(initial_delay: Duration, period: Duration, scheduler: Scheduler) -> Self {
        Self::create(move |subscriber| {
            schedule_tick(subscriber, scheduler, initial_delay, period, 0);
        })
    }
}

fn schedule_tick(
    subscriber: Subscriber<u64>,
    scheduler: Scheduler,
    delay: Duration,
    period: Duration,
    tick: u64,
) {
    let token = subscriber.token().clone();
    scheduler.schedule_after_with_token(token, delay, move || {
        subscriber.on_next(tick);
        if !subscriber.is_cancelled() {
            schedule_tick(subscriber, scheduler, period, period, tick + 1);
        }
    });
}
