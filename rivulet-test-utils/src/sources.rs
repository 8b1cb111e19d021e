// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Controllable sources for exercising operator edge cases.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use rivulet_core::RivuletError;
use rivulet_stream::Observable;

/// An infinite counter that records every emission it manages to deliver.
///
/// The producer polls the subscription token between emissions, so the
/// counter freezes once the subscription is cancelled; tests assert on this
/// to prove an upstream observably stopped.
pub fn counted_infinite(emitted: Arc<AtomicUsize>) -> Observable<u64> {
    Observable::create(move |subscriber| {
        let mut next = 0u64;
        while !subscriber.is_cancelled() {
            subscriber.on_next(next);
            emitted.fetch_add(1, Ordering::SeqCst);
            next += 1;
        }
    })
}

/// A source that fails the first `failures` subscriptions and succeeds with
/// `values` afterwards, counting subscription attempts.
pub fn fail_n_times<T: Clone + Send + Sync + 'static>(
    failures: usize,
    values: Vec<T>,
    attempts: Arc<AtomicUsize>,
) -> Observable<T> {
    Observable::create(move |subscriber| {
        let attempt = attempts.fetch_add(1, Ordering::SeqCst);
        if attempt < failures {
            subscriber.on_error(RivuletError::stream_error(format!(
                "induced failure on attempt {attempt}"
            )));
            return;
        }
        for value in &values {
            subscriber.on_next(value.clone());
        }
        subscriber.on_complete();
    })
}

/// Wrap `source` so each subscription increments `subscriptions` first.
pub fn tracked<T: Send + 'static>(
    source: Observable<T>,
    subscriptions: Arc<AtomicUsize>,
) -> Observable<T> {
    Observable::create(move |subscriber| {
        subscriptions.fetch_add(1, Ordering::SeqCst);
        source.subscribe_subscriber(&subscriber);
    })
}
