// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Merge operator: interleave several sources into one stream.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use rivulet_core::{Observer, RivuletError, Subscriber};

use crate::observable::Observable;

impl<T: Send + 'static> Observable<T> {
    /// Subscribe to all `sources` and relay their values as they arrive.
    ///
    /// Values are interleaved by real-time delivery order; within one source
    /// emission order is preserved, across sources no ordering is
    /// guaranteed. The output completes only after every source has
    /// completed. The first error wins: it is forwarded downstream and all
    /// remaining sources are cancelled.
    ///
    /// Sources are subscribed on the calling context; concurrency comes
    /// from the sources themselves (e.g. `subscribe_on`), not from merge.
    ///
    /// # Examples
    ///
    /// ```
    /// use rivulet_stream::Observable;
    /// use rivulet_scheduler::Scheduler;
    ///
    /// let a = Observable::from_vec(vec![1, 2]).subscribe_on(Scheduler::Io);
    /// let b = Observable::from_vec(vec![3, 4]).subscribe_on(Scheduler::Io);
    /// let mut merged = Observable::merge(vec![a, b]).blocking().collect().unwrap();
    /// merged.sort();
    /// assert_eq!(merged, vec![1, 2, 3, 4]);
    /// ```
    pub fn merge(sources: Vec<Observable<T>>) -> Observable<T> {
        Observable::create(move |down: Subscriber<T>| {
            if sources.is_empty() {
                down.on_complete();
                return;
            }
            let remaining = Arc::new(AtomicUsize::new(sources.len()));
            for source in &sources {
                let up_token = down.token().child_token();
                source.subscribe_with_token(
                    MergeObserver {
                        down: down.clone(),
                        remaining: Arc::clone(&remaining),
                    },
                    up_token,
                );
            }
        })
    }

    /// Merge `self` with one other source.
    pub fn merge_with(self, other: Observable<T>) -> Observable<T> {
        Self::merge(vec![self, other])
    }
}

/// The downstream [`Subscriber`] serializes concurrent deliveries and
/// deduplicates terminals; its token parents every source leg, so the first
/// error tears the remaining sources down.
struct MergeObserver<T> {
    down: Subscriber<T>,
    remaining: Arc<AtomicUsize>,
}

impl<T: Send + 'static> Observer<T> for MergeObserver<T> {
    fn on_next(&mut self, value: T) {
        self.down.on_next(value);
    }

    fn on_error(&mut self, error: RivuletError) {
        self.down.on_error(error);
    }

    fn on_complete(&mut self) {
        if self.remaining.fetch_sub(1, Ordering::AcqRel) == 1 {
            self.down.on_complete();
        }
    }
}
