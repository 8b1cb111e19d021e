// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Flat-map operator: merge dynamically created inner streams.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use rivulet_core::{catch_callback, Observer, RivuletError, Subscriber};

use crate::observable::Observable;

impl<T: Send + 'static> Observable<T> {
    /// For each upstream value compute an inner observable via `f` and merge
    /// all inner outputs into the output stream.
    ///
    /// Merge semantics apply: inner values are relayed as they arrive, and
    /// upstream completion completes the output only once every
    /// currently-active inner observable has also completed. An error from
    /// upstream, from `f`, or from any inner observable is forwarded once
    /// and cancels the whole subtree.
    ///
    /// # Examples
    ///
    /// ```
    /// use rivulet_stream::Observable;
    ///
    /// let repeated = Observable::from_vec(vec![1u64, 2])
    ///     .flat_map(|n| Observable::range(0, n));
    /// assert_eq!(repeated.blocking().collect().unwrap().len(), 3);
    /// ```
    pub fn flat_map<U: Send + 'static>(
        self,
        f: impl Fn(T) -> Observable<U> + Send + Sync + 'static,
    ) -> Observable<U> {
        let f: Arc<dyn Fn(T) -> Observable<U> + Send + Sync> = Arc::new(f);
        Observable::create(move |down: Subscriber<U>| {
            let state = Arc::new(FlatMapState {
                down,
                // Upstream itself counts as one active leg.
                active: AtomicUsize::new(1),
            });
            let up_token = state.down.token().child_token();
            self.subscribe_with_token(
                OuterObserver {
                    state: Arc::clone(&state),
                    f: Arc::clone(&f),
                },
                up_token,
            );
        })
    }
}

struct FlatMapState<U> {
    down: Subscriber<U>,
    /// Upstream plus all live inner subscriptions.
    active: AtomicUsize,
}

impl<U: Send + 'static> FlatMapState<U> {
    fn leg_finished(&self) {
        if self.active.fetch_sub(1, Ordering::AcqRel) == 1 {
            self.down.on_complete();
        }
    }
}

struct OuterObserver<T, U> {
    state: Arc<FlatMapState<U>>,
    f: Arc<dyn Fn(T) -> Observable<U> + Send + Sync>,
}

impl<T: Send, U: Send + 'static> Observer<T> for OuterObserver<T, U> {
    fn on_next(&mut self, value: T) {
        let inner = match catch_callback("flat_map", || (self.f)(value)) {
            Ok(inner) => inner,
            Err(error) => {
                self.state.down.on_error(error);
                return;
            }
        };
        self.state.active.fetch_add(1, Ordering::AcqRel);
        let inner_token = self.state.down.token().child_token();
        inner.subscribe_with_token(
            InnerObserver {
                state: Arc::clone(&self.state),
            },
            inner_token,
        );
    }

    fn on_error(&mut self, error: RivuletError) {
        self.state.down.on_error(error);
    }

    fn on_complete(&mut self) {
        self.state.leg_finished();
    }
}

struct InnerObserver<U> {
    state: Arc<FlatMapState<U>>,
}

impl<U: Send + 'static> Observer<U> for InnerObserver<U> {
    fn on_next(&mut self, value: U) {
        self.state.down.on_next(value);
    }

    fn on_error(&mut self, error: RivuletError) {
        self.state.down.on_error(error);
    }

    fn on_complete(&mut self) {
        self.state.leg_finished();
    }
}
