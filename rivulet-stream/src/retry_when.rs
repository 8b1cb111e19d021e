// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Retry-when operator: re-subscription driven by a control stream.

use std::sync::Arc;

use rivulet_core::{catch_callback, Observer, RivuletError, Subscriber};

use crate::observable::Observable;
use crate::publisher::Publisher;

impl<T: Send + 'static> Observable<T> {
    /// On upstream error, consult a control stream to decide whether to
    /// re-subscribe.
    ///
    /// At subscribe time `handler` is called once with an observable of the
    /// source's errors. Each value the returned control observable emits
    /// triggers one re-subscription to the source; if the control
    /// observable errors or completes instead, the retry sequence stops and
    /// that outcome becomes the subscription's terminal signal.
    ///
    /// The runtime enforces no retry limit. Bounded attempt counts and
    /// delayed/backoff retries are policy, expressed entirely inside
    /// `handler` by pairing each error with an attempt index (`zip_with` a
    /// `range`), mapping the index into a `timer` delay, and erroring
    /// deliberately once the attempt budget is spent.
    ///
    /// # Examples
    ///
    /// Retry twice, then give up with the original error:
    ///
    /// ```
    /// use rivulet_core::RivuletError;
    /// use rivulet_stream::Observable;
    ///
    /// let flaky = Observable::<i32>::error(RivuletError::stream_error("boom"));
    /// let result = flaky
    ///     .retry_when(|errors| {
    ///         errors
    ///             .zip_with(Observable::range(1, 3), |error, attempt| (error, attempt))
    ///             .flat_map(|(error, attempt)| {
    ///                 if attempt < 3 {
    ///                     Observable::just(attempt)
    ///                 } else {
    ///                     Observable::error(error)
    ///                 }
    ///             })
    ///     })
    ///     .blocking()
    ///     .collect();
    /// assert!(result.is_err());
    /// ```
    pub fn retry_when<S: Send + 'static>(
        self,
        handler: impl Fn(Observable<RivuletError>) -> Observable<S> + Send + Sync + 'static,
    ) -> Observable<T> {
        let handler = Arc::new(handler);
        Observable::create(move |down: Subscriber<T>| {
            let errors = Publisher::<RivuletError>::new();
            let state = Arc::new(RetryState {
                source: self.clone(),
                down: down.clone(),
                errors: errors.clone(),
            });

            let control = match catch_callback("retry_when", || (handler)(errors.observable())) {
                Ok(control) => control,
                Err(error) => {
                    down.on_error(error);
                    return;
                }
            };

            // The control stream must be listening before the first attempt
            // runs, or a synchronous first failure would be buffered instead
            // of driving a retry decision.
            let control_token = down.token().child_token();
            control.subscribe_with_token(ControlObserver::new(Arc::clone(&state)), control_token);

            state.subscribe_attempt();
        })
    }
}

struct RetryState<T> {
    source: Observable<T>,
    down: Subscriber<T>,
    errors: Publisher<RivuletError>,
}

impl<T: Send + 'static> RetryState<T> {
    fn subscribe_attempt(self: &Arc<Self>) {
        let attempt_token = self.down.token().child_token();
        self.source.subscribe_with_token(
            AttemptObserver {
                state: Arc::clone(self),
            },
            attempt_token,
        );
    }
}

/// One subscription attempt against the source: values and completion pass
/// through, errors are diverted into the control loop.
struct AttemptObserver<T> {
    state: Arc<RetryState<T>>,
}

impl<T: Send + 'static> Observer<T> for AttemptObserver<T> {
    fn on_next(&mut self, value: T) {
        self.state.down.on_next(value);
    }

    fn on_error(&mut self, error: RivuletError) {
        self.state.errors.push(error);
    }

    fn on_complete(&mut self) {
        self.state.down.on_complete();
    }
}

struct ControlObserver<T, S> {
    state: Arc<RetryState<T>>,
    _marker: std::marker::PhantomData<fn(S)>,
}

impl<T, S> ControlObserver<T, S> {
    fn new(state: Arc<RetryState<T>>) -> Self {
        Self {
            state,
            _marker: std::marker::PhantomData,
        }
    }
}

impl<T: Send + 'static, S: Send> Observer<S> for ControlObserver<T, S> {
    fn on_next(&mut self, _signal: S) {
        self.state.subscribe_attempt();
    }

    fn on_error(&mut self, error: RivuletError) {
        self.state.down.on_error(error);
    }

    fn on_complete(&mut self) {
        self.state.down.on_complete();
    }
}
