// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Recording observer for assertions on stream output.

use std::sync::Arc;
use std::time::{Duration, Instant};

use parking_lot::{Condvar, Mutex};
use rivulet_core::{Observer, RivuletError, StreamEvent};

/// Records every event a subscription delivers, for later assertions.
///
/// The recorder handle stays with the test while the observer produced by
/// [`observer`](Recorder::observer) is handed to the subscription; both
/// share the same storage.
///
/// # Examples
///
/// ```
/// use rivulet_stream::Observable;
/// use rivulet_test_utils::Recorder;
///
/// let recorder = Recorder::new();
/// Observable::from_vec(vec![1, 2]).subscribe_observer(recorder.observer());
/// assert_eq!(recorder.values(), vec![1, 2]);
/// assert!(recorder.is_completed());
/// ```
pub struct Recorder<T> {
    inner: Arc<RecorderInner<T>>,
}

struct RecorderInner<T> {
    events: Mutex<Vec<StreamEvent<T>>>,
    terminated: Condvar,
}

impl<T> Clone for Recorder<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<T: Send + 'static> Recorder<T> {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(RecorderInner {
                events: Mutex::new(Vec::new()),
                terminated: Condvar::new(),
            }),
        }
    }

    /// An observer feeding this recorder; pass it to `subscribe_observer`.
    pub fn observer(&self) -> RecorderObserver<T> {
        RecorderObserver {
            inner: Arc::clone(&self.inner),
        }
    }

    /// All values recorded so far, in delivery order.
    pub fn values(&self) -> Vec<T>
    where
        T: Clone,
    {
        self.inner
            .events
            .lock()
            .iter()
            .filter_map(|event| match event {
                StreamEvent::Value(value) => Some(value.clone()),
                _ => None,
            })
            .collect()
    }

    /// Number of values recorded so far.
    pub fn value_count(&self) -> usize {
        self.inner
            .events
            .lock()
            .iter()
            .filter(|event| matches!(event, StreamEvent::Value(_)))
            .count()
    }

    /// The recorded terminal error, if the stream failed.
    pub fn error(&self) -> Option<RivuletError> {
        self.inner.events.lock().iter().find_map(|event| match event {
            StreamEvent::Error(error) => Some(error.clone()),
            _ => None,
        })
    }

    pub fn is_completed(&self) -> bool {
        self.inner
            .events
            .lock()
            .iter()
            .any(|event| matches!(event, StreamEvent::Complete))
    }

    pub fn is_errored(&self) -> bool {
        self.error().is_some()
    }

    /// Number of terminal events recorded; must never exceed one.
    pub fn terminal_count(&self) -> usize {
        self.inner
            .events
            .lock()
            .iter()
            .filter(|event| event.is_terminal())
            .count()
    }

    /// Block until a terminal event arrives or `timeout` elapses.
    ///
    /// Returns `true` if the stream terminated within the timeout.
    pub fn await_terminal(&self, timeout: Duration) -> bool {
        let deadline = Instant::now() + timeout;
        let mut events = self.inner.events.lock();
        while !events.iter().any(StreamEvent::is_terminal) {
            if self
                .inner
                .terminated
                .wait_until(&mut events, deadline)
                .timed_out()
            {
                return events.iter().any(StreamEvent::is_terminal);
            }
        }
        true
    }
}

impl<T: Send + 'static> Default for Recorder<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// The [`Observer`] half of a [`Recorder`].
pub struct RecorderObserver<T> {
    inner: Arc<RecorderInner<T>>,
}

impl<T> RecorderObserver<T> {
    fn record(&self, event: StreamEvent<T>) {
        let terminal = event.is_terminal();
        let mut events = self.inner.events.lock();
        events.push(event);
        if terminal {
            self.inner.terminated.notify_all();
        }
    }
}

impl<T: Send> Observer<T> for RecorderObserver<T> {
    fn on_next(&mut self, value: T) {
        self.record(StreamEvent::Value(value));
    }

    fn on_error(&mut self, error: RivuletError) {
        self.record(StreamEvent::Error(error));
    }

    fn on_complete(&mut self) {
        self.record(StreamEvent::Complete);
    }
}
