// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Producer-facing emission handle.
//!
//! A [`Subscriber`] wraps one [`Observer`] with the state that makes the
//! subscription contracts hold no matter who is emitting from where:
//!
//! - a mutex around the observer, so concurrent emitters (merged sources,
//!   scheduler workers) are serialized into one delivery at a time;
//! - a terminal flag, so exactly one of `on_error`/`on_complete` wins and
//!   anything after it is ignored;
//! - the subscription's [`CancellationToken`], checked under the delivery
//!   lock so that after `cancel()` returns no further callback runs.
//!
//! Delivering a terminal signal cancels the token. Operator chains hang
//! their upstream legs off child tokens, so a terminal event tears down the
//! whole producing subtree and releases any scheduler work still pending for
//! the subscription.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use parking_lot::Mutex;

use crate::cancellation_token::CancellationToken;
use crate::error::RivuletError;
use crate::observer::Observer;
use crate::stream_event::StreamEvent;

/// Serialized, terminal-once emission handle around one [`Observer`].
///
/// Cloning a `Subscriber` clones the handle, not the observer: all clones
/// feed the same consumer and share the same terminal flag and token.
pub struct Subscriber<T> {
    inner: Arc<SubscriberInner<T>>,
}

struct SubscriberInner<T> {
    observer: Mutex<Box<dyn Observer<T>>>,
    terminal: AtomicBool,
    token: CancellationToken,
}

impl<T> Clone for Subscriber<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<T> Subscriber<T> {
    /// Bind an observer to a cancellation token.
    pub fn new(observer: impl Observer<T> + 'static, token: CancellationToken) -> Self {
        Self {
            inner: Arc::new(SubscriberInner {
                observer: Mutex::new(Box::new(observer)),
                terminal: AtomicBool::new(false),
                token,
            }),
        }
    }

    /// The cancellation token this subscriber is bound to.
    pub fn token(&self) -> &CancellationToken {
        &self.inner.token
    }

    /// `true` once the subscription has been cancelled.
    pub fn is_cancelled(&self) -> bool {
        self.inner.token.is_cancelled()
    }

    /// `true` once a terminal signal has been delivered (or suppressed by
    /// cancellation).
    pub fn is_terminated(&self) -> bool {
        self.inner.terminal.load(Ordering::Acquire)
    }

    /// Deliver a value, unless the subscription is cancelled or terminated.
    ///
    /// The flags are re-checked under the delivery lock: once `cancel()` has
    /// returned, no delivery that starts afterwards can reach the observer.
    pub fn on_next(&self, value: T) {
        if self.is_terminated() || self.is_cancelled() {
            return;
        }
        let mut observer = self.inner.observer.lock();
        if self.is_terminated() || self.is_cancelled() {
            return;
        }
        observer.on_next(value);
    }

    /// Deliver the error terminal, if no terminal has been delivered yet,
    /// then cancel the token.
    pub fn on_error(&self, error: RivuletError) {
        let mut observer = self.inner.observer.lock();
        if self.is_cancelled() {
            self.inner.terminal.store(true, Ordering::Release);
            return;
        }
        if self.inner.terminal.swap(true, Ordering::AcqRel) {
            return;
        }
        observer.on_error(error);
        drop(observer);
        self.inner.token.cancel();
    }

    /// Deliver the completion terminal, if no terminal has been delivered
    /// yet, then cancel the token.
    pub fn on_complete(&self) {
        let mut observer = self.inner.observer.lock();
        if self.is_cancelled() {
            self.inner.terminal.store(true, Ordering::Release);
            return;
        }
        if self.inner.terminal.swap(true, Ordering::AcqRel) {
            return;
        }
        observer.on_complete();
        drop(observer);
        self.inner.token.cancel();
    }

    /// Deliver a materialized event.
    pub fn emit(&self, event: StreamEvent<T>) {
        match event {
            StreamEvent::Value(value) => self.on_next(value),
            StreamEvent::Error(error) => self.on_error(error),
            StreamEvent::Complete => self.on_complete(),
        }
    }
}
