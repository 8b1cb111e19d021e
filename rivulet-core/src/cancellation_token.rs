// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Cooperative cancellation token.
//!
//! This module provides the shared stop flag that links a [`Subscription`]
//! to everything working on its behalf: producers poll it, pending scheduler
//! tasks check it before running, and timed waits park on it so they wake
//! early when the flag is set.
//!
//! Tokens form a tree. An operator that needs to stop its upstream without
//! silencing its own downstream (e.g. `take` after the nth value) holds a
//! *child* token for the upstream leg: cancelling a parent cancels all of
//! its children, never the reverse.
//!
//! [`Subscription`]: crate::Subscription

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Weak};
use std::time::{Duration, Instant};

use event_listener::{Event, Listener};
use parking_lot::Mutex;

/// Cooperative cancellation flag, clonable and shareable across threads.
///
/// A `CancellationToken` can be cloned to create multiple handles to the
/// same cancellation state. When `cancel()` is called on any clone, all
/// blocked waiters are woken and every child token is cancelled as well.
///
/// # Example
///
/// ```
/// use rivulet_core::CancellationToken;
///
/// let token = CancellationToken::new();
/// let child = token.child_token();
///
/// token.cancel();
/// assert!(token.is_cancelled());
/// assert!(child.is_cancelled());
/// ```
#[derive(Clone, Debug)]
pub struct CancellationToken {
    inner: Arc<Inner>,
}

#[derive(Debug)]
struct Inner {
    cancelled: AtomicBool,
    event: Event,
    children: Mutex<Vec<Weak<Inner>>>,
}

impl CancellationToken {
    /// Create a new, not yet cancelled token.
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Inner {
                cancelled: AtomicBool::new(false),
                event: Event::new(),
                children: Mutex::new(Vec::new()),
            }),
        }
    }

    /// Cancel the token, waking all waiters and cancelling all children.
    ///
    /// This method is idempotent. Calling it multiple times has the same
    /// effect as calling it once.
    pub fn cancel(&self) {
        // Set flag first with release ordering so all prior writes are
        // visible to waiters before they are notified
        if self.inner.cancelled.swap(true, Ordering::AcqRel) {
            return;
        }

        self.inner.event.notify(usize::MAX);

        let children = std::mem::take(&mut *self.inner.children.lock());
        for child in children {
            if let Some(inner) = child.upgrade() {
                Self { inner }.cancel();
            }
        }
    }

    /// Check if the token has been cancelled (non-blocking).
    ///
    /// # Example
    ///
    /// ```
    /// use rivulet_core::CancellationToken;
    ///
    /// let token = CancellationToken::new();
    /// assert!(!token.is_cancelled());
    ///
    /// token.cancel();
    /// assert!(token.is_cancelled());
    /// ```
    pub fn is_cancelled(&self) -> bool {
        self.inner.cancelled.load(Ordering::Acquire)
    }

    /// Create a child token that is cancelled whenever this token is.
    ///
    /// Cancelling the child does not affect the parent. If this token is
    /// already cancelled, the child is created cancelled.
    pub fn child_token(&self) -> Self {
        let child = Self::new();
        if self.is_cancelled() {
            child.cancel();
            return child;
        }

        self.inner
            .children
            .lock()
            .push(Arc::downgrade(&child.inner));

        // A cancel racing with the push above may have drained the child
        // list before our entry landed; re-check the flag so the child can
        // never miss the cancellation.
        if self.is_cancelled() {
            child.cancel();
        }
        child
    }

    /// Block the calling thread until the token is cancelled or the timeout
    /// elapses, whichever comes first.
    ///
    /// Returns `true` if the token was cancelled, `false` on timeout. The
    /// wait parks on an [`event_listener::Event`], so cancellation wakes the
    /// caller immediately rather than after the full timeout.
    pub fn wait_timeout(&self, timeout: Duration) -> bool {
        if self.is_cancelled() {
            return true;
        }
        let deadline = Instant::now() + timeout;
        loop {
            let listener = self.inner.event.listen();
            if self.is_cancelled() {
                return true;
            }
            if listener.wait_deadline(deadline).is_none() {
                // Timed out
                return self.is_cancelled();
            }
            if self.is_cancelled() {
                return true;
            }
            if Instant::now() >= deadline {
                return self.is_cancelled();
            }
        }
    }
}

impl Default for CancellationToken {
    fn default() -> Self {
        Self::new()
    }
}
