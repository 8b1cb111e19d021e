// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Consumer-side callback set.
//!
//! An [`Observer`] is what a subscription delivers into: a value handler, an
//! error handler and a completion handler. Operators implement it with small
//! structs; consumers usually build one from closures via [`FnObserver`].

use crate::error::RivuletError;

/// The consumer capability set of a subscription.
///
/// The runtime guarantees the terminal-once contract for every observer it
/// drives: after `on_error` or `on_complete` has been invoked, no further
/// calls occur on that subscription. Implementors do not need to defend
/// against late emissions themselves.
pub trait Observer<T>: Send {
    /// Called for each emitted value, in emission order.
    fn on_next(&mut self, value: T);

    /// Called at most once, on terminal failure.
    fn on_error(&mut self, error: RivuletError);

    /// Called at most once, on terminal completion.
    fn on_complete(&mut self);
}

/// Closure-backed [`Observer`] with optional handlers.
///
/// Handlers that were not supplied are no-ops, with one exception: an error
/// reaching an observer without an error handler is logged at `error!`
/// level as a last resort, so failures never disappear silently. The core
/// itself never prints.
///
/// # Examples
///
/// ```
/// use rivulet_core::FnObserver;
///
/// let observer = FnObserver::new()
///     .with_next(|value: i32| println!("got {value}"))
///     .with_complete(|| println!("done"));
/// # let _ = observer;
/// ```
pub struct FnObserver<T> {
    next: Option<Box<dyn FnMut(T) + Send>>,
    error: Option<Box<dyn FnMut(RivuletError) + Send>>,
    complete: Option<Box<dyn FnMut() + Send>>,
}

impl<T> FnObserver<T> {
    /// Create an observer with no handlers.
    #[must_use]
    pub fn new() -> Self {
        Self {
            next: None,
            error: None,
            complete: None,
        }
    }

    /// Set the value handler.
    #[must_use]
    pub fn with_next(mut self, f: impl FnMut(T) + Send + 'static) -> Self {
        self.next = Some(Box::new(f));
        self
    }

    /// Set the error handler.
    #[must_use]
    pub fn with_error(mut self, f: impl FnMut(RivuletError) + Send + 'static) -> Self {
        self.error = Some(Box::new(f));
        self
    }

    /// Set the completion handler.
    #[must_use]
    pub fn with_complete(mut self, f: impl FnMut() + Send + 'static) -> Self {
        self.complete = Some(Box::new(f));
        self
    }
}

impl<T> Default for FnObserver<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Send> Observer<T> for FnObserver<T> {
    fn on_next(&mut self, value: T) {
        if let Some(next) = &mut self.next {
            next(value);
        }
    }

    fn on_error(&mut self, error: RivuletError) {
        match &mut self.error {
            Some(handler) => handler(error),
            None => tracing::error!(%error, "unhandled stream error"),
        }
    }

    fn on_complete(&mut self) {
        if let Some(complete) = &mut self.complete {
            complete();
        }
    }
}
