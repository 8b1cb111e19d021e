// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Consumer-side subscription handle.

use crate::cancellation_token::CancellationToken;

/// The live link created by one subscribe call.
///
/// A `Subscription` owns the root cancellation token of everything started
/// on the subscription's behalf: the producer, operator-internal upstream
/// legs (child tokens) and any scheduler tasks still pending. Calling
/// [`cancel`](Self::cancel) stops all of them cooperatively; after it
/// returns, no further callback is invoked on this subscription.
///
/// Dropping the handle does *not* cancel the subscription; a fire-and-forget
/// subscribe keeps running until it terminates on its own.
#[derive(Clone, Debug)]
pub struct Subscription {
    token: CancellationToken,
}

impl Subscription {
    /// Wrap the root token of a new subscription.
    pub fn new(token: CancellationToken) -> Self {
        Self { token }
    }

    /// Request cancellation of the whole subscription subtree.
    pub fn cancel(&self) {
        self.token.cancel();
    }

    /// `true` once [`cancel`](Self::cancel) has been called or a terminal
    /// signal has been delivered.
    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }

    /// The root cancellation token.
    pub fn token(&self) -> &CancellationToken {
        &self.token
    }
}
