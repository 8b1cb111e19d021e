// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Handle to a scheduled unit of work.

use rivulet_core::CancellationToken;

/// Cancel-handle returned by every scheduling call.
///
/// The handle shares the token the task was scheduled under. Cancelling it
/// prevents a still-pending task from running: pooled tasks re-check the
/// token immediately before execution, and the delay timer drops cancelled
/// entries at fire time. A task that is already running is not interrupted.
#[derive(Clone, Debug)]
pub struct TaskHandle {
    token: CancellationToken,
}

impl TaskHandle {
    /// Wrap the token a task was scheduled under.
    pub fn new(token: CancellationToken) -> Self {
        Self { token }
    }

    /// Prevent the task from running if it has not started yet.
    pub fn cancel(&self) {
        self.token.cancel();
    }

    /// `true` once the task's token has been cancelled.
    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }

    /// The token the task was scheduled under.
    pub fn token(&self) -> &CancellationToken {
        &self.token
    }
}
