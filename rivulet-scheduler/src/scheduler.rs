// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Scheduler policies.
//!
//! A [`Scheduler`] accepts a unit of work and an optional delay, and
//! guarantees execution on some worker context. Callers pick one of the
//! named policies by value; arbitrary custom executors are deliberately not
//! injectable, so the ordering and cancellation contracts of the stream
//! operators stay verifiable against a closed set of policies.

use std::sync::OnceLock;
use std::thread;
use std::time::{Duration, Instant};

use rivulet_core::CancellationToken;
use tracing::{error, trace};

use crate::pool::{Job, WorkerPool};
use crate::task::TaskHandle;
use crate::timer::Timer;

static IO_POOL: OnceLock<WorkerPool> = OnceLock::new();
static COMPUTE_POOL: OnceLock<WorkerPool> = OnceLock::new();

fn io_pool() -> &'static WorkerPool {
    IO_POOL.get_or_init(|| WorkerPool::cached("rivulet-io"))
}

fn compute_pool() -> &'static WorkerPool {
    COMPUTE_POOL.get_or_init(|| WorkerPool::fixed("rivulet-compute", num_cpus::get()))
}

/// Where and when a unit of work executes.
///
/// # Policies
///
/// - [`Immediate`](Self::Immediate): run synchronously on the calling
///   thread. A delayed task sleeps the caller (waking early on
///   cancellation) and then runs; this is the only policy where a delay
///   blocks the scheduling context.
/// - [`Io`](Self::Io): cached, growing worker pool for blocking or
///   latency-bound work.
/// - [`Compute`](Self::Compute): fixed worker pool sized to the available
///   parallelism, for CPU-bound work.
/// - [`NewThread`](Self::NewThread): one fresh OS thread per scheduling
///   request, isolating a pipeline stage.
///
/// # Examples
///
/// ```
/// use rivulet_scheduler::Scheduler;
///
/// let handle = Scheduler::Io.schedule(|| {
///     // runs on a rivulet-io-N worker
/// });
/// # let _ = handle;
/// ```
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Scheduler {
    /// Run synchronously on the calling thread.
    Immediate,
    /// Cached pool for blocking/latency-bound work.
    Io,
    /// Fixed pool sized to available parallelism, for CPU-bound work.
    Compute,
    /// A dedicated, fresh OS thread per request.
    NewThread,
}

impl Scheduler {
    /// Schedule `task` for execution under a fresh token.
    pub fn schedule(self, task: impl FnOnce() + Send + 'static) -> TaskHandle {
        self.schedule_with_token(CancellationToken::new(), task)
    }

    /// Schedule `task` under an existing token.
    ///
    /// If the token is cancelled before the task starts, the task never
    /// runs: it is re-checked immediately before execution on the worker.
    pub fn schedule_with_token(
        self,
        token: CancellationToken,
        task: impl FnOnce() + Send + 'static,
    ) -> TaskHandle {
        self.dispatch(token.clone(), Box::new(task));
        TaskHandle::new(token)
    }

    /// Schedule `task` to run after `delay`, under a fresh token.
    pub fn schedule_after(self, delay: Duration, task: impl FnOnce() + Send + 'static) -> TaskHandle {
        self.schedule_after_with_token(CancellationToken::new(), delay, task)
    }

    /// Schedule `task` to run after `delay`, under an existing token.
    ///
    /// For every policy but [`Immediate`](Self::Immediate) the delay is
    /// tracked by the shared timer thread and the task is dispatched onto
    /// this policy's workers at fire time; a cancelled entry is dropped
    /// unrun. `Immediate` sleeps the calling thread instead, waking early
    /// (without running the task) if the token is cancelled.
    pub fn schedule_after_with_token(
        self,
        token: CancellationToken,
        delay: Duration,
        task: impl FnOnce() + Send + 'static,
    ) -> TaskHandle {
        if delay.is_zero() {
            return self.schedule_with_token(token, task);
        }
        match self {
            Self::Immediate => {
                if token.wait_timeout(delay) {
                    trace!("immediate delayed task dropped on cancel");
                } else {
                    task();
                }
                TaskHandle::new(token)
            }
            _ => {
                Timer::global().submit(
                    Instant::now() + delay,
                    token.clone(),
                    self,
                    Box::new(task),
                );
                TaskHandle::new(token)
            }
        }
    }

    /// Hand `job` to this policy's execution context.
    pub(crate) fn dispatch(self, token: CancellationToken, job: Job) {
        if token.is_cancelled() {
            trace!(scheduler = ?self, "dropping task scheduled under cancelled token");
            return;
        }
        match self {
            Self::Immediate => job(),
            Self::Io => io_pool().execute(guarded(token, job)),
            Self::Compute => compute_pool().execute(guarded(token, job)),
            Self::NewThread => {
                let job = guarded(token, job);
                let spawned = thread::Builder::new()
                    .name("rivulet-thread".to_string())
                    .spawn(job);
                if let Err(cause) = spawned {
                    error!(%cause, "failed to spawn dedicated scheduler thread");
                }
            }
        }
    }
}

/// Re-check the token on the worker, immediately before running.
fn guarded(token: CancellationToken, job: Job) -> Box<dyn FnOnce() + Send + 'static> {
    Box::new(move || {
        if token.is_cancelled() {
            trace!("dropping pending task whose token was cancelled");
            return;
        }
        job();
    })
}
