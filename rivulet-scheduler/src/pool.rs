// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Worker pools backing the pooled scheduler policies.
//!
//! Two flavours share one implementation:
//!
//! - the **io** pool grows on demand: a submission spawns a fresh worker
//!   whenever no idle worker is available, and idle workers retire after a
//!   keep-alive timeout;
//! - the **compute** pool is fixed-size, one worker per available core,
//!   spawned up front on first use.
//!
//! Workers park on a shared [`crossbeam_channel`] injector queue. A panic in
//! a submitted job is caught and logged without killing the worker.

use std::panic::AssertUnwindSafe;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use crossbeam_channel::{unbounded, Receiver, RecvTimeoutError, Sender};
use tracing::{error, trace};

/// A unit of work accepted by a pool.
pub(crate) type Job = Box<dyn FnOnce() + Send + 'static>;

/// How long an io worker stays parked before retiring.
const IDLE_KEEP_ALIVE: Duration = Duration::from_secs(30);

pub(crate) struct WorkerPool {
    inner: Arc<PoolInner>,
}

struct PoolInner {
    name: &'static str,
    sender: Sender<Job>,
    receiver: Receiver<Job>,
    /// Workers currently parked on the injector queue.
    idle: AtomicUsize,
    next_worker_id: AtomicUsize,
    /// `Some` makes workers retire after the timeout (cached pool);
    /// `None` makes them permanent (fixed pool).
    keep_alive: Option<Duration>,
}

impl WorkerPool {
    /// Cached pool that grows whenever a job arrives and no worker is idle.
    pub(crate) fn cached(name: &'static str) -> Self {
        Self::new(name, Some(IDLE_KEEP_ALIVE))
    }

    /// Fixed pool with `workers` permanent workers, spawned immediately.
    pub(crate) fn fixed(name: &'static str, workers: usize) -> Self {
        let pool = Self::new(name, None);
        for _ in 0..workers.max(1) {
            pool.spawn_worker();
        }
        pool
    }

    fn new(name: &'static str, keep_alive: Option<Duration>) -> Self {
        let (sender, receiver) = unbounded();
        Self {
            inner: Arc::new(PoolInner {
                name,
                sender,
                receiver,
                idle: AtomicUsize::new(0),
                next_worker_id: AtomicUsize::new(0),
                keep_alive,
            }),
        }
    }

    /// Hand a job to the pool.
    pub(crate) fn execute(&self, job: Job) {
        if self.inner.keep_alive.is_some() && self.inner.idle.load(Ordering::Acquire) == 0 {
            self.spawn_worker();
        }
        // The pool owns both channel ends, so the send cannot fail.
        let _ = self.inner.sender.send(job);
    }

    fn spawn_worker(&self) {
        let id = self.inner.next_worker_id.fetch_add(1, Ordering::Relaxed);
        let name = format!("{}-{id}", self.inner.name);
        let inner = Arc::clone(&self.inner);
        let spawned = thread::Builder::new()
            .name(name.clone())
            .spawn(move || worker_loop(&inner));
        match spawned {
            Ok(_) => trace!(worker = %name, "pool worker spawned"),
            Err(cause) => error!(worker = %name, %cause, "failed to spawn pool worker"),
        }
    }
}

fn worker_loop(inner: &PoolInner) {
    loop {
        inner.idle.fetch_add(1, Ordering::AcqRel);
        let received = match inner.keep_alive {
            Some(keep_alive) => inner.receiver.recv_timeout(keep_alive),
            None => inner
                .receiver
                .recv()
                .map_err(|_| RecvTimeoutError::Disconnected),
        };
        inner.idle.fetch_sub(1, Ordering::AcqRel);

        match received {
            Ok(job) => run_job(inner.name, job),
            Err(RecvTimeoutError::Timeout) => {
                // A job may have been queued in the instant between waking
                // and deregistering as idle; drain it before retiring.
                if let Ok(job) = inner.receiver.try_recv() {
                    run_job(inner.name, job);
                    continue;
                }
                trace!(pool = inner.name, "idle pool worker retiring");
                return;
            }
            Err(RecvTimeoutError::Disconnected) => return,
        }
    }
}

fn run_job(pool: &'static str, job: Job) {
    if std::panic::catch_unwind(AssertUnwindSafe(job)).is_err() {
        error!(pool, "scheduled task panicked");
    }
}
