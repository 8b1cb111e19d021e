// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Shared delay timer.
//!
//! All delayed scheduling (except the blocking `Immediate` policy) routes
//! through one process-wide timer thread owning a min-heap of
//! `(deadline, task)` entries. Due tasks are re-dispatched to their target
//! scheduler policy, never run on the timer thread itself. Entries whose
//! token is cancelled before the deadline are dropped unrun at fire time.

use std::cmp::Ordering as CmpOrdering;
use std::collections::BinaryHeap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::OnceLock;
use std::thread;
use std::time::Instant;

use parking_lot::{Condvar, Mutex};
use rivulet_core::CancellationToken;
use tracing::{error, trace};

use crate::pool::Job;
use crate::scheduler::Scheduler;

struct TimerEntry {
    deadline: Instant,
    /// Submission order, breaking deadline ties in the heap.
    seq: u64,
    token: CancellationToken,
    scheduler: Scheduler,
    job: Job,
}

impl PartialEq for TimerEntry {
    fn eq(&self, other: &Self) -> bool {
        self.deadline == other.deadline && self.seq == other.seq
    }
}

impl Eq for TimerEntry {}

impl PartialOrd for TimerEntry {
    fn partial_cmp(&self, other: &Self) -> Option<CmpOrdering> {
        Some(self.cmp(other))
    }
}

impl Ord for TimerEntry {
    // Reversed, so the BinaryHeap max is the earliest deadline.
    fn cmp(&self, other: &Self) -> CmpOrdering {
        other
            .deadline
            .cmp(&self.deadline)
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

pub(crate) struct Timer {
    queue: Mutex<BinaryHeap<TimerEntry>>,
    entry_due: Condvar,
    next_seq: AtomicU64,
}

static TIMER: OnceLock<&'static Timer> = OnceLock::new();

impl Timer {
    pub(crate) fn global() -> &'static Timer {
        TIMER.get_or_init(|| {
            let timer: &'static Timer = Box::leak(Box::new(Timer {
                queue: Mutex::new(BinaryHeap::new()),
                entry_due: Condvar::new(),
                next_seq: AtomicU64::new(0),
            }));
            let spawned = thread::Builder::new()
                .name("rivulet-timer".to_string())
                .spawn(move || timer.run());
            if let Err(cause) = spawned {
                error!(%cause, "failed to spawn timer thread");
            }
            timer
        })
    }

    /// Queue `job` to be dispatched onto `scheduler` at `deadline`.
    pub(crate) fn submit(
        &self,
        deadline: Instant,
        token: CancellationToken,
        scheduler: Scheduler,
        job: Job,
    ) {
        let entry = TimerEntry {
            deadline,
            seq: self.next_seq.fetch_add(1, Ordering::Relaxed),
            token,
            scheduler,
            job,
        };
        self.queue.lock().push(entry);
        self.entry_due.notify_one();
    }

    fn run(&self) {
        let mut queue = self.queue.lock();
        loop {
            let now = Instant::now();
            match queue.peek() {
                None => {
                    self.entry_due.wait(&mut queue);
                }
                Some(head) if head.deadline <= now => {
                    let entry = queue.pop().expect("peeked entry must pop");
                    // Dispatch without holding the queue lock so submissions
                    // are never blocked behind a slow pool hand-off.
                    drop(queue);
                    if entry.token.is_cancelled() {
                        trace!("dropping cancelled timer entry");
                    } else {
                        entry.scheduler.dispatch(entry.token, entry.job);
                    }
                    queue = self.queue.lock();
                }
                Some(head) => {
                    let deadline = head.deadline;
                    self.entry_due.wait_until(&mut queue, deadline);
                }
            }
        }
    }
}
