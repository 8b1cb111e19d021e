// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Observe-on operator: move delivery onto a scheduler.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use parking_lot::Mutex;
use rivulet_core::{Observer, RivuletError, StreamEvent, Subscriber};
use rivulet_scheduler::Scheduler;

use crate::observable::Observable;

impl<T: Send + 'static> Observable<T> {
    /// Deliver subsequent values on `scheduler`, without changing where the
    /// upstream producer runs.
    ///
    /// The hand-off is serializing: events queue up and exactly one drain
    /// task runs at a time, so per-subscription emission order survives the
    /// thread hop. Cancellation stops the drain immediately and pending
    /// drain tasks are dropped unrun.
    pub fn observe_on(self, scheduler: Scheduler) -> Observable<T> {
        Observable::create(move |down: Subscriber<T>| {
            let state = Arc::new(HandOff {
                queue: Mutex::new(VecDeque::new()),
                wip: AtomicUsize::new(0),
                scheduler,
                down,
            });
            let up_token = state.down.token().child_token();
            self.subscribe_with_token(ObserveOnObserver { state }, up_token);
        })
    }
}

/// Single-drainer delivery queue at a scheduler boundary.
struct HandOff<T> {
    queue: Mutex<VecDeque<StreamEvent<T>>>,
    /// Queued-but-undelivered event count; the 0 -> 1 transition elects the
    /// drainer, so at most one drain task exists at a time.
    wip: AtomicUsize,
    scheduler: Scheduler,
    down: Subscriber<T>,
}

impl<T: Send + 'static> HandOff<T> {
    fn enqueue(self: &Arc<Self>, event: StreamEvent<T>) {
        if self.down.is_cancelled() {
            return;
        }
        self.queue.lock().push_back(event);
        if self.wip.fetch_add(1, Ordering::AcqRel) == 0 {
            let state = Arc::clone(self);
            self.scheduler
                .schedule_with_token(self.down.token().clone(), move || state.drain());
        }
    }

    fn drain(&self) {
        loop {
            if self.down.is_cancelled() {
                self.queue.lock().clear();
                return;
            }
            let Some(event) = self.queue.lock().pop_front() else {
                return;
            };
            self.down.emit(event);
            if self.wip.fetch_sub(1, Ordering::AcqRel) == 1 {
                return;
            }
        }
    }
}

struct ObserveOnObserver<T> {
    state: Arc<HandOff<T>>,
}

impl<T: Send + 'static> Observer<T> for ObserveOnObserver<T> {
    fn on_next(&mut self, value: T) {
        self.state.enqueue(StreamEvent::Value(value));
    }

    fn on_error(&mut self, error: RivuletError) {
        self.state.enqueue(StreamEvent::Error(error));
    }

    fn on_complete(&mut self) {
        self.state.enqueue(StreamEvent::Complete);
    }
}
