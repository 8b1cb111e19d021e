// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Internal replay-from-current hand-off point.
//!
//! A [`Publisher`] is the pushable end of a sub-stream created mid-flight by
//! an operator: the live groups of `group_by`, the open window of `window`,
//! and the error feed of `retry_when`. Values pushed before the first
//! subscriber arrives are buffered (unbounded) and replayed to that first
//! subscriber; later subscribers see only live values from their subscribe
//! point onward. After the terminal event, new subscribers receive the
//! terminal immediately.
//!
//! Routing is trampolined: events land in a dispatch queue and exactly one
//! drainer delivers at a time, with the state lock released for each
//! delivery. A delivered event may synchronously push this same publisher
//! again (the `retry_when` control loop does exactly that when the source
//! fails synchronously); the nested push only enqueues and returns, and the
//! outer drainer delivers it after the current delivery unwinds. Without the
//! queue, that re-entry would land back on a subscriber whose delivery lock
//! is still held.

use std::collections::VecDeque;
use std::sync::Arc;

use parking_lot::Mutex;
use rivulet_core::{RivuletError, StreamEvent, Subscriber};

use crate::observable::Observable;

pub(crate) struct Publisher<T> {
    state: Arc<Mutex<PublisherState<T>>>,
}

impl<T> Clone for Publisher<T> {
    fn clone(&self) -> Self {
        Self {
            state: Arc::clone(&self.state),
        }
    }
}

struct PublisherState<T> {
    subscribers: Vec<Subscriber<T>>,
    /// Values buffered while no subscriber has ever attached.
    pending: VecDeque<T>,
    /// Accepted but not yet delivered events.
    queue: VecDeque<StreamEvent<T>>,
    /// One drainer at a time; pushes that find the flag set only enqueue.
    draining: bool,
    terminal: Option<StreamEvent<T>>,
    attached_once: bool,
}

impl<T: Send + Clone + 'static> Publisher<T> {
    pub(crate) fn new() -> Self {
        Self {
            state: Arc::new(Mutex::new(PublisherState {
                subscribers: Vec::new(),
                pending: VecDeque::new(),
                queue: VecDeque::new(),
                draining: false,
                terminal: None,
                attached_once: false,
            })),
        }
    }

    /// The subscribable face of this publisher.
    pub(crate) fn observable(&self) -> Observable<T> {
        let publisher = self.clone();
        Observable::create(move |down| publisher.attach(down))
    }

    fn attach(&self, down: Subscriber<T>) {
        let mut state = self.state.lock();
        if !state.attached_once {
            state.attached_once = true;
            while let Some(value) = state.pending.pop_front() {
                down.on_next(value);
            }
        }
        match state.terminal.clone() {
            Some(StreamEvent::Error(error)) => down.on_error(error),
            Some(_) => down.on_complete(),
            None => state.subscribers.push(down),
        }
    }

    /// Route one value to the live subscribers, or buffer it if none has
    /// ever attached.
    pub(crate) fn push(&self, value: T) {
        self.dispatch(StreamEvent::Value(value));
    }

    pub(crate) fn complete(&self) {
        self.dispatch(StreamEvent::Complete);
    }

    pub(crate) fn error(&self, error: RivuletError) {
        self.dispatch(StreamEvent::Error(error));
    }

    /// Accept one event and, unless a drain is already running, deliver the
    /// queue to the live subscribers.
    ///
    /// Each delivery runs with the state lock released, and only one drainer
    /// runs at a time, so a delivery that synchronously dispatches on this
    /// same publisher neither re-enters a held subscriber lock nor grows the
    /// stack per event.
    fn dispatch(&self, event: StreamEvent<T>) {
        let mut state = self.state.lock();
        if state.terminal.is_some() {
            return;
        }
        match event {
            StreamEvent::Value(value) => {
                if !state.attached_once {
                    state.pending.push_back(value);
                    return;
                }
                state.queue.push_back(StreamEvent::Value(value));
            }
            StreamEvent::Error(error) => {
                state.terminal = Some(StreamEvent::Error(error.clone()));
                state.queue.push_back(StreamEvent::Error(error));
            }
            StreamEvent::Complete => {
                state.terminal = Some(StreamEvent::Complete);
                state.queue.push_back(StreamEvent::Complete);
            }
        }
        if state.draining {
            return;
        }
        state.draining = true;
        loop {
            let Some(next) = state.queue.pop_front() else {
                state.draining = false;
                return;
            };
            let targets = match &next {
                StreamEvent::Value(_) => {
                    state.subscribers.retain(|sub| !sub.is_cancelled());
                    state.subscribers.clone()
                }
                _ => state.subscribers.drain(..).collect(),
            };
            drop(state);
            match next {
                StreamEvent::Value(value) => match targets.as_slice() {
                    [] => {}
                    [only] => only.on_next(value),
                    subscribers => {
                        for subscriber in subscribers {
                            subscriber.on_next(value.clone());
                        }
                    }
                },
                StreamEvent::Error(error) => {
                    for subscriber in targets {
                        subscriber.on_error(error.clone());
                    }
                }
                StreamEvent::Complete => {
                    for subscriber in targets {
                        subscriber.on_complete();
                    }
                }
            }
            state = self.state.lock();
        }
    }
}
