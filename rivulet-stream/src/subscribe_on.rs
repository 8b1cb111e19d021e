// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Subscribe-on operator: move producer execution onto a scheduler.

use rivulet_core::Subscriber;
use rivulet_scheduler::Scheduler;

use crate::observable::Observable;

impl<T: Send + 'static> Observable<T> {
    /// Run the act of subscribing (producer execution) on `scheduler`.
    ///
    /// The subscribe call returns immediately; the producer starts on a
    /// worker of the chosen policy and emits from there. If the
    /// subscription is cancelled before the worker picks the task up, the
    /// producer never runs.
    ///
    /// # Examples
    ///
    /// ```
    /// use rivulet_stream::Observable;
    /// use rivulet_scheduler::Scheduler;
    ///
    /// let values = Observable::from_vec(vec![1, 2, 3])
    ///     .subscribe_on(Scheduler::Io)
    ///     .blocking()
    ///     .collect()
    ///     .unwrap();
    /// assert_eq!(values, vec![1, 2, 3]);
    /// ```
    pub fn subscribe_on(self, scheduler: Scheduler) -> Observable<T> {
        Observable::create(move |down: Subscriber<T>| {
            let source = self.clone();
            let token = down.token().clone();
            scheduler.schedule_with_token(token, move || {
                source.subscribe_subscriber(&down);
            });
        })
    }
}
