// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Window operator: fixed-size groups as live sub-streams.

use rivulet_core::{Observer, RivuletError, Subscriber};

use crate::observable::Observable;
use crate::publisher::Publisher;

impl<T: Send + Clone + 'static> Observable<T> {
    /// Group values by count like [`buffer`](Observable::buffer), but emit
    /// each group as a live sub-observable instead of a materialized `Vec`.
    ///
    /// A window opens (and is emitted downstream) as soon as its first
    /// element arrives, so the consumer can start processing it while the
    /// next window is still filling. The intended use is per-window
    /// scheduling: `observe_on` each window onto the compute pool and
    /// process windows in parallel.
    ///
    /// # Panics
    ///
    /// Panics if `size` is zero.
    ///
    /// # Examples
    ///
    /// ```
    /// use rivulet_stream::Observable;
    ///
    /// let sums = Observable::range(1, 6)
    ///     .window(3)
    ///     .flat_map(|window| window.reduce(|a, b| a + b))
    ///     .blocking()
    ///     .collect()
    ///     .unwrap();
    /// assert_eq!(sums, vec![6, 15]);
    /// ```
    pub fn window(self, size: usize) -> Observable<Observable<T>> {
        assert!(size > 0, "window size must be positive");
        Observable::create(move |down: Subscriber<Observable<T>>| {
            let up_token = down.token().child_token();
            self.subscribe_with_token(
                WindowObserver {
                    down,
                    size,
                    filled: 0,
                    current: None,
                },
                up_token,
            );
        })
    }
}

struct WindowObserver<T> {
    down: Subscriber<Observable<T>>,
    size: usize,
    filled: usize,
    current: Option<Publisher<T>>,
}

impl<T: Send + Clone + 'static> Observer<T> for WindowObserver<T> {
    fn on_next(&mut self, value: T) {
        let publisher = match &self.current {
            Some(publisher) => publisher.clone(),
            None => {
                let publisher = Publisher::new();
                self.current = Some(publisher.clone());
                self.filled = 0;
                self.down.on_next(publisher.observable());
                publisher
            }
        };
        publisher.push(value);
        self.filled += 1;
        if self.filled == self.size {
            publisher.complete();
            self.current = None;
        }
    }

    fn on_error(&mut self, error: RivuletError) {
        if let Some(publisher) = self.current.take() {
            publisher.error(error.clone());
        }
        self.down.on_error(error);
    }

    fn on_complete(&mut self) {
        if let Some(publisher) = self.current.take() {
            publisher.complete();
        }
        self.down.on_complete();
    }
}
