// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Take operators: stop the upstream after a prefix.

use std::sync::Arc;

use rivulet_core::{catch_callback, CancellationToken, Observer, RivuletError, Subscriber};

use crate::observable::Observable;

impl<T: Send + 'static> Observable<T> {
    /// Emit at most the first `n` values, then complete.
    ///
    /// Delivering the nth value cancels the upstream leg before completing
    /// downstream, so an infinite producer observably stops being driven
    /// rather than merely being ignored. `take(0)` completes without
    /// subscribing upstream at all.
    ///
    /// # Examples
    ///
    /// ```
    /// use rivulet_stream::Observable;
    ///
    /// let first_three = Observable::range(0, 1_000_000).take(3);
    /// assert_eq!(first_three.blocking().collect().unwrap(), vec![0, 1, 2]);
    /// ```
    pub fn take(self, n: usize) -> Observable<T> {
        Observable::create(move |down: Subscriber<T>| {
            if n == 0 {
                down.on_complete();
                return;
            }
            let up_token = down.token().child_token();
            self.subscribe_with_token(
                TakeObserver {
                    down,
                    up_token: up_token.clone(),
                    remaining: n,
                },
                up_token,
            );
        })
    }

    /// Emit values while `predicate` holds, then complete.
    ///
    /// The first value failing the predicate is not emitted; the operator
    /// cancels the upstream leg and completes (never errors) downstream.
    pub fn take_while(
        self,
        predicate: impl Fn(&T) -> bool + Send + Sync + 'static,
    ) -> Observable<T> {
        let predicate: Arc<dyn Fn(&T) -> bool + Send + Sync> = Arc::new(predicate);
        Observable::create(move |down: Subscriber<T>| {
            let up_token = down.token().child_token();
            self.subscribe_with_token(
                TakeWhileObserver {
                    down,
                    up_token: up_token.clone(),
                    predicate: Arc::clone(&predicate),
                },
                up_token,
            );
        })
    }
}

struct TakeObserver<T> {
    down: Subscriber<T>,
    up_token: CancellationToken,
    remaining: usize,
}

impl<T: Send + 'static> Observer<T> for TakeObserver<T> {
    fn on_next(&mut self, value: T) {
        if self.remaining == 0 {
            return;
        }
        self.remaining -= 1;
        let last = self.remaining == 0;
        if last {
            // Stop the producer before handing the final value downstream.
            self.up_token.cancel();
        }
        self.down.on_next(value);
        if last {
            self.down.on_complete();
        }
    }

    fn on_error(&mut self, error: RivuletError) {
        self.down.on_error(error);
    }

    fn on_complete(&mut self) {
        self.down.on_complete();
    }
}

struct TakeWhileObserver<T> {
    down: Subscriber<T>,
    up_token: CancellationToken,
    predicate: Arc<dyn Fn(&T) -> bool + Send + Sync>,
}

impl<T: Send + 'static> Observer<T> for TakeWhileObserver<T> {
    fn on_next(&mut self, value: T) {
        match catch_callback("take_while", || (self.predicate)(&value)) {
            Ok(true) => self.down.on_next(value),
            Ok(false) => {
                self.up_token.cancel();
                self.down.on_complete();
            }
            Err(error) => self.down.on_error(error),
        }
    }

    fn on_error(&mut self, error: RivuletError) {
        self.down.on_error(error);
    }

    fn on_complete(&mut self) {
        self.down.on_complete();
    }
}
