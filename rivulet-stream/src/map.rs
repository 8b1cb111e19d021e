// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Map operator: transform each value.

use std::sync::Arc;

use rivulet_core::{catch_callback, Observer, RivuletError, Subscriber};

use crate::observable::Observable;

impl<T: Send + 'static> Observable<T> {
    /// Transform each value with `f`.
    ///
    /// Errors and completion propagate unchanged. If `f` panics, the
    /// operator emits a terminal error downstream and cancels the upstream
    /// subscription, so the producer is not driven further.
    ///
    /// # Examples
    ///
    /// ```
    /// use rivulet_stream::Observable;
    ///
    /// let doubled = Observable::from_vec(vec![1, 2, 3]).map(|n| n * 2);
    /// assert_eq!(doubled.blocking().collect().unwrap(), vec![2, 4, 6]);
    /// ```
    pub fn map<U: Send + 'static>(
        self,
        f: impl Fn(T) -> U + Send + Sync + 'static,
    ) -> Observable<U> {
        let f: Arc<dyn Fn(T) -> U + Send + Sync> = Arc::new(f);
        Observable::create(move |down: Subscriber<U>| {
            let up_token = down.token().child_token();
            self.subscribe_with_token(
                MapObserver {
                    down,
                    f: Arc::clone(&f),
                },
                up_token,
            );
        })
    }
}

struct MapObserver<T, U> {
    down: Subscriber<U>,
    f: Arc<dyn Fn(T) -> U + Send + Sync>,
}

impl<T: Send, U: Send + 'static> Observer<T> for MapObserver<T, U> {
    fn on_next(&mut self, value: T) {
        match catch_callback("map", || (self.f)(value)) {
            Ok(mapped) => self.down.on_next(mapped),
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
