// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Aggregation operators: collapse a finite stream into one value.

use std::sync::Arc;

use rivulet_core::{catch_callback, Observer, RivuletError, Subscriber};

use crate::observable::Observable;

impl<T: Send + 'static> Observable<T> {
    /// Collect all values into a single `Vec`, emitted at completion.
    ///
    /// # Examples
    ///
    /// ```
    /// use rivulet_stream::Observable;
    ///
    /// let lists = Observable::range(1, 3).to_list().blocking().collect().unwrap();
    /// assert_eq!(lists, vec![vec![1, 2, 3]]);
    /// ```
    pub fn to_list(self) -> Observable<Vec<T>> {
        Observable::create(move |down: Subscriber<Vec<T>>| {
            let up_token = down.token().child_token();
            self.subscribe_with_token(
                ToListObserver {
                    down,
                    items: Vec::new(),
                },
                up_token,
            );
        })
    }

    /// Fold the stream pairwise with `f`, emitting the final accumulation
    /// at completion.
    ///
    /// There is no seed: the first value starts the accumulation, and
    /// reducing an empty stream is an error.
    pub fn reduce(self, f: impl Fn(T, T) -> T + Send + Sync + 'static) -> Observable<T> {
        let f: Arc<dyn Fn(T, T) -> T + Send + Sync> = Arc::new(f);
        Observable::create(move |down: Subscriber<T>| {
            let up_token = down.token().child_token();
            self.subscribe_with_token(
                ReduceObserver {
                    down,
                    f: Arc::clone(&f),
                    acc: None,
                },
                up_token,
            );
        })
    }
}

struct ToListObserver<T> {
    down: Subscriber<Vec<T>>,
    items: Vec<T>,
}

impl<T: Send + 'static> Observer<T> for ToListObserver<T> {
    fn on_next(&mut self, value: T) {
        self.items.push(value);
    }

    fn on_error(&mut self, error: RivuletError) {
        self.items.clear();
        self.down.on_error(error);
    }

    fn on_complete(&mut self) {
        self.down.on_next(std::mem::take(&mut self.items));
        self.down.on_complete();
    }
}

struct ReduceObserver<T> {
    down: Subscriber<T>,
    f: Arc<dyn Fn(T, T) -> T + Send + Sync>,
    acc: Option<T>,
}

impl<T: Send + 'static> Observer<T> for ReduceObserver<T> {
    fn on_next(&mut self, value: T) {
        let acc = match self.acc.take() {
            None => Some(value),
            Some(current) => match catch_callback("reduce", || (self.f)(current, value)) {
                Ok(next) => Some(next),
                Err(error) => {
                    self.down.on_error(error);
                    None
                }
            },
        };
        self.acc = acc;
    }

    fn on_error(&mut self, error: RivuletError) {
        self.acc = None;
        self.down.on_error(error);
    }

    fn on_complete(&mut self) {
        match self.acc.take() {
            Some(result) => {
                self.down.on_next(result);
                self.down.on_complete();
            }
            None => self
                .down
                .on_error(RivuletError::stream_error("reduce on empty stream")),
        }
    }
}
