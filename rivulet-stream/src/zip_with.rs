// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Zip operator: pairwise combination of two streams.

use std::collections::VecDeque;
use std::sync::Arc;

use parking_lot::Mutex;
use rivulet_core::{catch_callback, Observer, RivuletError, Subscriber};

use crate::observable::Observable;

impl<T: Send + 'static> Observable<T> {
    /// Combine `self` and `other` pairwise with `f`.
    ///
    /// The nth output is `f(nth of self, nth of other)`; values waiting for
    /// their counterpart queue up per side. The output completes as soon as
    /// one side has completed and its queue is drained (the longer side is
    /// cancelled); an error on either side forwards immediately and cancels
    /// both.
    ///
    /// # Examples
    ///
    /// ```
    /// use rivulet_stream::Observable;
    ///
    /// let indexed = Observable::from_vec(vec!["a", "b"])
    ///     .zip_with(Observable::range(1, 9), |s, i| format!("{i}:{s}"));
    /// assert_eq!(
    ///     indexed.blocking().collect().unwrap(),
    ///     vec!["1:a".to_string(), "2:b".to_string()]
    /// );
    /// ```
    pub fn zip_with<U: Send + 'static, R: Send + 'static>(
        self,
        other: Observable<U>,
        f: impl Fn(T, U) -> R + Send + Sync + 'static,
    ) -> Observable<R> {
        let f: Arc<dyn Fn(T, U) -> R + Send + Sync> = Arc::new(f);
        Observable::create(move |down: Subscriber<R>| {
            let state = Arc::new(ZipState {
                sides: Mutex::new(Sides {
                    left: VecDeque::new(),
                    right: VecDeque::new(),
                    left_done: false,
                    right_done: false,
                }),
                down,
                f: Arc::clone(&f),
            });

            let left_token = state.down.token().child_token();
            self.subscribe_with_token(
                LeftObserver {
                    state: Arc::clone(&state),
                },
                left_token,
            );
            let right_token = state.down.token().child_token();
            other.subscribe_with_token(RightObserver { state }, right_token);
        })
    }
}

struct Sides<T, U> {
    left: VecDeque<T>,
    right: VecDeque<U>,
    left_done: bool,
    right_done: bool,
}

impl<T, U> Sides<T, U> {
    /// A side that has completed with an empty queue can never pair again.
    fn exhausted(&self) -> bool {
        (self.left_done && self.left.is_empty()) || (self.right_done && self.right.is_empty())
    }
}

struct ZipState<T, U, R> {
    sides: Mutex<Sides<T, U>>,
    down: Subscriber<R>,
    f: Arc<dyn Fn(T, U) -> R + Send + Sync>,
}

impl<T: Send, U: Send, R: Send + 'static> ZipState<T, U, R> {
    fn emit_pair(&self, left: T, right: U) {
        match catch_callback("zip_with", || (self.f)(left, right)) {
            Ok(combined) => self.down.on_next(combined),
            Err(error) => self.down.on_error(error),
        }
    }

    fn push_left(&self, value: T) {
        let paired = {
            let mut sides = self.sides.lock();
            match sides.right.pop_front() {
                Some(right) => Some((value, right)),
                None => {
                    sides.left.push_back(value);
                    None
                }
            }
        };
        if let Some((left, right)) = paired {
            self.emit_pair(left, right);
            self.complete_if_exhausted();
        }
    }

    fn push_right(&self, value: U) {
        let paired = {
            let mut sides = self.sides.lock();
            match sides.left.pop_front() {
                Some(left) => Some((left, value)),
                None => {
                    sides.right.push_back(value);
                    None
                }
            }
        };
        if let Some((left, right)) = paired {
            self.emit_pair(left, right);
            self.complete_if_exhausted();
        }
    }

    fn side_done(&self, left_side: bool) {
        {
            let mut sides = self.sides.lock();
            if left_side {
                sides.left_done = true;
            } else {
                sides.right_done = true;
            }
        }
        self.complete_if_exhausted();
    }

    fn complete_if_exhausted(&self) {
        if self.sides.lock().exhausted() {
            self.down.on_complete();
        }
    }
}

struct LeftObserver<T, U, R> {
    state: Arc<ZipState<T, U, R>>,
}

impl<T: Send, U: Send, R: Send + 'static> Observer<T> for LeftObserver<T, U, R> {
    fn on_next(&mut self, value: T) {
        self.state.push_left(value);
    }

    fn on_error(&mut self, error: RivuletError) {
        self.state.down.on_error(error);
    }

    fn on_complete(&mut self) {
        self.state.side_done(true);
    }
}

struct RightObserver<T, U, R> {
    state: Arc<ZipState<T, U, R>>,
}

impl<T: Send, U: Send, R: Send + 'static> Observer<U> for RightObserver<T, U, R> {
    fn on_next(&mut self, value: U) {
        self.state.push_right(value);
    }

    fn on_error(&mut self, error: RivuletError) {
        self.state.down.on_error(error);
    }

    fn on_complete(&mut self) {
        self.state.side_done(false);
    }
}
