// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Concat operator: sequential composition of two streams.

use rivulet_core::{Observer, RivuletError, Subscriber};

use crate::observable::Observable;

impl<T: Send + 'static> Observable<T> {
    /// Emit all of `self`, then on its completion subscribe `next` and emit
    /// all of it.
    ///
    /// An error in either part terminates the output; `next` is never
    /// subscribed if `self` errors.
    ///
    /// # Examples
    ///
    /// ```
    /// use rivulet_stream::Observable;
    ///
    /// let chained = Observable::from_vec(vec![1, 2]).concat_with(Observable::from_vec(vec![3]));
    /// assert_eq!(chained.blocking().collect().unwrap(), vec![1, 2, 3]);
    /// ```
    pub fn concat_with(self, next: Observable<T>) -> Observable<T> {
        Observable::create(move |down: Subscriber<T>| {
            let up_token = down.token().child_token();
            self.subscribe_with_token(
                ConcatObserver {
                    down,
                    next: next.clone(),
                },
                up_token,
            );
        })
    }
}

struct ConcatObserver<T> {
    down: Subscriber<T>,
    next: Observable<T>,
}

impl<T: Send + 'static> Observer<T> for ConcatObserver<T> {
    fn on_next(&mut self, value: T) {
        self.down.on_next(value);
    }

    fn on_error(&mut self, error: RivuletError) {
        self.down.on_error(error);
    }

    fn on_complete(&mut self) {
        let tail_token = self.down.token().child_token();
        self.next.subscribe_with_token(
            TailRelay {
                down: self.down.clone(),
            },
            tail_token,
        );
    }
}

struct TailRelay<T> {
    down: Subscriber<T>,
}

impl<T: Send + 'static> Observer<T> for TailRelay<T> {
    fn on_next(&mut self, value: T) {
        self.down.on_next(value);
    }

    fn on_error(&mut self, error: RivuletError) {
        self.down.on_error(error);
    }

    fn on_complete(&mut self) {
        self.down.on_complete();
    }
}
