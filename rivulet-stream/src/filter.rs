// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Filter operator: drop values that fail a predicate.

use std::sync::Arc;

use rivulet_core::{catch_callback, Observer, RivuletError, Subscriber};

use crate::observable::Observable;

impl<T: Send + 'static> Observable<T> {
    /// Keep only the values for which `predicate` returns `true`.
    ///
    /// Errors and completion propagate unchanged. A panicking predicate is
    /// an operator failure: terminal error downstream, upstream cancelled.
    ///
    /// # Examples
    ///
    /// ```
    /// use rivulet_stream::Observable;
    ///
    /// let odds = Observable::range(1, 6).filter(|n| n % 2 == 1);
    /// assert_eq!(odds.blocking().collect().unwrap(), vec![1, 3, 5]);
    /// ```
    pub fn filter(self, predicate: impl Fn(&T) -> bool + Send + Sync + 'static) -> Observable<T> {
        let predicate: Arc<dyn Fn(&T) -> bool + Send + Sync> = Arc::new(predicate);
        Observable::create(move |down: Subscriber<T>| {
            let up_token = down.token().child_token();
            self.subscribe_with_token(
                FilterObserver {
                    down,
                    predicate: Arc::clone(&predicate),
                },
                up_token,
            );
        })
    }
}

struct FilterObserver<T> {
    down: Subscriber<T>,
    predicate: Arc<dyn Fn(&T) -> bool + Send + Sync>,
}

impl<T: Send + 'static> Observer<T> for FilterObserver<T> {
    fn on_next(&mut self, value: T) {
        match catch_callback("filter", || (self.predicate)(&value)) {
            Ok(true) => self.down.on_next(value),
            Ok(false) => {}
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
