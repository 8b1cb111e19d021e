// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Tap operator: observe values without transforming them.

use std::sync::Arc;

use rivulet_core::{catch_callback, Observer, RivuletError, Subscriber};

use crate::observable::Observable;

impl<T: Send + 'static> Observable<T> {
    /// Invoke `f` for each value before passing it on unchanged.
    ///
    /// Useful for logging and metrics probes in the middle of a chain. A
    /// panicking side effect is an operator failure, like any other
    /// user-callback failure.
    pub fn tap(self, f: impl Fn(&T) + Send + Sync + 'static) -> Observable<T> {
        let f: Arc<dyn Fn(&T) + Send + Sync> = Arc::new(f);
        Observable::create(move |down: Subscriber<T>| {
            let up_token = down.token().child_token();
            self.subscribe_with_token(
                TapObserver {
                    down,
                    f: Arc::clone(&f),
                },
                up_token,
            );
        })
    }
}

struct TapObserver<T> {
    down: Subscriber<T>,
    f: Arc<dyn Fn(&T) + Send + Sync>,
}

impl<T: Send + 'static> Observer<T> for TapObserver<T> {
    fn on_next(&mut self, value: T) {
        match catch_callback("tap", || (self.f)(&value)) {
            Ok(()) => self.down.on_next(value),
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
