// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Skip operator: drop a prefix.

use rivulet_core::{Observer, RivuletError, Subscriber};

use crate::observable::Observable;

impl<T: Send + 'static> Observable<T> {
    /// Drop the first `n` values, emit everything after them.
    ///
    /// If the stream has fewer than `n` values, nothing is emitted before
    /// the terminal signal. Errors and completion propagate unchanged.
    pub fn skip(self, n: usize) -> Observable<T> {
        Observable::create(move |down: Subscriber<T>| {
            let up_token = down.token().child_token();
            self.subscribe_with_token(SkipObserver { down, remaining: n }, up_token);
        })
    }
}

struct SkipObserver<T> {
    down: Subscriber<T>,
    remaining: usize,
}

impl<T: Send + 'static> Observer<T> for SkipObserver<T> {
    fn on_next(&mut self, value: T) {
        if self.remaining > 0 {
            self.remaining -= 1;
            return;
        }
        self.down.on_next(value);
    }

    fn on_error(&mut self, error: RivuletError) {
        self.down.on_error(error);
    }

    fn on_complete(&mut self) {
        self.down.on_complete();
    }
}
