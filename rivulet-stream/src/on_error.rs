// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Error-recovery operators: replace a failing tail with a defined
//! alternative.
//!
//! Recovery never suppresses an error silently; the error is handed to user
//! code, which decides what stream (or value) takes the failed upstream's
//! place.

use std::sync::Arc;

use rivulet_core::{catch_callback, Observer, RivuletError, Subscriber};

use crate::observable::Observable;

impl<T: Send + 'static> Observable<T> {
    /// On upstream error, discard the error and continue with the
    /// observable produced by `f(error)` as the new tail.
    ///
    /// Values and completion of the fallback stream are relayed as if they
    /// came from the original source. If `f` itself fails, its error
    /// terminates the output.
    ///
    /// # Examples
    ///
    /// ```
    /// use rivulet_core::RivuletError;
    /// use rivulet_stream::Observable;
    ///
    /// let recovered = Observable::error(RivuletError::stream_error("boom"))
    ///     .on_error_resume_next(|_| Observable::from_vec(vec![7, 8]));
    /// assert_eq!(recovered.blocking().collect().unwrap(), vec![7, 8]);
    /// ```
    pub fn on_error_resume_next(
        self,
        f: impl Fn(&RivuletError) -> Observable<T> + Send + Sync + 'static,
    ) -> Observable<T> {
        let f: Arc<dyn Fn(&RivuletError) -> Observable<T> + Send + Sync> = Arc::new(f);
        Observable::create(move |down: Subscriber<T>| {
            let up_token = down.token().child_token();
            self.subscribe_with_token(
                ResumeNextObserver {
                    down,
                    f: Arc::clone(&f),
                },
                up_token,
            );
        })
    }

    /// On upstream error, emit the single fallback value `f(error)` and
    /// complete.
    ///
    /// Structurally a special case of
    /// [`on_error_resume_next`](Self::on_error_resume_next) with a
    /// single-value replacement stream.
    pub fn on_error_return(
        self,
        f: impl Fn(&RivuletError) -> T + Send + Sync + 'static,
    ) -> Observable<T>
    where
        T: Clone + Sync,
    {
        self.on_error_resume_next(move |error| Observable::just(f(error)))
    }
}

struct ResumeNextObserver<T> {
    down: Subscriber<T>,
    f: Arc<dyn Fn(&RivuletError) -> Observable<T> + Send + Sync>,
}

impl<T: Send + 'static> Observer<T> for ResumeNextObserver<T> {
    fn on_next(&mut self, value: T) {
        self.down.on_next(value);
    }

    fn on_error(&mut self, error: RivuletError) {
        match catch_callback("on_error_resume_next", || (self.f)(&error)) {
            Ok(fallback) => {
                let tail_token = self.down.token().child_token();
                fallback.subscribe_with_token(
                    TailObserver {
                        down: self.down.clone(),
                    },
                    tail_token,
                );
            }
            Err(selector_error) => self.down.on_error(selector_error),
        }
    }

    fn on_complete(&mut self) {
        self.down.on_complete();
    }
}

/// Plain relay for the replacement tail.
struct TailObserver<T> {
    down: Subscriber<T>,
}

impl<T: Send + 'static> Observer<T> for TailObserver<T> {
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
