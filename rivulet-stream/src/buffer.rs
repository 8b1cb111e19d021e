// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Buffer operator: collect values into fixed-size groups.

use rivulet_core::{Observer, RivuletError, Subscriber};

use crate::observable::Observable;

impl<T: Send + 'static> Observable<T> {
    /// Collect values into `Vec`s of `size` elements.
    ///
    /// A group is emitted as soon as it fills. On upstream completion any
    /// partial remaining group (fewer than `size` elements) is emitted
    /// before the completion; on upstream error the partial group is
    /// discarded and the error propagates.
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
    /// let groups = Observable::range(1, 10).buffer(3).blocking().collect().unwrap();
    /// assert_eq!(groups, vec![vec![1, 2, 3], vec![4, 5, 6], vec![7, 8, 9], vec![10]]);
    /// ```
    pub fn buffer(self, size: usize) -> Observable<Vec<T>> {
        assert!(size > 0, "buffer size must be positive");
        Observable::create(move |down: Subscriber<Vec<T>>| {
            let up_token = down.token().child_token();
            self.subscribe_with_token(
                BufferObserver {
                    down,
                    size,
                    pending: Vec::with_capacity(size),
                },
                up_token,
            );
        })
    }
}

struct BufferObserver<T> {
    down: Subscriber<Vec<T>>,
    size: usize,
    pending: Vec<T>,
}

impl<T: Send + 'static> Observer<T> for BufferObserver<T> {
    fn on_next(&mut self, value: T) {
        self.pending.push(value);
        if self.pending.len() == self.size {
            let group = std::mem::replace(&mut self.pending, Vec::with_capacity(self.size));
            self.down.on_next(group);
        }
    }

    fn on_error(&mut self, error: RivuletError) {
        self.pending.clear();
        self.down.on_error(error);
    }

    fn on_complete(&mut self) {
        if !self.pending.is_empty() {
            let group = std::mem::take(&mut self.pending);
            self.down.on_next(group);
        }
        self.down.on_complete();
    }
}
