// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Group-by operator: demultiplex one stream into keyed sub-streams.

use std::collections::HashMap;
use std::hash::Hash;
use std::sync::Arc;

use parking_lot::Mutex;
use rivulet_core::{catch_callback, Observer, RivuletError, Subscriber};
use tracing::trace;

use crate::observable::Observable;
use crate::publisher::Publisher;

/// A keyed view produced by [`Observable::group_by`]: the key plus the
/// observable of the elements sharing that key.
///
/// Groups are created lazily the first time a key is seen and stay
/// subscribable until the parent terminates. Values that arrive while a
/// group has no subscriber yet are buffered and replayed from current to
/// the first subscriber.
pub struct GroupedObservable<K, T> {
    key: K,
    stream: Observable<T>,
}

impl<K, T> GroupedObservable<K, T> {
    /// The group's key.
    pub fn key(&self) -> &K {
        &self.key
    }

    /// The group's value stream.
    pub fn observable(&self) -> Observable<T> {
        self.stream.clone()
    }

    /// Split into key and value stream.
    pub fn into_parts(self) -> (K, Observable<T>) {
        (self.key, self.stream)
    }
}

impl<T: Send + Clone + 'static> Observable<T> {
    /// Compute a key for each value and route it into the sub-stream of the
    /// elements sharing that key.
    ///
    /// On a new key the group is created and the [`GroupedObservable`]
    /// itself is emitted on the outer stream; on a known key the value is
    /// routed into the existing group. Upstream completion completes every
    /// open group and then the outer stream; upstream error propagates to
    /// the outer stream and to every open group. A panicking key selector
    /// is an operator failure and takes the same error path.
    ///
    /// A group with no current subscriber buffers its values without bound.
    /// The canonical consumer (`flat_map` subscribing each group as it is
    /// emitted) drains immediately, but a hot key paired with a slow or
    /// absent consumer grows that buffer: this is a documented backpressure
    /// risk, not a managed one.
    ///
    /// # Examples
    ///
    /// ```
    /// use rivulet_stream::Observable;
    ///
    /// let mut per_parity = Observable::range(1, 6)
    ///     .group_by(|n| n % 2)
    ///     .flat_map(|group| group.observable().to_list())
    ///     .blocking()
    ///     .collect()
    ///     .unwrap();
    /// per_parity.sort();
    /// assert_eq!(per_parity, vec![vec![1, 3, 5], vec![2, 4, 6]]);
    /// ```
    pub fn group_by<K>(
        self,
        key_fn: impl Fn(&T) -> K + Send + Sync + 'static,
    ) -> Observable<GroupedObservable<K, T>>
    where
        K: Eq + Hash + Clone + Send + 'static,
    {
        let key_fn: Arc<dyn Fn(&T) -> K + Send + Sync> = Arc::new(key_fn);
        Observable::create(move |down: Subscriber<GroupedObservable<K, T>>| {
            let up_token = down.token().child_token();
            self.subscribe_with_token(
                GroupByObserver {
                    down,
                    key_fn: Arc::clone(&key_fn),
                    registry: Arc::new(Mutex::new(HashMap::new())),
                },
                up_token,
            );
        })
    }
}

struct GroupByObserver<K, T> {
    down: Subscriber<GroupedObservable<K, T>>,
    key_fn: Arc<dyn Fn(&T) -> K + Send + Sync>,
    /// Key-indexed registry of open groups. Holding publishers by handle
    /// (not back-references) lets a group drop out without dangling links.
    registry: Arc<Mutex<HashMap<K, Publisher<T>>>>,
}

impl<K, T> GroupByObserver<K, T>
where
    K: Eq + Hash + Clone + Send + 'static,
    T: Send + Clone + 'static,
{
    /// Error path shared by upstream errors and key-selector failures: the
    /// error reaches every open group as well as the outer stream.
    fn fail(&self, error: RivuletError) {
        let groups: Vec<Publisher<T>> = self.registry.lock().drain().map(|(_, p)| p).collect();
        for group in groups {
            group.error(error.clone());
        }
        self.down.on_error(error);
    }
}

impl<K, T> Observer<T> for GroupByObserver<K, T>
where
    K: Eq + Hash + Clone + Send + 'static,
    T: Send + Clone + 'static,
{
    fn on_next(&mut self, value: T) {
        let key = match catch_callback("group_by key", || (self.key_fn)(&value)) {
            Ok(key) => key,
            Err(error) => {
                self.fail(error);
                return;
            }
        };

        let (publisher, is_new) = {
            let mut registry = self.registry.lock();
            match registry.get(&key) {
                Some(publisher) => (publisher.clone(), false),
                None => {
                    trace!(open_groups = registry.len() + 1, "opening new group");
                    let publisher = Publisher::new();
                    registry.insert(key.clone(), publisher.clone());
                    (publisher, true)
                }
            }
        };

        if is_new {
            // Announce the group before routing its first value, so an
            // immediately-subscribing consumer sees the value live instead
            // of replayed.
            self.down.on_next(GroupedObservable {
                key,
                stream: publisher.observable(),
            });
        }
        publisher.push(value);
    }

    fn on_error(&mut self, error: RivuletError) {
        self.fail(error);
    }

    fn on_complete(&mut self) {
        let groups: Vec<Publisher<T>> = self.registry.lock().drain().map(|(_, p)| p).collect();
        trace!(open_groups = groups.len(), "completing all groups");
        for group in groups {
            group.complete();
        }
        self.down.on_complete();
    }
}
