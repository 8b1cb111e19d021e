// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! The push-based stream primitive.
//!
//! An [`Observable`] is an immutable, clonable description of how to produce
//! a sequence of values: a producer function plus nothing else. It owns no
//! resources until subscribed; every subscribe call runs the producer from
//! scratch against a fresh [`Subscriber`], so re-subscription never shares
//! state between consumers.

use std::sync::Arc;

use rivulet_core::{
    catch_callback, CancellationToken, FnObserver, Observer, RivuletError, Subscriber,
    Subscription,
};

/// A push-based, possibly asynchronous sequence of values.
///
/// Assembled from a producer function ([`create`](Self::create)) or from the
/// source constructors and operators in this crate. Subscribing drives the
/// producer, which pushes values through the operator chain into the
/// consumer's callbacks; thread hand-offs happen only at explicit scheduler
/// boundaries (`subscribe_on`, `observe_on`, timers).
///
/// # Examples
///
/// ```
/// use rivulet_stream::Observable;
///
/// let evens: Vec<u64> = Observable::range(1, 10)
///     .filter(|n| n % 2 == 0)
///     .blocking()
///     .collect()
///     .unwrap();
/// assert_eq!(evens, vec![2, 4, 6, 8, 10]);
/// ```
pub struct Observable<T> {
    producer: Arc<dyn Fn(Subscriber<T>) + Send + Sync>,
}

impl<T> Clone for Observable<T> {
    fn clone(&self) -> Self {
        Self {
            producer: Arc::clone(&self.producer),
        }
    }
}

impl<T: Send + 'static> Observable<T> {
    /// Build an observable from an explicit producer function.
    ///
    /// The producer may emit any number of values via
    /// [`Subscriber::on_next`], then must deliver exactly one terminal
    /// signal, or run indefinitely while polling
    /// [`Subscriber::is_cancelled`]. If the producer panics outside of the
    /// `on_error` contract, the panic is captured and forwarded as a
    /// terminal error instead of escaping, so the consumer is never left
    /// without a terminal signal.
    ///
    /// # Examples
    ///
    /// ```
    /// use rivulet_stream::Observable;
    ///
    /// let numbers = Observable::create(|subscriber| {
    ///     subscriber.on_next(1);
    ///     subscriber.on_next(2);
    ///     subscriber.on_complete();
    /// });
    /// assert_eq!(numbers.blocking().collect().unwrap(), vec![1, 2]);
    /// ```
    pub fn create(producer: impl Fn(Subscriber<T>) + Send + Sync + 'static) -> Self {
        Self {
            producer: Arc::new(producer),
        }
    }

    /// Subscribe with a value callback only.
    ///
    /// An error terminating this subscription has no consumer handler and is
    /// logged at `error!` level as a last resort.
    pub fn subscribe(&self, on_next: impl FnMut(T) + Send + 'static) -> Subscription {
        self.subscribe_observer(FnObserver::new().with_next(on_next))
    }

    /// Subscribe with the full callback set.
    pub fn subscribe_all(
        &self,
        on_next: impl FnMut(T) + Send + 'static,
        on_error: impl FnMut(RivuletError) + Send + 'static,
        on_complete: impl FnMut() + Send + 'static,
    ) -> Subscription {
        self.subscribe_observer(
            FnObserver::new()
                .with_next(on_next)
                .with_error(on_error)
                .with_complete(on_complete),
        )
    }

    /// Subscribe with an explicit [`Observer`].
    pub fn subscribe_observer(&self, observer: impl Observer<T> + 'static) -> Subscription {
        let token = CancellationToken::new();
        let subscriber = Subscriber::new(observer, token.clone());
        self.subscribe_subscriber(&subscriber);
        Subscription::new(token)
    }

    /// Subscribe an observer under an existing token.
    ///
    /// Operators use this to hang their upstream legs off child tokens of
    /// the downstream subscription.
    pub fn subscribe_with_token(
        &self,
        observer: impl Observer<T> + 'static,
        token: CancellationToken,
    ) {
        let subscriber = Subscriber::new(observer, token);
        self.subscribe_subscriber(&subscriber);
    }

    /// Run the producer against an existing subscriber.
    pub fn subscribe_subscriber(&self, subscriber: &Subscriber<T>) {
        if subscriber.is_cancelled() {
            return;
        }
        let producer = Arc::clone(&self.producer);
        if let Err(error) = catch_callback("producer", || producer(subscriber.clone())) {
            subscriber.on_error(error);
        }
    }
}
