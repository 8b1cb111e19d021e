// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Blocking adapter for the program's outer edge.
//!
//! The adapter subscribes and parks the calling thread on a channel of
//! materialized events until the subscription terminates. It belongs at the
//! outermost boundary of a program (a main function, a test); using it
//! inside an operator would wedge the delivery context it runs on.

use crossbeam_channel::{unbounded, Sender};
use rivulet_core::{Observer, Result, RivuletError, StreamEvent};

use crate::observable::Observable;

impl<T: Send + 'static> Observable<T> {
    /// Adapt this observable for blocking consumption.
    pub fn blocking(self) -> BlockingObservable<T> {
        BlockingObservable { source: self }
    }
}

/// Blocking view over an [`Observable`], created by
/// [`Observable::blocking`].
pub struct BlockingObservable<T> {
    source: Observable<T>,
}

impl<T: Send + 'static> BlockingObservable<T> {
    /// Subscribe and invoke `f` for every value on the calling thread,
    /// returning once the stream terminates.
    ///
    /// # Errors
    /// Returns the stream's terminal error, if it ended in one.
    pub fn for_each(&self, mut f: impl FnMut(T)) -> Result<()> {
        let (tx, rx) = unbounded::<StreamEvent<T>>();
        let subscription = self.source.subscribe_observer(ChannelObserver { tx });
        for event in &rx {
            match event {
                StreamEvent::Value(value) => f(value),
                StreamEvent::Error(error) => return Err(error),
                StreamEvent::Complete => break,
            }
        }
        drop(subscription);
        Ok(())
    }

    /// Subscribe and collect every value until completion.
    ///
    /// # Errors
    /// Returns the stream's terminal error, if it ended in one.
    pub fn collect(&self) -> Result<Vec<T>> {
        let mut values = Vec::new();
        self.for_each(|value| values.push(value))?;
        Ok(values)
    }

    /// Subscribe, wait for the first value, then cancel the upstream.
    ///
    /// Returns `Ok(None)` if the stream completes without emitting.
    ///
    /// # Errors
    /// Returns the stream's terminal error if it fails before the first
    /// value.
    pub fn first(&self) -> Result<Option<T>> {
        let (tx, rx) = unbounded::<StreamEvent<T>>();
        let subscription = self.source.subscribe_observer(ChannelObserver { tx });
        for event in &rx {
            match event {
                StreamEvent::Value(value) => {
                    subscription.cancel();
                    return Ok(Some(value));
                }
                StreamEvent::Error(error) => return Err(error),
                StreamEvent::Complete => break,
            }
        }
        Ok(None)
    }
}

struct ChannelObserver<T> {
    tx: Sender<StreamEvent<T>>,
}

impl<T: Send> Observer<T> for ChannelObserver<T> {
    fn on_next(&mut self, value: T) {
        let _ = self.tx.send(StreamEvent::Value(value));
    }

    fn on_error(&mut self, error: RivuletError) {
        let _ = self.tx.send(StreamEvent::Error(error));
    }

    fn on_complete(&mut self) {
        let _ = self.tx.send(StreamEvent::Complete);
    }
}
