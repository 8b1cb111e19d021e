// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Materialized stream emission.
//!
//! A push-based subscription delivers three kinds of signals. Wherever a
//! signal has to sit in a queue instead of being delivered inline (the
//! `observe_on` hand-off queue, the blocking adapter's channel, test
//! recorders), it is materialized as a [`StreamEvent`].

use crate::error::RivuletError;

/// One materialized emission of a stream.
#[derive(Debug, Clone)]
pub enum StreamEvent<T> {
    /// A regular value emission.
    Value(T),
    /// Terminal failure; no further events follow on this subscription.
    Error(RivuletError),
    /// Terminal completion; no further events follow on this subscription.
    Complete,
}

impl<T> StreamEvent<T> {
    /// `true` for [`Error`](Self::Error) and [`Complete`](Self::Complete).
    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        matches!(self, Self::Error(_) | Self::Complete)
    }

    /// Return the contained value, if this is a [`Value`](Self::Value).
    pub fn into_value(self) -> Option<T> {
        match self {
            Self::Value(value) => Some(value),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn terminal_classification() {
        assert!(!StreamEvent::Value(1).is_terminal());
        assert!(StreamEvent::<i32>::Complete.is_terminal());
        assert!(StreamEvent::<i32>::Error(RivuletError::stream_error("boom")).is_terminal());
    }

    #[test]
    fn into_value_extracts_only_values() {
        assert_eq!(StreamEvent::Value(7).into_value(), Some(7));
        assert_eq!(StreamEvent::<i32>::Complete.into_value(), None);
    }
}
