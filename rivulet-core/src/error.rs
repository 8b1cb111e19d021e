// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Error types for the Rivulet reactive runtime.
//!
//! This module provides the error handling system for all Rivulet operations.
//! It defines a root [`RivuletError`] type with specific variants for the
//! failure modes a stream can encounter: failures in stream bookkeeping
//! itself, errors raised by user code, and panics captured inside
//! user-supplied callbacks.
//!
//! # Examples
//!
//! ```
//! use rivulet_core::{RivuletError, Result};
//!
//! fn process_data() -> Result<()> {
//!     Err(RivuletError::stream_error("Stream not ready"))
//! }
//! ```

/// Root error type for all Rivulet operations.
///
/// This enum encompasses the error conditions that can occur during stream
/// production, operator application and subscription handling.
#[derive(Debug, thiserror::Error)]
pub enum RivuletError {
    /// Stream processing encountered an error.
    ///
    /// This is a general error for stream operations that don't fit
    /// other specific categories.
    #[error("Stream processing error: {context}")]
    StreamProcessingError {
        /// Description of what went wrong during stream processing
        context: String,
    },

    /// Custom error from user code.
    ///
    /// This wraps errors produced by user-provided producers and callbacks,
    /// allowing them to be propagated through the Rivulet error system.
    #[error("User error: {0}")]
    UserError(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// A user-supplied callback panicked.
    ///
    /// Panics inside producers and operator callbacks (map functions,
    /// predicates, key selectors) are captured and converted into this
    /// variant so a subscription always receives a terminal signal instead
    /// of an unwinding stack.
    #[error("Callback '{site}' panicked: {payload}")]
    CallbackPanic {
        /// Which callback panicked (e.g. "producer", "map", "group_by key")
        site: String,
        /// The stringified panic payload
        payload: String,
    },
}

impl RivuletError {
    /// Create a stream processing error with the given context.
    pub fn stream_error(context: impl Into<String>) -> Self {
        Self::StreamProcessingError {
            context: context.into(),
        }
    }

    /// Wrap a user error.
    pub fn user_error(error: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::UserError(Box::new(error))
    }

    /// Create a callback-panic error for the given call site.
    pub fn callback_panic(site: impl Into<String>, payload: impl Into<String>) -> Self {
        Self::CallbackPanic {
            site: site.into(),
            payload: payload.into(),
        }
    }
}

/// Errors flow through fan-out points (`group_by` routes one upstream error
/// into every open group, recovery operators hand the error to user code and
/// may also forward it), so the type must be clonable. `UserError` wraps an
/// arbitrary boxed error that cannot be cloned; cloning degrades it to a
/// `StreamProcessingError` carrying its rendered message.
impl Clone for RivuletError {
    fn clone(&self) -> Self {
        match self {
            Self::StreamProcessingError { context } => Self::StreamProcessingError {
                context: context.clone(),
            },
            Self::UserError(source) => Self::StreamProcessingError {
                context: format!("User error: {source}"),
            },
            Self::CallbackPanic { site, payload } => Self::CallbackPanic {
                site: site.clone(),
                payload: payload.clone(),
            },
        }
    }
}

/// Specialized Result type for Rivulet operations.
///
/// # Examples
///
/// ```
/// use rivulet_core::Result;
///
/// fn process() -> Result<String> {
///     Ok("processed".to_string())
/// }
/// ```
pub type Result<T> = std::result::Result<T, RivuletError>;

/// Helper trait for adding context to `Result`s.
///
/// This allows chaining context information onto errors in a fluent style.
pub trait ResultExt<T> {
    /// Add context to an error.
    ///
    /// # Errors
    /// Returns `Err(RivuletError)` if the underlying result is `Err`.
    fn context(self, context: impl Into<String>) -> Result<T>;
}

impl<T, E> ResultExt<T> for std::result::Result<T, E>
where
    E: std::error::Error + Send + Sync + 'static,
{
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|error| RivuletError::StreamProcessingError {
            context: format!("{}: {error}", context.into()),
        })
    }
}

/// Run a user-supplied callback, converting a panic into an error.
///
/// Producers and operator callbacks (map functions, predicates, key
/// selectors) run through this guard so that an unwinding callback becomes a
/// terminal `on_error` instead of leaving the consumer without any terminal
/// signal.
///
/// # Errors
/// Returns [`RivuletError::CallbackPanic`] if the callback panicked.
///
/// # Examples
///
/// ```
/// use rivulet_core::error::catch_callback;
///
/// let ok = catch_callback("doubler", || 21 * 2);
/// assert_eq!(ok.unwrap(), 42);
///
/// let err = catch_callback("exploder", || panic!("boom"));
/// assert!(err.is_err());
/// ```
pub fn catch_callback<R>(site: &str, f: impl FnOnce() -> R) -> Result<R> {
    std::panic::catch_unwind(std::panic::AssertUnwindSafe(f)).map_err(|payload| {
        let payload = if let Some(message) = payload.downcast_ref::<&'static str>() {
            (*message).to_string()
        } else if let Some(message) = payload.downcast_ref::<String>() {
            message.clone()
        } else {
            "non-string panic payload".to_string()
        };
        RivuletError::callback_panic(site, payload)
    })
}
