// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

#![allow(clippy::multiple_crate_versions, clippy::doc_markdown)]
//! Core primitives for the Rivulet push-based reactive stream runtime.
//!
//! This crate holds everything the observable layer and the scheduler layer
//! both depend on: the error type, the materialized event enum, the
//! cooperative cancellation token and the observer/subscriber/subscription
//! triple that enforces the delivery contracts (serialized emission,
//! terminal-once, silence after cancel).

pub mod cancellation_token;
pub mod error;
pub mod observer;
pub mod stream_event;
pub mod subscriber;
pub mod subscription;

pub use self::cancellation_token::CancellationToken;
pub use self::error::{catch_callback, Result, ResultExt, RivuletError};
pub use self::observer::{FnObserver, Observer};
pub use self::stream_event::StreamEvent;
pub use self::subscriber::Subscriber;
pub use self::subscription::Subscription;
