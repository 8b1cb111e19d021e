// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

#![allow(clippy::multiple_crate_versions, clippy::doc_markdown)]
//! # Rivulet
//!
//! A push-based, composable reactive stream runtime: the [`Observable`]
//! abstraction, its operator algebra, a four-policy [`Scheduler`] contract
//! and a cooperative cancellation / single-terminal error model.
//!
//! ## Overview
//!
//! An `Observable` is an immutable description of how to produce values.
//! Subscribing runs its producer, which pushes values through the operator
//! chain into the consumer's callbacks; every subscription is independent
//! and delivers exactly one terminal signal (completion or error). Thread
//! hand-offs happen only at explicit scheduler boundaries (`subscribe_on`,
//! `observe_on`, timers), and per-subscription emission order survives
//! every hop.
//!
//! ## Quick Start
//!
//! ```
//! use rivulet::prelude::*;
//!
//! let processed = Observable::range(0, 30)
//!     .buffer(3)
//!     .flat_map(|chunk| {
//!         Observable::from_vec(chunk)
//!             .subscribe_on(Scheduler::Compute)
//!             .map(|item| item * 2)
//!     })
//!     .blocking()
//!     .collect()
//!     .unwrap();
//! assert_eq!(processed.len(), 30);
//! ```

// Re-export core types
pub use rivulet_core::{
    CancellationToken, FnObserver, Observer, Result, RivuletError, StreamEvent, Subscriber,
    Subscription,
};

// Re-export the scheduler layer
pub use rivulet_scheduler::{Scheduler, TaskHandle};

// Re-export the observable layer
pub use rivulet_stream::{BlockingObservable, GroupedObservable, Observable};

/// Prelude module for convenient imports
pub mod prelude {
    pub use rivulet_core::{
        CancellationToken, FnObserver, Observer, Result, RivuletError, StreamEvent, Subscription,
    };
    pub use rivulet_scheduler::Scheduler;
    pub use rivulet_stream::{BlockingObservable, GroupedObservable, Observable};
}
