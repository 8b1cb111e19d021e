// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

#![allow(clippy::multiple_crate_versions, clippy::doc_markdown)]
//! Observable core and operator algebra of the Rivulet reactive runtime.
//!
//! The [`Observable`] type is the push-based stream primitive; every
//! operator lives in its own module as an inherent method returning a new
//! `Observable`, so pipelines compose left to right:
//!
//! ```
//! use rivulet_stream::Observable;
//! use rivulet_scheduler::Scheduler;
//!
//! let processed = Observable::range(0, 30)
//!     .window(3)
//!     .flat_map(|work| {
//!         work.observe_on(Scheduler::Compute)
//!             .map(|item| format!("{item} processed"))
//!     })
//!     .blocking()
//!     .collect()
//!     .unwrap();
//! assert_eq!(processed.len(), 30);
//! ```
//!
//! Concurrency routes exclusively through [`rivulet_scheduler::Scheduler`];
//! the operators themselves are synchronous transformations invoked by
//! whichever context currently holds delivery.

pub mod aggregate;
pub mod blocking;
pub mod buffer;
pub mod concat_with;
pub mod filter;
pub mod flat_map;
pub mod group_by;
pub mod map;
pub mod merge;
pub mod observable;
pub mod observe_on;
pub mod on_error;
pub mod prelude;
mod publisher;
pub mod retry_when;
pub mod skip;
pub mod sources;
pub mod subscribe_on;
pub mod take;
pub mod tap;
pub mod window;
pub mod zip_with;

pub use self::blocking::BlockingObservable;
pub use self::group_by::GroupedObservable;
pub use self::observable::Observable;
