// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

#![allow(clippy::multiple_crate_versions, clippy::doc_markdown)]
//! Test utilities for Rivulet streams.
//!
//! Provides the recording observer used throughout the workspace's tests,
//! plus controllable sources (infinite counters, induced failures,
//! subscription trackers) for exercising cancellation and retry paths.

pub mod recorder;
pub mod sources;
pub mod test_data;

pub use self::recorder::{Recorder, RecorderObserver};
pub use self::sources::{counted_infinite, fail_n_times, tracked};
pub use self::test_data::{person_alice, person_bob, person_charlie, Person};
