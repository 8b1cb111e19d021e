// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

#![allow(clippy::multiple_crate_versions, clippy::doc_markdown)]
//! Scheduler layer of the Rivulet reactive runtime.
//!
//! Everything concurrent in Rivulet routes through this crate: the stream
//! operators never spawn threads of their own. [`Scheduler`] is an enum
//! selector over four policies (immediate, io pool, compute pool, dedicated
//! thread); delayed work goes through one shared timer thread and is
//! re-dispatched to the selected policy at fire time.

mod pool;
pub mod scheduler;
pub mod task;
mod timer;

pub use self::scheduler::Scheduler;
pub use self::task::TaskHandle;
