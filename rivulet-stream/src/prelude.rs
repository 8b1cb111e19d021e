// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Prelude module re-exporting the commonly used types.
//!
//! Import this module for convenient access to the whole surface:
//!
//! ```
//! use rivulet_stream::prelude::*;
//!
//! let subscription = Observable::range(1, 4)
//!     .map(|n| n * 10)
//!     .subscribe(|n| println!("{n}"));
//! # let _ = subscription;
//! ```

pub use crate::blocking::BlockingObservable;
pub use crate::group_by::GroupedObservable;
pub use crate::observable::Observable;
pub use rivulet_core::{
    CancellationToken, FnObserver, Observer, Result, RivuletError, StreamEvent, Subscriber,
    Subscription,
};
pub use rivulet_scheduler::{Scheduler, TaskHandle};
