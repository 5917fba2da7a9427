//! A lock-free bitmap for handing out runs of slots from a small fixed-size pool.
//!
//! The whole bitmap lives in one machine word. Slot `i` is bit `i` counted from the most
//! significant end; a set bit is an occupied slot. A [ReservationEngine] reserves and releases
//! runs of consecutive slots by reading the word, finding a run with leading-zero and
//! leading-one counts, and publishing the change with a single compare-and-swap. Lost races are
//! retried a bounded number of times and then reported as [Error::ContentionExceeded].
//!
//! ```
//! use freebits::{Error, PlainAccessor, ReservationEngine};
//!
//! let engine = ReservationEngine::new(PlainAccessor::<u8>::default());
//! assert_eq!(engine.reserve(3), Ok(0));
//! assert_eq!(engine.reserve(2), Ok(3));
//! assert_eq!(engine.release(0, 3), Ok(0));
//! assert_eq!(engine.reserve(5), Err(Error::NoSpace { bits: 5 }));
//! ```
#![cfg_attr(not(test), no_std)]

#[cfg(all(feature = "std", not(test)))]
extern crate std;

pub mod accessor;
pub mod engine;
pub mod err;
pub mod run;
mod sync;
pub mod types;

pub use crate::accessor::{AtomicAccessor, PlainAccessor, StorageAccessor};
pub use crate::engine::{AtomicReservationEngine, ReservationEngine, DEFAULT_CONTENTION_LIMIT};
pub use crate::err::Error;
pub use crate::run::{find_free_run, find_run, free_runs, run_mask, Fit, FreeRuns};
pub use crate::types::{AtomicBitmask, BitCount, BitPosition, Bitmask, Run, WidestLockFree};
