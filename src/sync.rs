//! A module which decides which synchronization primitives to use throughout the rest of the crate
//! depending on features and configuration options

cfg_if::cfg_if! {
    if #[cfg(loom)] {
        pub(crate) use loom::sync::atomic::{AtomicU16, AtomicU32, AtomicU64, AtomicU8, Ordering};
    } else if #[cfg(feature = "shuttle")] {
        pub(crate) use shuttle::sync::atomic::{AtomicU16, AtomicU32, AtomicU64, AtomicU8, Ordering};
    } else {
        pub(crate) use core::sync::atomic::Ordering;

        #[cfg(target_has_atomic = "8")]
        pub(crate) use core::sync::atomic::AtomicU8;
        #[cfg(target_has_atomic = "16")]
        pub(crate) use core::sync::atomic::AtomicU16;
        #[cfg(target_has_atomic = "32")]
        pub(crate) use core::sync::atomic::AtomicU32;
        #[cfg(target_has_atomic = "64")]
        pub(crate) use core::sync::atomic::AtomicU64;
    }
}
