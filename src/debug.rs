// NOTE: Exporting macros in Rust is a bit weird. `#[macro_export]` causes them to be exported to
//       the crate root, but that makes it difficult to include just the macros without using
//       `#[macro_use] extern crate polyrate;`. That's why the macros are also re-exported from
//       this module.

/// Write something to the logger. Thin wrapper around [`log::info!`] so call sites don't need to
/// depend on `log` directly.
#[macro_export]
macro_rules! rt_log {
    ($($args:tt)*) => (
        $crate::log::info!($($args)*)
    );
}
pub use rt_log;

/// Similar to [`rt_log!`], but for fatal, construction-time errors.
#[macro_export]
macro_rules! rt_error {
    ($($args:tt)*) => (
        $crate::log::error!($($args)*)
    );
}
pub use rt_error;

/// A `debug_assert!()` analogue that logs the failure with source information instead of
/// panicking or aborting the audio callback. Caller-contract violations on the audio thread are
/// asserted in debug builds and silently handled in release builds — never propagated as an
/// error from a processing call.
#[macro_export]
macro_rules! rt_debug_assert {
    ($cond:expr $(,)?) => (
        if cfg!(debug_assertions) && !$cond {
            $crate::log::debug!(concat!("Debug assertion failed: ", stringify!($cond)));
        }
    );
    ($cond:expr, $format:expr $(, $($args:tt)*)?) => (
        if cfg!(debug_assertions) && !$cond {
            $crate::log::debug!(concat!("Debug assertion failed: ", stringify!($cond), ", ", $format), $($($args)*)?);
        }
    );
}
pub use rt_debug_assert;

/// An unconditional debug assertion failure, for when the condition has already been checked
/// elsewhere.
#[macro_export]
macro_rules! rt_debug_assert_failure {
    () => (
        if cfg!(debug_assertions) {
            $crate::log::debug!("Debug assertion failed");
        }
    );
    ($format:expr $(, $($args:tt)*)?) => (
        if cfg!(debug_assertions) {
            $crate::log::debug!(concat!("Debug assertion failed: ", $format), $($($args)*)?);
        }
    );
}
pub use rt_debug_assert_failure;

/// A `debug_assert_eq!()` analogue that logs instead of panicking.
#[macro_export]
macro_rules! rt_debug_assert_eq {
    ($left:expr, $right:expr $(,)?) => (
        if cfg!(debug_assertions) && $left != $right {
            $crate::log::debug!(concat!("Debug assertion failed: ", stringify!($left), " != ", stringify!($right)));
        }
    );
}
pub use rt_debug_assert_eq;

/// A `debug_assert_ne!()` analogue that logs instead of panicking.
#[macro_export]
macro_rules! rt_debug_assert_ne {
    ($left:expr, $right:expr $(,)?) => (
        if cfg!(debug_assertions) && $left == $right {
            $crate::log::debug!(concat!("Debug assertion failed: ", stringify!($left), " == ", stringify!($right)));
        }
    );
}
pub use rt_debug_assert_ne;
