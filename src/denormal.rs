//! Denormal prevention for the audio thread.
//!
//! The half-band IIR stages in [`crate::halfband`] can develop denormals on quiet tails, which
//! on some platforms costs an order of magnitude more than normal floating point arithmetic.
//! [`with_denormals_flushed`] wraps a closure (typically the whole `process_block`/`process`
//! call) with flush-to-zero enabled for its duration, restoring whatever mode was previously set
//! once the closure returns.

use std::marker::PhantomData;

/// Runs `f` with the CPU's flush-to-zero flag enabled, restoring the previous mode afterwards.
///
/// A no-op wrapper on targets without SSE (FTZ is simply never enabled, `f` still runs).
#[inline]
pub fn with_denormals_flushed<T, F: FnOnce() -> T>(f: F) -> T {
    let _guard = ScopedFtz::enable();
    f()
}

/// Enables the CPU's flush-to-zero flag while this guard is alive. If the flag was not already
/// set, it is restored to its prior value on drop; if it was already set (e.g. the host enabled
/// it), dropping this guard leaves it alone.
struct ScopedFtz {
    old_ftz_mode: Option<u32>,
    // FTZ is a per-thread floating point control register; this guard must not cross threads.
    _not_send_sync: PhantomData<*const ()>,
}

impl ScopedFtz {
    fn enable() -> Self {
        cfg_if::cfg_if! {
            if #[cfg(all(any(target_arch = "x86", target_arch = "x86_64"), target_feature = "sse"))] {
                #[cfg(target_arch = "x86_64")]
                use core::arch::x86_64::{
                    _MM_FLUSH_ZERO_ON, _MM_GET_FLUSH_ZERO_MODE, _MM_SET_FLUSH_ZERO_MODE,
                };
                #[cfg(target_arch = "x86")]
                use core::arch::x86::{
                    _MM_FLUSH_ZERO_ON, _MM_GET_FLUSH_ZERO_MODE, _MM_SET_FLUSH_ZERO_MODE,
                };

                let mode = unsafe { _MM_GET_FLUSH_ZERO_MODE() };
                if mode != _MM_FLUSH_ZERO_ON {
                    unsafe { _MM_SET_FLUSH_ZERO_MODE(_MM_FLUSH_ZERO_ON) };
                    Self {
                        old_ftz_mode: Some(mode),
                        _not_send_sync: PhantomData,
                    }
                } else {
                    Self {
                        old_ftz_mode: None,
                        _not_send_sync: PhantomData,
                    }
                }
            } else {
                Self {
                    old_ftz_mode: None,
                    _not_send_sync: PhantomData,
                }
            }
        }
    }
}

impl Drop for ScopedFtz {
    fn drop(&mut self) {
        if let Some(mode) = self.old_ftz_mode {
            cfg_if::cfg_if! {
                if #[cfg(all(any(target_arch = "x86", target_arch = "x86_64"), target_feature = "sse"))] {
                    #[cfg(target_arch = "x86_64")]
                    unsafe { core::arch::x86_64::_MM_SET_FLUSH_ZERO_MODE(mode) };
                    #[cfg(target_arch = "x86")]
                    unsafe { core::arch::x86::_MM_SET_FLUSH_ZERO_MODE(mode) };
                } else {
                    let _ = mode;
                }
            }
        }
    }
}
