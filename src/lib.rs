#![cfg_attr(feature = "simd", feature(portable_simd))]

//! Real-time multirate resampling core.
//!
//! Two independent pieces:
//!
//! - An integer-factor oversampler ([`oversampler::Oversampler`]) built from cascaded half-band
//!   polyphase IIR stages ([`halfband`], [`stage2x`]), for running a per-sample nonlinearity or
//!   other process at 2×/4×/8×/16× to push aliasing above the audible band.
//! - An arbitrary-ratio streaming resampler ([`realtime::RealtimeResampler`]) bridging any outer
//!   host sample rate to a fixed inner processing rate, using windowed-sinc (Lanczos) kernels
//!   ([`lanczos`]) or a linear/cubic interpolation fallback.
//!
//! Neither type allocates or returns an error once constructed; all fallibility lives at
//! construction and reconfiguration time (see [`error::ResamplerError`]).

#[macro_use]
pub mod debug;

pub mod coefficients;
pub mod denormal;
pub mod error;
pub mod halfband;
pub mod lanczos;
pub mod oversampler;
pub mod realtime;
pub mod sample;
pub mod stage2x;

pub use error::ResamplerError;
pub use oversampler::{Factor, Oversampler};
pub use realtime::{BlockProcessor, Mode, RealtimeResampler};
pub use sample::Sample;

// Re-exported so the `rt_*!` macros (see `debug.rs`) can refer to `$crate::log` without forcing
// every caller to also depend on `log` directly.
pub use log;
