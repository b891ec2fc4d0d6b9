//! Construction-time errors.
//!
//! Per the failure semantics of this crate, no error ever propagates out of a processing call
//! (`process`, `process_gen`, `process_block`) — these are total once constructed. The only
//! fallible points are construction and reconfiguration, surfaced here.

use std::fmt;

/// An error raised while constructing or reconfiguring one of this crate's resamplers.
///
/// Never returned from a processing call; all processing-time caller-contract violations are
/// handled locally (debug-asserted and truncated/silenced), per [`crate::debug::rt_debug_assert`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResamplerError {
    /// [`crate::oversampler::Factor`] requested a oversampling factor higher than the engine
    /// supports.
    UnsupportedFactor,
    /// The Lanczos kernel table failed to initialize (e.g. allocation failure on first
    /// construction). There is no fallback — table construction is process-wide and one-shot.
    TableInitFailed,
}

impl fmt::Display for ResamplerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResamplerError::UnsupportedFactor => {
                write!(f, "requested oversampling factor is not supported")
            }
            ResamplerError::TableInitFailed => {
                write!(f, "Lanczos kernel table failed to initialize")
            }
        }
    }
}

impl std::error::Error for ResamplerError {}
