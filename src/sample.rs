//! The generic float sample type used throughout this crate.

/// The floating point types every engine in this crate can process: `f32` and `f64`.
///
/// Bounded by [`num_traits::Float`] rather than a hand-rolled trait, matching the rest of the
/// Rust DSP ecosystem's go-to abstraction for "any IEEE float sample type". `Default` gives us
/// zero-initialisation for scratch buffers without writing `S::zero()` everywhere.
pub trait Sample: num_traits::Float + Default + Copy + Send + Sync + 'static {
    /// Constructs a sample from an `f64` literal. Used for coefficients and constants that are
    /// naturally expressed in double precision regardless of `Self`.
    fn from_f64(value: f64) -> Self;

    /// Converts this sample to `f64`, e.g. for phase-accumulator arithmetic that must stay in
    /// double precision even when `Self = f32`.
    fn to_f64_lossy(self) -> f64;
}

impl Sample for f32 {
    #[inline]
    fn from_f64(value: f64) -> Self {
        value as f32
    }

    #[inline]
    fn to_f64_lossy(self) -> f64 {
        self as f64
    }
}

impl Sample for f64 {
    #[inline]
    fn from_f64(value: f64) -> Self {
        value
    }

    #[inline]
    fn to_f64_lossy(self) -> f64 {
        self
    }
}
