//! Baked-in half-band IIR polyphase coefficients for the four 2× doubling stages used by
//! [`crate::oversampler::Oversampler`].
//!
//! These are the literal double-precision constants the reference implementation ships
//! (computed offline by a polyphase IIR filter designer, not reproduced here). Per `spec.md` §6,
//! reproducing the designer's stop-band behaviour bit-for-bit is not required, but the stop-band
//! floor must not rise — so these values are kept exactly as shipped rather than re-derived.

/// 1× → 2×: 12 coefficients, stop-band ≥ 96 dB, transition near 0.01·Fs.
pub const STAGE_2X: [f64; 12] = [
    0.036_681_502_163_648_017,
    0.136_547_624_631_957_94,
    0.274_631_759_379_454_44,
    0.423_138_617_436_567_11,
    0.561_098_697_879_195_31,
    0.677_540_049_974_161_84,
    0.769_741_833_863_227_03,
    0.839_889_624_849_638_92,
    0.892_260_818_003_879_02,
    0.931_541_959_963_183_9,
    0.962_094_548_378_084_17,
    0.987_816_370_732_895_85,
];

/// 2× → 4×: 4 coefficients, transition near 0.255·Fs.
pub const STAGE_4X: [f64; 4] = [
    0.041_893_991_997_656_171,
    0.168_903_482_439_952_01,
    0.390_560_772_921_166_03,
    0.743_895_748_268_479_26,
];

/// 4× → 8×: 3 coefficients, transition near 0.3775·Fs.
pub const STAGE_8X: [f64; 3] = [
    0.055_748_680_811_302_048,
    0.243_051_195_741_530_72,
    0.646_699_131_192_681_96,
];

/// 8× → 16×: 2 coefficients, transition near 0.43865·Fs.
pub const STAGE_16X: [f64; 2] = [0.107_177_453_460_235_73, 0.530_914_353_545_045_57];
