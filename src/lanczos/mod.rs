//! Windowed-sinc (Lanczos) resampling: discretized kernel tables plus the streaming
//! push/pop resampler built on top of them.

pub mod resampler;
pub mod table;

pub(crate) use resampler::TapSum;
pub use resampler::LanczosResampler;
pub use table::{HasKernelTable, KernelTable, FILTER_WINDOW, FILTER_WIDTH, TABLE_POINTS};
