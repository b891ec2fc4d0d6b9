//! Discretized Lanczos kernel tables (component D).
//!
//! The kernel itself, `A * sin(pi*x) * sin(pi*x/A) / (pi^2 * x^2)`, is too expensive to
//! evaluate per tap at audio rate, so it's pre-evaluated once at [`TABLE_POINTS`] fractional
//! offsets and looked up with linear interpolation between adjacent rows (`T`/`dT`) at run time.

use crate::sample::Sample;

/// The Lanczos window parameter `A`: the kernel is zero outside `[-A, A]`. This is the
/// reference's own default and the only value any retrieved call site instantiates. It's kept
/// as a plain constant rather than a const generic on [`KernelTable`]: the table is process-wide
/// static state built once per sample type, and a `static` item can't depend on a generic
/// parameter of its enclosing generic item, so a const-generic `KernelTable<S, const A: usize>`
/// couldn't back a single shared `lazy_static!` the way `KernelTable<S>` can.
pub const FILTER_WINDOW: usize = 12;
/// The filter spans `2*A` taps: `A` to the left of the read position, `A` to the right.
pub const FILTER_WIDTH: usize = FILTER_WINDOW * 2;
/// Discretization resolution: the `[0, 1)` fractional offset between input samples is divided
/// into this many steps.
pub const TABLE_POINTS: usize = 8192;

fn kernel(x: f64) -> f64 {
    if x.abs() < 1e-7 {
        return 1.0;
    }
    let a = FILTER_WINDOW as f64;
    let pi = std::f64::consts::PI;
    a * (pi * x).sin() * (pi * x / a).sin() / (pi * pi * x * x)
}

/// A pair of row-major `(TABLE_POINTS + 1) x FILTER_WIDTH` tables: `t` holds the kernel value at
/// each discretized fractional offset, `dt` holds the forward difference to the next row (used
/// to linearly interpolate between the `TABLE_POINTS` discretization steps at run time).
pub struct KernelTable<S> {
    t: Vec<S>,
    dt: Vec<S>,
}

impl<S: Sample> KernelTable<S> {
    fn build() -> Self {
        let delta_x = 1.0 / (TABLE_POINTS as f64);
        let mut t = vec![S::default(); (TABLE_POINTS + 1) * FILTER_WIDTH];

        for row in 0..=TABLE_POINTS {
            let x0 = delta_x * row as f64;
            for i in 0..FILTER_WIDTH {
                let x = x0 + i as f64 - FILTER_WINDOW as f64;
                t[row * FILTER_WIDTH + i] = S::from_f64(kernel(x));
            }
        }

        let mut dt = vec![S::default(); (TABLE_POINTS + 1) * FILTER_WIDTH];
        for row in 0..TABLE_POINTS {
            for i in 0..FILTER_WIDTH {
                dt[row * FILTER_WIDTH + i] =
                    t[(row + 1) * FILTER_WIDTH + i] - t[row * FILTER_WIDTH + i];
            }
        }
        // The last row wraps to row 0's delta, matching the reference's note that the delta is
        // the same at the seam.
        for i in 0..FILTER_WIDTH {
            dt[TABLE_POINTS * FILTER_WIDTH + i] = dt[i];
        }

        Self { t, dt }
    }

    /// The `FILTER_WIDTH`-long kernel-value row at discretized offset `row`.
    #[inline]
    pub fn row(&self, row: usize) -> &[S] {
        &self.t[row * FILTER_WIDTH..(row + 1) * FILTER_WIDTH]
    }

    /// The `FILTER_WIDTH`-long forward-difference row at discretized offset `row`.
    #[inline]
    pub fn delta_row(&self, row: usize) -> &[S] {
        &self.dt[row * FILTER_WIDTH..(row + 1) * FILTER_WIDTH]
    }
}

/// Sample types with a process-wide, lazily-built kernel table. Implemented only for the two
/// concrete types this crate supports (`f32`, `f64`) since each backing `lazy_static!` is
/// necessarily non-generic (see [`FILTER_WINDOW`]'s doc comment).
pub trait HasKernelTable: Sample {
    fn kernel_table() -> &'static KernelTable<Self>;
}

// Each `static ref` below derefs to `KernelTable<_>`, so `&F32_TABLE`/`&F64_TABLE` coerce to
// `&'static KernelTable<f32>`/`&'static KernelTable<f64>` the same way `&String` coerces to `&str`.
lazy_static::lazy_static! {
    static ref F32_TABLE: KernelTable<f32> = KernelTable::build();
    static ref F64_TABLE: KernelTable<f64> = KernelTable::build();
}

impl HasKernelTable for f32 {
    fn kernel_table() -> &'static KernelTable<f32> {
        &F32_TABLE
    }
}

impl HasKernelTable for f64 {
    fn kernel_table() -> &'static KernelTable<f64> {
        &F64_TABLE
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kernel_is_unity_at_zero() {
        assert!((kernel(0.0) - 1.0).abs() < 1e-12);
        assert!((kernel(1e-9) - 1.0).abs() < 1e-9);
    }

    #[test]
    fn kernel_is_zero_at_integer_offsets_other_than_zero() {
        for i in 1..FILTER_WINDOW {
            assert!(kernel(i as f64).abs() < 1e-9, "kernel({i}) should vanish");
        }
    }

    #[test]
    fn table_row_center_matches_kernel_function() {
        let table = <f64 as HasKernelTable>::kernel_table();
        let row0 = table.row(0);
        for i in 0..FILTER_WIDTH {
            let x = i as f64 - FILTER_WINDOW as f64;
            assert!((row0[i] - kernel(x)).abs() < 1e-9);
        }
    }

    #[test]
    fn delta_table_matches_forward_difference() {
        let table = <f64 as HasKernelTable>::kernel_table();
        for row in 0..4 {
            let a = table.row(row);
            let b = table.row(row + 1);
            let d = table.delta_row(row);
            for i in 0..FILTER_WIDTH {
                assert!((d[i] - (b[i] - a[i])).abs() < 1e-12);
            }
        }
    }

    #[test]
    fn delta_table_wraps_at_the_seam() {
        let table = <f64 as HasKernelTable>::kernel_table();
        let last = table.delta_row(TABLE_POINTS);
        let first = table.delta_row(0);
        assert_eq!(last, first);
    }

    #[test]
    fn f32_and_f64_tables_are_independent_and_agree_closely() {
        let f64_table = <f64 as HasKernelTable>::kernel_table();
        let f32_table = <f32 as HasKernelTable>::kernel_table();
        let row64 = f64_table.row(100);
        let row32 = f32_table.row(100);
        for i in 0..FILTER_WIDTH {
            assert!((row64[i] as f32 - row32[i]).abs() < 1e-5);
        }
    }
}
