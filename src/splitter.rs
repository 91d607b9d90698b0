//! Splitter selection on the root rank.
//!
//! Keys dispatch statically between two behaviours: ordered-only keys take
//! the nearest sample at or below the ideal position, while numeric keys
//! linearly interpolate between the two bracketing samples. The sampled
//! cumulative counts are an underestimate of the true quantiles and the
//! CDF is roughly linear between adjacent samples, so interpolation closes
//! most of the remaining gap without any extra communication.

use crate::comm::CommScalar;

/// Key types the distributed sort can choose splitters over.
///
/// The provided `interpolate` ignores the upper bracketing sample and
/// returns the lower one, which is correct for any totally ordered key.
/// The primitive numeric types override it with linear interpolation;
/// integer keys round the interpolated value up, float keys keep it.
/// A user key type opts in with an empty impl:
///
/// ```
/// use sihsort::SortKey;
///
/// #[derive(Clone, Default, PartialEq, PartialOrd)]
/// struct Version(u8, u8);
///
/// #[cfg(not(feature = "mpi"))]
/// impl SortKey for Version {}
/// ```
pub trait SortKey: CommScalar {
    /// Pick a splitter for global position `target` between adjacent
    /// samples `x0` and `x1` whose global cumulative counts `y0 <= target`
    /// and `y1 > target` bracket it.
    fn interpolate(x0: Self, x1: Self, y0: u64, y1: u64, target: u64) -> Self {
        let _ = (x1, y0, y1, target);
        x0
    }
}

macro_rules! int_sort_key {
    ($($t:ty),* $(,)?) => {$(
        impl SortKey for $t {
            fn interpolate(x0: Self, x1: Self, y0: u64, y1: u64, target: u64) -> Self {
                if y1 == y0 {
                    return x0;
                }
                let frac = (target - y0) as f64 / (y1 - y0) as f64;
                let step = (frac * (x1 as f64 - x0 as f64)).ceil();
                (x0 as i128 + step as i128) as Self
            }
        }
    )*};
}

macro_rules! float_sort_key {
    ($($t:ty),* $(,)?) => {$(
        impl SortKey for $t {
            fn interpolate(x0: Self, x1: Self, y0: u64, y1: u64, target: u64) -> Self {
                if y1 == y0 {
                    return x0;
                }
                let frac = (target - y0) as $t / (y1 - y0) as $t;
                x0 + frac * (x1 - x0)
            }
        }
    )*};
}

int_sort_key!(i8, i16, i32, i64, isize, u8, u16, u32, u64, usize);
float_sort_key!(f32, f64);

/// Choose `size - 1` splitters from the globally sorted samples and their
/// summed cumulative histogram. Runs on the root rank only.
///
/// The ideal global position of boundary i is `round(i · N / P)`, rounded
/// half up in 128-bit arithmetic so positions cannot overflow. The largest
/// sample whose cumulative count does not exceed that position anchors the
/// choice; when the position falls strictly between two samples the key
/// decides whether to interpolate. A position below every sample's count
/// falls back to the first sample (every splitter at or below the global
/// minimum partitions identically).
pub fn select_splitters<K: SortKey>(
    samples: &[K],
    hist: &[u64],
    n_global: u64,
    size: usize,
) -> Vec<K> {
    debug_assert_eq!(samples.len(), hist.len());
    let n_samples = samples.len();
    let mut splitters = Vec::with_capacity(size - 1);

    for i in 1..size {
        let target =
            ((2 * i as u128 * n_global as u128 + size as u128) / (2 * size as u128)) as u64;
        let c = hist.partition_point(|&h| h <= target);
        let splitter = if c == 0 {
            samples[0].clone()
        } else if c == n_samples {
            samples[n_samples - 1].clone()
        } else {
            K::interpolate(
                samples[c - 1].clone(),
                samples[c].clone(),
                hist[c - 1],
                hist[c],
                target,
            )
        };
        splitters.push(splitter);
    }
    splitters
}
