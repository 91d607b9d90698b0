//! Probe histograms over the sorted rank-local array.
//!
//! Probes are independent, so both variants fan the binary searches out
//! over a thread pool; every probe writes its own output slot.

use rayon::prelude::*;

use crate::order::{searchsortedfirst, searchsortedlast, SortOrder};

/// For every probe key, count the local elements that do not exceed it.
///
/// `v` must be sorted under `order`. Only the first `probes.len()` slots
/// of `out` are written, so a longer buffer can reserve tail slots for
/// piggy-backed values.
pub fn histogram_into<E, K>(v: &[E], probes: &[K], order: &SortOrder<E, K>, out: &mut [u64])
where
    E: Sync,
    K: Sync,
{
    debug_assert!(out.len() >= probes.len());
    out[..probes.len()]
        .par_iter_mut()
        .zip(probes.par_iter())
        .for_each(|(slot, probe)| *slot = searchsortedlast(v, probe, order) as u64);
}

/// For every probe key, count the local elements strictly preceding it.
///
/// The companion of [`histogram_into`]; the difference of the two at a
/// probe is the number of local elements tied with it.
pub fn histogram_below_into<E, K>(v: &[E], probes: &[K], order: &SortOrder<E, K>, out: &mut [u64])
where
    E: Sync,
    K: Sync,
{
    debug_assert!(out.len() >= probes.len());
    out[..probes.len()]
        .par_iter_mut()
        .zip(probes.par_iter())
        .for_each(|(slot, probe)| *slot = searchsortedfirst(v, probe, order) as u64);
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::helpers::uniform_keys_fixture;

    #[test]
    fn test_against_naive_count() {
        let mut v: Vec<i64> = uniform_keys_fixture(500, 0, 50, Some(1));
        v.sort_unstable();
        let order = SortOrder::natural();
        let probes: Vec<i64> = vec![-1, 0, 7, 7, 25, 49, 60];

        let mut upto = vec![0u64; probes.len()];
        let mut below = vec![0u64; probes.len()];
        histogram_into(&v, &probes, &order, &mut upto);
        histogram_below_into(&v, &probes, &order, &mut below);

        for (j, &p) in probes.iter().enumerate() {
            assert_eq!(upto[j], v.iter().filter(|&&e| e <= p).count() as u64);
            assert_eq!(below[j], v.iter().filter(|&&e| e < p).count() as u64);
        }
    }

    #[test]
    fn test_tail_slots_untouched() {
        let v = vec![1i64, 2, 3];
        let order = SortOrder::natural();
        let probes = vec![2i64];
        let mut out = vec![0u64, 99];
        histogram_into(&v, &probes, &order, &mut out);
        assert_eq!(out, vec![2, 99]);
    }

    #[test]
    fn test_monotone_over_sorted_probes() {
        let mut v: Vec<i64> = uniform_keys_fixture(300, -1000, 1000, Some(2));
        v.sort_unstable();
        let order = SortOrder::natural();
        let mut probes: Vec<i64> = uniform_keys_fixture(40, -1200, 1200, Some(3));
        probes.sort_unstable();

        let mut out = vec![0u64; probes.len()];
        histogram_into(&v, &probes, &order, &mut out);
        for pair in out.windows(2) {
            assert!(pair[0] <= pair[1]);
        }
    }

    #[test]
    fn test_reversed_order() {
        let v = vec![9i64, 7, 7, 4, 1];
        let order = SortOrder::natural().reversed(true);
        let probes = vec![10i64, 7, 0];
        let mut out = vec![0u64; probes.len()];
        histogram_into(&v, &probes, &order, &mut out);
        // Counts of elements not preceding the probe in descending order.
        assert_eq!(out, vec![0, 3, 5]);
    }
}
