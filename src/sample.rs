//! Deterministic sample extraction from the sorted rank-local array.

use crate::linspace::{ceil_ilog2, IntLinSpace};
use crate::order::SortOrder;

/// Number of samples each rank contributes, `2 · P · ⌈log₂ P⌉` for a
/// communicator of `size` ranks.
pub fn local_sample_count(size: usize) -> usize {
    2 * size * ceil_ilog2(size) as usize
}

/// Project `n_samples` keys out of the locally sorted array, evenly spaced
/// from the first element to the last.
///
/// Sampling is deterministic so repeated runs see identical splitter
/// candidates and no RNG state has to be agreed across ranks; because the
/// array is sorted, the samples come out sorted as well.
pub fn extract_samples<E, K>(v: &[E], n_samples: usize, order: &SortOrder<E, K>) -> Vec<K> {
    debug_assert!(!v.is_empty());
    let indices = IntLinSpace::new(0, v.len() - 1, n_samples);
    indices.iter().map(|i| order.key(&v[i])).collect()
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_local_sample_count() {
        assert_eq!(local_sample_count(1), 0);
        assert_eq!(local_sample_count(2), 4);
        assert_eq!(local_sample_count(4), 16);
        assert_eq!(local_sample_count(8), 48);
        assert_eq!(local_sample_count(16), 128);
    }

    #[test]
    fn test_samples_span_the_array() {
        let v: Vec<i64> = (0..100).map(|i| 3 * i).collect();
        let order = SortOrder::natural();
        let samples = extract_samples(&v, 16, &order);
        assert_eq!(samples.len(), 16);
        assert_eq!(samples[0], v[0]);
        assert_eq!(*samples.last().unwrap(), *v.last().unwrap());
        for pair in samples.windows(2) {
            assert!(pair[0] <= pair[1]);
        }
    }

    #[test]
    fn test_samples_are_projected() {
        let v = vec![(0u8, 10i64), (0, 20), (0, 30)];
        let order: SortOrder<(u8, i64), i64> = SortOrder::by(|e: &(u8, i64)| e.1);
        let samples = extract_samples(&v, 4, &order);
        assert_eq!(samples, vec![10, 20, 30, 30]);
    }

    #[test]
    fn test_short_array_repeats_entries() {
        let v = vec![7i64];
        let order = SortOrder::natural();
        assert_eq!(extract_samples(&v, 4, &order), vec![7, 7, 7, 7]);
    }
}
