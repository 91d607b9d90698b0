//! Uniform adapter over the rank-local in-place sorter.

use std::sync::Arc;

use crate::order::SortOrder;

/// Which local sorter the driver applies to the rank-local buffers, once
/// before the collective section and once on the received data.
pub enum SorterKind<E> {
    /// Default comparison sort, `slice::sort_by` under the configured
    /// order.
    Stable,
    /// `slice::sort_unstable_by` under the configured order.
    Unstable,
    /// User supplied in-place sorter, invoked as-is. The function is
    /// responsible for honouring the same order as the rest of the sort.
    Custom(Arc<dyn Fn(&mut [E]) + Send + Sync>),
}

impl<E> Clone for SorterKind<E> {
    fn clone(&self) -> Self {
        match self {
            SorterKind::Stable => SorterKind::Stable,
            SorterKind::Unstable => SorterKind::Unstable,
            SorterKind::Custom(f) => SorterKind::Custom(f.clone()),
        }
    }
}

impl<E> Default for SorterKind<E> {
    fn default() -> Self {
        SorterKind::Stable
    }
}

/// Sort the local element buffer with the configured sorter.
pub fn sort_elements<E, K>(v: &mut [E], order: &SortOrder<E, K>, kind: &SorterKind<E>) {
    match kind {
        SorterKind::Stable => v.sort_by(|a, b| order.cmp_elems(a, b)),
        SorterKind::Unstable => v.sort_unstable_by(|a, b| order.cmp_elems(a, b)),
        SorterKind::Custom(f) => f(v),
    }
}

/// Sort a key buffer with the configured strategy.
///
/// A custom element sorter cannot run on keys; that case takes the stable
/// path.
pub fn sort_keys<E, K>(keys: &mut [K], order: &SortOrder<E, K>, kind: &SorterKind<E>) {
    match kind {
        SorterKind::Unstable => keys.sort_unstable_by(|a, b| order.cmp_keys(a, b)),
        SorterKind::Stable | SorterKind::Custom(_) => keys.sort_by(|a, b| order.cmp_keys(a, b)),
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_stable_and_unstable_agree_on_values() {
        let order = SortOrder::<i64, i64>::natural();
        let mut a = vec![5i64, 1, 4, 1, 3];
        let mut b = a.clone();
        sort_elements(&mut a, &order, &SorterKind::Stable);
        sort_elements(&mut b, &order, &SorterKind::Unstable);
        assert_eq!(a, vec![1, 1, 3, 4, 5]);
        assert_eq!(a, b);
    }

    #[test]
    fn test_custom_sorter_is_invoked_as_is() {
        // A custom sorter that ignores the configured order entirely.
        let order = SortOrder::<i64, i64>::natural().reversed(true);
        let kind = SorterKind::Custom(Arc::new(|v: &mut [i64]| v.sort_unstable()));
        let mut v = vec![3i64, 1, 2];
        sort_elements(&mut v, &order, &kind);
        assert_eq!(v, vec![1, 2, 3]);
    }

    #[test]
    fn test_key_sort_respects_direction() {
        let order = SortOrder::<i64, i64>::natural().reversed(true);
        let mut keys = vec![2i64, 9, 4];
        sort_keys(&mut keys, &order, &SorterKind::Unstable);
        assert_eq!(keys, vec![9, 4, 2]);
    }

    #[test]
    fn test_key_sort_with_custom_falls_back_to_stable() {
        let order = SortOrder::<i64, i64>::natural();
        let kind: SorterKind<i64> = SorterKind::Custom(Arc::new(|_: &mut [i64]| {
            panic!("element sorter must not run on keys")
        }));
        let mut keys = vec![3i64, 1, 2];
        sort_keys(&mut keys, &order, &kind);
        assert_eq!(keys, vec![1, 2, 3]);
    }
}
