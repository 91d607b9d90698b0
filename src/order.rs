//! The ordering shared by every comparison in the sort: a key projection,
//! a strict less-than on keys and a direction flag, plus the binary search
//! primitives probing a sorted rank-local array.

use std::cmp::Ordering;
use std::sync::Arc;

/// Total order used by the distributed sort.
///
/// Bundles the caller supplied key projection `by`, the strict comparator
/// `lt` on keys, and the reverse flag. Every rank must use the same order
/// for the local sorts and for every probe; mixing orders between phases
/// produces garbage splitters.
///
/// The projection must return one fixed key type for the whole sort, and
/// `lt` must be a strict total order on that type.
pub struct SortOrder<E, K> {
    by: Arc<dyn Fn(&E) -> K + Send + Sync>,
    lt: Arc<dyn Fn(&K, &K) -> bool + Send + Sync>,
    rev: bool,
}

impl<E, K> Clone for SortOrder<E, K> {
    fn clone(&self) -> Self {
        Self {
            by: self.by.clone(),
            lt: self.lt.clone(),
            rev: self.rev,
        }
    }
}

impl<E> SortOrder<E, E>
where
    E: Clone + PartialOrd,
{
    /// Natural order: the key is the element itself, compared with
    /// `PartialOrd`.
    pub fn natural() -> Self {
        Self {
            by: Arc::new(|e: &E| e.clone()),
            lt: Arc::new(|a: &E, b: &E| a < b),
            rev: false,
        }
    }
}

impl<E, K> SortOrder<E, K> {
    /// Order elements by a projected key, compared with `PartialOrd`.
    pub fn by<F>(by: F) -> Self
    where
        F: Fn(&E) -> K + Send + Sync + 'static,
        K: PartialOrd,
    {
        Self {
            by: Arc::new(by),
            lt: Arc::new(|a: &K, b: &K| a < b),
            rev: false,
        }
    }

    /// Replace the key comparator.
    pub fn with_comparator<F>(mut self, lt: F) -> Self
    where
        F: Fn(&K, &K) -> bool + Send + Sync + 'static,
    {
        self.lt = Arc::new(lt);
        self
    }

    /// Set the direction: `true` reverses the order.
    pub fn reversed(mut self, rev: bool) -> Self {
        self.rev = rev;
        self
    }

    /// Whether the order is reversed.
    pub fn is_reversed(&self) -> bool {
        self.rev
    }

    /// Apply the key projection to an element.
    pub fn key(&self, e: &E) -> K {
        (self.by)(e)
    }

    /// Strict precedence between two keys, direction applied. Equal keys
    /// never precede each other, in either direction.
    pub fn key_lt(&self, a: &K, b: &K) -> bool {
        if self.rev {
            (self.lt)(b, a)
        } else {
            (self.lt)(a, b)
        }
    }

    /// Strict precedence between two elements.
    pub fn elem_lt(&self, a: &E, b: &E) -> bool {
        self.key_lt(&self.key(a), &self.key(b))
    }

    /// Three-way comparison between keys, for the standard sorts.
    pub fn cmp_keys(&self, a: &K, b: &K) -> Ordering {
        if self.key_lt(a, b) {
            Ordering::Less
        } else if self.key_lt(b, a) {
            Ordering::Greater
        } else {
            Ordering::Equal
        }
    }

    /// Three-way comparison between elements.
    pub fn cmp_elems(&self, a: &E, b: &E) -> Ordering {
        self.cmp_keys(&self.key(a), &self.key(b))
    }
}

/// Number of elements of the sorted slice whose key precedes `probe`.
///
/// `v` must be sorted under `order`. Equivalently the index of the first
/// element not preceding the probe.
pub fn searchsortedfirst<E, K>(v: &[E], probe: &K, order: &SortOrder<E, K>) -> usize {
    v.partition_point(|e| order.key_lt(&order.key(e), probe))
}

/// Number of elements of the sorted slice whose key does not exceed
/// `probe`, i.e. the position after the last element ≼ probe.
///
/// `v` must be sorted under `order`; agrees with the comparison used by
/// the local sorts.
pub fn searchsortedlast<E, K>(v: &[E], probe: &K, order: &SortOrder<E, K>) -> usize {
    v.partition_point(|e| !order.key_lt(probe, &order.key(e)))
}

#[cfg(test)]
mod test {
    use super::*;

    fn naive_counts(v: &[i64], probe: i64, rev: bool) -> (usize, usize) {
        let below = v
            .iter()
            .filter(|&&e| if rev { e > probe } else { e < probe })
            .count();
        let upto = v
            .iter()
            .filter(|&&e| if rev { e >= probe } else { e <= probe })
            .count();
        (below, upto)
    }

    #[test]
    fn test_search_against_linear_scan() {
        let v = vec![1i64, 3, 3, 3, 7, 9, 9, 12];
        let order = SortOrder::natural();
        for probe in [-5, 0, 1, 2, 3, 4, 7, 9, 12, 40] {
            let (below, upto) = naive_counts(&v, probe, false);
            assert_eq!(searchsortedfirst(&v, &probe, &order), below);
            assert_eq!(searchsortedlast(&v, &probe, &order), upto);
        }
    }

    #[test]
    fn test_search_reversed() {
        let v = vec![12i64, 9, 9, 7, 3, 3, 3, 1];
        let order = SortOrder::natural().reversed(true);
        for probe in [-5, 0, 1, 3, 7, 9, 12, 40] {
            let (below, upto) = naive_counts(&v, probe, true);
            assert_eq!(searchsortedfirst(&v, &probe, &order), below);
            assert_eq!(searchsortedlast(&v, &probe, &order), upto);
        }
    }

    #[test]
    fn test_projection_and_comparator() {
        let v = vec![(1u8, 30i64), (2, 20), (3, 10)];
        let order: SortOrder<(u8, i64), i64> = SortOrder::by(|e: &(u8, i64)| e.1)
            .with_comparator(|a: &i64, b: &i64| a > b);
        // Under the flipped comparator the slice is sorted as given.
        assert_eq!(searchsortedlast(&v, &20, &order), 2);
        assert_eq!(searchsortedfirst(&v, &20, &order), 1);
        assert!(order.elem_lt(&(0, 25), &(0, 15)));
    }

    #[test]
    fn test_ties_are_not_ordered() {
        let order = SortOrder::<i64, i64>::natural().reversed(true);
        assert!(!order.key_lt(&5, &5));
        assert_eq!(order.cmp_keys(&5, &5), Ordering::Equal);
        assert_eq!(order.cmp_keys(&3, &5), Ordering::Greater);
    }
}
