//! Redistribution layout: per-destination send counts derived from the
//! splitter histograms, and the displacement prefix sums for the packed
//! exchange buffers.

use std::cmp::Ordering;

use itertools::Itertools;

use crate::comm::Count;
use crate::order::SortOrder;

/// Per-destination send counts for the locally sorted array.
///
/// `below[k]` and `upto[k]` count the local elements strictly preceding /
/// not exceeding splitter k. Destination k takes the elements between
/// splitters k−1 and k, with elements tied with a splitter staying on its
/// left; the first destination starts at the beginning of the array and
/// the last one runs to its end. A run of equal splitters carries no
/// elements between its members, so the elements tied with the run are
/// pooled and spread evenly over the destinations the run spans — on
/// all-duplicate inputs this is what keeps the result balanced instead of
/// collapsing onto one rank.
///
/// The counts are non-negative by monotonicity of the histograms and sum
/// to `local_len`.
pub fn send_counts<E, K>(
    splitters: &[K],
    below: &[u64],
    upto: &[u64],
    local_len: usize,
    order: &SortOrder<E, K>,
) -> Vec<Count> {
    debug_assert_eq!(splitters.len(), below.len());
    debug_assert_eq!(splitters.len(), upto.len());

    let size = splitters.len() + 1;
    let mut counts = vec![0 as Count; size];
    let mut assigned = 0u64;

    let mut a = 0;
    while a < splitters.len() {
        let mut b = a + 1;
        while b < splitters.len()
            && order.cmp_keys(&splitters[a], &splitters[b]) == Ordering::Equal
        {
            b += 1;
        }
        let run = b - a;

        if run == 1 {
            counts[a] += (upto[a] - assigned) as Count;
            assigned = upto[a];
        } else {
            counts[a] += (below[a] - assigned) as Count;
            let ties = upto[a] - below[a];
            let share = ties / (run as u64 + 1);
            let remainder = (ties % (run as u64 + 1)) as usize;
            for j in 0..=run {
                counts[a + j] += (share + u64::from(j < remainder)) as Count;
            }
            assigned = upto[a];
        }
        a = b;
    }
    counts[size - 1] += (local_len as u64 - assigned) as Count;

    debug_assert_eq!(
        counts.iter().map(|&c| c as u64).sum::<u64>(),
        local_len as u64
    );
    counts
}

/// Exclusive prefix sum of the counts: the offset of each rank's packet
/// inside a packed exchange buffer.
pub fn displacements(counts: &[Count]) -> Vec<Count> {
    counts
        .iter()
        .scan(0, |acc, &x| {
            let tmp = *acc;
            *acc += x;
            Some(tmp)
        })
        .collect_vec()
}
