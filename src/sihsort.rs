//! Driver for the distributed sort: sequences the sample, histogram,
//! interpolate and redistribute phases and the fixed schedule of
//! collectives between them.

use crate::{
    comm::{Collectives, CommScalar, Count},
    exchange::send_counts,
    histogram::{histogram_below_into, histogram_into},
    order::SortOrder,
    sample::{extract_samples, local_sample_count},
    sorter::{sort_elements, sort_keys, SorterKind},
    splitter::{select_splitters, SortKey},
};

/// Algorithm configuration shared by all ranks of a sort.
pub struct SihSortConfig<E> {
    /// Rank that gathers the samples and selects the splitters.
    pub root: Count,
    /// Local in-place sorter, see [`SorterKind`].
    pub sorter: SorterKind<E>,
}

impl<E> Default for SihSortConfig<E> {
    fn default() -> Self {
        Self {
            root: 0,
            sorter: SorterKind::Stable,
        }
    }
}

impl<E> Clone for SihSortConfig<E> {
    fn clone(&self) -> Self {
        Self {
            root: self.root,
            sorter: self.sorter.clone(),
        }
    }
}

/// Summary emitted once the sort completes, identical on every rank.
#[derive(Debug, Clone, PartialEq)]
pub struct SortStats<K> {
    /// The `P − 1` selected splitters, sorted under the configured order.
    pub splitters: Vec<K>,
    /// Post-sort element count of every rank.
    pub num_elements: Vec<u64>,
}

/// Sort a distributed array collectively over the ranks of `comm`.
///
/// Every rank calls this with its local part of the data and the same
/// communicator, root and order. On return each rank holds a contiguous
/// slice of the global sorted sequence: all elements on rank i precede
/// all elements on rank i + 1 under `order`, with slice sizes balanced to
/// within roughly one sample interval. The returned stats carry the
/// chosen splitters and every rank's final element count.
///
/// Exactly seven collectives are issued per non-trivial call — gather,
/// broadcast, reduce, broadcast, all-to-all, all-reduce and the variable
/// all-to-all, in that order. Ranks enter them in lockstep, so a rank
/// that fails its argument check leaves the others blocked: holding at
/// least one element per rank is a caller-side precondition, checked
/// before the first collective. A single-rank communicator degenerates to
/// the local sort with no communication.
///
/// # Arguments
/// * `array` - Local part of the distributed array, consumed and replaced
///   by this rank's slice of the sorted sequence
/// * `comm` - Collective transport shared by all participating ranks
/// * `order` - Key projection, comparator and direction
/// * `config` - Root rank and local sorter choice
pub fn sihsort<E, K, C>(
    array: &mut Vec<E>,
    comm: &C,
    order: &SortOrder<E, K>,
    config: &SihSortConfig<E>,
) -> Result<SortStats<K>, std::io::Error>
where
    E: CommScalar,
    K: SortKey,
    C: Collectives,
{
    if array.is_empty() {
        return Err(std::io::Error::new(
            std::io::ErrorKind::InvalidInput,
            "every rank must hold at least one element",
        ));
    }

    let size = comm.size();
    let rank = comm.rank();
    let root = config.root;
    let local_len = array.len();

    sort_elements(array, order, &config.sorter);

    if size == 1 {
        return Ok(SortStats {
            splitters: Vec::new(),
            num_elements: vec![local_len as u64],
        });
    }

    let p = size as usize;
    let k_local = local_sample_count(p);
    let k_total = k_local * p;

    // Deterministic local samples, gathered and sorted on the root, then
    // shared with everyone.
    let local_samples = extract_samples(array, k_local, order);
    let mut samples = vec![K::default(); k_total];
    if rank == root {
        comm.gather_into(root, &local_samples, Some(&mut samples));
        sort_keys(&mut samples, order, &config.sorter);
    } else {
        comm.gather_into(root, &local_samples, None);
    }
    comm.broadcast_into(root, &mut samples);

    // Local rank of every sample; the tail slot piggy-backs the local
    // element count so the reduction also delivers N to the root.
    let mut hist = vec![0u64; k_total + 1];
    histogram_into(array, &samples, order, &mut hist);
    hist[k_total] = local_len as u64;
    comm.reduce_sum_into(root, &mut hist);
    let n_global = hist[k_total];

    let mut splitters = vec![K::default(); p - 1];
    if rank == root {
        splitters = select_splitters(&samples, &hist[..k_total], n_global, p);
    }
    comm.broadcast_into(root, &mut splitters);

    // Histogram the splitters against the local data, reusing the prefix
    // of the sample histogram buffer for the inclusive counts.
    hist.truncate(p);
    histogram_into(array, &splitters, order, &mut hist);
    let mut below = vec![0u64; p - 1];
    histogram_below_into(array, &splitters, order, &mut below);

    let counts_snd = send_counts(&splitters, &below, &hist[..p - 1], local_len, order);

    let mut counts_recv = vec![0 as Count; p];
    comm.all_to_all_into(&counts_snd, &mut counts_recv);

    // The same buffer once more: this rank's send counts, summed across
    // ranks, give every rank the full post-sort count vector. The sum of
    // the received counts must agree with it, the two being independent
    // derivations of the same layout.
    for (slot, &count) in hist.iter_mut().zip(&counts_snd) {
        *slot = count as u64;
    }
    comm.all_reduce_sum_into(&mut hist);
    let num_elements = hist;

    let total_recv: usize = counts_recv.iter().map(|&c| c as usize).sum();
    debug_assert_eq!(total_recv as u64, num_elements[rank as usize]);

    // The payload arrives as a concatenation of P sorted runs; the final
    // adapter sort re-orders it.
    let mut received = vec![E::default(); total_recv];
    comm.all_to_all_varcount_into(array, &counts_snd, &mut received, &counts_recv);
    sort_elements(&mut received, order, &config.sorter);
    *array = received;

    Ok(SortStats {
        splitters,
        num_elements,
    })
}
