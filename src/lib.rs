//! # Sampling with Interpolated Histograms Sort (SIHSort)
//!
//! A distributed, comparison-based sort for arrays spread across the
//! ranks of a communicator, where no single rank can hold the full
//! dataset. After the sort each rank owns a contiguous, near-balanced
//! slice of the global order.
//!
//! Notable features of this library are:
//! * Splitters chosen from deterministic samples and refined by linear
//!   interpolation on a globally reduced histogram, with a fixed schedule
//!   of seven collectives regardless of data size.
//! * A pluggable collective transport: an MPI backend behind the `mpi`
//!   feature, and a shared-memory threaded backend for single-node runs
//!   and for exercising multi-rank behaviour inside ordinary tests.
//! * Caller-supplied key projections, comparators and direction, and a
//!   pluggable rank-local sorter.
//!
//! ## References
//! \[1\] Harsh, V., Kalé, L., & Solomonik, E. (2019). Histogram sort with
//! sampling. Proceedings of the 31st ACM Symposium on Parallelism in
//! Algorithms and Architectures.
//!
//! \[2\] Sundar, H., Malhotra, D., & Biros, G. (2013). HykSort: a new
//! variant of hypercube quicksort on distributed memory architectures.
//! Proceedings of the 27th International ACM Conference on
//! Supercomputing.
#![cfg_attr(feature = "strict", deny(warnings))]
#![warn(missing_docs)]

pub mod comm;
pub mod exchange;
pub mod helpers;
pub mod histogram;
pub mod linspace;
pub mod order;
pub mod sample;
pub mod sihsort;
pub mod sorter;
pub mod splitter;

// Public API
#[doc(inline)]
pub use comm::local::LocalComm;
#[cfg(feature = "mpi")]
#[doc(inline)]
pub use comm::mpi::MpiComm;
#[doc(inline)]
pub use comm::{Collectives, CommScalar, Count};
#[doc(inline)]
pub use order::{searchsortedfirst, searchsortedlast, SortOrder};
#[doc(inline)]
pub use sihsort::{sihsort, SihSortConfig, SortStats};
#[doc(inline)]
pub use sorter::SorterKind;
#[doc(inline)]
pub use splitter::SortKey;
