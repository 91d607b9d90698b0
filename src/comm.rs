//! Collective transport consumed by the sort.
//!
//! The seven MPI collectives the pipeline issues are captured behind the
//! [`Collectives`] trait so that a real MPI communicator and the
//! shared-memory [`local::LocalComm`] backend are interchangeable.

pub mod local;
#[cfg(feature = "mpi")]
pub mod mpi;

use std::ops::AddAssign;

/// Message count type, matching the MPI count width.
pub type Count = i32;

/// Values that can cross rank boundaries.
///
/// Blanket-implemented for every qualifying type; payloads and keys both
/// carry this bound.
#[cfg(not(feature = "mpi"))]
pub trait CommScalar: Default + Clone + Send + Sync + 'static {}

#[cfg(not(feature = "mpi"))]
impl<T: Default + Clone + Send + Sync + 'static> CommScalar for T {}

/// Values that can cross rank boundaries.
///
/// With the `mpi` feature enabled the bound additionally carries rsmpi's
/// `Equivalence`, so every transportable value maps onto an MPI datatype.
#[cfg(feature = "mpi")]
pub trait CommScalar:
    Default + Clone + Send + Sync + ::mpi::traits::Equivalence + 'static
{
}

#[cfg(feature = "mpi")]
impl<T: Default + Clone + Send + Sync + ::mpi::traits::Equivalence + 'static> CommScalar for T {}

/// The collective operations the sort consumes, shaped like the MPI
/// collectives they map onto.
///
/// Every rank of the communicator must enter each collective, and all
/// ranks must issue them in the same order; implementations block until
/// the collective completes. Errors follow the MPI model: a failed
/// collective aborts the program rather than returning.
pub trait Collectives {
    /// Identity of the calling rank, in `0..size`.
    fn rank(&self) -> Count;

    /// Number of ranks in the communicator.
    fn size(&self) -> Count;

    /// Block until every rank has entered.
    fn barrier(&self);

    /// Fixed-stride gather. Every rank contributes `send`; the root passes
    /// a buffer of `size * send.len()` slots and receives the
    /// contributions in rank order, all other ranks pass `None`.
    fn gather_into<T: CommScalar>(&self, root: Count, send: &[T], recv: Option<&mut [T]>);

    /// In-place broadcast of the root's buffer to every rank.
    fn broadcast_into<T: CommScalar>(&self, root: Count, buf: &mut [T]);

    /// Element-wise sum reduction, in place in the root's buffer; the
    /// buffers of the other ranks are left untouched.
    fn reduce_sum_into<T: CommScalar + AddAssign>(&self, root: Count, buf: &mut [T]);

    /// Element-wise sum reduction, in place on every rank.
    fn all_reduce_sum_into<T: CommScalar + AddAssign>(&self, buf: &mut [T]);

    /// Fixed-stride all-to-all: chunk i of `send` goes to rank i, chunk i
    /// of `recv` arrives from rank i. Both buffers hold `size` equal
    /// chunks.
    fn all_to_all_into<T: CommScalar>(&self, send: &[T], recv: &mut [T]);

    /// Variable-stride all-to-all. Packet boundaries are the prefix sums
    /// of the count vectors; packets arrive packed in rank order.
    fn all_to_all_varcount_into<T: CommScalar>(
        &self,
        send: &[T],
        send_counts: &[Count],
        recv: &mut [T],
        recv_counts: &[Count],
    );
}
