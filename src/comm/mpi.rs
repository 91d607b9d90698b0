//! MPI collective transport via rsmpi.

use std::ops::AddAssign;

use mpi::{
    collective::SystemOperation,
    datatype::{Partition, PartitionMut},
    traits::{Communicator, CommunicatorCollectives, Root},
};

use super::{Collectives, CommScalar, Count};
use crate::exchange::displacements;

/// Adapter making any rsmpi communicator usable by the sort.
///
/// The reductions the sort issues are in place; where MPI wants distinct
/// send and receive buffers a staging copy is taken.
pub struct MpiComm<C>(
    /// The wrapped rsmpi communicator.
    pub C,
);

impl<C> Collectives for MpiComm<C>
where
    C: Communicator + CommunicatorCollectives,
{
    fn rank(&self) -> Count {
        self.0.rank()
    }

    fn size(&self) -> Count {
        self.0.size()
    }

    fn barrier(&self) {
        self.0.barrier();
    }

    fn gather_into<T: CommScalar>(&self, root: Count, send: &[T], recv: Option<&mut [T]>) {
        let root_process = self.0.process_at_rank(root);
        if self.0.rank() == root {
            let recv = recv.expect("the root rank must supply a receive buffer");
            root_process.gather_into_root(send, recv);
        } else {
            root_process.gather_into(send);
        }
    }

    fn broadcast_into<T: CommScalar>(&self, root: Count, buf: &mut [T]) {
        self.0.process_at_rank(root).broadcast_into(buf);
    }

    fn reduce_sum_into<T: CommScalar + AddAssign>(&self, root: Count, buf: &mut [T]) {
        let root_process = self.0.process_at_rank(root);
        if self.0.rank() == root {
            let staged = buf.to_vec();
            root_process.reduce_into_root(&staged[..], buf, SystemOperation::sum());
        } else {
            root_process.reduce_into(&buf[..], SystemOperation::sum());
        }
    }

    fn all_reduce_sum_into<T: CommScalar + AddAssign>(&self, buf: &mut [T]) {
        let staged = buf.to_vec();
        self.0
            .all_reduce_into(&staged[..], buf, SystemOperation::sum());
    }

    fn all_to_all_into<T: CommScalar>(&self, send: &[T], recv: &mut [T]) {
        self.0.all_to_all_into(send, recv);
    }

    fn all_to_all_varcount_into<T: CommScalar>(
        &self,
        send: &[T],
        send_counts: &[Count],
        recv: &mut [T],
        recv_counts: &[Count],
    ) {
        let send_displs = displacements(send_counts);
        let recv_displs = displacements(recv_counts);
        let partition_snd = Partition::new(send, send_counts, &send_displs[..]);
        let mut partition_recv = PartitionMut::new(recv, recv_counts, &recv_displs[..]);
        self.0
            .all_to_all_varcount_into(&partition_snd, &mut partition_recv);
    }
}
