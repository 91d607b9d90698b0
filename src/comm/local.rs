//! Shared-memory collective transport: one OS thread per rank over a
//! common mailbox.
//!
//! Each collective is a deposit / combine / collect round: every rank
//! leaves its contribution in a per-rank slot, the last rank to arrive
//! combines the contributions into per-rank results, and everyone picks
//! its result up on the way out. Contributions are type-erased so one
//! round protocol serves all the collectives.

use std::any::Any;
use std::ops::AddAssign;
use std::sync::{Arc, Condvar, Mutex};

use super::{Collectives, CommScalar, Count};

type Slot = Option<Box<dyn Any + Send>>;

struct Round {
    arrived: usize,
    taken: usize,
    distributing: bool,
    deposits: Vec<Slot>,
    results: Vec<Slot>,
}

struct Shared {
    size: usize,
    round: Mutex<Round>,
    cv: Condvar,
}

/// A rank handle on a shared-memory communicator.
///
/// Mirrors the blocking semantics of MPI: each collective parks the
/// calling thread until every rank of the cluster has entered the same
/// call, so all ranks must issue the collectives in the same order. Used
/// for single-node sorting and for exercising multi-rank behaviour inside
/// ordinary tests.
pub struct LocalComm {
    shared: Arc<Shared>,
    rank: usize,
}

impl LocalComm {
    /// Create the `size` connected rank handles of a new communicator.
    pub fn cluster(size: usize) -> Vec<LocalComm> {
        assert!(size > 0, "a communicator needs at least one rank");
        let shared = Arc::new(Shared {
            size,
            round: Mutex::new(Round {
                arrived: 0,
                taken: 0,
                distributing: false,
                deposits: (0..size).map(|_| None).collect(),
                results: (0..size).map(|_| None).collect(),
            }),
            cv: Condvar::new(),
        });
        (0..size)
            .map(|rank| LocalComm {
                shared: shared.clone(),
                rank,
            })
            .collect()
    }

    /// Run `f` once per rank, each on its own thread, and return the
    /// results in rank order.
    pub fn spawn<R, F>(size: usize, f: F) -> Vec<R>
    where
        F: Fn(LocalComm) -> R + Send + Sync,
        R: Send,
    {
        let comms = Self::cluster(size);
        std::thread::scope(|scope| {
            let handles: Vec<_> = comms
                .into_iter()
                .map(|comm| {
                    let f = &f;
                    scope.spawn(move || f(comm))
                })
                .collect();
            handles
                .into_iter()
                .map(|handle| handle.join().expect("rank thread panicked"))
                .collect()
        })
    }

    /// One collective round. `combine` sees the contributions in rank
    /// order and must produce one result per rank; it runs on whichever
    /// rank arrives last. Panics if the ranks disagree on the collective
    /// being issued (a protocol violation, as over MPI).
    fn exchange<T, R>(&self, contribution: T, combine: impl FnOnce(Vec<T>) -> Vec<R>) -> R
    where
        T: Send + 'static,
        R: Send + 'static,
    {
        let size = self.shared.size;
        let mut round = self.shared.round.lock().unwrap();

        // A rank may arrive for the next collective while stragglers are
        // still collecting results from the previous one.
        while round.distributing {
            round = self.shared.cv.wait(round).unwrap();
        }

        round.deposits[self.rank] = Some(Box::new(contribution));
        round.arrived += 1;

        if round.arrived == size {
            let inputs: Vec<T> = round
                .deposits
                .iter_mut()
                .map(|slot| {
                    *slot
                        .take()
                        .expect("missing deposit")
                        .downcast::<T>()
                        .expect("ranks issued different collectives")
                })
                .collect();
            let outputs = combine(inputs);
            debug_assert_eq!(outputs.len(), size);
            for (slot, result) in round.results.iter_mut().zip(outputs) {
                *slot = Some(Box::new(result));
            }
            round.distributing = true;
            self.shared.cv.notify_all();
        } else {
            while !round.distributing {
                round = self.shared.cv.wait(round).unwrap();
            }
        }

        let result = *round.results[self.rank]
            .take()
            .expect("missing result")
            .downcast::<R>()
            .expect("ranks issued different collectives");
        round.taken += 1;
        if round.taken == size {
            round.arrived = 0;
            round.taken = 0;
            round.distributing = false;
            self.shared.cv.notify_all();
        }
        result
    }
}

impl Collectives for LocalComm {
    fn rank(&self) -> Count {
        self.rank as Count
    }

    fn size(&self) -> Count {
        self.shared.size as Count
    }

    fn barrier(&self) {
        let size = self.shared.size;
        self.exchange((), |_| vec![(); size]);
    }

    fn gather_into<T: CommScalar>(&self, root: Count, send: &[T], recv: Option<&mut [T]>) {
        let size = self.shared.size;
        let root = root as usize;
        let gathered: Vec<T> = self.exchange(send.to_vec(), |parts| {
            let mut out: Vec<Vec<T>> = (0..size).map(|_| Vec::new()).collect();
            out[root] = parts.into_iter().flatten().collect();
            out
        });
        if self.rank == root {
            let recv = recv.expect("the root rank must supply a receive buffer");
            recv[..gathered.len()].clone_from_slice(&gathered);
        }
    }

    fn broadcast_into<T: CommScalar>(&self, root: Count, buf: &mut [T]) {
        let size = self.shared.size;
        let root = root as usize;
        let contribution = if self.rank == root {
            buf.to_vec()
        } else {
            Vec::new()
        };
        let data: Vec<T> = self.exchange(contribution, |mut parts| {
            let data = std::mem::take(&mut parts[root]);
            (0..size).map(|_| data.clone()).collect()
        });
        buf.clone_from_slice(&data);
    }

    fn reduce_sum_into<T: CommScalar + AddAssign>(&self, root: Count, buf: &mut [T]) {
        let size = self.shared.size;
        let root = root as usize;
        let summed: Vec<T> = self.exchange(buf.to_vec(), |parts| {
            let mut acc = parts[0].clone();
            for part in &parts[1..] {
                for (slot, x) in acc.iter_mut().zip(part) {
                    *slot += x.clone();
                }
            }
            let mut out: Vec<Vec<T>> = (0..size).map(|_| Vec::new()).collect();
            out[root] = acc;
            out
        });
        if self.rank == root {
            buf.clone_from_slice(&summed);
        }
    }

    fn all_reduce_sum_into<T: CommScalar + AddAssign>(&self, buf: &mut [T]) {
        let size = self.shared.size;
        let summed: Vec<T> = self.exchange(buf.to_vec(), |parts| {
            let mut acc = parts[0].clone();
            for part in &parts[1..] {
                for (slot, x) in acc.iter_mut().zip(part) {
                    *slot += x.clone();
                }
            }
            (0..size).map(|_| acc.clone()).collect()
        });
        buf.clone_from_slice(&summed);
    }

    fn all_to_all_into<T: CommScalar>(&self, send: &[T], recv: &mut [T]) {
        let size = self.shared.size;
        debug_assert_eq!(send.len() % size, 0);
        let stride = send.len() / size;
        let parts: Vec<Vec<T>> = (0..size)
            .map(|i| send[i * stride..(i + 1) * stride].to_vec())
            .collect();
        let mine: Vec<T> = self.exchange(parts, |all| {
            (0..size)
                .map(|j| all.iter().flat_map(|p| p[j].iter().cloned()).collect())
                .collect()
        });
        recv.clone_from_slice(&mine);
    }

    fn all_to_all_varcount_into<T: CommScalar>(
        &self,
        send: &[T],
        send_counts: &[Count],
        recv: &mut [T],
        recv_counts: &[Count],
    ) {
        let size = self.shared.size;
        debug_assert_eq!(send_counts.len(), size);
        debug_assert_eq!(recv_counts.len(), size);

        let mut parts: Vec<Vec<T>> = Vec::with_capacity(size);
        let mut offset = 0usize;
        for &count in send_counts {
            let count = count as usize;
            parts.push(send[offset..offset + count].to_vec());
            offset += count;
        }

        let mine: Vec<T> = self.exchange(parts, |all| {
            (0..size)
                .map(|j| all.iter().flat_map(|p| p[j].iter().cloned()).collect())
                .collect()
        });
        debug_assert_eq!(
            mine.len(),
            recv_counts.iter().map(|&c| c as usize).sum::<usize>()
        );
        recv[..mine.len()].clone_from_slice(&mine);
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_spawn_returns_in_rank_order() {
        let ranks = LocalComm::spawn(4, |comm| comm.rank());
        assert_eq!(ranks, vec![0, 1, 2, 3]);
        let sizes = LocalComm::spawn(3, |comm| comm.size());
        assert_eq!(sizes, vec![3, 3, 3]);
    }

    #[test]
    fn test_gather_concatenates_in_rank_order() {
        let results = LocalComm::spawn(3, |comm| {
            let rank = comm.rank();
            let send = vec![rank * 10, rank * 10 + 1];
            let mut recv = vec![0; 6];
            if rank == 1 {
                comm.gather_into(1, &send, Some(&mut recv));
            } else {
                comm.gather_into(1, &send, None);
            }
            recv
        });
        assert_eq!(results[1], vec![0, 1, 10, 11, 20, 21]);
    }

    #[test]
    fn test_broadcast_overwrites_non_roots() {
        let results = LocalComm::spawn(4, |comm| {
            let mut buf = if comm.rank() == 2 {
                vec![7i64, 8, 9]
            } else {
                vec![0i64; 3]
            };
            comm.broadcast_into(2, &mut buf);
            buf
        });
        for buf in results {
            assert_eq!(buf, vec![7, 8, 9]);
        }
    }

    #[test]
    fn test_reduce_sums_at_the_root_only() {
        let results = LocalComm::spawn(4, |comm| {
            let mut buf = vec![comm.rank() as u64, 1];
            comm.reduce_sum_into(0, &mut buf);
            buf
        });
        assert_eq!(results[0], vec![6, 4]);
        assert_eq!(results[3], vec![3, 1]);
    }

    #[test]
    fn test_all_reduce_sums_everywhere() {
        let results = LocalComm::spawn(4, |comm| {
            let mut buf = vec![1u64, comm.rank() as u64];
            comm.all_reduce_sum_into(&mut buf);
            buf
        });
        for buf in results {
            assert_eq!(buf, vec![4, 6]);
        }
    }

    #[test]
    fn test_all_to_all_transposes() {
        let results = LocalComm::spawn(4, |comm| {
            let rank = comm.rank();
            let send: Vec<i32> = (0..4).map(|j| rank * 10 + j).collect();
            let mut recv = vec![0i32; 4];
            comm.all_to_all_into(&send, &mut recv);
            recv
        });
        for (j, recv) in results.iter().enumerate() {
            let expected: Vec<i32> = (0..4).map(|i| i * 10 + j as i32).collect();
            assert_eq!(*recv, expected);
        }
    }

    #[test]
    fn test_all_to_all_varcount_packs_in_rank_order() {
        // Rank r sends r + 1 copies of its rank id to every destination.
        let results = LocalComm::spawn(3, |comm| {
            let rank = comm.rank();
            let send: Vec<i64> = (0..3).flat_map(|_| vec![rank as i64; rank as usize + 1]).collect();
            let send_counts = vec![rank + 1; 3];
            let recv_counts = vec![1, 2, 3];
            let mut recv = vec![0i64; 6];
            comm.all_to_all_varcount_into(&send, &send_counts, &mut recv, &recv_counts);
            recv
        });
        for recv in results {
            assert_eq!(recv, vec![0, 1, 1, 2, 2, 2]);
        }
    }

    #[test]
    fn test_barrier_and_repeated_rounds() {
        let results = LocalComm::spawn(8, |comm| {
            let mut acc = 0u64;
            for _ in 0..50 {
                comm.barrier();
                let mut buf = vec![1u64];
                comm.all_reduce_sum_into(&mut buf);
                acc += buf[0];
            }
            acc
        });
        for acc in results {
            assert_eq!(acc, 400);
        }
    }

    #[test]
    fn test_single_rank_cluster() {
        let results = LocalComm::spawn(1, |comm| {
            comm.barrier();
            let mut buf = vec![5u64];
            comm.all_reduce_sum_into(&mut buf);
            let mut bc = vec![1i32];
            comm.broadcast_into(0, &mut bc);
            buf[0]
        });
        assert_eq!(results, vec![5]);
    }
}
