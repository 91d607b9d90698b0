//! Large-input harness: a million floats per rank, timed end to end.
//!
//! Run with e.g. `mpirun -n 8 cargo run --release --example largescale --features mpi`.

use std::time::Instant;

use mpi::traits::Communicator;
use sihsort::helpers::uniform_keys_fixture;
use sihsort::{sihsort, Collectives, MpiComm, SihSortConfig, SortOrder, SorterKind};

fn main() {
    let universe = mpi::initialize().expect("failed to initialise MPI");
    let world = universe.world();
    let rank = world.rank();
    let comm = MpiComm(world);

    let n_local = 1_000_000;
    let mut keys: Vec<f64> = uniform_keys_fixture(n_local, 0.0, 1.0, Some(rank as u64));

    let order = SortOrder::natural();
    let config = SihSortConfig {
        root: 0,
        sorter: SorterKind::Unstable,
    };

    comm.barrier();
    let start = Instant::now();
    let stats = sihsort(&mut keys, &comm, &order, &config).expect("sort failed");
    comm.barrier();
    let elapsed = start.elapsed();

    if comm.rank() == 0 {
        println!(
            "sorted {} elements over {} ranks in {:.3?}",
            stats.num_elements.iter().sum::<u64>(),
            comm.size(),
            elapsed
        );
        println!("counts: {:?}", stats.num_elements);
    }

    let local_max = keys.last().copied().unwrap_or(f64::NEG_INFINITY);
    println!(
        "rank {}: {} elements, local range [{:?}, {:?}]",
        rank,
        keys.len(),
        keys.first(),
        local_max
    );
}
