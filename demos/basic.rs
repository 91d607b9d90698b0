//! Small driver harness: sort a handful of uniformly distributed integers
//! per rank over MPI and print each rank's slice.
//!
//! Run with e.g. `mpirun -n 4 cargo run --example basic --features mpi`.

use mpi::traits::Communicator;
use sihsort::helpers::uniform_keys_fixture;
use sihsort::{sihsort, Collectives, MpiComm, SihSortConfig, SortOrder};

fn main() {
    let universe = mpi::initialize().expect("failed to initialise MPI");
    let world = universe.world();
    let rank = world.rank();
    let comm = MpiComm(world);

    let n_local = 50 + 2 * rank as usize;
    let mut keys: Vec<i64> = uniform_keys_fixture(n_local, 1, 501, Some(rank as u64));

    let order = SortOrder::natural();
    let stats =
        sihsort(&mut keys, &comm, &order, &SihSortConfig::default()).expect("sort failed");

    println!(
        "rank {}: {} -> {} elements, range [{:?}, {:?}]",
        rank,
        n_local,
        keys.len(),
        keys.first(),
        keys.last()
    );
    if comm.rank() == 0 {
        println!("splitters: {:?}", stats.splitters);
        println!("counts: {:?}", stats.num_elements);
    }
}
