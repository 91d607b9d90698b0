//! Helper functions used in testing the sort and in the demo harnesses,
//! specifically seeded key generators.

use num::Num;
use rand::distributions::uniform::SampleUniform;
use rand::prelude::*;

/// Keys fixture, uniformly sampled in `min..max`.
///
/// # Arguments
/// * `n` - The number of keys to draw.
/// * `min` - Inclusive lower bound.
/// * `max` - Exclusive upper bound.
/// * `seed` - RNG seed; defaults to 0. Rank-dependent seeds give each
///   rank distinct data while keeping runs reproducible.
pub fn uniform_keys_fixture<T>(n: usize, min: T, max: T, seed: Option<u64>) -> Vec<T>
where
    T: Num + SampleUniform + PartialOrd + Copy,
{
    let seed = seed.unwrap_or(0);
    let mut rng = StdRng::seed_from_u64(seed);
    let between = rand::distributions::Uniform::from(min..max);
    (0..n).map(|_| between.sample(&mut rng)).collect()
}

/// Keys fixture holding `n` copies of one value, the degenerate case for
/// splitter selection.
pub fn constant_keys_fixture<T: Clone>(n: usize, value: T) -> Vec<T> {
    vec![value; n]
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_uniform_fixture_is_seeded() {
        let a: Vec<i64> = uniform_keys_fixture(100, 0, 50, Some(3));
        let b: Vec<i64> = uniform_keys_fixture(100, 0, 50, Some(3));
        let c: Vec<i64> = uniform_keys_fixture(100, 0, 50, Some(4));
        assert_eq!(a, b);
        assert_ne!(a, c);
        assert!(a.iter().all(|&k| (0..50).contains(&k)));
    }

    #[test]
    fn test_constant_fixture() {
        assert_eq!(constant_keys_fixture(3, 7u32), vec![7, 7, 7]);
    }
}
