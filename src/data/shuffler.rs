// ============================================================
// Layer 4 — Seeded Shuffle
// ============================================================
// Permutes the accepted corpus before packing, so each shard is
// a representative mix of sources rather than "all of Caselaw,
// then all of Old Bailey".
//
// The permutation must be reproducible: same input order + same
// seed → same output order, run after run. A StdRng seeded with
// `seed_from_u64` drives rand's Fisher-Yates `shuffle`, which
// gives exactly that for a fixed build of the crate.
//
// Reference: rand crate documentation (SeedableRng, SliceRandom)

use rand::{rngs::StdRng, seq::SliceRandom, SeedableRng};

/// Shuffle `items` in place with a generator seeded from `seed`.
pub fn shuffle_seeded<T>(items: &mut [T], seed: u64) {
    let mut rng = StdRng::seed_from_u64(seed);
    items.shuffle(&mut rng);

    tracing::debug!("Shuffled {} items with seed {}", items.len(), seed);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_seed_same_permutation() {
        let mut a: Vec<usize> = (0..1000).collect();
        let mut b: Vec<usize> = (0..1000).collect();
        shuffle_seeded(&mut a, 42);
        shuffle_seeded(&mut b, 42);
        assert_eq!(a, b);
    }

    #[test]
    fn different_seeds_differ() {
        let mut a: Vec<usize> = (0..1000).collect();
        let mut b: Vec<usize> = (0..1000).collect();
        shuffle_seeded(&mut a, 1);
        shuffle_seeded(&mut b, 2);
        assert_ne!(a, b);
    }

    #[test]
    fn all_items_preserved() {
        let mut items: Vec<usize> = (0..500).collect();
        shuffle_seeded(&mut items, 7);
        assert_ne!(items, (0..500).collect::<Vec<_>>());
        items.sort_unstable();
        assert_eq!(items, (0..500).collect::<Vec<_>>());
    }

    #[test]
    fn empty_and_single() {
        let mut empty: Vec<u8> = Vec::new();
        shuffle_seeded(&mut empty, 42);
        assert!(empty.is_empty());

        let mut one = vec!["only"];
        shuffle_seeded(&mut one, 42);
        assert_eq!(one, vec!["only"]);
    }
}
