//! Deterministic random number generation.
//!
//! Shuffles and coin flips all flow through one [`GameRng`] so a game
//! seeded the same way deals the same cards. Tests lean on this to
//! assert exact post-shuffle pile contents.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Deterministic RNG for shuffling and the opening coin flip.
///
/// Uses ChaCha8 for speed while maintaining cryptographic quality randomness.
#[derive(Clone, Debug)]
pub struct GameRng {
    inner: ChaCha8Rng,
}

impl GameRng {
    /// Create a new RNG with the given seed.
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self {
            inner: ChaCha8Rng::seed_from_u64(seed),
        }
    }

    /// Generate a random usize in the given range.
    pub fn gen_range_usize(&mut self, range: std::ops::Range<usize>) -> usize {
        self.inner.gen_range(range)
    }

    /// Flip a fair coin.
    pub fn coin_flip(&mut self) -> bool {
        self.inner.gen_bool(0.5)
    }

    /// Shuffle a slice in place.
    pub fn shuffle<T>(&mut self, slice: &mut [T]) {
        use rand::seq::SliceRandom;
        slice.shuffle(&mut self.inner);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_determinism() {
        let mut rng1 = GameRng::new(42);
        let mut rng2 = GameRng::new(42);

        for _ in 0..100 {
            assert_eq!(
                rng1.gen_range_usize(0..1000),
                rng2.gen_range_usize(0..1000)
            );
        }
    }

    #[test]
    fn test_different_seeds() {
        let mut rng1 = GameRng::new(1);
        let mut rng2 = GameRng::new(2);

        let seq1: Vec<_> = (0..10).map(|_| rng1.gen_range_usize(0..1000)).collect();
        let seq2: Vec<_> = (0..10).map(|_| rng2.gen_range_usize(0..1000)).collect();

        assert_ne!(seq1, seq2);
    }

    #[test]
    fn test_shuffle() {
        let mut rng = GameRng::new(42);
        let mut data = vec![1, 2, 3, 4, 5, 6, 7, 8, 9, 10];
        let original = data.clone();

        rng.shuffle(&mut data);

        // Should be same elements, different order (very likely)
        assert_eq!(data.len(), original.len());
        assert_ne!(data, original);

        data.sort();
        assert_eq!(data, vec![1, 2, 3, 4, 5, 6, 7, 8, 9, 10]);
    }

    #[test]
    fn test_coin_flip_is_deterministic() {
        let mut rng1 = GameRng::new(7);
        let mut rng2 = GameRng::new(7);

        for _ in 0..50 {
            assert_eq!(rng1.coin_flip(), rng2.coin_flip());
        }
    }

    #[test]
    fn test_coin_flip_lands_both_ways() {
        let mut rng = GameRng::new(42);
        let flips: Vec<bool> = (0..100).map(|_| rng.coin_flip()).collect();

        assert!(flips.iter().any(|&f| f));
        assert!(flips.iter().any(|&f| !f));
    }
}
