//! Deterministic pseudo-randomness for reproducible training
//!
//! All randomness in the trainer (shuffle, train/test split, fold
//! assignment) flows from an explicitly seeded LCG. There is no
//! process-wide RNG state anywhere.

use std::num::Wrapping;

/// Linear Congruential Generator with glibc constants.
#[derive(Clone, Debug)]
pub struct LcgRng {
    state: Wrapping<i64>,
}

impl LcgRng {
    const MULTIPLIER: i64 = 1103515245;
    const INCREMENT: i64 = 12345;
    const MODULUS: i64 = 1 << 31;

    pub fn new(seed: i64) -> Self {
        Self {
            state: Wrapping(seed.abs() % Self::MODULUS),
        }
    }

    /// Next value in [0, MODULUS).
    pub fn next_i64(&mut self) -> i64 {
        self.state = self.state * Wrapping(Self::MULTIPLIER) + Wrapping(Self::INCREMENT);
        (self.state.0 & (Self::MODULUS - 1)).abs()
    }

    /// Next value in [0, max); 0 when max <= 0.
    pub fn next_range(&mut self, max: i64) -> i64 {
        if max <= 0 {
            return 0;
        }
        self.next_i64() % max
    }

    /// Fisher-Yates shuffle of an index slice.
    pub fn shuffle(&mut self, indices: &mut [usize]) {
        for i in (1..indices.len()).rev() {
            let j = self.next_range(i as i64 + 1) as usize;
            indices.swap(i, j);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lcg_determinism() {
        let mut rng1 = LcgRng::new(42);
        let mut rng2 = LcgRng::new(42);
        for _ in 0..100 {
            assert_eq!(rng1.next_i64(), rng2.next_i64());
        }
    }

    #[test]
    fn test_lcg_range() {
        let mut rng = LcgRng::new(42);
        for _ in 0..100 {
            let val = rng.next_range(10);
            assert!((0..10).contains(&val));
        }
    }

    #[test]
    fn test_shuffle_is_seeded_and_complete() {
        let mut a: Vec<usize> = (0..50).collect();
        let mut b = a.clone();

        LcgRng::new(7).shuffle(&mut a);
        LcgRng::new(7).shuffle(&mut b);
        assert_eq!(a, b);

        let mut sorted = a.clone();
        sorted.sort_unstable();
        assert_eq!(sorted, (0..50).collect::<Vec<_>>());

        let mut c: Vec<usize> = (0..50).collect();
        LcgRng::new(8).shuffle(&mut c);
        assert_ne!(a, c);
    }
}
