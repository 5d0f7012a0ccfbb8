//! Deterministic random source threaded through sampling.

use rand::Rng;
use rand::SeedableRng;
use rand::distributions::uniform::SampleUniform;
use rand::rngs::StdRng;

/// A seeded pseudo-random bit source.
///
/// The same seed yields the same full sequence of calls. There is no global
/// state: the driver creates a source and threads it explicitly through
/// every draw. Parallel drivers `split` sources upstream instead of sharing
/// one.
#[derive(Debug, Clone)]
pub struct RandomSource {
    seed: u64,
    rng: StdRng,
}

impl RandomSource {
    /// Create a source from an explicit seed
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Create a source from entropy, keeping the chosen seed reportable
    pub fn from_entropy() -> Self {
        let seed = rand::random::<u64>();
        Self::new(seed)
    }

    /// The seed this source was created with
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Next unbounded 64-bit value
    pub fn next_u64(&mut self) -> u64 {
        self.rng.r#gen()
    }

    /// Next integer in `[0, bound)`
    pub fn next_below(&mut self, bound: u64) -> u64 {
        assert!(bound > 0, "bound must be positive");
        self.rng.gen_range(0..bound)
    }

    /// Next double in `[0, 1)`
    pub fn next_double(&mut self) -> f64 {
        self.rng.r#gen()
    }

    /// Next bool, true with the given probability
    pub fn next_bool(&mut self, probability: f64) -> bool {
        if probability <= 0.0 {
            return false;
        }
        if probability >= 1.0 {
            return true;
        }
        self.rng.gen_bool(probability)
    }

    /// Next value in the inclusive range `[min, max]`
    pub fn next_in<T>(&mut self, min: T, max: T) -> T
    where
        T: SampleUniform + PartialOrd + Copy,
    {
        if !(min < max) {
            return min;
        }
        self.rng.gen_range(min..=max)
    }

    /// Split off an independent child source.
    ///
    /// The child's seed is drawn from this source, so splitting advances the
    /// parent deterministically.
    pub fn split(&mut self) -> RandomSource {
        RandomSource::new(self.next_u64())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_same_seed_same_sequence() {
        let mut a = RandomSource::new(42);
        let mut b = RandomSource::new(42);

        for _ in 0..100 {
            assert_eq!(a.next_u64(), b.next_u64());
        }
    }

    #[test]
    fn test_same_seed_same_mixed_calls() {
        let mut a = RandomSource::new(7);
        let mut b = RandomSource::new(7);

        for _ in 0..50 {
            assert_eq!(a.next_below(10), b.next_below(10));
            assert_eq!(a.next_double(), b.next_double());
            assert_eq!(a.next_bool(0.3), b.next_bool(0.3));
            assert_eq!(a.next_in(-5i32, 5), b.next_in(-5i32, 5));
        }
    }

    #[test]
    fn test_next_below_stays_in_bound() {
        let mut source = RandomSource::new(99);
        for _ in 0..1000 {
            assert!(source.next_below(7) < 7);
        }
    }

    #[test]
    fn test_next_double_unit_interval() {
        let mut source = RandomSource::new(3);
        for _ in 0..1000 {
            let d = source.next_double();
            assert!((0.0..1.0).contains(&d));
        }
    }

    #[test]
    fn test_next_bool_degenerate_weights() {
        let mut source = RandomSource::new(1);
        for _ in 0..100 {
            assert!(!source.next_bool(0.0));
            assert!(source.next_bool(1.0));
        }
    }

    #[test]
    fn test_next_in_degenerate_range() {
        let mut source = RandomSource::new(5);
        assert_eq!(source.next_in(4i64, 4), 4);
    }

    #[test]
    fn test_split_is_independent_and_deterministic() {
        let mut a = RandomSource::new(11);
        let mut b = RandomSource::new(11);

        let mut child_a = a.split();
        let mut child_b = b.split();

        assert_eq!(child_a.seed(), child_b.seed());
        for _ in 0..20 {
            assert_eq!(child_a.next_u64(), child_b.next_u64());
        }
        // The parents advanced past the split the same way.
        assert_eq!(a.next_u64(), b.next_u64());
    }

    #[test]
    fn test_seed_accessor() {
        let source = RandomSource::new(1234);
        assert_eq!(source.seed(), 1234);
    }
}
