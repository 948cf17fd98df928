//! Weighted random selection.
//!
//! Each entry owns the half-open range `[acc, acc + weight)` on a line of
//! length `total`. A uniform `r` in `[0, total)` lands in exactly one range,
//! so an entry wins with probability `weight / total` regardless of order.
//!
//! ```text
//! A(1) B(3)      C(2)
//! [0)[1  2  3)[4  5)      total = 6, r = 3 → B
//! ```

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::entry::{total_weight, Entry};
use crate::error::DrawError;

/// Source of uniform integers. Any `rand::Rng` is one; tests plug in fixed
/// sequences.
pub trait RandomSource {
    /// Uniform value in `[0, bound)`. `bound` is always > 0.
    fn next_below(&mut self, bound: u64) -> u64;
}

impl<R: Rng + ?Sized> RandomSource for R {
    fn next_below(&mut self, bound: u64) -> u64 {
        self.gen_range(0..bound)
    }
}

/// Index of the entry whose cumulative range contains `r`
pub fn pick_index(pool: &[Entry], r: u64) -> Option<usize> {
    let mut acc: u64 = 0;
    for (idx, entry) in pool.iter().enumerate() {
        acc += u64::from(entry.weight());
        if r < acc {
            return Some(idx);
        }
    }
    None
}

/// Picks entries from a pool with probability proportional to weight
#[derive(Debug)]
pub struct WeightedSelector<R> {
    source: R,
}

impl WeightedSelector<StdRng> {
    /// Selector seeded from OS entropy - every run differs
    pub fn from_entropy() -> Self {
        Self::new(StdRng::from_entropy())
    }

    /// Reproducible selector for `--seed`
    pub fn seeded(seed: u64) -> Self {
        Self::new(StdRng::seed_from_u64(seed))
    }
}

impl<R: RandomSource> WeightedSelector<R> {
    pub fn new(source: R) -> Self {
        Self { source }
    }

    /// Choose an index into `pool`
    pub fn select_index(&mut self, pool: &[Entry]) -> Result<usize, DrawError> {
        if pool.is_empty() {
            return Err(DrawError::EmptyPool);
        }

        let total = total_weight(pool);
        if total == 0 {
            return Err(DrawError::InvalidPool);
        }

        let r = self.source.next_below(total);
        tracing::debug!(total, r, "weighted pick");
        pick_index(pool, r).ok_or(DrawError::InvalidPool)
    }

    /// Choose an entry from `pool`
    #[allow(dead_code)] // Used in tests
    pub fn select<'a>(&mut self, pool: &'a [Entry]) -> Result<&'a Entry, DrawError> {
        let idx = self.select_index(pool)?;
        Ok(&pool[idx])
    }
}

/// Replays a fixed list of values, wrapping around. Values are reduced
/// modulo the requested bound.
#[cfg(test)]
#[derive(Debug, Clone)]
pub(crate) struct FixedSource {
    values: Vec<u64>,
    pos: usize,
}

#[cfg(test)]
impl FixedSource {
    pub(crate) fn new(values: Vec<u64>) -> Self {
        assert!(!values.is_empty(), "FixedSource needs at least one value");
        Self { values, pos: 0 }
    }
}

#[cfg(test)]
impl RandomSource for FixedSource {
    fn next_below(&mut self, bound: u64) -> u64 {
        let v = self.values[self.pos % self.values.len()];
        self.pos += 1;
        v % bound
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pool(items: &[(&str, u32)]) -> Vec<Entry> {
        items
            .iter()
            .map(|(name, weight)| Entry::new(name, *weight).unwrap())
            .collect()
    }

    #[test]
    fn test_pick_index_ranges() {
        let p = pool(&[("A", 1), ("B", 3), ("C", 2)]);
        assert_eq!(pick_index(&p, 0), Some(0));
        assert_eq!(pick_index(&p, 1), Some(1));
        assert_eq!(pick_index(&p, 3), Some(1));
        assert_eq!(pick_index(&p, 4), Some(2));
        assert_eq!(pick_index(&p, 5), Some(2));
        assert_eq!(pick_index(&p, 6), None);
    }

    #[test]
    fn test_select_follows_source() {
        let p = pool(&[("A", 1), ("B", 3), ("C", 2)]);
        let mut selector = WeightedSelector::new(FixedSource::new(vec![0, 2, 5]));
        assert_eq!(selector.select(&p).unwrap().name(), "A");
        assert_eq!(selector.select(&p).unwrap().name(), "B");
        assert_eq!(selector.select(&p).unwrap().name(), "C");
    }

    #[test]
    fn test_empty_pool() {
        let mut selector = WeightedSelector::seeded(1);
        assert_eq!(selector.select(&[]), Err(DrawError::EmptyPool));
    }

    #[test]
    fn test_single_entry_always_wins() {
        let p = pool(&[("Only", 7)]);
        let mut selector = WeightedSelector::seeded(99);
        for _ in 0..100 {
            assert_eq!(selector.select_index(&p), Ok(0));
        }
    }

    #[test]
    fn test_weighted_frequency() {
        let p = pool(&[("A", 1), ("B", 3)]);
        let mut selector = WeightedSelector::seeded(7);
        let trials = 10_000;
        let b_wins = (0..trials)
            .filter(|_| selector.select_index(&p) == Ok(1))
            .count();
        let ratio = b_wins as f64 / trials as f64;
        assert!((ratio - 0.75).abs() < 0.02, "B won {:.3} of draws", ratio);
    }

    #[test]
    fn test_any_rng_is_a_source() {
        let mut rng = StdRng::seed_from_u64(3);
        for _ in 0..50 {
            assert!(rng.next_below(10) < 10);
        }
        // &mut R works as well
        let p = pool(&[("A", 1), ("B", 1)]);
        let mut selector = WeightedSelector::new(&mut rng);
        assert!(selector.select_index(&p).is_ok());
    }
}
