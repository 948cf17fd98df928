//! Spin animation for the wheel.
//!
//! The winner is already known when a `SpinAnimation` is built; the animation
//! only decides how the wheel gets there. Each entry owns an arc proportional
//! to its weight, the wheel turns `k` full times plus the distance to a point
//! inside the winner's arc, and decelerates with a cubic ease-out.

use rand::Rng;
use std::time::Duration;

use crate::config::SpinConfig;

/// Cubic ease-out: fast start, slow stop
pub fn ease_out(progress: f64) -> f64 {
    let p = progress.clamp(0.0, 1.0);
    1.0 - (1.0 - p).powi(3)
}

#[derive(Debug, Clone)]
pub struct SpinAnimation {
    /// Cumulative arc ends as fractions of a turn, last one is 1.0
    arc_ends: Vec<f64>,
    winner: usize,
    /// Total distance in turns at the end of the animation
    distance: f64,
    duration: Duration,
}

impl SpinAnimation {
    /// Plan a spin that lands on `winner`. `rng` only shapes the animation.
    /// Returns `None` for an empty wheel or an out-of-range winner.
    pub fn new<R: Rng + ?Sized>(
        weights: &[u32],
        winner: usize,
        config: &SpinConfig,
        rng: &mut R,
    ) -> Option<Self> {
        if winner >= weights.len() {
            return None;
        }

        let total: u64 = weights.iter().map(|&w| u64::from(w)).sum();
        if total == 0 {
            return None;
        }

        let mut acc = 0u64;
        let arc_ends: Vec<f64> = weights
            .iter()
            .map(|&w| {
                acc += u64::from(w);
                acc as f64 / total as f64
            })
            .collect();

        let start = if winner == 0 { 0.0 } else { arc_ends[winner - 1] };
        let end = arc_ends[winner];
        // land somewhere in the middle 80% of the arc
        let target = start + (end - start) * rng.gen_range(0.1..0.9);

        let min_turns = config.min_turns.min(config.max_turns);
        let turns = rng.gen_range(min_turns..=config.max_turns.max(min_turns));

        Some(Self {
            arc_ends,
            winner,
            distance: f64::from(turns) + target,
            duration: Duration::from_millis(config.duration_ms),
        })
    }

    /// Fraction of the animation elapsed, 0.0..=1.0
    pub fn progress(&self, elapsed: Duration) -> f64 {
        if self.duration.is_zero() {
            return 1.0;
        }
        (elapsed.as_secs_f64() / self.duration.as_secs_f64()).min(1.0)
    }

    pub fn is_finished(&self, elapsed: Duration) -> bool {
        self.progress(elapsed) >= 1.0
    }

    /// Wheel position in turns
    pub fn position(&self, elapsed: Duration) -> f64 {
        self.distance * ease_out(self.progress(elapsed))
    }

    /// Entry under the pointer
    pub fn index_at(&self, elapsed: Duration) -> usize {
        if self.is_finished(elapsed) {
            return self.winner;
        }
        self.index_for_position(self.position(elapsed))
    }

    fn index_for_position(&self, position: f64) -> usize {
        let frac = position.fract();
        self.arc_ends
            .iter()
            .position(|&end| frac < end)
            .unwrap_or(self.arc_ends.len() - 1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn config(duration_ms: u64) -> SpinConfig {
        SpinConfig {
            enabled: true,
            duration_ms,
            min_turns: 2,
            max_turns: 4,
        }
    }

    #[test]
    fn test_ease_out_bounds() {
        assert_eq!(ease_out(0.0), 0.0);
        assert_eq!(ease_out(1.0), 1.0);
        assert_eq!(ease_out(2.0), 1.0);
        let mut last = 0.0;
        for i in 1..=100 {
            let v = ease_out(i as f64 / 100.0);
            assert!(v >= last);
            last = v;
        }
    }

    #[test]
    fn test_lands_on_winner() {
        let mut rng = StdRng::seed_from_u64(1);
        let weights = [1, 3, 2, 5];
        for winner in 0..weights.len() {
            for _ in 0..20 {
                let spin = SpinAnimation::new(&weights, winner, &config(1000), &mut rng).unwrap();
                let end = spin.duration;
                assert!(spin.is_finished(end));
                assert_eq!(spin.index_at(end), winner);
                // the geometry agrees with the reported winner
                assert_eq!(spin.index_for_position(spin.position(end)), winner);
            }
        }
    }

    #[test]
    fn test_turns_within_config() {
        let mut rng = StdRng::seed_from_u64(9);
        for _ in 0..50 {
            let spin = SpinAnimation::new(&[1, 1], 1, &config(1000), &mut rng).unwrap();
            let total = spin.position(spin.duration);
            assert!(total >= 2.0 && total < 5.0, "distance {}", total);
        }
    }

    #[test]
    fn test_progress_and_position_increase() {
        let mut rng = StdRng::seed_from_u64(4);
        let spin = SpinAnimation::new(&[2, 2, 2], 2, &config(3000), &mut rng).unwrap();
        assert_eq!(spin.progress(Duration::ZERO), 0.0);
        assert_eq!(spin.position(Duration::ZERO), 0.0);
        assert!(!spin.is_finished(Duration::from_millis(1500)));

        let mut last = 0.0;
        for ms in (0..=3000).step_by(100) {
            let pos = spin.position(Duration::from_millis(ms));
            assert!(pos >= last);
            last = pos;
        }
    }

    #[test]
    fn test_zero_duration_is_immediate() {
        let mut rng = StdRng::seed_from_u64(0);
        let spin = SpinAnimation::new(&[1, 1, 1], 1, &config(0), &mut rng).unwrap();
        assert!(spin.is_finished(Duration::ZERO));
        assert_eq!(spin.index_at(Duration::ZERO), 1);
    }

    #[test]
    fn test_invalid_inputs() {
        let mut rng = StdRng::seed_from_u64(0);
        assert!(SpinAnimation::new(&[], 0, &config(100), &mut rng).is_none());
        assert!(SpinAnimation::new(&[1, 2], 2, &config(100), &mut rng).is_none());
    }
}
