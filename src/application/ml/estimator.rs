//! Synthetic age/experience estimation.
//!
//! No real biographical data is available, so age is drawn from a
//! position-conditioned interval. The default estimator seeds the draw
//! from the player's name: repeated calls for the same player are
//! idempotent, which keeps training and inference passes consistent.

use crate::config::{AgeRangeTable, EstimatorMode};
use crate::domain::types::{AttributeEstimate, Position};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::hash::{DefaultHasher, Hash, Hasher};

pub trait AttributeEstimator: Send + Sync {
    fn estimate(&self, player: &str, position: Position) -> AttributeEstimate;
}

pub fn estimator_for_mode(
    mode: EstimatorMode,
    ranges: AgeRangeTable,
) -> Box<dyn AttributeEstimator> {
    match mode {
        EstimatorMode::Seeded => Box::new(SeededEstimator::new(ranges)),
        EstimatorMode::Random => Box::new(RandomEstimator::new(ranges)),
    }
}

/// Identity-stable estimator: the age draw is uniform over the position's
/// interval, seeded by a hash of the player name.
pub struct SeededEstimator {
    ranges: AgeRangeTable,
}

impl SeededEstimator {
    pub fn new(ranges: AgeRangeTable) -> Self {
        Self { ranges }
    }
}

impl AttributeEstimator for SeededEstimator {
    fn estimate(&self, player: &str, position: Position) -> AttributeEstimate {
        let (lo, hi) = self.ranges.for_position(position);
        let mut hasher = DefaultHasher::new();
        player.hash(&mut hasher);
        position.hash(&mut hasher);
        let mut rng = StdRng::seed_from_u64(hasher.finish());
        AttributeEstimate::from_age(rng.random_range(lo..hi))
    }
}

/// Re-samples on every call. Matches the original behavior where the same
/// player could get different ages between passes; useful only for
/// comparing against the seeded default.
pub struct RandomEstimator {
    ranges: AgeRangeTable,
}

impl RandomEstimator {
    pub fn new(ranges: AgeRangeTable) -> Self {
        Self { ranges }
    }
}

impl AttributeEstimator for RandomEstimator {
    fn estimate(&self, _player: &str, position: Position) -> AttributeEstimate {
        let (lo, hi) = self.ranges.for_position(position);
        let mut rng = rand::rng();
        AttributeEstimate::from_age(rng.random_range(lo..hi))
    }
}

/// Fixed-age estimator for deterministic runs and tests.
pub struct FixedEstimator(pub u32);

impl AttributeEstimator for FixedEstimator {
    fn estimate(&self, _player: &str, _position: Position) -> AttributeEstimate {
        AttributeEstimate::from_age(self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ages_stay_within_position_interval() {
        let estimator = RandomEstimator::new(AgeRangeTable::default());
        for _ in 0..200 {
            let est = estimator.estimate("A. Back", Position::Rb);
            assert!((22..28).contains(&est.age));
            let est = estimator.estimate("B. Passer", Position::Qb);
            assert!((25..35).contains(&est.age));
            let est = estimator.estimate("C. Kicker", Position::Other);
            assert!((24..29).contains(&est.age));
        }
    }

    #[test]
    fn test_seeded_estimator_is_idempotent() {
        let estimator = SeededEstimator::new(AgeRangeTable::default());
        let first = estimator.estimate("J. Chase", Position::Wr);
        for _ in 0..20 {
            assert_eq!(estimator.estimate("J. Chase", Position::Wr), first);
        }
        assert!((23..30).contains(&first.age));
    }

    #[test]
    fn test_seeded_estimator_varies_across_players() {
        let estimator = SeededEstimator::new(AgeRangeTable::default());
        let ages: std::collections::HashSet<u32> = (0..40)
            .map(|i| estimator.estimate(&format!("Player {i}"), Position::Qb).age)
            .collect();
        assert!(ages.len() > 1, "hash-seeded draws should spread over the interval");
    }

    #[test]
    fn test_experience_derived_from_age() {
        let estimator = SeededEstimator::new(AgeRangeTable::default());
        let est = estimator.estimate("D. Tight", Position::Te);
        assert_eq!(est.experience, est.age.saturating_sub(22).max(1));
    }
}
