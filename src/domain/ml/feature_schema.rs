//! Single versioned definition of the feature vector layout.
//!
//! Training and inference both encode through this module, so a model is
//! only ever scored with the exact layout it was fitted on. Any change to
//! the order or length here is a breaking change and must bump
//! `FEATURE_SCHEMA_VERSION`; persisted model metadata carries the version
//! and the predictor rejects a mismatch.

use crate::domain::types::{AttributeEstimate, Position, SeasonRecord};

/// Bumped whenever `FEATURE_NAMES` changes in length or order.
pub const FEATURE_SCHEMA_VERSION: u32 = 2;

/// Ordered feature names. Index i names element i of every encoded vector.
pub const FEATURE_NAMES: &[&str] = &[
    "current_points",
    "weighted_current_points",
    "is_qb",
    "is_rb",
    "is_wr",
    "is_te",
    "age_factor",
    "experience_factor",
    "rb_age_risk",
    "wr_age_peak",
    "years_since_epoch",
    "team_consistency",
];

pub const FEATURE_COUNT: usize = FEATURE_NAMES.len();

/// Encodes one season into the fixed-order feature vector.
///
/// `team_consistent` is known at training time (team in year i equals team
/// in year i+1) and assumed true at inference, where no future team exists.
pub fn encode(
    record: &SeasonRecord,
    position: Position,
    estimate: &AttributeEstimate,
    epoch_year: i32,
    team_consistent: bool,
) -> Vec<f64> {
    let age = estimate.age as f64;
    vec![
        record.fantasy_points,
        record.fantasy_points * 0.8,
        one_hot(position, Position::Qb),
        one_hot(position, Position::Rb),
        one_hot(position, Position::Wr),
        one_hot(position, Position::Te),
        age_factor(estimate.age),
        experience_factor(estimate.experience),
        flag(position == Position::Rb && age > 28.0),
        flag(position == Position::Wr && (26.0..=32.0).contains(&age)),
        (record.year - epoch_year) as f64,
        flag(team_consistent),
    ]
}

/// Peaks at 1.0 at age 27 and decays linearly by 0.05 per year of
/// distance. Floored at 0 for robustness against out-of-range ages.
pub fn age_factor(age: u32) -> f64 {
    (1.0 - (27.0 - age as f64).abs() * 0.05).max(0.0)
}

/// Saturates at 1.0 from five years of experience onward.
pub fn experience_factor(experience: u32) -> f64 {
    (experience as f64 * 0.2).min(1.0)
}

fn one_hot(position: Position, target: Position) -> f64 {
    flag(position == target)
}

fn flag(condition: bool) -> f64 {
    if condition { 1.0 } else { 0.0 }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(points: f64, year: i32) -> SeasonRecord {
        SeasonRecord {
            player_name: "T. Test".to_string(),
            position: Position::Rb,
            team: "DAL".to_string(),
            fantasy_points: points,
            year,
        }
    }

    #[test]
    fn test_vector_matches_schema_length() {
        let est = AttributeEstimate::from_age(27);
        let vec = encode(&record(100.0, 2023), Position::Rb, &est, 2019, true);
        assert_eq!(vec.len(), FEATURE_COUNT);
        assert_eq!(vec.len(), FEATURE_NAMES.len());
    }

    #[test]
    fn test_field_order_contract() {
        let est = AttributeEstimate::from_age(30);
        let vec = encode(&record(200.0, 2024), Position::Rb, &est, 2019, false);
        assert_eq!(vec[0], 200.0);
        assert_eq!(vec[1], 160.0);
        // One-hot block: QB, RB, WR, TE.
        assert_eq!(&vec[2..6], &[0.0, 1.0, 0.0, 0.0]);
        assert_eq!(vec[8], 1.0, "RB aged 30 carries the age-risk flag");
        assert_eq!(vec[9], 0.0);
        assert_eq!(vec[10], 5.0);
        assert_eq!(vec[11], 0.0);
    }

    #[test]
    fn test_other_position_has_empty_one_hot() {
        let est = AttributeEstimate::from_age(26);
        let vec = encode(&record(50.0, 2022), Position::Other, &est, 2019, true);
        assert_eq!(&vec[2..6], &[0.0, 0.0, 0.0, 0.0]);
        assert_eq!(vec[8], 0.0);
        assert_eq!(vec[9], 0.0);
    }

    #[test]
    fn test_age_factor_peaks_at_27() {
        assert_eq!(age_factor(27), 1.0);
        for age in 18..=45 {
            let factor = age_factor(age);
            assert!((0.0..=1.0).contains(&factor));
            if age != 27 {
                assert!(factor < 1.0);
            }
        }
        // Symmetric decay around the peak.
        assert!((age_factor(25) - age_factor(29)).abs() < 1e-12);
        // Floor engages far outside any valid range.
        assert_eq!(age_factor(90), 0.0);
    }

    #[test]
    fn test_experience_factor_saturates_at_five_years() {
        assert!((experience_factor(1) - 0.2).abs() < 1e-12);
        assert!((experience_factor(4) - 0.8).abs() < 1e-12);
        for experience in 5..=20 {
            assert_eq!(experience_factor(experience), 1.0);
        }
    }

    #[test]
    fn test_wr_age_peak_window() {
        for (age, expected) in [(25, 0.0), (26, 1.0), (32, 1.0), (33, 0.0)] {
            let est = AttributeEstimate::from_age(age);
            let vec = encode(&record(80.0, 2023), Position::Wr, &est, 2019, true);
            assert_eq!(vec[9], expected, "age {age}");
        }
    }
}
