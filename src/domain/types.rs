use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Fantasy-relevant positions. Anything outside the four scoring
/// positions collapses into `Other` and carries no one-hot signal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Position {
    Qb,
    Rb,
    Wr,
    Te,
    Other,
}

impl Position {
    /// Case-insensitive parse. Unknown tags (FB, K, DST, ...) map to `Other`.
    pub fn parse(s: &str) -> Self {
        match s.trim().to_uppercase().as_str() {
            "QB" => Position::Qb,
            "RB" => Position::Rb,
            "WR" => Position::Wr,
            "TE" => Position::Te,
            _ => Position::Other,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Position::Qb => "QB",
            Position::Rb => "RB",
            Position::Wr => "WR",
            Position::Te => "TE",
            Position::Other => "OTHER",
        }
    }
}

impl From<String> for Position {
    fn from(s: String) -> Self {
        Position::parse(&s)
    }
}

impl From<Position> for String {
    fn from(p: Position) -> Self {
        p.as_str().to_string()
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One player's performance in one season. Immutable once ingested.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeasonRecord {
    #[serde(rename = "Player")]
    pub player_name: String,
    #[serde(rename = "Position")]
    pub position: Position,
    #[serde(rename = "Team", default)]
    pub team: String,
    #[serde(rename = "Fantasy_Points", deserialize_with = "de_points", default)]
    pub fantasy_points: f64,
    #[serde(rename = "Year")]
    pub year: i32,
}

/// Tolerant points parser: an empty or unparsable cell counts as 0.0
/// instead of failing the whole batch. Negative totals are clamped.
fn de_points<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    let points = raw.trim().parse::<f64>().unwrap_or(0.0);
    Ok(if points.is_finite() { points.max(0.0) } else { 0.0 })
}

/// Synthetic age/experience estimate. Derived, never persisted with the
/// player: there is no real biographical data behind it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttributeEstimate {
    pub age: u32,
    pub experience: u32,
}

impl AttributeEstimate {
    /// Experience is a deterministic function of age, floored at one year.
    pub fn from_age(age: u32) -> Self {
        Self {
            age,
            experience: age.saturating_sub(22).max(1),
        }
    }
}

/// Where a training example came from. `to_year` is always
/// `from_year + 1`: examples are consecutive-season transitions only.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Provenance {
    pub player: String,
    pub position: Position,
    pub from_year: i32,
    pub to_year: i32,
}

/// One (features-at-year-i, points-at-year-i+1) supervised pair.
#[derive(Debug, Clone)]
pub struct TrainingExample {
    pub features: Vec<f64>,
    pub label: f64,
    pub provenance: Provenance,
}

/// Held-out evaluation metrics for a trained model.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvalMetrics {
    pub mse: f64,
    pub rmse: f64,
    pub r2: f64,
    /// Permutation importance per feature, keyed by schema feature name.
    pub feature_importance: BTreeMap<String, f64>,
}

/// Metadata persisted next to every model artifact. Never mutated after
/// creation, only superseded by a newer artifact.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelMetadata {
    pub timestamp: String,
    pub model_type: String,
    pub training_samples: usize,
    pub feature_count: usize,
    pub schema_version: u32,
    pub metrics: EvalMetrics,
}

/// One player's forecast. Field names are a serialization contract with
/// the persisted prediction lists and must not change.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PredictionRecord {
    #[serde(rename = "Player")]
    pub player: String,
    #[serde(rename = "Position")]
    pub position: Position,
    #[serde(rename = "Team")]
    pub team: String,
    #[serde(rename = "Current_Points")]
    pub current_points: f64,
    #[serde(rename = "Predicted_Next_Year")]
    pub predicted_next_year: f64,
    #[serde(rename = "Percent_Change")]
    pub percent_change: f64,
    #[serde(rename = "Confidence")]
    pub confidence: f64,
    #[serde(rename = "Age")]
    pub age: u32,
    #[serde(rename = "Experience")]
    pub experience: u32,
}

/// Rounds to one decimal place, the precision used in persisted output.
pub fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}
