//! Slicing of a persisted prediction set.
//!
//! Mirrors the external query contract: optional case-insensitive
//! position filter plus a top-N cut, with distinct not-found conditions
//! for "no data at all" and "no players at that position".

use crate::domain::errors::PipelineError;
use crate::domain::types::{round1, PredictionRecord};
use serde::Serialize;
use std::cmp::Ordering;
use std::collections::BTreeMap;

#[derive(Debug, Clone)]
pub struct QueryParams {
    pub top_n: usize,
    pub position: Option<String>,
}

impl Default for QueryParams {
    fn default() -> Self {
        Self {
            top_n: 50,
            position: None,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct QuerySummary {
    pub total_predictions: usize,
    pub position_breakdown: BTreeMap<String, usize>,
    pub avg_predicted_change: f64,
    pub top_predicted_player: String,
    pub top_predicted_points: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct QueryResponse {
    pub predictions: Vec<PredictionRecord>,
    pub summary: QuerySummary,
}

/// Filters, re-ranks and truncates a stored prediction set.
pub fn slice_predictions(
    predictions: &[PredictionRecord],
    params: &QueryParams,
) -> Result<QueryResponse, PipelineError> {
    if predictions.is_empty() {
        return Err(PipelineError::NoPredictions);
    }

    let mut selected: Vec<PredictionRecord> = match &params.position {
        Some(raw) => {
            // Literal tag match: an unknown filter string must come back
            // not-found, never collapse onto the OTHER bucket.
            let wanted = raw.trim().to_uppercase();
            let matches: Vec<PredictionRecord> = predictions
                .iter()
                .filter(|p| p.position.as_str() == wanted)
                .cloned()
                .collect();
            if matches.is_empty() {
                return Err(PipelineError::PositionNotFound { position: wanted });
            }
            matches
        }
        None => predictions.to_vec(),
    };

    // Stored sets are already ranked, but re-sort defensively so a
    // hand-edited file cannot break the top-N contract.
    selected.sort_by(|a, b| {
        b.predicted_next_year
            .partial_cmp(&a.predicted_next_year)
            .unwrap_or(Ordering::Equal)
    });
    selected.truncate(params.top_n);

    let mut position_breakdown: BTreeMap<String, usize> = BTreeMap::new();
    for prediction in &selected {
        *position_breakdown
            .entry(prediction.position.to_string())
            .or_insert(0) += 1;
    }

    let avg_change =
        selected.iter().map(|p| p.percent_change).sum::<f64>() / selected.len() as f64;
    let summary = QuerySummary {
        total_predictions: selected.len(),
        position_breakdown,
        avg_predicted_change: round1(avg_change),
        top_predicted_player: selected[0].player.clone(),
        top_predicted_points: selected[0].predicted_next_year,
    };

    Ok(QueryResponse {
        predictions: selected,
        summary,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::types::Position;

    fn prediction(player: &str, position: Position, predicted: f64) -> PredictionRecord {
        PredictionRecord {
            player: player.to_string(),
            position,
            team: "PHI".to_string(),
            current_points: 100.0,
            predicted_next_year: predicted,
            percent_change: predicted - 100.0,
            confidence: 85.0,
            age: 27,
            experience: 5,
        }
    }

    fn sample() -> Vec<PredictionRecord> {
        vec![
            prediction("A", Position::Qb, 310.0),
            prediction("B", Position::Rb, 250.0),
            prediction("C", Position::Rb, 190.0),
            prediction("D", Position::Wr, 220.0),
        ]
    }

    #[test]
    fn test_empty_set_is_no_predictions() {
        let result = slice_predictions(&[], &QueryParams::default());
        assert!(matches!(result, Err(PipelineError::NoPredictions)));
    }

    #[test]
    fn test_top_n_cut_is_exact_and_sorted() {
        let response = slice_predictions(
            &sample(),
            &QueryParams {
                top_n: 2,
                position: None,
            },
        )
        .unwrap();
        assert_eq!(response.predictions.len(), 2);
        assert_eq!(response.predictions[0].player, "A");
        assert_eq!(response.predictions[1].player, "B");
        assert_eq!(response.summary.total_predictions, 2);
        assert_eq!(response.summary.top_predicted_player, "A");
        assert_eq!(response.summary.top_predicted_points, 310.0);
    }

    #[test]
    fn test_position_filter_is_case_insensitive() {
        let response = slice_predictions(
            &sample(),
            &QueryParams {
                top_n: 50,
                position: Some("rb".to_string()),
            },
        )
        .unwrap();
        assert_eq!(response.predictions.len(), 2);
        assert!(response
            .predictions
            .iter()
            .all(|p| p.position == Position::Rb));
        assert_eq!(response.summary.position_breakdown["RB"], 2);
    }

    #[test]
    fn test_unknown_filter_never_matches_other_bucket() {
        // K/DST/FB ingest as Other; a garbage filter string must not
        // silently select them.
        let predictions = vec![
            prediction("A", Position::Qb, 310.0),
            prediction("Kicker", Position::Other, 140.0),
        ];
        let result = slice_predictions(
            &predictions,
            &QueryParams {
                top_n: 50,
                position: Some("xyz".to_string()),
            },
        );
        assert!(matches!(
            result,
            Err(PipelineError::PositionNotFound { position }) if position == "XYZ"
        ));

        // The literal tag still reaches the bucket.
        let response = slice_predictions(
            &predictions,
            &QueryParams {
                top_n: 50,
                position: Some("other".to_string()),
            },
        )
        .unwrap();
        assert_eq!(response.predictions.len(), 1);
        assert_eq!(response.predictions[0].player, "Kicker");
    }

    #[test]
    fn test_unmatched_position_is_not_found() {
        let result = slice_predictions(
            &sample(),
            &QueryParams {
                top_n: 50,
                position: Some("te".to_string()),
            },
        );
        assert!(matches!(
            result,
            Err(PipelineError::PositionNotFound { position }) if position == "TE"
        ));
    }
}
