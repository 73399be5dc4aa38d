//! Read-only summarization over prediction sets and historical corpora.
//!
//! No model interaction. Empty inputs produce empty summaries rather
//! than errors, so the analyze surface never fails on missing data.

use crate::domain::types::{round1, PredictionRecord, SeasonRecord};
use serde::Serialize;
use std::collections::BTreeMap;

#[derive(Debug, Clone, Default, Serialize)]
pub struct PredictionAnalysis {
    pub position_breakdown: BTreeMap<String, usize>,
    pub avg_change_by_position: BTreeMap<String, f64>,
    pub breakout_candidates: Vec<PredictionRecord>,
    pub risk_candidates: Vec<PredictionRecord>,
    pub avg_age_by_position: BTreeMap<String, f64>,
    pub avg_experience_by_position: BTreeMap<String, f64>,
    pub avg_confidence: f64,
    pub avg_confidence_by_position: BTreeMap<String, f64>,
}

#[derive(Debug, Clone, Serialize)]
pub struct TopScorer {
    pub player: String,
    pub position: String,
    pub team: String,
    pub fantasy_points: f64,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct HistoricalAnalysis {
    pub total_records: usize,
    pub years_covered: Vec<i32>,
    pub position_counts: BTreeMap<String, usize>,
    pub avg_points_by_year: BTreeMap<i32, f64>,
    pub avg_points_by_position: BTreeMap<String, f64>,
    pub top_scorers_by_year: BTreeMap<i32, Vec<TopScorer>>,
    pub points_trend_by_position: BTreeMap<String, BTreeMap<i32, f64>>,
}

/// Summarizes a prediction set: per-position breakdowns plus the top-K
/// breakout and bottom-K risk candidates by percent change.
pub fn analyze_predictions(predictions: &[PredictionRecord], k: usize) -> PredictionAnalysis {
    if predictions.is_empty() {
        return PredictionAnalysis::default();
    }

    let mut analysis = PredictionAnalysis {
        avg_confidence: round1(mean(predictions.iter().map(|p| p.confidence))),
        ..Default::default()
    };

    let mut by_position: BTreeMap<String, Vec<&PredictionRecord>> = BTreeMap::new();
    for prediction in predictions {
        by_position
            .entry(prediction.position.to_string())
            .or_default()
            .push(prediction);
    }

    for (position, group) in &by_position {
        analysis
            .position_breakdown
            .insert(position.clone(), group.len());
        analysis.avg_change_by_position.insert(
            position.clone(),
            round1(mean(group.iter().map(|p| p.percent_change))),
        );
        analysis.avg_age_by_position.insert(
            position.clone(),
            round1(mean(group.iter().map(|p| p.age as f64))),
        );
        analysis.avg_experience_by_position.insert(
            position.clone(),
            round1(mean(group.iter().map(|p| p.experience as f64))),
        );
        analysis.avg_confidence_by_position.insert(
            position.clone(),
            round1(mean(group.iter().map(|p| p.confidence))),
        );
    }

    let mut by_change: Vec<&PredictionRecord> = predictions.iter().collect();
    by_change.sort_by(|a, b| {
        b.percent_change
            .partial_cmp(&a.percent_change)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    analysis.breakout_candidates = by_change.iter().take(k).map(|p| (*p).clone()).collect();
    analysis.risk_candidates = by_change.iter().rev().take(k).map(|p| (*p).clone()).collect();

    analysis
}

/// Summarizes a historical corpus: coverage, scoring averages by year
/// and position, top scorers per year and the per-position trend.
pub fn analyze_historical(records: &[SeasonRecord]) -> HistoricalAnalysis {
    if records.is_empty() {
        return HistoricalAnalysis::default();
    }

    let mut analysis = HistoricalAnalysis {
        total_records: records.len(),
        ..Default::default()
    };

    let mut by_year: BTreeMap<i32, Vec<&SeasonRecord>> = BTreeMap::new();
    let mut by_position: BTreeMap<String, Vec<&SeasonRecord>> = BTreeMap::new();
    for record in records {
        by_year.entry(record.year).or_default().push(record);
        by_position
            .entry(record.position.to_string())
            .or_default()
            .push(record);
    }

    analysis.years_covered = by_year.keys().copied().collect();

    for (&year, group) in &by_year {
        analysis
            .avg_points_by_year
            .insert(year, round1(mean(group.iter().map(|r| r.fantasy_points))));

        let mut scorers: Vec<&&SeasonRecord> = group.iter().collect();
        scorers.sort_by(|a, b| {
            b.fantasy_points
                .partial_cmp(&a.fantasy_points)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        analysis.top_scorers_by_year.insert(
            year,
            scorers
                .iter()
                .take(5)
                .map(|r| TopScorer {
                    player: r.player_name.clone(),
                    position: r.position.to_string(),
                    team: r.team.clone(),
                    fantasy_points: r.fantasy_points,
                })
                .collect(),
        );
    }

    for (position, group) in &by_position {
        analysis.position_counts.insert(position.clone(), group.len());
        analysis.avg_points_by_position.insert(
            position.clone(),
            round1(mean(group.iter().map(|r| r.fantasy_points))),
        );

        let mut trend: BTreeMap<i32, Vec<f64>> = BTreeMap::new();
        for record in group {
            trend
                .entry(record.year)
                .or_default()
                .push(record.fantasy_points);
        }
        analysis.points_trend_by_position.insert(
            position.clone(),
            trend
                .into_iter()
                .map(|(year, points)| (year, round1(mean(points.into_iter()))))
                .collect(),
        );
    }

    analysis
}

/// Short natural-language observations over both inputs. Empty inputs
/// contribute no lines.
pub fn generate_insights(
    predictions: &[PredictionRecord],
    historical: &[SeasonRecord],
) -> Vec<String> {
    let mut insights = Vec::new();

    if !predictions.is_empty() {
        let analysis = analyze_predictions(predictions, 1);
        if let Some((position, count)) = analysis
            .position_breakdown
            .iter()
            .max_by_key(|&(_, &count)| count)
        {
            insights.push(format!(
                "Top predictions are dominated by {position}s ({count} players)"
            ));
        }
        if let Some(breakout) = analysis.breakout_candidates.first() {
            insights.push(format!(
                "Biggest breakout candidate: {} ({}) with {}% increase",
                breakout.player, breakout.position, breakout.percent_change
            ));
        }
        if let Some(risk) = analysis.risk_candidates.first() {
            insights.push(format!(
                "Highest risk player: {} ({}) with {}% decrease",
                risk.player, risk.position, risk.percent_change
            ));
        }
        let avg_age = mean(predictions.iter().map(|p| p.age as f64));
        insights.push(format!(
            "Average age of top predicted players: {avg_age:.1} years"
        ));
    }

    if !historical.is_empty() {
        let analysis = analyze_historical(historical);
        let recent: Vec<(&i32, &f64)> = analysis
            .avg_points_by_year
            .iter()
            .rev()
            .take(3)
            .collect::<Vec<_>>()
            .into_iter()
            .rev()
            .collect();
        if recent.len() >= 2 {
            let direction = if recent[recent.len() - 1].1 > recent[0].1 {
                "increasing"
            } else {
                "decreasing"
            };
            insights.push(format!(
                "Fantasy points trend is {direction} over the last {} years",
                recent.len()
            ));
        }
    }

    insights
}

fn mean(values: impl Iterator<Item = f64>) -> f64 {
    let collected: Vec<f64> = values.collect();
    if collected.is_empty() {
        return 0.0;
    }
    collected.iter().sum::<f64>() / collected.len() as f64
}
