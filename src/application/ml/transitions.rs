//! Extraction of year-over-year training transitions.
//!
//! Walks each player's chronologically sorted history and emits one
//! (features at year i, points at year i+1) pair per consecutive-season
//! pair. Players with a single season contribute nothing. Feature
//! construction is independent across players and runs on the rayon pool;
//! within a player the chronological order is preserved.

use crate::application::ml::features::FeatureBuilder;
use crate::domain::types::{Provenance, SeasonRecord, TrainingExample};
use rayon::prelude::*;
use std::collections::BTreeMap;
use tracing::debug;

pub struct TransitionExtractor<'a> {
    builder: &'a FeatureBuilder,
}

impl<'a> TransitionExtractor<'a> {
    pub fn new(builder: &'a FeatureBuilder) -> Self {
        Self { builder }
    }

    pub fn extract(&self, records: &[SeasonRecord]) -> Vec<TrainingExample> {
        let mut by_player: BTreeMap<&str, Vec<&SeasonRecord>> = BTreeMap::new();
        for record in records {
            by_player
                .entry(record.player_name.as_str())
                .or_default()
                .push(record);
        }

        let players: Vec<(&str, Vec<&SeasonRecord>)> = by_player.into_iter().collect();
        let examples: Vec<TrainingExample> = players
            .into_par_iter()
            .flat_map(|(player, mut seasons)| {
                seasons.sort_by_key(|r| r.year);
                self.player_transitions(player, &seasons)
            })
            .collect();

        debug!(
            examples = examples.len(),
            records = records.len(),
            "extracted training transitions"
        );
        examples
    }

    fn player_transitions(
        &self,
        player: &str,
        seasons: &[&SeasonRecord],
    ) -> Vec<TrainingExample> {
        if seasons.len() < 2 {
            return Vec::new();
        }

        // Position fixed to the most recent recorded one; one attribute
        // estimate per player, reused across all of their transitions.
        let position = seasons[seasons.len() - 1].position;
        let estimate = self.builder.estimate(player, position);

        seasons
            .windows(2)
            .map(|pair| {
                let (current, next) = (pair[0], pair[1]);
                let team_consistent = current.team == next.team;
                TrainingExample {
                    features: self.builder.encode(current, position, &estimate, team_consistent),
                    label: next.fantasy_points,
                    provenance: Provenance {
                        player: player.to_string(),
                        position,
                        from_year: current.year,
                        to_year: next.year,
                    },
                }
            })
            .collect()
    }
}
