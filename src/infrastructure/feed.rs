//! CSV feeds at the pipeline boundary.
//!
//! Season records come in as flat CSV with the contract column names
//! (Player, Position, Team, Fantasy_Points, Year); prediction sets go
//! out the same way. Malformed numeric cells degrade to 0 points inside
//! the record deserializer instead of failing the batch.

use crate::domain::types::{PredictionRecord, SeasonRecord};
use anyhow::{Context, Result};
use std::path::Path;
use tracing::{info, warn};

/// Reads season records from a CSV file. Rows that fail structurally
/// (wrong column count, missing player) are skipped with a warning.
pub fn read_season_records(path: &Path) -> Result<Vec<SeasonRecord>> {
    let mut reader = csv::Reader::from_path(path)
        .with_context(|| format!("Failed to open season data at {}", path.display()))?;

    let mut records = Vec::new();
    let mut skipped = 0usize;
    for row in reader.deserialize::<SeasonRecord>() {
        match row {
            Ok(record) if !record.player_name.trim().is_empty() => records.push(record),
            Ok(_) => skipped += 1,
            Err(e) => {
                warn!("skipping malformed season row: {e}");
                skipped += 1;
            }
        }
    }

    info!(
        records = records.len(),
        skipped,
        path = %path.display(),
        "season data loaded"
    );
    Ok(records)
}

/// Writes a prediction set as CSV with the contract column names.
pub fn write_predictions_csv(path: &Path, predictions: &[PredictionRecord]) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }
    let mut writer = csv::Writer::from_path(path)
        .with_context(|| format!("Failed to create {}", path.display()))?;
    for prediction in predictions {
        writer.serialize(prediction)?;
    }
    writer.flush()?;
    Ok(())
}
