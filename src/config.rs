use crate::domain::types::Position;
use anyhow::{Context, Result};
use std::env;
use std::path::PathBuf;

/// How player ages are estimated when no biographical data exists.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EstimatorMode {
    /// Hash-seeded draw: the same player always gets the same age.
    Seeded,
    /// Fresh draw on every call. Kept for parity with the original
    /// behavior; unstable between training and inference passes.
    Random,
}

impl std::str::FromStr for EstimatorMode {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "seeded" => Ok(EstimatorMode::Seeded),
            "random" => Ok(EstimatorMode::Random),
            _ => anyhow::bail!("Invalid ESTIMATOR_MODE: {}. Must be 'seeded' or 'random'", s),
        }
    }
}

/// Half-open age intervals per position for the attribute estimator.
#[derive(Debug, Clone)]
pub struct AgeRangeTable {
    pub qb: (u32, u32),
    pub rb: (u32, u32),
    pub wr: (u32, u32),
    pub te: (u32, u32),
    pub default: (u32, u32),
}

impl Default for AgeRangeTable {
    fn default() -> Self {
        Self {
            qb: (25, 35),
            rb: (22, 28),
            wr: (23, 30),
            te: (23, 29),
            default: (24, 29),
        }
    }
}

impl AgeRangeTable {
    pub fn for_position(&self, position: Position) -> (u32, u32) {
        match position {
            Position::Qb => self.qb,
            Position::Rb => self.rb,
            Position::Wr => self.wr,
            Position::Te => self.te,
            Position::Other => self.default,
        }
    }
}

/// Position-specific variance for prediction noise injection.
#[derive(Debug, Clone)]
pub struct VarianceTable {
    pub qb: f64,
    pub rb: f64,
    pub wr: f64,
    pub te: f64,
    pub default: f64,
}

impl Default for VarianceTable {
    fn default() -> Self {
        Self {
            qb: 0.15,
            rb: 0.25,
            wr: 0.20,
            te: 0.30,
            default: 0.20,
        }
    }
}

impl VarianceTable {
    pub fn for_position(&self, position: Position) -> f64 {
        match position {
            Position::Qb => self.qb,
            Position::Rb => self.rb,
            Position::Wr => self.wr,
            Position::Te => self.te,
            Position::Other => self.default,
        }
    }
}

/// Random forest hyperparameters. Fixed by design; env overrides exist
/// for experimentation only.
#[derive(Debug, Clone)]
pub struct ForestParams {
    pub n_trees: usize,
    pub max_depth: u16,
    pub min_samples_split: usize,
    pub min_samples_leaf: usize,
    pub seed: u64,
}

impl Default for ForestParams {
    fn default() -> Self {
        Self {
            n_trees: 200,
            max_depth: 12,
            min_samples_split: 5,
            min_samples_leaf: 2,
            seed: 42,
        }
    }
}

/// Explicit configuration for every pipeline entry point. No ambient
/// globals: bucket paths, the epoch constant and the noise tables all
/// travel through this object.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Root directory of the filesystem object store.
    pub data_dir: PathBuf,
    /// Epoch for the years_since_epoch feature. Fixed by design.
    pub epoch_year: i32,
    pub default_top_n: usize,
    /// Fraction of examples held out for evaluation.
    pub holdout_fraction: f64,
    pub estimator_mode: EstimatorMode,
    pub forest: ForestParams,
    pub variance: VarianceTable,
    pub age_ranges: AgeRangeTable,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("data"),
            epoch_year: 2019,
            default_top_n: 50,
            holdout_fraction: 0.2,
            estimator_mode: EstimatorMode::Seeded,
            forest: ForestParams::default(),
            variance: VarianceTable::default(),
            age_ranges: AgeRangeTable::default(),
        }
    }
}

impl PipelineConfig {
    pub fn from_env() -> Result<Self> {
        let mut config = PipelineConfig::default();

        if let Ok(dir) = env::var("GRIDCAST_DATA_DIR") {
            config.data_dir = PathBuf::from(dir);
        }

        let epoch_year = env::var("GRIDCAST_EPOCH_YEAR")
            .unwrap_or_else(|_| "2019".to_string())
            .parse::<i32>()
            .context("Failed to parse GRIDCAST_EPOCH_YEAR")?;

        let default_top_n = env::var("GRIDCAST_TOP_N")
            .unwrap_or_else(|_| "50".to_string())
            .parse::<usize>()
            .context("Failed to parse GRIDCAST_TOP_N")?;

        let estimator_mode = env::var("GRIDCAST_ESTIMATOR_MODE")
            .unwrap_or_else(|_| "seeded".to_string())
            .parse::<EstimatorMode>()?;

        let n_trees = env::var("GRIDCAST_N_TREES")
            .unwrap_or_else(|_| "200".to_string())
            .parse::<usize>()
            .context("Failed to parse GRIDCAST_N_TREES")?;

        let max_depth = env::var("GRIDCAST_MAX_DEPTH")
            .unwrap_or_else(|_| "12".to_string())
            .parse::<u16>()
            .context("Failed to parse GRIDCAST_MAX_DEPTH")?;

        config.epoch_year = epoch_year;
        config.default_top_n = default_top_n;
        config.estimator_mode = estimator_mode;
        config.forest.n_trees = n_trees;
        config.forest.max_depth = max_depth;
        Ok(config)
    }
}
