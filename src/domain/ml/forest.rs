//! Serializable random forest wrapper.
//!
//! The rest of the pipeline only sees the `Regressor` seam; the concrete
//! smartcore forest stays swappable and opaque between fit and predict.

use crate::config::ForestParams;
use crate::domain::errors::PipelineError;
use crate::domain::repositories::Regressor;
use serde::{Deserialize, Serialize};
use smartcore::ensemble::random_forest_regressor::{
    RandomForestRegressor, RandomForestRegressorParameters,
};
use smartcore::linalg::basic::matrix::DenseMatrix;

#[derive(Serialize, Deserialize)]
pub struct ForestModel {
    forest: RandomForestRegressor<f64, f64, DenseMatrix<f64>, Vec<f64>>,
}

impl ForestModel {
    pub fn fit(x: &[Vec<f64>], y: &[f64], params: &ForestParams) -> Result<Self, PipelineError> {
        let matrix =
            DenseMatrix::from_2d_vec(&x.to_vec()).map_err(|e| PipelineError::Training {
                reason: format!("matrix creation failed: {e}"),
            })?;
        let labels: Vec<f64> = y.to_vec();

        let forest_params = RandomForestRegressorParameters::default()
            .with_n_trees(params.n_trees)
            .with_max_depth(params.max_depth)
            .with_min_samples_split(params.min_samples_split)
            .with_min_samples_leaf(params.min_samples_leaf)
            .with_seed(params.seed);

        let forest =
            RandomForestRegressor::fit(&matrix, &labels, forest_params).map_err(|e| {
                PipelineError::Training {
                    reason: format!("forest fit failed: {e}"),
                }
            })?;

        Ok(Self { forest })
    }
}

impl Regressor for ForestModel {
    fn predict(&self, features: &[Vec<f64>]) -> Result<Vec<f64>, String> {
        let matrix = DenseMatrix::from_2d_vec(&features.to_vec())
            .map_err(|e| format!("matrix creation failed: {e}"))?;
        self.forest
            .predict(&matrix)
            .map_err(|e| format!("prediction failed: {e}"))
    }
}
