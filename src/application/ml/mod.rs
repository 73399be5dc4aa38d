pub mod analyzer;
pub mod estimator;
pub mod features;
pub mod predictor;
pub mod trainer;
pub mod transitions;
