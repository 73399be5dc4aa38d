//! Next-season fantasy football prediction pipeline.
//!
//! Transforms raw per-season player records into a fixed-width feature
//! vector, trains a random forest on historical year-over-year transitions,
//! and scores the current season with the identical feature transform.

pub mod application;
pub mod config;
pub mod domain;
pub mod infrastructure;
