pub mod ml;
pub mod query;
