pub mod errors;
pub mod ml;
pub mod repositories;
pub mod types;
