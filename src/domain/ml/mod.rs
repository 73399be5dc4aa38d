pub mod feature_schema;
pub mod forest;
