pub mod aggregation;
pub mod markdown;
