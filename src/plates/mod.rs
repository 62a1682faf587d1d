pub mod ingestion;
pub mod models;
pub mod pools;
pub mod sequence;
pub mod views;
