// Track Features Core - fixed-width feature vectors from track analyses
// Deterministic statistical reductions over section and segment series

// Module declarations
pub mod analysis;
pub mod config;
pub mod error;
pub mod track;

// Re-exports for convenience
pub use analysis::{
    BatchPolicy, BatchReport, FeatureBatchAssembler, FeatureTable, FeatureValue, FeatureVector,
    TrackFeatureExtractor, FEATURE_COUNT,
};
pub use config::AppConfig;
pub use error::{BatchError, ErrorCode, ExtractionError};
pub use track::{load_collection, TrackAnalysis};
