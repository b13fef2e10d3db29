// Analysis module - feature extraction pipeline
//
// Turns column-wise track analyses into fixed-width feature vectors.
//
// Architecture:
// - series: scalar reducers (moments, order statistics, trend counts)
// - timbre: segment timbre vectors to per-basis series
// - features: TrackFeatureExtractor, one FeatureVector per track
// - batch: FeatureBatchAssembler, one FeatureTable per collection
//
// Pipeline: TrackAnalysis → TrackFeatureExtractor → FeatureVector →
// FeatureBatchAssembler → FeatureTable

pub mod batch;
pub mod features;
pub mod series;
pub mod timbre;

pub use batch::{
    BatchPolicy, BatchReport, FeatureBatchAssembler, FeatureRow, FeatureTable, TrackFailure,
};
pub use features::{FeatureValue, FeatureVector, TrackFeatureExtractor, FEATURE_COUNT};
