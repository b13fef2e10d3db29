// TrackFeatureExtractor - fixed-width feature vectors from track analyses
//
// This module reduces one track's variable-length section and segment
// series to 86 named scalar features. Every reduction is an order
// statistic, a central moment or a monotonic-trend count.
//
// Module organization:
// - types: FeatureVector and its per-group structs
// - schema: ordered feature column names
// - sections: loudness, mode, key, time signature and tempo features
// - segments: attack and per-basis timbre features
// - mod.rs: Coordinator (TrackFeatureExtractor)
//
// Feature groups:
// 1. Loudness: mean/variance over all sections and the trailing window,
//    decrease count in the trailing window
// 2. Mode: mean/variance
// 3. Key: min/max/median, decrease count over all sections and the window
// 4. Time signature: mean/variance, whether 3/4 occurs
// 5. Tempo: as loudness, plus a whole-series decrease count
// 6. Attack: min/max/mean/variance/sum of squares of loudness_max_time
// 7. Timbre: mean/variance/median/min/max for each of the 12 bases

mod schema;
mod sections;
mod segments;
mod types;

pub use schema::{feature_index, feature_names, FEATURE_COUNT};
pub use types::{
    AttackFeatures, BasisFeatures, FeatureValue, FeatureVector, KeyFeatures, LoudnessFeatures,
    ModeFeatures, TempoFeatures, TimeSignatureFeatures,
};

use sections::SectionFeatures;
use segments::SegmentFeatures;

use crate::config::ExtractionConfig;
use crate::error::ExtractionError;
use crate::track::TrackAnalysis;

/// Number of trailing sections used for the `last_*` features
pub const DEFAULT_TRAILING_WINDOW: usize = 5;

/// TrackFeatureExtractor coordinates the feature extraction pipeline
///
/// Holds no per-track state: one extractor can be shared across worker
/// threads and `extract` is a pure function of its input.
pub struct TrackFeatureExtractor {
    section_features: SectionFeatures,
    segment_features: SegmentFeatures,
    trailing_window: usize,
}

impl TrackFeatureExtractor {
    /// Create a new TrackFeatureExtractor
    ///
    /// # Arguments
    /// * `trailing_window` - Sections in the "last" window; 0 is raised to 1
    pub fn new(trailing_window: usize) -> Self {
        let trailing_window = if trailing_window == 0 {
            log::warn!("[Extractor] trailing window of 0 sections requested, using 1");
            1
        } else {
            trailing_window
        };

        Self {
            section_features: SectionFeatures::new(trailing_window),
            segment_features: SegmentFeatures::new(),
            trailing_window,
        }
    }

    pub fn from_config(config: &ExtractionConfig) -> Self {
        Self::new(config.trailing_window)
    }

    pub fn trailing_window(&self) -> usize {
        self.trailing_window
    }

    /// Extract all features from one track analysis
    ///
    /// # Arguments
    /// * `track_id` - Identifier used in error reports
    /// * `analysis` - The track's section and segment series
    ///
    /// # Returns
    /// FeatureVector with all 86 features
    ///
    /// # Errors
    /// The first empty attribute series or malformed timbre vector, in
    /// feature-group order. No default is substituted.
    pub fn extract(
        &self,
        track_id: &str,
        analysis: &TrackAnalysis,
    ) -> Result<FeatureVector, ExtractionError> {
        let sections = &analysis.sections;
        let segments = &analysis.segments;

        let loudness = self.section_features.compute_loudness(track_id, sections)?;
        let mode = self.section_features.compute_mode(track_id, sections)?;
        let key = self.section_features.compute_key(track_id, sections)?;
        let time_signature = self
            .section_features
            .compute_time_signature(track_id, sections)?;
        let tempo = self.section_features.compute_tempo(track_id, sections)?;

        let attack = self.segment_features.compute_attack(track_id, segments)?;
        let timbre = self.segment_features.compute_timbre(track_id, segments)?;

        tracing::debug!(
            "[Extractor] track {}: {} sections, {} segments",
            track_id,
            analysis.section_count(),
            analysis.segment_count()
        );

        Ok(FeatureVector {
            loudness,
            mode,
            key,
            time_signature,
            tempo,
            attack,
            timbre,
        })
    }
}

impl Default for TrackFeatureExtractor {
    fn default() -> Self {
        Self::new(DEFAULT_TRAILING_WINDOW)
    }
}
