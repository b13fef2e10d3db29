// Sections module - features over section attribute series
//
// Loudness and tempo are summarised over the whole series and over a
// trailing window ("last five" sections by default). Key gets order
// statistics and decrease counts; mode and time signature get moments only.

use super::types::{
    KeyFeatures, LoudnessFeatures, ModeFeatures, TempoFeatures, TimeSignatureFeatures,
};
use crate::analysis::series::{
    contains_value, decrease_count, max, mean, median, min, trailing_window, variance,
};
use crate::error::{ExtractionError, StatsError};
use crate::track::{Attribute, SectionSeries};

/// Section feature computation functions
pub struct SectionFeatures {
    trailing_window: usize,
}

impl SectionFeatures {
    /// Create a new section features processor
    ///
    /// # Arguments
    /// * `trailing_window` - Number of trailing sections used for `last_*` features
    pub fn new(trailing_window: usize) -> Self {
        Self { trailing_window }
    }

    pub fn compute_loudness(
        &self,
        track_id: &str,
        sections: &SectionSeries,
    ) -> Result<LoudnessFeatures, ExtractionError> {
        let series = &sections.loudness;
        let last = trailing_window(series, self.trailing_window);
        let context = |err: StatsError| err.for_track(track_id, Attribute::Loudness);

        Ok(LoudnessFeatures {
            mean: mean(series).map_err(context)?,
            var: variance(series).map_err(context)?,
            last_mean: mean(last).map_err(context)?,
            last_var: variance(last).map_err(context)?,
            last_decrease: decrease_count(last),
        })
    }

    pub fn compute_mode(
        &self,
        track_id: &str,
        sections: &SectionSeries,
    ) -> Result<ModeFeatures, ExtractionError> {
        let series = &sections.mode;
        let context = |err: StatsError| err.for_track(track_id, Attribute::Mode);

        Ok(ModeFeatures {
            mean: mean(series).map_err(context)?,
            var: variance(series).map_err(context)?,
        })
    }

    /// Key order statistics and trend
    ///
    /// The whole-series decrease count and the trailing-window decrease
    /// count are both reported; no moments are computed for key.
    pub fn compute_key(
        &self,
        track_id: &str,
        sections: &SectionSeries,
    ) -> Result<KeyFeatures, ExtractionError> {
        let series = &sections.key;
        let last = trailing_window(series, self.trailing_window);
        let context = |err: StatsError| err.for_track(track_id, Attribute::Key);

        Ok(KeyFeatures {
            min: min(series).map_err(context)?,
            max: max(series).map_err(context)?,
            median: median(series).map_err(context)?,
            decrease: decrease_count(series),
            last_decrease: decrease_count(last),
        })
    }

    pub fn compute_time_signature(
        &self,
        track_id: &str,
        sections: &SectionSeries,
    ) -> Result<TimeSignatureFeatures, ExtractionError> {
        let series = &sections.time_signature;
        let context =
            |err: StatsError| err.for_track(track_id, Attribute::TimeSignature);

        Ok(TimeSignatureFeatures {
            mean: mean(series).map_err(context)?,
            var: variance(series).map_err(context)?,
            has_3: contains_value(series, 3),
        })
    }

    pub fn compute_tempo(
        &self,
        track_id: &str,
        sections: &SectionSeries,
    ) -> Result<TempoFeatures, ExtractionError> {
        let series = &sections.tempo;
        let last = trailing_window(series, self.trailing_window);
        let context = |err: StatsError| err.for_track(track_id, Attribute::Tempo);

        Ok(TempoFeatures {
            mean: mean(series).map_err(context)?,
            var: variance(series).map_err(context)?,
            last_mean: mean(last).map_err(context)?,
            last_var: variance(last).map_err(context)?,
            decrease: decrease_count(series),
            last_decrease: decrease_count(last),
        })
    }
}
