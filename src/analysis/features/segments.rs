// Segments module - features over segment attribute series
//
// Attack features summarise the loudness peak offset of every segment.
// Timbre features are computed per basis function after transposing the
// segment timbre vectors; only order-independent statistics are used here.

use super::types::{AttackFeatures, BasisFeatures};
use crate::analysis::series::{max, mean, median, min, sum_of_squares, variance};
use crate::analysis::timbre::{self, TIMBRE_DIMENSIONS};
use crate::error::{ExtractionError, StatsError};
use crate::track::{Attribute, SegmentSeries};

/// Segment feature computation functions
pub struct SegmentFeatures;

impl SegmentFeatures {
    pub fn new() -> Self {
        Self
    }

    /// Attack features from `loudness_max_time`
    ///
    /// `square` is the sum of squared offsets, not a mean.
    pub fn compute_attack(
        &self,
        track_id: &str,
        segments: &SegmentSeries,
    ) -> Result<AttackFeatures, ExtractionError> {
        let series = &segments.loudness_max_time;
        let context = |err: StatsError| err.for_track(track_id, Attribute::LoudnessMaxTime);

        Ok(AttackFeatures {
            min: min(series).map_err(context)?,
            max: max(series).map_err(context)?,
            mean: mean(series).map_err(context)?,
            var: variance(series).map_err(context)?,
            square: sum_of_squares(series).map_err(context)?,
        })
    }

    /// Per-basis timbre statistics
    ///
    /// # Errors
    /// * `MalformedTimbre` - a segment vector is not 12 long
    /// * `EmptySeries` - the track has no timbre vectors
    pub fn compute_timbre(
        &self,
        track_id: &str,
        segments: &SegmentSeries,
    ) -> Result<[BasisFeatures; TIMBRE_DIMENSIONS], ExtractionError> {
        let bases = timbre::transpose(&segments.timbre).map_err(|err| err.for_track(track_id))?;
        let context = |err: StatsError| err.for_track(track_id, Attribute::Timbre);

        let mut features = [BasisFeatures {
            mean: 0.0,
            var: 0.0,
            median: 0.0,
            min: 0.0,
            max: 0.0,
        }; TIMBRE_DIMENSIONS];

        for (slot, basis) in features.iter_mut().zip(bases.iter()) {
            *slot = BasisFeatures {
                mean: mean(basis).map_err(context)?,
                var: variance(basis).map_err(context)?,
                median: median(basis).map_err(context)?,
                min: min(basis).map_err(context)?,
                max: max(basis).map_err(context)?,
            };
        }

        Ok(features)
    }
}

impl Default for SegmentFeatures {
    fn default() -> Self {
        Self::new()
    }
}
