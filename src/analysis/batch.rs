// Batch module - feature extraction over a collection of tracks
//
// FeatureBatchAssembler runs the extractor on every (track id, analysis)
// pair on a rayon pool and gathers the results into a FeatureTable keyed by
// track id. Outcomes are collected in input order before any policy is
// applied, so the table, the failure list and the strict-mode error are
// the same for every worker count.
//
// Policies:
// - CollectAndReport (default): failing tracks are listed next to the table
// - FailFast: the first failing track in input order aborts the batch
//
// Duplicate track ids: last write wins. The later features replace the
// earlier row in place and the id is listed in `overwritten`.

use std::collections::HashMap;

use rayon::prelude::*;
use serde::ser::{Serialize, SerializeMap, SerializeSeq, Serializer};

use super::features::{feature_names, FeatureVector, TrackFeatureExtractor};
use crate::config::AppConfig;
use crate::error::{log_extraction_error, BatchError, ErrorCode, ExtractionError};
use crate::track::{ShapedTrack, TrackAnalysis};

/// How per-track failures affect the batch
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BatchPolicy {
    /// Isolate failures; report them alongside the extracted rows
    #[default]
    CollectAndReport,
    /// Abort on the first failing track (strict mode)
    FailFast,
}

/// One table row: a track id and its features
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureRow {
    pub track_id: String,
    pub features: FeatureVector,
}

/// Serialized as `{"id": .., <86 features>}`
impl Serialize for FeatureRow {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let entries = self.features.entries();
        let mut map = serializer.serialize_map(Some(entries.len() + 1))?;
        map.serialize_entry("id", &self.track_id)?;
        for (name, value) in entries {
            map.serialize_entry(name, &value)?;
        }
        map.end()
    }
}

/// Ordered feature rows with unique track ids
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FeatureTable {
    rows: Vec<FeatureRow>,
    index: HashMap<String, usize>,
}

impl FeatureTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a row
    ///
    /// # Returns
    /// The replaced features when `track_id` was already present. The row
    /// keeps its original position.
    pub fn insert(&mut self, track_id: String, features: FeatureVector) -> Option<FeatureVector> {
        match self.index.get(&track_id) {
            Some(&position) => Some(std::mem::replace(
                &mut self.rows[position].features,
                features,
            )),
            None => {
                self.index.insert(track_id.clone(), self.rows.len());
                self.rows.push(FeatureRow { track_id, features });
                None
            }
        }
    }

    pub fn get(&self, track_id: &str) -> Option<&FeatureVector> {
        self.index
            .get(track_id)
            .map(|&position| &self.rows[position].features)
    }

    pub fn contains(&self, track_id: &str) -> bool {
        self.index.contains_key(track_id)
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn rows(&self) -> &[FeatureRow] {
        &self.rows
    }

    pub fn track_ids(&self) -> impl Iterator<Item = &str> {
        self.rows.iter().map(|row| row.track_id.as_str())
    }

    /// `id` followed by the feature columns in schema order
    pub fn column_names() -> Vec<&'static str> {
        std::iter::once("id")
            .chain(feature_names().iter().map(String::as_str))
            .collect()
    }
}

impl Serialize for FeatureTable {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut seq = serializer.serialize_seq(Some(self.rows.len()))?;
        for row in &self.rows {
            seq.serialize_element(row)?;
        }
        seq.end()
    }
}

/// A track that could not be turned into a feature row
#[derive(Debug, Clone, PartialEq)]
pub struct TrackFailure {
    pub track_id: String,
    pub error: ExtractionError,
}

/// Serialized as `{"id", "kind", "code", "message"}`
impl Serialize for TrackFailure {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(4))?;
        map.serialize_entry("id", &self.track_id)?;
        map.serialize_entry("kind", self.error.kind())?;
        map.serialize_entry("code", &self.error.code())?;
        map.serialize_entry("message", &self.error.message())?;
        map.end()
    }
}

/// Result of a batch run
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BatchReport {
    pub table: FeatureTable,
    /// Failed tracks in input order (always empty under FailFast)
    pub failures: Vec<TrackFailure>,
    /// Track ids whose earlier row was replaced by a later duplicate
    pub overwritten: Vec<String>,
}

impl BatchReport {
    /// True when every track produced a row
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }
}

type Outcome = (String, Result<FeatureVector, ExtractionError>);

/// FeatureBatchAssembler applies the extractor to a collection of tracks
pub struct FeatureBatchAssembler {
    extractor: TrackFeatureExtractor,
    policy: BatchPolicy,
    worker_threads: Option<usize>,
}

impl FeatureBatchAssembler {
    /// Create an assembler with the collect-and-report policy on the
    /// global rayon pool
    pub fn new(extractor: TrackFeatureExtractor) -> Self {
        Self {
            extractor,
            policy: BatchPolicy::default(),
            worker_threads: None,
        }
    }

    pub fn from_config(config: &AppConfig) -> Self {
        let policy = if config.batch.strict {
            BatchPolicy::FailFast
        } else {
            BatchPolicy::CollectAndReport
        };
        Self::new(TrackFeatureExtractor::from_config(&config.extraction))
            .with_policy(policy)
            .with_worker_threads(config.batch.worker_threads)
    }

    pub fn with_policy(mut self, policy: BatchPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Run on a dedicated pool of `threads` workers instead of the global
    /// pool (`None` or `Some(0)` keeps the global pool)
    pub fn with_worker_threads(mut self, threads: Option<usize>) -> Self {
        self.worker_threads = threads.filter(|&n| n > 0);
        self
    }

    pub fn policy(&self) -> BatchPolicy {
        self.policy
    }

    pub fn extractor(&self) -> &TrackFeatureExtractor {
        &self.extractor
    }

    /// Extract features for every track
    ///
    /// # Errors
    /// * `TrackFailed` - FailFast policy and at least one track failed
    /// * `ThreadPool` - the dedicated worker pool could not be built
    pub fn assemble(&self, tracks: &[(String, TrackAnalysis)]) -> Result<BatchReport, BatchError> {
        let outcomes = self.run(tracks, |(track_id, analysis)| {
            (track_id.clone(), self.extractor.extract(track_id, analysis))
        })?;
        self.collect(outcomes)
    }

    /// Extract features for tracks that went through record shaping
    ///
    /// Shaping failures are handled exactly like extraction failures.
    pub fn assemble_shaped(&self, tracks: &[ShapedTrack]) -> Result<BatchReport, BatchError> {
        let outcomes = self.run(tracks, |(track_id, shaped)| {
            let outcome = match shaped {
                Ok(analysis) => self.extractor.extract(track_id, analysis),
                Err(err) => Err(err.clone()),
            };
            (track_id.clone(), outcome)
        })?;
        self.collect(outcomes)
    }

    fn run<T, F>(&self, items: &[T], extract: F) -> Result<Vec<Outcome>, BatchError>
    where
        T: Sync,
        F: Fn(&T) -> Outcome + Sync + Send,
    {
        match self.worker_threads {
            Some(threads) => {
                let pool = rayon::ThreadPoolBuilder::new()
                    .num_threads(threads)
                    .build()
                    .map_err(|err| BatchError::ThreadPool {
                        reason: err.to_string(),
                    })?;
                tracing::debug!("[Batch] running on a dedicated pool of {} workers", threads);
                Ok(pool.install(|| items.par_iter().map(&extract).collect()))
            }
            None => Ok(items.par_iter().map(&extract).collect()),
        }
    }

    fn collect(&self, outcomes: Vec<Outcome>) -> Result<BatchReport, BatchError> {
        let total = outcomes.len();
        let mut report = BatchReport::default();

        for (track_id, outcome) in outcomes {
            match outcome {
                Ok(features) => {
                    if report.table.insert(track_id.clone(), features).is_some() {
                        tracing::warn!(
                            "[Batch] duplicate track id {}, keeping the later row",
                            track_id
                        );
                        report.overwritten.push(track_id);
                    }
                }
                Err(error) => {
                    log_extraction_error(&error, "FeatureBatchAssembler");
                    if self.policy == BatchPolicy::FailFast {
                        return Err(BatchError::TrackFailed { source: error });
                    }
                    report.failures.push(TrackFailure { track_id, error });
                }
            }
        }

        tracing::info!(
            "[Batch] {} tracks: {} extracted, {} failed, {} overwritten",
            total,
            report.table.len(),
            report.failures.len(),
            report.overwritten.len()
        );

        Ok(report)
    }
}

#[cfg(test)]
#[path = "batch_tests.rs"]
mod tests;
