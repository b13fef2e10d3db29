// Types module - Data structures for track features
//
// A FeatureVector is a set of typed feature groups, one per attribute, plus
// one group per timbre basis. The flat name/value view used for tables and
// reports is generated from these groups in schema order.

use serde::ser::{Serialize, SerializeMap, Serializer};

use super::schema::{
    feature_index, feature_names, BASIS_STATISTICS, FEATURE_COUNT, TIMBRE_OFFSET,
};
use crate::analysis::timbre::TIMBRE_DIMENSIONS;

/// A single scalar feature value
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize)]
#[serde(untagged)]
pub enum FeatureValue {
    Float(f64),
    Int(i64),
    Bool(bool),
}

impl FeatureValue {
    /// Numeric view; booleans map to 0.0 / 1.0
    pub fn as_f64(&self) -> f64 {
        match *self {
            FeatureValue::Float(value) => value,
            FeatureValue::Int(value) => value as f64,
            FeatureValue::Bool(value) => {
                if value {
                    1.0
                } else {
                    0.0
                }
            }
        }
    }
}

impl From<f64> for FeatureValue {
    fn from(value: f64) -> Self {
        FeatureValue::Float(value)
    }
}

impl From<i32> for FeatureValue {
    fn from(value: i32) -> Self {
        FeatureValue::Int(value as i64)
    }
}

impl From<usize> for FeatureValue {
    fn from(value: usize) -> Self {
        FeatureValue::Int(value as i64)
    }
}

impl From<bool> for FeatureValue {
    fn from(value: bool) -> Self {
        FeatureValue::Bool(value)
    }
}

/// Section loudness in dB, whole series and trailing window
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LoudnessFeatures {
    pub mean: f64,
    pub var: f64,
    pub last_mean: f64,
    pub last_var: f64,
    /// Strict decreases inside the trailing window
    pub last_decrease: usize,
}

/// Section modality (1 major, 0 minor, -1 no result)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ModeFeatures {
    pub mean: f64,
    pub var: f64,
}

/// Section key as pitch class
///
/// Only key and tempo carry a whole-series decrease count.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct KeyFeatures {
    pub min: i32,
    pub max: i32,
    pub median: f64,
    pub decrease: usize,
    pub last_decrease: usize,
}

/// Section time signature (beats per bar)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimeSignatureFeatures {
    pub mean: f64,
    pub var: f64,
    /// Whether any section is in 3/4
    pub has_3: bool,
}

/// Section tempo in BPM, whole series and trailing window
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TempoFeatures {
    pub mean: f64,
    pub var: f64,
    pub last_mean: f64,
    pub last_var: f64,
    pub decrease: usize,
    pub last_decrease: usize,
}

/// Segment attack, from the loudness peak offset in seconds
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AttackFeatures {
    pub min: f64,
    pub max: f64,
    pub mean: f64,
    pub var: f64,
    /// Sum of squared peak offsets
    pub square: f64,
}

/// Statistics of one timbre basis across all segments
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BasisFeatures {
    pub mean: f64,
    pub var: f64,
    pub median: f64,
    pub min: f64,
    pub max: f64,
}

/// All features of one track
///
/// Every track yields the same 86 features regardless of its length.
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureVector {
    pub loudness: LoudnessFeatures,
    pub mode: ModeFeatures,
    pub key: KeyFeatures,
    pub time_signature: TimeSignatureFeatures,
    pub tempo: TempoFeatures,
    pub attack: AttackFeatures,
    /// Basis 1 is at index 0
    pub timbre: [BasisFeatures; TIMBRE_DIMENSIONS],
}

impl FeatureVector {
    /// Feature values in schema order
    pub fn values(&self) -> Vec<FeatureValue> {
        (0..FEATURE_COUNT)
            .filter_map(|index| self.value_at(index))
            .collect()
    }

    /// Value of the feature at `index` in schema order
    pub fn value_at(&self, index: usize) -> Option<FeatureValue> {
        let value: FeatureValue = match index {
            0 => self.loudness.mean.into(),
            1 => self.loudness.var.into(),
            2 => self.loudness.last_mean.into(),
            3 => self.loudness.last_var.into(),
            4 => self.loudness.last_decrease.into(),
            5 => self.mode.mean.into(),
            6 => self.mode.var.into(),
            7 => self.key.min.into(),
            8 => self.key.max.into(),
            9 => self.key.median.into(),
            10 => self.key.decrease.into(),
            11 => self.key.last_decrease.into(),
            12 => self.time_signature.mean.into(),
            13 => self.time_signature.var.into(),
            14 => self.time_signature.has_3.into(),
            15 => self.tempo.mean.into(),
            16 => self.tempo.var.into(),
            17 => self.tempo.last_mean.into(),
            18 => self.tempo.last_var.into(),
            19 => self.tempo.decrease.into(),
            20 => self.tempo.last_decrease.into(),
            21 => self.attack.min.into(),
            22 => self.attack.max.into(),
            23 => self.attack.mean.into(),
            24 => self.attack.var.into(),
            25 => self.attack.square.into(),
            _ if index < FEATURE_COUNT => {
                let offset = index - TIMBRE_OFFSET;
                let basis = &self.timbre[offset / BASIS_STATISTICS.len()];
                match offset % BASIS_STATISTICS.len() {
                    0 => basis.mean.into(),
                    1 => basis.var.into(),
                    2 => basis.median.into(),
                    3 => basis.min.into(),
                    _ => basis.max.into(),
                }
            }
            _ => return None,
        };
        Some(value)
    }

    /// (name, value) pairs in schema order
    pub fn entries(&self) -> Vec<(&'static str, FeatureValue)> {
        feature_names()
            .iter()
            .map(String::as_str)
            .zip(self.values())
            .collect()
    }

    /// Look up a feature by column name
    pub fn get(&self, name: &str) -> Option<FeatureValue> {
        self.value_at(feature_index(name)?)
    }

    /// Statistics of a timbre basis by its 1-based index
    pub fn basis(&self, basis: usize) -> Option<&BasisFeatures> {
        basis.checked_sub(1).and_then(|index| self.timbre.get(index))
    }
}

/// Serialized as a flat map in schema order
impl Serialize for FeatureVector {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let entries = self.entries();
        let mut map = serializer.serialize_map(Some(entries.len()))?;
        for (name, value) in entries {
            map.serialize_entry(name, &value)?;
        }
        map.end()
    }
}
