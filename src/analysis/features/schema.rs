// Schema module - the fixed, ordered list of feature column names
//
// Names match the column headers of the existing feature dataset so the
// output joins with metadata tables built from it. The order here is the
// order of `FeatureVector::values()`.

use once_cell::sync::Lazy;
use std::collections::HashMap;

use crate::analysis::timbre::TIMBRE_DIMENSIONS;

/// Number of features produced per track
pub const FEATURE_COUNT: usize = 86;

pub(crate) const LOUDNESS_FEATURES: [&str; 5] = [
    "loudness_mean",
    "loudness_var",
    "last_loudness_mean",
    "last_loudness_var",
    "last_loudness_decrease",
];

pub(crate) const MODE_FEATURES: [&str; 2] = ["mode_mean", "mode_var"];

pub(crate) const KEY_FEATURES: [&str; 5] = [
    "key_min",
    "key_max",
    "key_median",
    "key_decrease",
    "last_key_decrease",
];

pub(crate) const TIME_SIGNATURE_FEATURES: [&str; 3] = [
    "time_signature_mean",
    "time_signature_var",
    "time_signature_has_3",
];

pub(crate) const TEMPO_FEATURES: [&str; 6] = [
    "tempo_mean",
    "tempo_var",
    "last_tempo_mean",
    "last_tempo_var",
    "tempo_decrease",
    "last_tempo_decrease",
];

pub(crate) const ATTACK_FEATURES: [&str; 5] = [
    "loudness_maxTime_min",
    "loudness_maxTime_max",
    "loudness_maxTime_mean",
    "loudness_maxTime_var",
    "loudness_maxTime_square",
];

/// Position of `Basis1_mean`; the scalar groups come first
pub(crate) const TIMBRE_OFFSET: usize = LOUDNESS_FEATURES.len()
    + MODE_FEATURES.len()
    + KEY_FEATURES.len()
    + TIME_SIGNATURE_FEATURES.len()
    + TEMPO_FEATURES.len()
    + ATTACK_FEATURES.len();

/// Statistic suffixes applied to every timbre basis
pub(crate) const BASIS_STATISTICS: [&str; 5] = ["mean", "var", "median", "min", "max"];

static FEATURE_NAMES: Lazy<Vec<String>> = Lazy::new(|| {
    let mut names: Vec<String> = LOUDNESS_FEATURES
        .iter()
        .chain(MODE_FEATURES.iter())
        .chain(KEY_FEATURES.iter())
        .chain(TIME_SIGNATURE_FEATURES.iter())
        .chain(TEMPO_FEATURES.iter())
        .chain(ATTACK_FEATURES.iter())
        .map(|name| name.to_string())
        .collect();

    for basis in 1..=TIMBRE_DIMENSIONS {
        for statistic in BASIS_STATISTICS {
            names.push(format!("Basis{basis}_{statistic}"));
        }
    }

    names
});

static FEATURE_INDEX: Lazy<HashMap<&'static str, usize>> = Lazy::new(|| {
    FEATURE_NAMES
        .iter()
        .enumerate()
        .map(|(index, name)| (name.as_str(), index))
        .collect()
});

/// All feature names in output order
pub fn feature_names() -> &'static [String] {
    &FEATURE_NAMES
}

/// Position of a feature name in output order
pub fn feature_index(name: &str) -> Option<usize> {
    FEATURE_INDEX.get(name).copied()
}
