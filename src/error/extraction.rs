// Extraction error types and constants

use crate::error::ErrorCode;
use crate::track::Attribute;
use log::{error, warn};
use std::fmt;

/// Extraction error code constants
///
/// Single source of truth for the codes written into batch failure reports.
///
/// Error code range: 3001-3005
pub struct ExtractionErrorCodes {}

impl ExtractionErrorCodes {
    /// An attribute series required for a statistic is empty
    pub const EMPTY_SERIES: i32 = 3001;

    /// A segment timbre vector does not have exactly 12 coordinates
    pub const MALFORMED_TIMBRE: i32 = 3002;

    /// A required attribute is absent from the input record
    pub const UNKNOWN_ATTRIBUTE: i32 = 3003;

    /// An attribute is present but holds a value of the wrong type
    pub const INVALID_VALUE: i32 = 3004;

    /// A statistic overflowed to a non-finite value
    pub const NON_FINITE_STATISTIC: i32 = 3005;
}

/// Log an extraction error with structured context
///
/// Malformed input is the caller's data problem rather than a pipeline
/// fault, so shaping errors are logged at warn level and statistics errors
/// at error level.
pub fn log_extraction_error(err: &ExtractionError, context: &str) {
    match err {
        ExtractionError::UnknownAttribute { .. } | ExtractionError::InvalidValue { .. } => {
            warn!(
                "Extraction error in {}: code={}, kind={}, message={}",
                context,
                err.code(),
                err.kind(),
                err.message()
            );
        }
        _ => {
            error!(
                "Extraction error in {}: code={}, kind={}, message={}",
                context,
                err.code(),
                err.kind(),
                err.message()
            );
        }
    }
}

/// Leaf error raised by the series statistics
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatsError {
    /// Mean, variance, median, min and max are undefined on an empty series
    EmptySeries,
    /// The result overflowed f64 (inf or NaN)
    NonFinite,
}

impl StatsError {
    /// Attach track and attribute context
    pub fn for_track(self, track_id: &str, attribute: Attribute) -> ExtractionError {
        match self {
            StatsError::EmptySeries => ExtractionError::EmptySeries {
                track_id: track_id.to_string(),
                attribute,
            },
            StatsError::NonFinite => ExtractionError::NonFiniteStatistic {
                track_id: track_id.to_string(),
                attribute,
            },
        }
    }
}

impl fmt::Display for StatsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StatsError::EmptySeries => write!(f, "statistic requested on an empty series"),
            StatsError::NonFinite => write!(f, "statistic is not finite"),
        }
    }
}

impl std::error::Error for StatsError {}

/// Leaf error raised by the timbre transposer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimbreError {
    /// The vector at `segment_index` has `len` coordinates instead of 12
    Malformed { segment_index: usize, len: usize },
}

impl TimbreError {
    /// Attach track context
    pub fn for_track(self, track_id: &str) -> ExtractionError {
        match self {
            TimbreError::Malformed { segment_index, len } => ExtractionError::MalformedTimbre {
                track_id: track_id.to_string(),
                segment_index,
                len,
            },
        }
    }
}

impl fmt::Display for TimbreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TimbreError::Malformed { segment_index, len } => write!(
                f,
                "timbre vector of segment {} has {} coordinates",
                segment_index, len
            ),
        }
    }
}

impl std::error::Error for TimbreError {}

/// Per-track extraction errors
///
/// Every variant names the track and the offending attribute so a batch
/// report can tell the caller exactly which raw record to refetch or drop.
///
/// Error code range: 3001-3005
#[derive(Debug, Clone, PartialEq)]
pub enum ExtractionError {
    /// An attribute series required for a statistic is empty
    EmptySeries { track_id: String, attribute: Attribute },

    /// A segment timbre vector does not have exactly 12 coordinates
    MalformedTimbre {
        track_id: String,
        segment_index: usize,
        len: usize,
    },

    /// A required attribute is absent from the input record
    UnknownAttribute { track_id: String, attribute: Attribute },

    /// An attribute value has the wrong type (`index` is the element
    /// position when the attribute is a series)
    InvalidValue {
        track_id: String,
        attribute: Attribute,
        index: Option<usize>,
    },

    /// A statistic over finite input overflowed to inf or NaN
    NonFiniteStatistic { track_id: String, attribute: Attribute },
}

impl ExtractionError {
    /// Identifier of the track the error belongs to
    pub fn track_id(&self) -> &str {
        match self {
            ExtractionError::EmptySeries { track_id, .. }
            | ExtractionError::MalformedTimbre { track_id, .. }
            | ExtractionError::UnknownAttribute { track_id, .. }
            | ExtractionError::InvalidValue { track_id, .. }
            | ExtractionError::NonFiniteStatistic { track_id, .. } => track_id,
        }
    }

    /// Stable kind name used in reports
    pub fn kind(&self) -> &'static str {
        match self {
            ExtractionError::EmptySeries { .. } => "EmptySeries",
            ExtractionError::MalformedTimbre { .. } => "MalformedTimbre",
            ExtractionError::UnknownAttribute { .. } => "UnknownAttribute",
            ExtractionError::InvalidValue { .. } => "InvalidValue",
            ExtractionError::NonFiniteStatistic { .. } => "NonFiniteStatistic",
        }
    }
}

impl ErrorCode for ExtractionError {
    fn code(&self) -> i32 {
        match self {
            ExtractionError::EmptySeries { .. } => ExtractionErrorCodes::EMPTY_SERIES,
            ExtractionError::MalformedTimbre { .. } => ExtractionErrorCodes::MALFORMED_TIMBRE,
            ExtractionError::UnknownAttribute { .. } => ExtractionErrorCodes::UNKNOWN_ATTRIBUTE,
            ExtractionError::InvalidValue { .. } => ExtractionErrorCodes::INVALID_VALUE,
            ExtractionError::NonFiniteStatistic { .. } => {
                ExtractionErrorCodes::NON_FINITE_STATISTIC
            }
        }
    }

    fn message(&self) -> String {
        match self {
            ExtractionError::EmptySeries {
                track_id,
                attribute,
            } => {
                format!("Track {}: attribute {} is empty", track_id, attribute)
            }
            ExtractionError::MalformedTimbre {
                track_id,
                segment_index,
                len,
            } => {
                format!(
                    "Track {}: segment {} timbre has {} coordinates, expected 12",
                    track_id, segment_index, len
                )
            }
            ExtractionError::UnknownAttribute {
                track_id,
                attribute,
            } => {
                format!("Track {}: attribute {} is missing", track_id, attribute)
            }
            ExtractionError::InvalidValue {
                track_id,
                attribute,
                index: Some(index),
            } => {
                format!(
                    "Track {}: attribute {} has an invalid value at index {}",
                    track_id, attribute, index
                )
            }
            ExtractionError::InvalidValue {
                track_id,
                attribute,
                index: None,
            } => {
                format!("Track {}: attribute {} has an invalid value", track_id, attribute)
            }
            ExtractionError::NonFiniteStatistic {
                track_id,
                attribute,
            } => {
                format!(
                    "Track {}: a statistic of attribute {} overflowed",
                    track_id, attribute
                )
            }
        }
    }
}

impl fmt::Display for ExtractionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "ExtractionError::{} (code {}): {}",
            self.kind(),
            self.code(),
            self.message()
        )
    }
}

impl std::error::Error for ExtractionError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extraction_error_codes() {
        assert_eq!(
            ExtractionError::EmptySeries {
                track_id: "t".to_string(),
                attribute: Attribute::Tempo,
            }
            .code(),
            ExtractionErrorCodes::EMPTY_SERIES
        );
        assert_eq!(
            ExtractionError::MalformedTimbre {
                track_id: "t".to_string(),
                segment_index: 0,
                len: 11,
            }
            .code(),
            ExtractionErrorCodes::MALFORMED_TIMBRE
        );
        assert_eq!(
            ExtractionError::UnknownAttribute {
                track_id: "t".to_string(),
                attribute: Attribute::Key,
            }
            .code(),
            ExtractionErrorCodes::UNKNOWN_ATTRIBUTE
        );
        assert_eq!(
            ExtractionError::InvalidValue {
                track_id: "t".to_string(),
                attribute: Attribute::Key,
                index: Some(1),
            }
            .code(),
            ExtractionErrorCodes::INVALID_VALUE
        );
    }

    #[test]
    fn test_extraction_error_messages() {
        let err = StatsError::EmptySeries.for_track("abc", Attribute::Loudness);
        assert_eq!(err.message(), "Track abc: attribute sections.loudness is empty");
        assert_eq!(err.track_id(), "abc");

        let err = TimbreError::Malformed {
            segment_index: 4,
            len: 11,
        }
        .for_track("abc");
        assert_eq!(
            err.message(),
            "Track abc: segment 4 timbre has 11 coordinates, expected 12"
        );

        let err = ExtractionError::UnknownAttribute {
            track_id: "abc".to_string(),
            attribute: Attribute::Segments,
        };
        assert!(err.message().contains("segments is missing"));

        let err = ExtractionError::InvalidValue {
            track_id: "abc".to_string(),
            attribute: Attribute::Mode,
            index: Some(2),
        };
        assert!(err.message().ends_with("at index 2"));

        let err = StatsError::NonFinite.for_track("abc", Attribute::LoudnessMaxTime);
        assert_eq!(err.code(), ExtractionErrorCodes::NON_FINITE_STATISTIC);
        assert_eq!(err.kind(), "NonFiniteStatistic");
        assert_eq!(
            err.message(),
            "Track abc: a statistic of attribute segments.loudness_max_time overflowed"
        );
    }

    #[test]
    fn test_extraction_error_display() {
        let err = ExtractionError::EmptySeries {
            track_id: "abc".to_string(),
            attribute: Attribute::Timbre,
        };
        let display = format!("{}", err);
        assert!(display.contains("ExtractionError::EmptySeries"));
        assert!(display.contains(&err.code().to_string()));
    }
}
