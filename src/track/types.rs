// Types module - Data structures for per-track analysis records
//
// A track analysis arrives as two ordered groups: sections (coarse
// structural spans) and segments (fine time slices). Both are stored
// column-wise so every attribute is an ordered series ready for the
// statistics in `analysis::series`.

use serde::Serialize;
use std::fmt;

/// Attributes of a track analysis record
///
/// Used to name the offending field in extraction errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Attribute {
    /// The section group as a whole
    Sections,
    /// The segment group as a whole
    Segments,
    Loudness,
    Mode,
    Key,
    TimeSignature,
    Tempo,
    LoudnessMaxTime,
    Timbre,
}

impl Attribute {
    /// Field name as it appears in the analysis JSON
    pub fn field_name(&self) -> &'static str {
        match self {
            Attribute::Sections => "sections",
            Attribute::Segments => "segments",
            Attribute::Loudness => "loudness",
            Attribute::Mode => "mode",
            Attribute::Key => "key",
            Attribute::TimeSignature => "time_signature",
            Attribute::Tempo => "tempo",
            Attribute::LoudnessMaxTime => "loudness_max_time",
            Attribute::Timbre => "timbre",
        }
    }

    /// Dotted path including the owning group, e.g. `sections.tempo`
    pub fn path(&self) -> &'static str {
        match self {
            Attribute::Sections => "sections",
            Attribute::Segments => "segments",
            Attribute::Loudness => "sections.loudness",
            Attribute::Mode => "sections.mode",
            Attribute::Key => "sections.key",
            Attribute::TimeSignature => "sections.time_signature",
            Attribute::Tempo => "sections.tempo",
            Attribute::LoudnessMaxTime => "segments.loudness_max_time",
            Attribute::Timbre => "segments.timbre",
        }
    }
}

impl fmt::Display for Attribute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path())
    }
}

/// One section as reported by the analysis service
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Section {
    /// Overall loudness in dB
    pub loudness: f64,
    /// 1 = major, 0 = minor, -1 = no result
    pub mode: i32,
    /// Pitch class 0..=11, or -1 when no key was detected
    pub key: i32,
    /// Beats per bar, 3..=7
    pub time_signature: i32,
    /// Beats per minute
    pub tempo: f64,
}

/// One segment as reported by the analysis service
#[derive(Debug, Clone, PartialEq)]
pub struct Segment {
    /// Offset of the loudness peak within the segment, in seconds
    pub loudness_max_time: f64,
    /// Timbre coefficients, expected to hold 12 values
    pub timbre: Vec<f64>,
}

/// Section attributes, one ordered series per attribute
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SectionSeries {
    pub loudness: Vec<f64>,
    pub mode: Vec<i32>,
    pub key: Vec<i32>,
    pub time_signature: Vec<i32>,
    pub tempo: Vec<f64>,
}

/// Segment attributes, one ordered series per attribute
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SegmentSeries {
    pub loudness_max_time: Vec<f64>,
    /// One timbre vector per segment, in segment order
    pub timbre: Vec<Vec<f64>>,
}

/// Column-wise analysis record for a single track
///
/// Read-only input to the feature extractor. Section and segment counts
/// are independent of each other.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TrackAnalysis {
    pub sections: SectionSeries,
    pub segments: SegmentSeries,
}

impl TrackAnalysis {
    /// Group per-section and per-segment records into column-wise series
    pub fn from_rows(sections: &[Section], segments: &[Segment]) -> Self {
        let sections = SectionSeries {
            loudness: sections.iter().map(|s| s.loudness).collect(),
            mode: sections.iter().map(|s| s.mode).collect(),
            key: sections.iter().map(|s| s.key).collect(),
            time_signature: sections.iter().map(|s| s.time_signature).collect(),
            tempo: sections.iter().map(|s| s.tempo).collect(),
        };
        let segments = SegmentSeries {
            loudness_max_time: segments.iter().map(|s| s.loudness_max_time).collect(),
            timbre: segments.iter().map(|s| s.timbre.clone()).collect(),
        };

        Self { sections, segments }
    }

    /// Number of sections (length of the loudness series)
    pub fn section_count(&self) -> usize {
        self.sections.loudness.len()
    }

    /// Number of segments (length of the loudness_max_time series)
    pub fn segment_count(&self) -> usize {
        self.segments.loudness_max_time.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_rows_groups_columns_in_order() {
        let sections = [
            Section {
                loudness: -5.0,
                mode: 1,
                key: 7,
                time_signature: 4,
                tempo: 120.0,
            },
            Section {
                loudness: -6.5,
                mode: 0,
                key: 2,
                time_signature: 3,
                tempo: 118.5,
            },
        ];
        let segments = [Segment {
            loudness_max_time: 0.04,
            timbre: vec![1.0; 12],
        }];

        let analysis = TrackAnalysis::from_rows(&sections, &segments);
        assert_eq!(analysis.sections.loudness, vec![-5.0, -6.5]);
        assert_eq!(analysis.sections.mode, vec![1, 0]);
        assert_eq!(analysis.sections.key, vec![7, 2]);
        assert_eq!(analysis.sections.time_signature, vec![4, 3]);
        assert_eq!(analysis.sections.tempo, vec![120.0, 118.5]);
        assert_eq!(analysis.section_count(), 2);
        assert_eq!(analysis.segment_count(), 1);
        assert_eq!(analysis.segments.timbre[0].len(), 12);
    }

    #[test]
    fn test_attribute_paths() {
        assert_eq!(Attribute::TimeSignature.field_name(), "time_signature");
        assert_eq!(Attribute::TimeSignature.to_string(), "sections.time_signature");
        assert_eq!(Attribute::Timbre.to_string(), "segments.timbre");
    }
}
