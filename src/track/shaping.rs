// Shaping module - turn analysis JSON into column-wise TrackAnalysis records
//
// Two input shapes are accepted for both `sections` and `segments`:
// - row form: an array of objects, one per section/segment, as returned by
//   the analysis service (extra fields are ignored)
// - columnar form: an object of arrays, one per attribute, as written by an
//   earlier cleaning pass

use serde_json::{Map, Value};

use super::types::{Attribute, SectionSeries, SegmentSeries, TrackAnalysis};
use crate::error::ExtractionError;

/// A track identifier paired with its shaping outcome
pub type ShapedTrack = (String, Result<TrackAnalysis, ExtractionError>);

impl TrackAnalysis {
    /// Shape one track's analysis JSON into a TrackAnalysis
    ///
    /// # Errors
    /// * `UnknownAttribute` - `sections`, `segments` or one of their
    ///   attributes is absent
    /// * `InvalidValue` - a value has the wrong JSON type, or the columns
    ///   of a group have different lengths
    pub fn from_json(track_id: &str, value: &Value) -> Result<Self, ExtractionError> {
        let sections = group(track_id, value, Attribute::Sections)?;
        let segments = group(track_id, value, Attribute::Segments)?;

        let sections = SectionSeries {
            loudness: column(track_id, sections, Attribute::Sections, Attribute::Loudness, float)?,
            mode: column(track_id, sections, Attribute::Sections, Attribute::Mode, int)?,
            key: column(track_id, sections, Attribute::Sections, Attribute::Key, int)?,
            time_signature: column(
                track_id,
                sections,
                Attribute::Sections,
                Attribute::TimeSignature,
                int,
            )?,
            tempo: column(track_id, sections, Attribute::Sections, Attribute::Tempo, float)?,
        };
        let segments = SegmentSeries {
            loudness_max_time: column(
                track_id,
                segments,
                Attribute::Segments,
                Attribute::LoudnessMaxTime,
                float,
            )?,
            timbre: column(track_id, segments, Attribute::Segments, Attribute::Timbre, vector)?,
        };

        aligned(
            track_id,
            &[
                (Attribute::Loudness, sections.loudness.len()),
                (Attribute::Mode, sections.mode.len()),
                (Attribute::Key, sections.key.len()),
                (Attribute::TimeSignature, sections.time_signature.len()),
                (Attribute::Tempo, sections.tempo.len()),
            ],
        )?;
        aligned(
            track_id,
            &[
                (Attribute::LoudnessMaxTime, segments.loudness_max_time.len()),
                (Attribute::Timbre, segments.timbre.len()),
            ],
        )?;

        Ok(Self { sections, segments })
    }
}

/// Shape every `{track_id: analysis}` entry of a collection
///
/// Entries come back ordered by track id. A shaping failure is kept next to
/// its id so it can be reported with the extraction failures.
pub fn load_collection(collection: &Map<String, Value>) -> Vec<ShapedTrack> {
    let mut shaped: Vec<ShapedTrack> = collection
        .iter()
        .map(|(track_id, value)| (track_id.clone(), TrackAnalysis::from_json(track_id, value)))
        .collect();
    shaped.sort_by(|a, b| a.0.cmp(&b.0));
    shaped
}

fn group<'a>(
    track_id: &str,
    value: &'a Value,
    attribute: Attribute,
) -> Result<&'a Value, ExtractionError> {
    let record = value
        .as_object()
        .ok_or_else(|| invalid(track_id, attribute, None))?;
    record
        .get(attribute.field_name())
        .ok_or_else(|| unknown(track_id, attribute))
}

fn column<T>(
    track_id: &str,
    container: &Value,
    group: Attribute,
    attribute: Attribute,
    parse: fn(&Value) -> Option<T>,
) -> Result<Vec<T>, ExtractionError> {
    match container {
        Value::Array(rows) => rows
            .iter()
            .enumerate()
            .map(|(index, row)| {
                let row = row
                    .as_object()
                    .ok_or_else(|| invalid(track_id, group, Some(index)))?;
                let value = row
                    .get(attribute.field_name())
                    .ok_or_else(|| unknown(track_id, attribute))?;
                parse(value).ok_or_else(|| invalid(track_id, attribute, Some(index)))
            })
            .collect(),
        Value::Object(columns) => {
            let series = columns
                .get(attribute.field_name())
                .ok_or_else(|| unknown(track_id, attribute))?
                .as_array()
                .ok_or_else(|| invalid(track_id, attribute, None))?;
            series
                .iter()
                .enumerate()
                .map(|(index, value)| {
                    parse(value).ok_or_else(|| invalid(track_id, attribute, Some(index)))
                })
                .collect()
        }
        _ => Err(invalid(track_id, group, None)),
    }
}

// Every column of a group describes the same sections (or segments), so all
// lengths must equal the first column's.
fn aligned(track_id: &str, columns: &[(Attribute, usize)]) -> Result<(), ExtractionError> {
    let Some((_, expected)) = columns.first() else {
        return Ok(());
    };
    match columns.iter().find(|(_, len)| len != expected) {
        Some(&(attribute, _)) => Err(invalid(track_id, attribute, None)),
        None => Ok(()),
    }
}

fn float(value: &Value) -> Option<f64> {
    value.as_f64()
}

// Integral floats such as 4.0 are accepted for categorical attributes.
fn int(value: &Value) -> Option<i32> {
    if let Some(i) = value.as_i64() {
        return i32::try_from(i).ok();
    }
    let f = value.as_f64()?;
    if f.fract() == 0.0 && f >= i32::MIN as f64 && f <= i32::MAX as f64 {
        Some(f as i32)
    } else {
        None
    }
}

fn vector(value: &Value) -> Option<Vec<f64>> {
    value.as_array()?.iter().map(Value::as_f64).collect()
}

fn unknown(track_id: &str, attribute: Attribute) -> ExtractionError {
    ExtractionError::UnknownAttribute {
        track_id: track_id.to_string(),
        attribute,
    }
}

fn invalid(track_id: &str, attribute: Attribute, index: Option<usize>) -> ExtractionError {
    ExtractionError::InvalidValue {
        track_id: track_id.to_string(),
        attribute,
        index,
    }
}
