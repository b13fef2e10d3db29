// Track module - per-track analysis records
//
// - types: column-wise TrackAnalysis plus the row records it is grouped from
// - shaping: JSON (row or columnar form) to TrackAnalysis

mod shaping;
mod types;

pub use shaping::{load_collection, ShapedTrack};
pub use types::{Attribute, Section, SectionSeries, Segment, SegmentSeries, TrackAnalysis};
