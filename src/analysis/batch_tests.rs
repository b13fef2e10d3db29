use super::*;
use crate::analysis::features::{FeatureValue, FEATURE_COUNT};
use crate::analysis::timbre::TIMBRE_DIMENSIONS;
use crate::error::ExtractionErrorCodes;
use crate::track::{Attribute, Section, Segment};

/// Helper to build a small valid track whose loudness is offset by `seed`
fn create_test_track(seed: f64, sections: usize, segments: usize) -> TrackAnalysis {
    let sections: Vec<Section> = (0..sections)
        .map(|i| Section {
            loudness: -10.0 + seed - i as f64,
            mode: (i % 2) as i32,
            key: (i % 12) as i32,
            time_signature: 4,
            tempo: 100.0 + seed,
        })
        .collect();
    let segments: Vec<Segment> = (0..segments)
        .map(|i| Segment {
            loudness_max_time: 0.01 * i as f64,
            timbre: (0..TIMBRE_DIMENSIONS).map(|b| seed + b as f64).collect(),
        })
        .collect();
    TrackAnalysis::from_rows(&sections, &segments)
}

fn malformed_track() -> TrackAnalysis {
    let mut track = create_test_track(0.0, 3, 4);
    track.segments.timbre[2].truncate(11);
    track
}

fn batch() -> Vec<(String, TrackAnalysis)> {
    vec![
        ("a".to_string(), create_test_track(1.0, 6, 10)),
        ("b".to_string(), malformed_track()),
        ("c".to_string(), create_test_track(3.0, 2, 5)),
        ("d".to_string(), create_test_track(4.0, 1, 1)),
    ]
}

#[test]
fn test_collect_and_report_keeps_valid_tracks() {
    let assembler = FeatureBatchAssembler::new(TrackFeatureExtractor::default());
    assert_eq!(assembler.policy(), BatchPolicy::CollectAndReport);

    let report = assembler.assemble(&batch()).unwrap();

    assert_eq!(report.table.len(), 3);
    assert_eq!(report.table.track_ids().collect::<Vec<_>>(), vec!["a", "c", "d"]);
    assert!(!report.is_clean());
    assert_eq!(report.failures.len(), 1);
    assert_eq!(report.failures[0].track_id, "b");
    assert_eq!(
        report.failures[0].error,
        ExtractionError::MalformedTimbre {
            track_id: "b".to_string(),
            segment_index: 2,
            len: 11,
        }
    );
    assert!(report.overwritten.is_empty());
}

#[test]
fn test_fail_fast_returns_first_failure_in_input_order() {
    let mut tracks = batch();
    let mut empty = create_test_track(0.0, 2, 2);
    empty.sections.tempo.clear();
    tracks.push(("e".to_string(), empty));

    let assembler = FeatureBatchAssembler::new(TrackFeatureExtractor::default())
        .with_policy(BatchPolicy::FailFast);

    for _ in 0..10 {
        let err = assembler.assemble(&tracks).unwrap_err();
        match err {
            BatchError::TrackFailed { source } => {
                assert_eq!(source.track_id(), "b");
                assert_eq!(source.code(), ExtractionErrorCodes::MALFORMED_TIMBRE);
            }
            other => panic!("Expected TrackFailed, got {:?}", other),
        }
    }
}

#[test]
fn test_fail_fast_succeeds_on_clean_batch() {
    let tracks: Vec<(String, TrackAnalysis)> = (0..20)
        .map(|i| (format!("track-{i:02}"), create_test_track(i as f64, 4, 8)))
        .collect();

    let report = FeatureBatchAssembler::new(TrackFeatureExtractor::default())
        .with_policy(BatchPolicy::FailFast)
        .assemble(&tracks)
        .unwrap();

    assert!(report.is_clean());
    assert_eq!(report.table.len(), 20);
}

#[test]
fn test_duplicate_ids_last_write_wins() {
    let tracks = vec![
        ("x".to_string(), create_test_track(1.0, 3, 3)),
        ("y".to_string(), create_test_track(2.0, 3, 3)),
        ("x".to_string(), create_test_track(5.0, 3, 3)),
    ];

    let report = FeatureBatchAssembler::new(TrackFeatureExtractor::default())
        .assemble(&tracks)
        .unwrap();

    assert_eq!(report.table.len(), 2);
    // Replaced in place, so "x" stays first
    assert_eq!(report.table.track_ids().collect::<Vec<_>>(), vec!["x", "y"]);
    assert_eq!(report.overwritten, vec!["x".to_string()]);

    let x = report.table.get("x").unwrap();
    assert_eq!(x.tempo.mean, 105.0);
}

#[test]
fn test_results_identical_for_any_worker_count() {
    let tracks: Vec<(String, TrackAnalysis)> = (0..64)
        .map(|i| (format!("t{i}"), create_test_track(i as f64 * 0.5, 1 + i % 9, 1 + i % 17)))
        .collect();

    let baseline = FeatureBatchAssembler::new(TrackFeatureExtractor::default())
        .with_worker_threads(Some(1))
        .assemble(&tracks)
        .unwrap();

    for threads in [None, Some(2), Some(7)] {
        let report = FeatureBatchAssembler::new(TrackFeatureExtractor::default())
            .with_worker_threads(threads)
            .assemble(&tracks)
            .unwrap();
        assert_eq!(report, baseline);
    }
}

#[test]
fn test_zero_worker_threads_uses_global_pool() {
    let assembler =
        FeatureBatchAssembler::new(TrackFeatureExtractor::default()).with_worker_threads(Some(0));
    let report = assembler.assemble(&batch()).unwrap();
    assert_eq!(report.table.len(), 3);
}

#[test]
fn test_assemble_shaped_reports_shaping_failures() {
    let shaped: Vec<ShapedTrack> = vec![
        ("a".to_string(), Ok(create_test_track(1.0, 2, 2))),
        (
            "b".to_string(),
            Err(ExtractionError::UnknownAttribute {
                track_id: "b".to_string(),
                attribute: Attribute::Segments,
            }),
        ),
    ];

    let report = FeatureBatchAssembler::new(TrackFeatureExtractor::default())
        .assemble_shaped(&shaped)
        .unwrap();

    assert_eq!(report.table.len(), 1);
    assert_eq!(report.failures.len(), 1);
    assert_eq!(report.failures[0].error.kind(), "UnknownAttribute");
}

#[test]
fn test_empty_batch() {
    let report = FeatureBatchAssembler::new(TrackFeatureExtractor::default())
        .assemble(&[])
        .unwrap();
    assert!(report.table.is_empty());
    assert!(report.is_clean());
}

#[test]
fn test_from_config_selects_policy() {
    let mut config = AppConfig::default();
    assert_eq!(
        FeatureBatchAssembler::from_config(&config).policy(),
        BatchPolicy::CollectAndReport
    );

    config.batch.strict = true;
    config.extraction.trailing_window = 3;
    let assembler = FeatureBatchAssembler::from_config(&config);
    assert_eq!(assembler.policy(), BatchPolicy::FailFast);
    assert_eq!(assembler.extractor().trailing_window(), 3);
}

#[test]
fn test_row_serialization_starts_with_id() {
    let report = FeatureBatchAssembler::new(TrackFeatureExtractor::default())
        .assemble(&[("abc".to_string(), create_test_track(0.0, 2, 2))])
        .unwrap();

    let json = serde_json::to_value(&report.table).unwrap();
    let row = json.as_array().unwrap()[0].as_object().unwrap();
    assert_eq!(row.len(), FEATURE_COUNT + 1);
    assert_eq!(row["id"], "abc");
    assert_eq!(row["time_signature_has_3"], false);

    let text = serde_json::to_string(&report.table).unwrap();
    assert!(text.starts_with("[{\"id\":\"abc\",\"loudness_mean\":"));
}

#[test]
fn test_failure_serialization() {
    let failure = TrackFailure {
        track_id: "b".to_string(),
        error: ExtractionError::EmptySeries {
            track_id: "b".to_string(),
            attribute: Attribute::Key,
        },
    };
    let json = serde_json::to_value(&failure).unwrap();
    assert_eq!(json["id"], "b");
    assert_eq!(json["kind"], "EmptySeries");
    assert_eq!(json["code"], ExtractionErrorCodes::EMPTY_SERIES);
}

#[test]
fn test_table_insert_and_lookup() {
    let extractor = TrackFeatureExtractor::default();
    let features = extractor
        .extract("k", &create_test_track(0.0, 3, 3))
        .unwrap();

    let mut table = FeatureTable::new();
    assert!(table.insert("k".to_string(), features.clone()).is_none());
    assert!(table.contains("k"));
    assert_eq!(
        table.get("k").and_then(|f| f.get("time_signature_mean")),
        Some(FeatureValue::Float(4.0))
    );
    assert_eq!(table.insert("k".to_string(), features.clone()), Some(features));
    assert_eq!(table.len(), 1);

    let columns = FeatureTable::column_names();
    assert_eq!(columns[0], "id");
    assert_eq!(columns.len(), FEATURE_COUNT + 1);
}
