//! Integration tests for seebeck-reduce
//!
//! These tests run synthetic rig records through the full pipeline, from the
//! raw text file to the written tables.

use seebeck_reduce::config::{PipelineConfig, Variant};
use seebeck_reduce::correction::{alpha, Leg, CELSIUS_TO_KELVIN};
use seebeck_reduce::fit::FitAlignment;
use seebeck_reduce::pipeline::{process_batch, Reducer, RunManifest, Stage};
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::tempdir;

const S_LOW: f64 = 15.0;
const S_HIGH: f64 = -5.0;

/// Temperature difference recorded on line `i` (K)
fn line_delta_t(i: usize) -> f64 {
    0.5 * ((i * 7) % 5) as f64 - 1.0
}

/// Plateau temperature of line `i` (°C)
fn line_temperature(i: usize) -> f64 {
    if i < 10 {
        100.0
    } else {
        200.0
    }
}

/// Plateau temperature of line `i` rising by 0.5 °C per line
fn line_ramp(i: usize) -> f64 {
    line_temperature(i) + 0.5 * i as f64
}

/// Build a 20-line high temperature record with two oscillation segments.
///
/// Voltages are chosen so that the corrected voltages are exactly
/// `S_LOW * dT` and `S_HIGH * dT`.
fn synthetic_record(markers: &[(usize, &str)]) -> String {
    record_with(markers, line_temperature)
}

/// Build a 20-line record whose mean temperature on line `i` is `temperature(i)`.
fn record_with(markers: &[(usize, &str)], temperature: impl Fn(usize) -> f64) -> String {
    let mut text = String::from(
        "Seebeck measurement\nsample: synthetic\noperator: test\nprogram: high temperature\ncolumns\n",
    );

    for i in 0..20 {
        let t = 2.0 * i as f64;
        let temp = temperature(i);
        let d_t = line_delta_t(i);
        let t_k = temp + CELSIUS_TO_KELVIN;
        let v_low = (alpha(Leg::Chromel, t_k).unwrap() - S_LOW) * d_t * 1e-6;
        let v_high = (alpha(Leg::Alumel, t_k).unwrap() - S_HIGH) * d_t * 1e-6;
        let temp_a = temp + d_t / 2.0;
        let temp_b = temp - d_t / 2.0;

        let marker = markers
            .iter()
            .find(|(line, _)| *line == i)
            .map_or("", |(_, m)| *m);

        let values = [temp_a, temp_b, temp_a, temp_b, v_low, v_high, v_low, v_high];
        let mut fields: Vec<String> = values
            .iter()
            .flat_map(|v| [t.to_string(), v.to_string()])
            .collect();
        fields.push(marker.to_string());
        text.push_str(&fields.join(","));
        text.push('\n');
    }

    text
}

const TWO_SEGMENTS: [(usize, &str); 5] = [
    (2, "Start Oscillation"),
    (7, "Stop Oscillation"),
    (9, "Left Equilibrium"),
    (12, "Start Oscillation"),
    (17, "Stop Oscillation"),
];

fn write_record(dir: &Path, name: &str, content: &str) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, content).unwrap();
    path
}

fn parse_csv(path: &Path) -> Vec<Vec<String>> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .from_path(path)
        .unwrap();
    reader
        .records()
        .map(|r| r.unwrap().iter().map(str::to_string).collect())
        .collect()
}

/// Test the complete reduction of one record
#[test]
fn test_reduce_two_segments() {
    let dir = tempdir().unwrap();
    let input = write_record(dir.path(), "run_01.txt", &synthetic_record(&TWO_SEGMENTS));

    let reducer = Reducer::new(PipelineConfig::default()).unwrap();
    let report = reducer.reduce_file(&input).unwrap();

    assert_eq!(report.raw_lines, 20);
    assert_eq!(report.series.len(), 19);
    assert_eq!(report.segment_count(), 2);

    let segments: Vec<(usize, usize)> = report
        .fits
        .iter()
        .map(|f| (f.segment.start, f.segment.stop))
        .collect();
    assert_eq!(segments, vec![(2, 7), (12, 17)]);

    let summary = &report.tables.summary;
    assert_eq!(summary.len(), 2);
    assert!((summary[0].low.temperature - 100.0).abs() < 0.01);
    assert!((summary[1].low.temperature - 200.0).abs() < 0.01);
    for row in summary {
        assert!((row.low.slope - S_LOW).abs() < 1e-6);
        assert!((row.high.slope - S_HIGH).abs() < 1e-6);
        assert!(row.low.intercept.abs() < 1e-6);
        assert!((row.low.r_squared - 1.0).abs() < 1e-9);
        assert!((row.high.r_squared - 1.0).abs() < 1e-9);
    }
}

/// The segment temperature is the mean of the resampled averages it spans
#[test]
fn test_segment_temperature_follows_ramp() {
    let record = record_with(&TWO_SEGMENTS, line_ramp);
    let report = Reducer::new(PipelineConfig::default())
        .unwrap()
        .reduce_reader(record.as_bytes())
        .unwrap();

    // Point j averages lines j and j + 1, so segment (2, 7) spans
    // 101.25, 101.75, ..., 103.75 and segment (12, 17) spans 206.25, ..., 208.75
    let expected = [102.5, 207.5];
    assert_eq!(report.fits.len(), expected.len());
    for (fit, expected) in report.fits.iter().zip(expected) {
        let by_hand: f64 = report.series.avg_temp[fit.segment.start..=fit.segment.stop]
            .iter()
            .sum::<f64>()
            / 6.0;
        assert!((by_hand - expected).abs() < 1e-9);
        assert!((fit.low.temperature - expected).abs() < 0.01);
        assert!((fit.high.temperature - expected).abs() < 0.01);

        // The leg correction now varies inside a segment
        assert!((fit.low.slope - S_LOW).abs() < 0.05);
        assert!((fit.high.slope - S_HIGH).abs() < 0.05);
    }
}

/// Test the written tables and manifest
#[test]
fn test_written_outputs() {
    let dir = tempdir().unwrap();
    let out = dir.path().join("out");
    fs::create_dir(&out).unwrap();
    let input = write_record(dir.path(), "run_01.txt", &synthetic_record(&TWO_SEGMENTS));

    let reducer = Reducer::new(PipelineConfig::default()).unwrap();
    let summary = process_batch(&reducer, &[input], &out);
    assert!(!summary.has_failures());
    let outputs = &summary.succeeded[0].outputs;

    let series = parse_csv(&outputs.series);
    assert_eq!(series.len(), 20);
    assert_eq!(
        series[0],
        vec![
            "time_s",
            "avg_temp_c",
            "delta_t_k",
            "v_low_corrected_uv",
            "v_high_corrected_uv",
            "marker"
        ]
    );
    assert_eq!(series[1][0], "1.000000");
    assert_eq!(series[3][5], "Start Oscillation");
    assert_eq!(series[10][5], "Left Equilibrium");

    let seebeck = parse_csv(&outputs.summary);
    assert_eq!(seebeck.len(), 3);
    assert_eq!(seebeck[0].len(), 8);
    let t_low: f64 = seebeck[1][0].parse().unwrap();
    let s_low: f64 = seebeck[1][1].parse().unwrap();
    let t_high: f64 = seebeck[2][4].parse().unwrap();
    let s_high: f64 = seebeck[2][5].parse().unwrap();
    assert!((t_low - 100.0).abs() < 0.01);
    assert!((s_low - S_LOW).abs() < 1e-5);
    assert!((t_high - 200.0).abs() < 0.01);
    assert!((s_high - S_HIGH).abs() < 1e-5);

    let manifest: RunManifest =
        serde_json::from_str(&fs::read_to_string(&outputs.manifest).unwrap()).unwrap();
    assert_eq!(manifest.variant, Variant::HighTemperature);
    assert_eq!(manifest.raw_lines, 20);
    assert_eq!(manifest.points, 19);
    assert_eq!(manifest.segments, 2);
}

/// One bad record must not affect the others
#[test]
fn test_batch_isolates_failures() {
    let dir = tempdir().unwrap();
    let out = dir.path().join("out");
    fs::create_dir(&out).unwrap();

    let good = write_record(dir.path(), "good.txt", &synthetic_record(&TWO_SEGMENTS));
    let stray_stop = write_record(
        dir.path(),
        "stray_stop.txt",
        &synthetic_record(&[(3, "Stop Oscillation"), (5, "Start Oscillation")]),
    );
    let mut truncated = synthetic_record(&TWO_SEGMENTS);
    truncated.push_str("40.0,1.0,40.0\n");
    let truncated = write_record(dir.path(), "truncated.txt", &truncated);
    let missing = dir.path().join("missing.txt");

    let reducer = Reducer::new(PipelineConfig::default()).unwrap();
    let summary = process_batch(
        &reducer,
        &[stray_stop.clone(), good.clone(), truncated.clone(), missing.clone()],
        &out,
    );

    assert_eq!(summary.succeeded.len(), 1);
    assert_eq!(summary.succeeded[0].input, good);
    assert_eq!(summary.failed.len(), 3);

    let failure = |path: &PathBuf| summary.failed.iter().find(|f| &f.input == path).unwrap();
    assert_eq!(failure(&stray_stop).stage, Stage::Segment);
    assert!(failure(&stray_stop).message.contains("Unmatched segment marker"));
    assert_eq!(failure(&truncated).stage, Stage::Ingest);
    assert!(failure(&truncated).message.contains("line 26"));
    assert_eq!(failure(&missing).stage, Stage::Ingest);

    // Failed runs leave nothing behind
    let mut written: Vec<String> = fs::read_dir(&out)
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    written.sort();
    assert_eq!(
        written,
        vec!["good_manifest.json", "good_seebeck.csv", "good_series.csv"]
    );
}

/// Records sharing a file name in different folders keep separate outputs
#[test]
fn test_batch_keeps_same_named_runs_apart() {
    let dir = tempdir().unwrap();
    let out = dir.path().join("out");
    fs::create_dir(&out).unwrap();
    fs::create_dir(dir.path().join("a")).unwrap();
    fs::create_dir(dir.path().join("b")).unwrap();

    let first = write_record(&dir.path().join("a"), "run.txt", &synthetic_record(&TWO_SEGMENTS));
    let second = write_record(
        &dir.path().join("b"),
        "run.txt",
        &record_with(&TWO_SEGMENTS, |i| line_temperature(i) + 100.0),
    );

    let reducer = Reducer::new(PipelineConfig::default()).unwrap();
    let summary = process_batch(&reducer, &[first, second], &out);
    assert!(!summary.has_failures());
    assert_eq!(summary.succeeded.len(), 2);

    let a = &summary.succeeded[0].outputs;
    let b = &summary.succeeded[1].outputs;
    assert_ne!(a.summary, b.summary);
    assert_eq!(fs::read_dir(&out).unwrap().count(), 6);

    let first_temperature: f64 = parse_csv(&a.summary)[1][0].parse().unwrap();
    let second_temperature: f64 = parse_csv(&b.summary)[1][0].parse().unwrap();
    assert!((first_temperature - 100.0).abs() < 0.01);
    assert!((second_temperature - 200.0).abs() < 0.01);
}

/// The legacy lag pairs each temperature difference with the previous voltage
#[test]
fn test_legacy_lag_changes_fits() {
    let record = synthetic_record(&TWO_SEGMENTS);

    let aligned = Reducer::new(PipelineConfig::default())
        .unwrap()
        .reduce_reader(record.as_bytes())
        .unwrap();
    let config = PipelineConfig {
        fit_alignment: FitAlignment::LegacyLag,
        ..Default::default()
    };
    let lagged = Reducer::new(config)
        .unwrap()
        .reduce_reader(record.as_bytes())
        .unwrap();

    assert_eq!(aligned.segment_count(), lagged.segment_count());
    assert!((aligned.fits[0].low.r_squared - 1.0).abs() < 1e-9);
    assert!(lagged.fits[0].low.r_squared < 0.5);
}

/// A segment starting at the first point cannot be fitted with the lag
#[test]
fn test_legacy_lag_at_first_point_fails() {
    let record = synthetic_record(&[(0, "Start Oscillation"), (5, "Stop Oscillation")]);
    let config = PipelineConfig {
        fit_alignment: FitAlignment::LegacyLag,
        ..Default::default()
    };
    let err = Reducer::new(config)
        .unwrap()
        .reduce_reader(record.as_bytes())
        .unwrap_err();
    assert_eq!(err.stage(), Stage::Fit);
}

/// Room temperature records carry one field fewer
#[test]
fn test_room_temperature_variant_rejects_high_temperature_layout() {
    // Every 17-field line is one field too many for the 16-field layout
    let record = synthetic_record(&TWO_SEGMENTS);
    let reducer = Reducer::new(PipelineConfig::for_variant(Variant::RoomTemperature)).unwrap();
    let err = reducer.reduce_reader(record.as_bytes()).unwrap_err();
    assert_eq!(err.stage(), Stage::Ingest);
    assert!(err.to_string().contains("expected 16 fields, found 17"));
}
