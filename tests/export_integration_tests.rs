//! Integration tests for export functionality
//!
//! Tests the export layer across different scenarios:
//! - CSV export with output directory creation
//! - Zero-row extractions producing no file
//! - Ragged rows under lenient projection
//! - Summary and ASCII dumps
//! - Sink failures reporting the offending path

mod common;

use aplog_analyzer::*;
use common::write_sample_log;
use std::fs;
use tempfile::TempDir;

fn row(pairs: &[(&str, FieldValue)]) -> Row {
    let mut row = Row::new();
    for (key, value) in pairs {
        row.insert(key, value.clone());
    }
    row
}

#[test]
fn test_export_csv_creates_output_directory() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let log_path = write_sample_log(temp_dir.path(), "00000042.log");
    let nonexistent_dir = temp_dir.path().join("nonexistent").join("output");

    let mut session = open_log_file(&log_path, AnalysisConfig::default()).unwrap();
    let series = session.extract_configured().unwrap();

    let export_opts = ExportOptions {
        csv: true,
        output_dir: Some(nonexistent_dir.to_str().unwrap().to_string()),
        ..Default::default()
    };
    let written = export_series_to_csv(&log_path, &series, &export_opts).unwrap();

    assert!(nonexistent_dir.exists(), "Output directory should be created");
    // RCOU is absent from the sample log, so only three files are written
    assert_eq!(written.len(), 3);
    assert!(nonexistent_dir.join("00000042_GPS_data.csv").exists());
    assert!(nonexistent_dir.join("00000042_AHR2_data.csv").exists());
    assert!(nonexistent_dir.join("00000042_BAT_data.csv").exists());
    assert!(!nonexistent_dir.join("00000042_RCOU_data.csv").exists());
}

#[test]
fn test_export_csv_contents() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let log_path = write_sample_log(temp_dir.path(), "flight.log");

    let mut session = open_log_file(&log_path, AnalysisConfig::default()).unwrap();
    let rows = session
        .extract("GPS", Some(&["TimeUS".to_string(), "Spd".to_string()]))
        .unwrap();

    let csv_path = temp_dir.path().join("gps.csv");
    assert!(export_rows_to_csv(&rows, &csv_path).unwrap());

    let content = fs::read_to_string(&csv_path).unwrap();
    let lines: Vec<&str> = content.lines().collect();
    assert_eq!(lines, vec!["TimeUS,Spd,Timestamp(s)", "2000000,3,1", "3000000,5,2"]);
}

#[test]
fn test_export_empty_rows_writes_nothing() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let csv_path = temp_dir.path().join("empty.csv");

    let written = export_rows_to_csv(&[], &csv_path).unwrap();
    assert!(!written);
    assert!(!csv_path.exists());
}

#[test]
fn test_export_ragged_rows_use_first_header() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let csv_path = temp_dir.path().join("ragged.csv");
    let rows = vec![
        row(&[("TimeUS", FieldValue::Int(1)), ("Volt", FieldValue::Float(12.5))]),
        row(&[("TimeUS", FieldValue::Int(2))]),
        row(&[
            ("TimeUS", FieldValue::Int(3)),
            ("Volt", FieldValue::Float(12.25)),
            ("Curr", FieldValue::Float(4.0)),
        ]),
    ];

    export_rows_to_csv(&rows, &csv_path).unwrap();
    let content = fs::read_to_string(&csv_path).unwrap();
    let lines: Vec<&str> = content.lines().collect();
    assert_eq!(lines, vec!["TimeUS,Volt", "1,12.5", "2,", "3,12.25"]);
}

#[test]
fn test_export_summary_lines() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let log_path = write_sample_log(temp_dir.path(), "flight.log");

    let mut session = open_log_file(&log_path, AnalysisConfig::default()).unwrap();
    let metrics = session.metrics().unwrap();

    let summary_path = temp_dir.path().join("summary.txt");
    export_summary(&metrics, &summary_path).unwrap();

    let content = fs::read_to_string(&summary_path).unwrap();
    let lines: Vec<&str> = content.lines().collect();
    assert_eq!(lines.len(), 5);
    assert_eq!(lines[0], "Flight duration: 2.60 s");
    assert_eq!(lines[1], "Max speed: 5.00 m/s");
    assert_eq!(lines[2], "Max altitude: 22.25 m");
    assert_eq!(lines[3], "Total distance: 111.19 m");
    assert_eq!(lines[4], "Max distance from home: 111.19 m");
}

#[test]
fn test_export_ascii_dumps_every_record() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let log_path = write_sample_log(temp_dir.path(), "flight.log");

    let mut session = open_log_file(&log_path, AnalysisConfig::default()).unwrap();
    let ascii_path = temp_dir.path().join("flight_ascii.dat");
    let count = export_ascii(session.rewound_cursor().unwrap(), &ascii_path).unwrap();
    assert_eq!(count, 10);

    let content = fs::read_to_string(&ascii_path).unwrap();
    let lines: Vec<&str> = content.lines().collect();
    assert_eq!(lines.len(), 10);
    assert_eq!(
        lines[3],
        "AHR2 {TimeUS : 2100000, Roll : 1, Pitch : 2, Yaw : 90, Alt : 15.5, Lat : 0}"
    );
}

#[test]
fn test_export_plot_series() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let log_path = write_sample_log(temp_dir.path(), "flight.log");

    let mut session = open_log_file(&log_path, AnalysisConfig::default()).unwrap();
    let rows = session
        .extract("AHR2", Some(&["TimeUS".to_string(), "Alt".to_string()]))
        .unwrap();
    let profile = altitude_profile(&rows, "Alt");

    let plot_path = temp_dir.path().join("alt.csv");
    assert!(export_plot_series(&profile, &plot_path).unwrap());
    let content = fs::read_to_string(&plot_path).unwrap();
    let lines: Vec<&str> = content.lines().collect();
    assert_eq!(lines, vec!["Time (s),Alt", "1.1,15.5", "2.1,22.25"]);
}

#[test]
fn test_export_plot_series_rejects_misaligned_series() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let plot_path = temp_dir.path().join("bad_plot.csv");
    let plot = PlotSeries {
        title: "hand built".to_string(),
        x_label: "x".to_string(),
        x: vec![0.0, 1.0],
        series: vec![("y".to_string(), vec![1.0])],
    };

    let err = export_plot_series(&plot, &plot_path).unwrap_err();
    assert!(matches!(err, AnalyzerError::InvalidRequest(_)));
    assert!(!plot_path.exists());
}

#[cfg(feature = "json")]
#[test]
fn test_export_summary_json_document() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let log_path = write_sample_log(temp_dir.path(), "flight.log");

    let mut session = open_log_file(&log_path, AnalysisConfig::default()).unwrap();
    let events = session.collect_mode_changes().unwrap();
    let metrics = session.metrics().unwrap();

    let json_path = temp_dir.path().join("flight_summary.json");
    export_summary_json(&metrics, &events, &json_path).unwrap();
    let content = fs::read_to_string(&json_path).unwrap();
    let document: serde_json::Value = serde_json::from_str(&content).unwrap();

    assert_eq!(document["flight_duration_s"], 2.6);
    assert_eq!(document["metrics"]["max_speed"], 5.0);
    assert_eq!(document["summary"][0]["label"], "Flight duration");
    assert_eq!(document["summary"][0]["value"], "2.60 s");
    assert_eq!(document["summary"].as_array().map(Vec::len), Some(5));

    let modes = document["mode_changes"].as_array().unwrap();
    assert_eq!(modes.len(), 2);
    assert_eq!(modes[0]["mode_name"], "FBWB");
    assert_eq!(modes[0]["relative_time"], 1.2);
    assert_eq!(modes[1]["mode_name"], "AUTO");
}

#[test]
fn test_sink_failure_reports_path() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let blocker = temp_dir.path().join("not_a_dir");
    fs::write(&blocker, "file in the way").unwrap();
    let csv_path = blocker.join("out.csv");

    let rows = vec![row(&[("TimeUS", FieldValue::Int(1))])];
    let err = export_rows_to_csv(&rows, &csv_path).unwrap_err();
    match err {
        AnalyzerError::Sink { path, .. } => assert_eq!(path, csv_path),
        other => panic!("expected sink error, got {other:?}"),
    }
}
