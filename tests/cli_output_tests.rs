//! Integration tests for the CLI binary and its CSV output

mod common;

use common::write_sample_log;
use std::fs;
use std::process::Command;
use tempfile::TempDir;

fn analyzer() -> Command {
    Command::new(env!("CARGO_BIN_EXE_aplog-analyzer"))
}

#[test]
fn test_csv_field_count_consistency() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let input_file = write_sample_log(temp_dir.path(), "00000042.log");
    let output_dir = temp_dir.path().join("csv_out");

    let output = analyzer()
        .arg("--csv")
        .arg("--output-dir")
        .arg(&output_dir)
        .arg(&input_file)
        .output()
        .expect("Failed to run aplog-analyzer");

    assert!(
        output.status.success(),
        "Analyzer failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );

    for type_tag in ["AHR2", "GPS", "BAT"] {
        let csv_path = output_dir.join(format!("00000042_{type_tag}_data.csv"));
        let csv_content = fs::read_to_string(&csv_path).expect("Failed to read generated CSV file");

        let lines: Vec<&str> = csv_content.lines().collect();
        assert_eq!(lines.len(), 3, "{type_tag}: header plus two rows expected");

        let header_fields = lines[0].split(',').count();
        assert!(lines[0].ends_with("Timestamp(s)"));
        for (i, line) in lines.iter().enumerate().skip(1) {
            assert_eq!(
                line.split(',').count(),
                header_fields,
                "{type_tag} row {} has a different field count: {}",
                i + 1,
                line
            );
        }
    }
}

#[test]
fn test_stdout_reports_modes_and_summary() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let input_file = write_sample_log(temp_dir.path(), "flight.log");

    let output = analyzer()
        .arg("--mode")
        .arg("17=FLY_BY_WIRE_B")
        .arg(&input_file)
        .output()
        .expect("Failed to run aplog-analyzer");
    assert!(output.status.success());

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Log start time: 1000000"));
    assert!(stdout.contains("to FLY_BY_WIRE_B"));
    assert!(stdout.contains("to AUTO"));
    assert!(stdout.contains("Max distance from home"));
    assert!(stdout.contains("111.19 m"));
    assert!(!temp_dir.path().join("flight_GPS_data.csv").exists());
}

#[test]
fn test_custom_extract_and_summary_file() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let input_file = write_sample_log(temp_dir.path(), "flight.log");

    let output = analyzer()
        .args(["--csv", "--summary", "--single-pass", "--extract", "MODE:TimeUS,Mode"])
        .arg(&input_file)
        .output()
        .expect("Failed to run aplog-analyzer");
    assert!(output.status.success());

    let mode_csv = fs::read_to_string(temp_dir.path().join("flight_MODE_data.csv")).unwrap();
    assert_eq!(mode_csv.lines().next(), Some("TimeUS,Mode,Timestamp(s)"));
    assert!(!temp_dir.path().join("flight_GPS_data.csv").exists());

    let summary = fs::read_to_string(temp_dir.path().join("flight_summary.txt")).unwrap();
    assert!(summary.starts_with("Flight duration: 2.60 s"));
}

#[test]
fn test_unsupported_extension_fails() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let bin_path = temp_dir.path().join("flight.bin");
    fs::write(&bin_path, [0xA3u8, 0x95, 0x80]).unwrap();

    let output = analyzer()
        .arg(&bin_path)
        .output()
        .expect("Failed to run aplog-analyzer");
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("No valid files found"));
}

#[test]
fn test_plot_data_for_full_record_request() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let input_file = write_sample_log(temp_dir.path(), "flight.log");

    let output = analyzer()
        .args(["--plot-data", "--extract", "BAT", "--extract", "GPS:TimeUS,Spd"])
        .arg(&input_file)
        .output()
        .expect("Failed to run aplog-analyzer");
    assert!(
        output.status.success(),
        "Analyzer failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );

    let bat_plot = fs::read_to_string(temp_dir.path().join("flight_BAT_plot.csv")).unwrap();
    let lines: Vec<&str> = bat_plot.lines().collect();
    assert_eq!(lines, vec!["TimeUS,Inst,Volt,Curr", "2300000,0,12.6,4.2", "3500000,0,12.4,4.5"]);

    let gps_plot = fs::read_to_string(temp_dir.path().join("flight_GPS_plot.csv")).unwrap();
    assert_eq!(gps_plot.lines().next(), Some("Timestamp(s),Spd"));
    assert!(!temp_dir.path().join("flight_BAT_data.csv").exists());
}

#[test]
fn test_ascii_dump_counts_records() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let input_file = write_sample_log(temp_dir.path(), "flight.log");

    let output = analyzer()
        .arg("--ascii")
        .arg(&input_file)
        .output()
        .expect("Failed to run aplog-analyzer");
    assert!(output.status.success());

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("(10 records)"));
    let dump = fs::read_to_string(temp_dir.path().join("flight_ascii.dat")).unwrap();
    assert_eq!(dump.lines().count(), 10);
    assert!(dump.lines().any(|line| line.starts_with("MODE {")));
}

#[cfg(feature = "json")]
#[test]
fn test_json_summary_file() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let input_file = write_sample_log(temp_dir.path(), "flight.log");

    let output = analyzer()
        .arg("--json")
        .arg(&input_file)
        .output()
        .expect("Failed to run aplog-analyzer");
    assert!(output.status.success());

    let content = fs::read_to_string(temp_dir.path().join("flight_summary.json")).unwrap();
    let document: serde_json::Value = serde_json::from_str(&content).unwrap();
    assert_eq!(document["flight_duration_s"], 2.6);
    assert_eq!(document["summary"][0]["value"], "2.60 s");
    assert_eq!(document["mode_changes"].as_array().map(Vec::len), Some(2));
}
