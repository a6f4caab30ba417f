//! CLI binary for the ArduPilot log analyzer
//!
//! Prints mode changes and the flight summary for each log, and writes the
//! requested artifacts next to the log (or into `--output-dir`).

use anyhow::{Context, Result};
use aplog_analyzer::{
    artifact_path, export_ascii, export_series_to_csv, export_summary, open_log_file,
    plot_fields, plot_series_from_rows, resolve_output_dir, summary_entries, AnalysisConfig,
    ExportOptions, ExtractionRequest, ModeTable,
};
use clap::{Arg, ArgAction, Command};
use glob::glob;
use std::path::{Path, PathBuf};
use tracing::debug;
use tracing_subscriber::EnvFilter;

fn build_command() -> Command {
    Command::new("ArduPilot Log Analyzer")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Extract time series, flight-mode changes and flight metrics from ArduPilot DataFlash text logs.")
        .arg(
            Arg::new("files")
                .help("Text DataFlash logs to analyze (.log, .txt extensions supported, case-insensitive, supports globbing)")
                .required(true)
                .num_args(1..)
                .index(1),
        )
        .arg(
            Arg::new("debug")
                .long("debug")
                .help("Enable debug output")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("csv")
                .long("csv")
                .help("Export each extracted message type to <log>_<TYPE>_data.csv")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("summary")
                .long("summary")
                .help("Write the flight summary to <log>_summary.txt")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("json")
                .long("json")
                .help("Write metrics and mode changes to <log>_summary.json (requires the 'json' feature)")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("ascii")
                .long("ascii")
                .help("Dump every record as text to <log>_ascii.dat")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("plot-data")
                .long("plot-data")
                .help("Write plot-ready series (relative time vs requested fields) to <log>_<TYPE>_plot.csv")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("output-dir")
                .long("output-dir")
                .help("Directory for output files (default: same as input file)")
                .value_name("DIR"),
        )
        .arg(
            Arg::new("extract")
                .long("extract")
                .help("Message type and fields to extract, e.g. GPS:TimeUS,Spd (repeatable, replaces the default set)")
                .value_name("TYPE[:FIELDS]")
                .action(ArgAction::Append),
        )
        .arg(
            Arg::new("mode")
                .long("mode")
                .help("Additional flight-mode name, e.g. 11=RTL (repeatable)")
                .value_name("CODE=NAME")
                .action(ArgAction::Append),
        )
        .arg(
            Arg::new("format-type")
                .long("format-type")
                .help("Message type whose first record defines the log start time")
                .value_name("TYPE")
                .default_value("FMTU"),
        )
        .arg(
            Arg::new("single-pass")
                .long("single-pass")
                .help("Extract all message types in one pass over the log")
                .action(ArgAction::SetTrue),
        )
}

fn init_tracing(debug: bool) {
    let default_level = if debug { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn build_config(matches: &clap::ArgMatches) -> Result<AnalysisConfig> {
    let mut config = AnalysisConfig::default();

    if let Some(format_type) = matches.get_one::<String>("format-type") {
        config.format_type = format_type.clone();
    }
    config.single_pass = matches.get_flag("single-pass");

    if let Some(requests) = matches.get_many::<String>("extract") {
        config.extractions = requests
            .map(|r| r.parse::<ExtractionRequest>())
            .collect::<Result<Vec<_>, _>>()?;
    }

    if let Some(entries) = matches.get_many::<String>("mode") {
        for entry in entries {
            let (code, name) = ModeTable::parse_entry(entry)
                .with_context(|| format!("Invalid --mode value '{entry}', expected CODE=NAME"))?;
            config.mode_table.insert(code, &name);
        }
    }

    Ok(config)
}

fn collect_paths(patterns: &[&String], debug: bool) -> Vec<PathBuf> {
    let mut valid_paths = Vec::new();
    for pattern in patterns {
        let paths: Vec<PathBuf> = if pattern.contains('*') || pattern.contains('?') {
            match glob(pattern) {
                Ok(glob_iter) => match glob_iter.collect::<Result<Vec<_>, _>>() {
                    Ok(paths) => {
                        debug!("Glob pattern '{pattern}' matched {} files", paths.len());
                        paths
                    }
                    Err(e) => {
                        eprintln!("Error expanding glob pattern '{pattern}': {e}");
                        continue;
                    }
                },
                Err(e) => {
                    eprintln!("Invalid glob pattern '{pattern}': {e}");
                    continue;
                }
            }
        } else {
            vec![Path::new(pattern.as_str()).to_path_buf()]
        };

        for path in paths {
            if !path.exists() {
                eprintln!("Warning: File does not exist: {path:?}");
                continue;
            }

            let ext = path
                .extension()
                .and_then(|e| e.to_str())
                .map(|e| e.to_ascii_lowercase())
                .unwrap_or_default();
            match ext.as_str() {
                "log" | "txt" => {
                    if debug {
                        println!("Added valid file: {path:?}");
                    }
                    valid_paths.push(path);
                }
                "bin" => {
                    eprintln!(
                        "Warning: Skipping binary DataFlash log {path:?}; convert it to a text .log first"
                    );
                }
                _ => {
                    let shown = if ext.is_empty() { "none" } else { ext.as_str() };
                    eprintln!("Warning: Skipping file with unsupported extension '{shown}': {path:?}");
                }
            }
        }
    }
    valid_paths
}

fn process_file(path: &Path, config: &AnalysisConfig, options: &ExportOptions) -> Result<()> {
    let mut session = open_log_file(path, config.clone())
        .with_context(|| format!("Failed to open log {path:?}"))?;

    let reference = session.reference_time();
    println!("Log start time: {}", reference.t0_us);

    let mut mode_events = Vec::new();
    for event in session.mode_changes()? {
        let event = event?;
        println!("{event}");
        mode_events.push(event);
    }

    let metrics = session.metrics()?;
    println!();
    for entry in summary_entries(&metrics) {
        println!("  {:<24} {}", entry.label, entry.value);
    }
    if !metrics.has_gps_data() {
        println!("  (no GPS fixes; distance metrics are zero)");
    }
    debug!(
        "Flight end is {:.2} s after the log start time",
        metrics.duration_since_reference_s(&reference)
    );

    let writes_files =
        options.csv || options.plot_data || options.summary || options.json || options.ascii;
    if !writes_files {
        return Ok(());
    }
    let output_dir = resolve_output_dir(path, options)?;

    if options.csv || options.plot_data {
        let series = session.extract_configured()?;

        if options.csv {
            for written in export_series_to_csv(path, &series, options)? {
                println!("Data saved to {}", written.display());
            }
        }

        if options.plot_data {
            for entry in series.iter().filter(|entry| !entry.is_empty()) {
                let fields = plot_fields(&entry.rows);
                let Some(plot) = plot_series_from_rows(&entry.rows, &fields) else {
                    continue;
                };
                let plot_path =
                    artifact_path(path, &output_dir, &format!("_{}_plot.csv", entry.type_tag()));
                if aplog_analyzer::export_plot_series(&plot, &plot_path)? {
                    println!("Plot data saved to {}", plot_path.display());
                }
            }
        }
    }

    if options.summary {
        let summary_path = artifact_path(path, &output_dir, "_summary.txt");
        export_summary(&metrics, &summary_path)?;
        println!("Summary saved to {}", summary_path.display());
    }

    if options.json {
        export_json(path, &output_dir, &metrics, &mode_events)?;
    }

    if options.ascii {
        let ascii_path = artifact_path(path, &output_dir, "_ascii.dat");
        let count = export_ascii(session.rewound_cursor()?, &ascii_path)?;
        println!("Log file saved as ASCII in {} ({count} records)", ascii_path.display());
    }

    Ok(())
}

#[cfg(feature = "json")]
fn export_json(
    path: &Path,
    output_dir: &Path,
    metrics: &aplog_analyzer::FlightMetrics,
    mode_events: &[aplog_analyzer::ModeEvent],
) -> Result<()> {
    let json_path = artifact_path(path, output_dir, "_summary.json");
    aplog_analyzer::export_summary_json(metrics, mode_events, &json_path)?;
    println!("JSON summary saved to {}", json_path.display());
    Ok(())
}

#[cfg(not(feature = "json"))]
fn export_json(
    _path: &Path,
    _output_dir: &Path,
    _metrics: &aplog_analyzer::FlightMetrics,
    _mode_events: &[aplog_analyzer::ModeEvent],
) -> Result<()> {
    eprintln!("Warning: --json requires building with the 'json' feature");
    Ok(())
}

fn main() -> Result<()> {
    let matches = build_command().get_matches();

    let debug = matches.get_flag("debug");
    init_tracing(debug);
    debug!(
        "aplog-analyzer {} (git {})",
        env!("CARGO_PKG_VERSION"),
        option_env!("VERGEN_GIT_SHA").unwrap_or("unknown")
    );

    let config = build_config(&matches)?;
    let export_options = ExportOptions {
        csv: matches.get_flag("csv"),
        summary: matches.get_flag("summary"),
        json: matches.get_flag("json"),
        ascii: matches.get_flag("ascii"),
        plot_data: matches.get_flag("plot-data"),
        output_dir: matches.get_one::<String>("output-dir").cloned(),
    };

    let file_patterns: Vec<&String> = matches
        .get_many::<String>("files")
        .map(|values| values.collect())
        .unwrap_or_default();
    let valid_paths = collect_paths(&file_patterns, debug);

    if valid_paths.is_empty() {
        eprintln!("Error: No valid files found to process.");
        eprintln!("Supported extensions: .LOG, .TXT (case-insensitive)");
        eprintln!("Input patterns were: {file_patterns:?}");
        std::process::exit(1);
    }

    let mut processed_files = 0;
    for (index, path) in valid_paths.iter().enumerate() {
        if index > 0 {
            println!();
        }

        let filename = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("unknown");
        println!("Processing: {filename}");

        match process_file(path, &config, &export_options) {
            Ok(()) => processed_files += 1,
            Err(e) => {
                eprintln!("Error processing {filename}: {e:#}");
                eprintln!("Continuing with next file...");
            }
        }
    }

    if processed_files == 0 {
        eprintln!(
            "Error: No files were successfully processed out of {} files found.",
            valid_paths.len()
        );
        eprintln!("Use --debug flag for more detailed error information.");
        std::process::exit(1);
    }

    Ok(())
}
