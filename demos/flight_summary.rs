//! Flight Summary Example
//!
//! Opens a text DataFlash log, prints the mode changes and the summary
//! table, and exports the GPS speed series to CSV.
//!
//! Binary `.bin` logs must be converted to the text format (with FMT lines)
//! first, e.g. with Mission Planner's "Convert .bin to .log".

use aplog_analyzer::{
    export_rows_to_csv, open_log_file, resolve_output_dir, summary_entries, csv_path_for,
    AnalysisConfig, ExportOptions,
};
use std::path::Path;

fn main() -> anyhow::Result<()> {
    let input_file = std::env::args().nth(1).unwrap_or_else(|| {
        println!("Usage: flight_summary <input.log> [output_dir]");
        println!("Example: flight_summary 00000042.log ./output");
        std::process::exit(1);
    });
    let output_dir = std::env::args().nth(2);
    let input_path = Path::new(&input_file);

    println!("Analyzing: {}", input_file);
    let mut session = open_log_file(input_path, AnalysisConfig::default())?;
    let reference = session.reference_time();
    if !reference.from_format_record {
        println!("  (no FMTU record, using first record as log start)");
    }

    println!("\nMode changes:");
    for event in session.mode_changes()? {
        println!("  {}", event?);
    }

    let metrics = session.metrics()?;
    println!("\nSummary:");
    for entry in summary_entries(&metrics) {
        println!("  {}: {}", entry.label, entry.value);
    }

    let rows = session.extract("GPS", Some(&["TimeUS".to_string(), "Spd".to_string()]))?;
    let export_opts = ExportOptions {
        csv: true,
        output_dir,
        ..Default::default()
    };
    let dir = resolve_output_dir(input_path, &export_opts)?;
    let csv_path = csv_path_for(input_path, &dir, "GPS");
    if export_rows_to_csv(&rows, &csv_path)? {
        println!("\n✓ GPS speed exported to {}", csv_path.display());
    }

    Ok(())
}
