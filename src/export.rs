//! Export functionality for analysis results
//!
//! Writes extracted rows, plot series and summaries to files. Sinks run
//! after analysis completes, so a failed write never touches the metrics
//! or rows held by the caller.

use crate::analysis::ExtractedSeries;
use crate::error::AnalyzerError;
use crate::report::{summary_entries, PlotSeries};
use crate::source::RecordCursor;
use crate::types::{FlightMetrics, Row};
use crate::Result;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Export options for controlling output artifacts
#[derive(Debug, Clone, Default)]
pub struct ExportOptions {
    pub csv: bool,
    pub summary: bool,
    pub json: bool,
    pub ascii: bool,
    pub plot_data: bool,
    pub output_dir: Option<String>,
}

/// Resolve (and create) the output directory: `output_dir` or the input's parent
pub fn resolve_output_dir(input_path: &Path, options: &ExportOptions) -> Result<PathBuf> {
    let dir = match options.output_dir {
        Some(ref dir) => PathBuf::from(dir),
        None => input_path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or(Path::new("."))
            .to_path_buf(),
    };

    if !dir.exists() {
        std::fs::create_dir_all(&dir).map_err(|e| AnalyzerError::sink(&dir, e))?;
        debug!("Created output directory: {:?}", dir);
    }
    Ok(dir)
}

fn case_name(input_path: &Path) -> &str {
    input_path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("flight")
}

/// `<dir>/<stem><suffix>`
pub fn artifact_path(input_path: &Path, output_dir: &Path, suffix: &str) -> PathBuf {
    output_dir.join(format!("{}{}", case_name(input_path), suffix))
}

/// `<dir>/<stem>_<TYPE>_data.csv`
pub fn csv_path_for(input_path: &Path, output_dir: &Path, type_tag: &str) -> PathBuf {
    artifact_path(input_path, output_dir, &format!("_{}_data.csv", type_tag))
}

/// Write rows to CSV with the first row's keys as header
///
/// Returns `false` without creating a file when there are no rows. Cells for
/// header keys a row lacks are left empty; keys outside the header are dropped.
#[cfg(feature = "csv")]
pub fn export_rows_to_csv(rows: &[Row], output_path: &Path) -> Result<bool> {
    let Some(first) = rows.first() else {
        warn!("No data to save for {:?}", output_path);
        return Ok(false);
    };

    let header: Vec<&str> = first.keys().collect();
    let mut writer =
        csv::Writer::from_path(output_path).map_err(|e| AnalyzerError::sink(output_path, e))?;
    writer
        .write_record(&header)
        .map_err(|e| AnalyzerError::sink(output_path, e))?;

    let mut dropped_keys = 0usize;
    for row in rows {
        dropped_keys += row.keys().filter(|k| !header.contains(k)).count();
        let cells: Vec<String> = header
            .iter()
            .map(|key| row.get(key).map(|v| v.to_string()).unwrap_or_default())
            .collect();
        writer
            .write_record(&cells)
            .map_err(|e| AnalyzerError::sink(output_path, e))?;
    }
    writer
        .flush()
        .map_err(|e| AnalyzerError::sink(output_path, e))?;

    if dropped_keys > 0 {
        warn!(
            "{} values outside the CSV header were dropped from {:?}",
            dropped_keys, output_path
        );
    }
    info!("Data saved to {:?}", output_path);
    Ok(true)
}

/// Export every non-empty series to its own CSV; returns the files written
#[cfg(feature = "csv")]
pub fn export_series_to_csv(
    input_path: &Path,
    series: &[ExtractedSeries],
    options: &ExportOptions,
) -> Result<Vec<PathBuf>> {
    let output_dir = resolve_output_dir(input_path, options)?;
    let mut written = Vec::new();
    for entry in series {
        let path = csv_path_for(input_path, &output_dir, entry.type_tag());
        if export_rows_to_csv(&entry.rows, &path)? {
            written.push(path);
        }
    }
    Ok(written)
}

/// Write plot inputs as columns: x, then each y series
#[cfg(feature = "csv")]
pub fn export_plot_series(plot: &PlotSeries, output_path: &Path) -> Result<bool> {
    if plot.is_empty() {
        warn!("No points to save for plot '{}'", plot.title);
        return Ok(false);
    }
    if let Some((label, ys)) = plot.series.iter().find(|(_, ys)| ys.len() != plot.x.len()) {
        return Err(AnalyzerError::InvalidRequest(format!(
            "plot '{}': series '{}' has {} points but x has {}",
            plot.title,
            label,
            ys.len(),
            plot.x.len()
        )));
    }

    let mut writer =
        csv::Writer::from_path(output_path).map_err(|e| AnalyzerError::sink(output_path, e))?;
    let mut header = vec![plot.x_label.clone()];
    header.extend(plot.series.iter().map(|(label, _)| label.clone()));
    writer
        .write_record(&header)
        .map_err(|e| AnalyzerError::sink(output_path, e))?;

    for (i, x) in plot.x.iter().enumerate() {
        let mut cells = vec![x.to_string()];
        cells.extend(plot.series.iter().map(|(_, ys)| ys[i].to_string()));
        writer
            .write_record(&cells)
            .map_err(|e| AnalyzerError::sink(output_path, e))?;
    }
    writer
        .flush()
        .map_err(|e| AnalyzerError::sink(output_path, e))?;

    info!("Plot data saved to {:?}", output_path);
    Ok(true)
}

/// Write the summary table as `label: value` lines
pub fn export_summary(metrics: &FlightMetrics, output_path: &Path) -> Result<()> {
    let write = || -> std::io::Result<()> {
        let mut writer = BufWriter::new(File::create(output_path)?);
        for entry in summary_entries(metrics) {
            writeln!(writer, "{}: {}", entry.label, entry.value)?;
        }
        writer.flush()
    };
    write().map_err(|e| AnalyzerError::sink(output_path, e))?;

    info!("Summary saved to {:?}", output_path);
    Ok(())
}

/// Write metrics, summary table and mode changes as one JSON document
#[cfg(feature = "json")]
pub fn export_summary_json(
    metrics: &FlightMetrics,
    mode_events: &[crate::types::ModeEvent],
    output_path: &Path,
) -> Result<()> {
    let document = serde_json::json!({
        "metrics": metrics,
        "flight_duration_s": metrics.flight_duration_s(),
        "summary": summary_entries(metrics),
        "mode_changes": mode_events,
    });

    let file = File::create(output_path).map_err(|e| AnalyzerError::sink(output_path, e))?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, &document)
        .map_err(|e| AnalyzerError::sink(output_path, e))?;
    writer
        .flush()
        .map_err(|e| AnalyzerError::sink(output_path, e))?;

    info!("JSON summary saved to {:?}", output_path);
    Ok(())
}

/// Dump every remaining record as one text line; returns the record count
pub fn export_ascii<C: RecordCursor + ?Sized>(cursor: &mut C, output_path: &Path) -> Result<usize> {
    let file = File::create(output_path).map_err(|e| AnalyzerError::sink(output_path, e))?;
    let mut writer = BufWriter::new(file);

    let mut count = 0;
    while let Some(record) = cursor.next_record()? {
        writeln!(writer, "{}", record).map_err(|e| AnalyzerError::sink(output_path, e))?;
        count += 1;
    }
    writer
        .flush()
        .map_err(|e| AnalyzerError::sink(output_path, e))?;

    info!("Log file saved as ASCII in {:?} ({} records)", output_path, count);
    Ok(count)
}
