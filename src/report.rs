//! Report inputs for external renderers
//!
//! The summary table and the plot series are plain data; writing them out
//! is left to `export` or to whatever renderer the caller uses.

use crate::conversion::format_with_unit;
use crate::source::TIME_US_FIELD;
use crate::types::{FlightMetrics, Row, TIMESTAMP_COLUMN};
use tracing::warn;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// One labelled, pre-formatted summary value
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SummaryEntry {
    pub label: String,
    pub value: String,
}

/// Fixed-order summary: duration, speed, altitude, distance, distance from home
pub fn summary_entries(metrics: &FlightMetrics) -> Vec<SummaryEntry> {
    [
        ("Flight duration", format_with_unit(metrics.flight_duration_s(), "s")),
        ("Max speed", format_with_unit(metrics.max_speed, "m/s")),
        ("Max altitude", format_with_unit(metrics.max_altitude, "m")),
        ("Total distance", format_with_unit(metrics.total_distance, "m")),
        (
            "Max distance from home",
            format_with_unit(metrics.max_distance_from_home, "m"),
        ),
    ]
    .into_iter()
    .map(|(label, value)| SummaryEntry {
        label: label.to_string(),
        value,
    })
    .collect()
}

/// Named x series with one or more y series
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PlotSeries {
    pub title: String,
    pub x_label: String,
    pub x: Vec<f64>,
    pub series: Vec<(String, Vec<f64>)>,
}

impl PlotSeries {
    pub fn len(&self) -> usize {
        self.x.len()
    }

    pub fn is_empty(&self) -> bool {
        self.x.is_empty()
    }
}

/// Plot the first field against the remaining ones
///
/// Rows lacking a numeric value for any plotted field are left out so the
/// series stay aligned. Needs at least two fields.
pub fn plot_series_from_rows(rows: &[Row], fields: &[String]) -> Option<PlotSeries> {
    if fields.len() < 2 {
        warn!("At least two fields are required for plotting.");
        return None;
    }

    let x_field = &fields[0];
    let y_fields = &fields[1..];
    let mut x = Vec::with_capacity(rows.len());
    let mut ys: Vec<Vec<f64>> = vec![Vec::with_capacity(rows.len()); y_fields.len()];

    for row in rows {
        let Some(x_value) = row.get_f64(x_field) else {
            continue;
        };
        let y_values: Option<Vec<f64>> = y_fields.iter().map(|f| row.get_f64(f)).collect();
        let Some(y_values) = y_values else {
            continue;
        };
        x.push(x_value);
        for (column, value) in ys.iter_mut().zip(y_values) {
            column.push(value);
        }
    }

    Some(PlotSeries {
        title: format!("{} vs {}", x_field, y_fields.join(", ")),
        x_label: x_field.clone(),
        x,
        series: y_fields.iter().cloned().zip(ys).collect(),
    })
}

/// Fields to plot for a batch of extracted rows, x axis first
///
/// The x axis is `Timestamp(s)` when the rows carry it, otherwise the raw
/// `TimeUS`. Every other numeric column of the first row becomes a y series.
/// Empty when there is no time column or nothing numeric to plot against it.
pub fn plot_fields(rows: &[Row]) -> Vec<String> {
    let Some(first) = rows.first() else {
        return Vec::new();
    };
    let x_field = if first.contains_key(TIMESTAMP_COLUMN) {
        TIMESTAMP_COLUMN
    } else if first.contains_key(TIME_US_FIELD) {
        TIME_US_FIELD
    } else {
        return Vec::new();
    };

    let mut fields = vec![x_field.to_string()];
    fields.extend(
        first
            .iter()
            .filter(|(key, value)| {
                *key != TIMESTAMP_COLUMN && *key != TIME_US_FIELD && value.as_f64().is_some()
            })
            .map(|(key, _)| key.to_string()),
    );
    if fields.len() < 2 {
        return Vec::new();
    }
    fields
}

/// Altitude over flight-relative time from rows carrying `Timestamp(s)`
pub fn altitude_profile(rows: &[Row], altitude_field: &str) -> PlotSeries {
    let fields = vec![TIMESTAMP_COLUMN.to_string(), altitude_field.to_string()];
    let mut series = plot_series_from_rows(rows, &fields).unwrap_or_else(|| PlotSeries {
        title: String::new(),
        x_label: String::new(),
        x: Vec::new(),
        series: Vec::new(),
    });
    series.title = "Altitude over Time".to_string();
    series.x_label = "Time (s)".to_string();
    series
}
