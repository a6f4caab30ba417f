//! Single-pass flight metrics
//!
//! Every record updates the end time; speed, altitude and position records
//! update their running statistics in arrival order.

use crate::config::MetricSources;
use crate::conversion::haversine_distance_m;
use crate::error::AnalyzerError;
use crate::source::RecordCursor;
use crate::types::{FlightMetrics, GeoPoint, Record};
use crate::Result;
use tracing::debug;

/// Running aggregator over a record stream
#[derive(Debug, Clone)]
pub struct MetricsAccumulator {
    sources: MetricSources,
    metrics: FlightMetrics,
    last_position: Option<GeoPoint>,
}

impl MetricsAccumulator {
    pub fn new(sources: MetricSources) -> Self {
        Self {
            sources,
            metrics: FlightMetrics::default(),
            last_position: None,
        }
    }

    /// Fold one record into the running statistics
    pub fn observe(&mut self, record: &Record) {
        if self.metrics.records_scanned == 0 {
            self.metrics.start_time_us = record.timestamp_us;
        }
        self.metrics.records_scanned += 1;
        self.metrics.end_time_us = record.timestamp_us;

        if record.is_type(&self.sources.speed.type_tag) {
            if let Some(speed) = record.get_f64(&self.sources.speed.field) {
                self.metrics.max_speed = self.metrics.max_speed.max(speed);
            }
        }

        if record.is_type(&self.sources.altitude.type_tag) {
            if let Some(altitude) = record.get_f64(&self.sources.altitude.field) {
                self.metrics.max_altitude = self.metrics.max_altitude.max(altitude);
            }
        }

        if record.is_type(&self.sources.position_type) {
            if let (Some(lat), Some(lon)) = (
                record.get_f64(&self.sources.latitude_field),
                record.get_f64(&self.sources.longitude_field),
            ) {
                self.observe_position(GeoPoint::new(lat, lon));
            }
        }
    }

    fn observe_position(&mut self, position: GeoPoint) {
        let home = *self.metrics.home.get_or_insert(position);

        if let Some(previous) = self.last_position {
            self.metrics.total_distance += haversine_distance_m(previous, position);
        }
        self.last_position = Some(position);

        let from_home = haversine_distance_m(home, position);
        self.metrics.max_distance_from_home = self.metrics.max_distance_from_home.max(from_home);
        self.metrics.gps_fix_count += 1;
    }

    /// Snapshot of the statistics so far
    pub fn current(&self) -> &FlightMetrics {
        &self.metrics
    }

    /// Finalize; a scan that saw no records has no meaningful metrics
    pub fn finish(self) -> Result<FlightMetrics> {
        if self.metrics.records_scanned == 0 {
            return Err(AnalyzerError::EmptySource);
        }
        Ok(self.metrics)
    }
}

/// Run the metrics pass from the cursor's current position to end-of-stream
pub fn accumulate_metrics<C: RecordCursor + ?Sized>(
    cursor: &mut C,
    sources: &MetricSources,
) -> Result<FlightMetrics> {
    let mut accumulator = MetricsAccumulator::new(sources.clone());
    while let Some(record) = cursor.next_record()? {
        accumulator.observe(&record);
    }
    let metrics = accumulator.finish()?;
    debug!(
        "Metrics over {} records ({} GPS fixes)",
        metrics.records_scanned, metrics.gps_fix_count
    );
    Ok(metrics)
}
