use crate::analysis::ReferenceTime;
use crate::conversion::micros_to_seconds;
use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Latitude/longitude pair in decimal degrees
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct GeoPoint {
    pub latitude: f64,
    pub longitude: f64,
}

impl GeoPoint {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }
}

/// Flight-mode transition resolved to a symbolic name
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ModeEvent {
    /// Seconds since the session reference time
    pub relative_time: f64,
    pub mode_code: i64,
    pub mode_name: String,
}

impl fmt::Display for ModeEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Mode has been changed at {:.3} s to {}",
            self.relative_time, self.mode_name
        )
    }
}

/// Finalized single-pass flight statistics
///
/// Maxima start at zero, so a log whose tracked values are all negative
/// reports 0.0 for that maximum.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct FlightMetrics {
    /// Maximum ground speed (m/s)
    pub max_speed: f64,
    /// Maximum altitude (m)
    pub max_altitude: f64,
    /// Cumulative great-circle path length between consecutive fixes (m)
    pub total_distance: f64,
    /// Largest great-circle distance from the home position (m)
    pub max_distance_from_home: f64,
    /// First GPS fix of the scan
    pub home: Option<GeoPoint>,
    /// Raw timestamp of the first record scanned
    pub start_time_us: u64,
    /// Raw timestamp of the last record scanned
    pub end_time_us: u64,
    pub gps_fix_count: u64,
    pub records_scanned: u64,
}

impl FlightMetrics {
    /// Duration in raw microseconds (last record minus first record)
    pub fn flight_duration_us(&self) -> u64 {
        self.end_time_us.saturating_sub(self.start_time_us)
    }

    /// Duration in seconds
    pub fn flight_duration_s(&self) -> f64 {
        micros_to_seconds(self.flight_duration_us() as f64)
    }

    /// End of flight measured against the session's t0 rather than the first record
    pub fn duration_since_reference_s(&self, reference: &ReferenceTime) -> f64 {
        micros_to_seconds(self.end_time_us as f64 - reference.t0_us as f64)
    }

    pub fn has_gps_data(&self) -> bool {
        self.gps_fix_count > 0
    }
}
