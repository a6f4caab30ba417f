//! Unit conversion utilities for DataFlash telemetry
//!
//! Contains the time-base conversions used to normalize raw microsecond
//! timestamps and the great-circle distance used by the metrics pass.

use crate::types::GeoPoint;

/// Mean Earth radius in meters
pub const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// Raw timestamps (`TimeUS`) are microseconds
pub const MICROS_PER_SECOND: f64 = 1_000_000.0;

/// Convert a raw microsecond quantity to seconds
pub fn micros_to_seconds(raw_us: f64) -> f64 {
    raw_us / MICROS_PER_SECOND
}

/// Seconds elapsed between the reference time and a raw timestamp
///
/// Negative when the timestamp precedes the reference (records logged
/// before the first format-unit record).
pub fn relative_seconds(raw_us: f64, t0_us: u64) -> f64 {
    micros_to_seconds(raw_us - t0_us as f64)
}

/// Great-circle distance between two positions (haversine), in meters
pub fn haversine_distance_m(from: GeoPoint, to: GeoPoint) -> f64 {
    let dlat = (to.latitude - from.latitude).to_radians();
    let dlon = (to.longitude - from.longitude).to_radians();
    let a = (dlat / 2.0).sin().powi(2)
        + from.latitude.to_radians().cos()
            * to.latitude.to_radians().cos()
            * (dlon / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());
    EARTH_RADIUS_M * c
}

/// Format a value with two decimals and a unit suffix for summary tables
pub fn format_with_unit(value: f64, unit: &str) -> String {
    format!("{:.2} {}", value, unit)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_relative_seconds() {
        assert!((relative_seconds(2000.0, 1000) - 0.001).abs() < 1e-12);
        assert!((relative_seconds(3_000_000.0, 1_000_000) - 2.0).abs() < 1e-12);
        assert!(relative_seconds(500.0, 1000) < 0.0);
    }

    #[test]
    fn test_haversine_same_point_is_zero() {
        let p = GeoPoint::new(-35.363261, 149.165230);
        assert_eq!(haversine_distance_m(p, p), 0.0);
    }

    #[test]
    fn test_haversine_one_millidegree_at_equator() {
        let d = haversine_distance_m(GeoPoint::new(0.0, 0.0), GeoPoint::new(0.0, 0.001));
        // 2 * pi * 6371 km / 360 / 1000
        assert!((d - 111.19).abs() < 0.01, "got {d}");
    }

    #[test]
    fn test_haversine_is_symmetric() {
        let a = GeoPoint::new(37.5665, 126.9780);
        let b = GeoPoint::new(37.5700, 126.9900);
        let ab = haversine_distance_m(a, b);
        let ba = haversine_distance_m(b, a);
        assert!((ab - ba).abs() < 1e-9);
        assert!(ab > 1000.0 && ab < 1200.0, "got {ab}");
    }

    #[test]
    fn test_format_with_unit() {
        assert_eq!(format_with_unit(12.3456, "m/s"), "12.35 m/s");
        assert_eq!(format_with_unit(0.0, "m"), "0.00 m");
    }
}
